//! Burn Forecast - burn-time and event prediction for spacecraft
//!
//! Every tick the forecaster estimates how long the engines must fire to
//! deliver a given velocity change, and when the next event that calls for
//! such a burn happens: surface impact, closest approach to a target,
//! atmosphere crossing, or a planned maneuver node.

pub mod body;
pub mod burn;
pub mod cache;
pub mod context;
pub mod error;
pub mod forecast;
pub mod orbit;
pub mod prediction;
pub mod scenarios;
pub mod settings;
pub mod tally;
pub mod time;
pub mod types;
pub mod vessel;

#[cfg(test)]
mod proptest_burn;
#[cfg(test)]
mod proptest_orbit;
#[cfg(test)]
pub mod test_utils;

pub use burn::{BurnEstimate, BurnModel};
pub use context::FlightContext;
pub use error::ForecastError;
pub use forecast::{ForecastPlugin, ForecastReport, Forecaster};
pub use prediction::{EventForecast, EventKind, EventPrediction, PredictionOutcome};
pub use settings::ForecastSettings;
