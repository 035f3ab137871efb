//! Forecast configuration.
//!
//! Hosts insert or mutate [`ForecastSettings`] at runtime; the forecaster
//! reads it every tick. Loading and persisting it is the host's job.

use bevy::prelude::*;

use crate::burn::BurnModel;
use crate::error::ForecastError;
use crate::types::DEFAULT_REFRESH_INTERVAL;

/// Global forecasting settings.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct ForecastSettings {
    /// Always use constant-acceleration burn times
    pub force_simple_model: bool,
    /// Host cheat: engines never run dry
    pub infinite_propellant: bool,
    /// Seconds of real time between recomputations
    pub refresh_interval: f64,
    pub impact: ImpactSettings,
    pub approach: ApproachSettings,
    pub atmosphere: AtmosphereSettings,
    pub maneuver: ManeuverSettings,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            force_simple_model: false,
            infinite_propellant: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            impact: ImpactSettings::default(),
            approach: ApproachSettings::default(),
            atmosphere: AtmosphereSettings::default(),
            maneuver: ManeuverSettings::default(),
        }
    }
}

/// Surface impact prediction.
#[derive(Clone, Debug, PartialEq)]
pub struct ImpactSettings {
    pub enabled: bool,
    /// Slowest descent still treated as falling (m/s)
    pub min_fall_speed: f64,
    /// Impacts further ahead than this are not reported (s)
    pub max_time_until: f64,
    /// At most this many parts are checked for the lowest point
    pub max_parts_examined: usize,
}

impl Default for ImpactSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_fall_speed: 1.0,
            max_time_until: 3_600.0,
            max_parts_examined: 30,
        }
    }
}

/// Closest approach to the selected target.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproachSettings {
    pub enabled: bool,
    /// Closer than this (m) while slower than `min_relative_speed` means already there
    pub min_separation: f64,
    /// Relative speed (m/s) below which a close target counts as docked
    pub min_relative_speed: f64,
    /// Approaches farther than this (m) are not reported
    pub max_distance: f64,
    /// Samples per search pass
    pub samples: usize,
    /// Refinement passes
    pub iterations: usize,
}

impl Default for ApproachSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_separation: 1.0,
            min_relative_speed: 0.01,
            max_distance: 10_000.0,
            samples: 20,
            iterations: 8,
        }
    }
}

/// Atmosphere boundary crossings.
#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereSettings {
    pub enabled: bool,
    /// Coarse search step (s)
    pub step: f64,
    /// How far ahead to search (s)
    pub max_look_ahead: f64,
    /// Bisection passes once a crossing is bracketed
    pub bisection_iterations: usize,
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            step: 30.0,
            max_look_ahead: 7_200.0,
            bisection_iterations: 10,
        }
    }
}

/// Planned maneuver nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct ManeuverSettings {
    pub enabled: bool,
}

impl Default for ManeuverSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ForecastSettings {
    /// Model the burn solver should use under these settings.
    pub fn burn_model(&self) -> BurnModel {
        if self.force_simple_model || self.infinite_propellant {
            BurnModel::Simple
        } else {
            BurnModel::VariableMass
        }
    }

    /// Reject intervals and thresholds that would stall or break the searches.
    pub fn validate(&self) -> Result<(), ForecastError> {
        positive("refresh_interval", self.refresh_interval)?;
        positive("impact.min_fall_speed", self.impact.min_fall_speed)?;
        positive("impact.max_time_until", self.impact.max_time_until)?;
        positive("approach.min_separation", self.approach.min_separation)?;
        positive("approach.min_relative_speed", self.approach.min_relative_speed)?;
        positive("approach.max_distance", self.approach.max_distance)?;
        positive("atmosphere.step", self.atmosphere.step)?;
        positive("atmosphere.max_look_ahead", self.atmosphere.max_look_ahead)?;
        at_least("impact.max_parts_examined", self.impact.max_parts_examined, 1)?;
        at_least("approach.samples", self.approach.samples, 2)?;
        at_least("approach.iterations", self.approach.iterations, 1)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ForecastError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ForecastError::InvalidSetting { name, value })
    }
}

fn at_least(name: &'static str, value: usize, min: usize) -> Result<(), ForecastError> {
    if value >= min {
        Ok(())
    } else {
        Err(ForecastError::InvalidSetting {
            name,
            value: value as f64,
        })
    }
}
