//! Event predictors.
//!
//! Each predictor answers "when will this happen, and how much velocity
//! change does it call for?" for one kind of event. Predictors are throttled:
//! they recompute at most once per refresh interval and serve their last
//! answer in between. Event times are stored as absolute universal time, so
//! the time remaining stays current between refreshes.

pub mod approach;
pub mod atmosphere;
pub mod impact;
pub mod maneuver;

#[cfg(test)]
mod proptest_prediction;

use bevy::prelude::*;

use crate::burn::BurnEstimate;
use crate::cache::Throttled;
use crate::context::FlightContext;
use crate::error::ForecastError;
use crate::settings::ForecastSettings;
use crate::vessel::PropulsionInventory;

pub use approach::ClosestApproachPredictor;
pub use atmosphere::AtmospherePredictor;
pub use impact::ImpactPredictor;
pub use maneuver::ManeuverPredictor;

/// Result of a prediction.
#[derive(Clone, Debug, PartialEq)]
pub enum PredictionOutcome<T> {
    /// A prediction is available
    Ready(T),
    /// The event does not apply right now
    Absent,
    /// The computation broke down
    Failed(ForecastError),
}

impl<T> Default for PredictionOutcome<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> PredictionOutcome<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn error(&self) -> Option<&ForecastError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PredictionOutcome<U> {
        match self {
            Self::Ready(value) => PredictionOutcome::Ready(f(value)),
            Self::Absent => PredictionOutcome::Absent,
            Self::Failed(err) => PredictionOutcome::Failed(err),
        }
    }
}

impl<T: Clone> PredictionOutcome<T> {
    /// On failure, fall back to `previous` if it held a ready value.
    pub fn or_previous(self, previous: &Self) -> Self {
        match (self, previous) {
            (Self::Failed(_), Self::Ready(value)) => Self::Ready(value.clone()),
            (outcome, _) => outcome,
        }
    }
}

impl<T> From<Result<Option<T>, ForecastError>> for PredictionOutcome<T> {
    fn from(result: Result<Option<T>, ForecastError>) -> Self {
        match result {
            Ok(Some(value)) => Self::Ready(value),
            Ok(None) => Self::Absent,
            Err(err) => Self::Failed(err),
        }
    }
}

/// What kind of event a prediction describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Survivable landing
    Touchdown,
    /// Landing in water
    Splash,
    /// Crash
    Impact,
    ClosestApproach,
    AtmosphereEntry,
    AtmosphereExit,
    ManeuverNode,
}

impl EventKind {
    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Touchdown => "touchdown",
            Self::Splash => "splash",
            Self::Impact => "impact",
            Self::ClosestApproach => "closest approach",
            Self::AtmosphereEntry => "atmosphere entry",
            Self::AtmosphereExit => "atmosphere exit",
            Self::ManeuverNode => "maneuver",
        }
    }

    /// Fraction of the burn that should happen before the event.
    ///
    /// A landing burn has to be finished by touchdown; a rendezvous or
    /// planned node burn is centered on the event.
    pub fn burn_lead_fraction(self) -> f64 {
        match self {
            Self::Touchdown | Self::Splash | Self::Impact => 1.0,
            _ => 0.5,
        }
    }
}

/// A predicted event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventPrediction {
    pub kind: EventKind,
    /// Universal time of the event (s)
    pub event_ut: f64,
    /// Velocity change the event calls for (m/s), if any
    pub required_dv: Option<f64>,
    /// Speed at impact (m/s)
    pub impact_speed: Option<f64>,
    /// Impact classified as survivable
    pub survivable: Option<bool>,
    /// Separation at closest approach (m)
    pub distance: Option<f64>,
}

impl EventPrediction {
    pub fn new(kind: EventKind, event_ut: f64) -> Self {
        Self {
            kind,
            event_ut,
            required_dv: None,
            impact_speed: None,
            survivable: None,
            distance: None,
        }
    }

    pub fn with_required_dv(mut self, dv: f64) -> Self {
        self.required_dv = Some(dv);
        self
    }

    /// Seconds until the event at universal time `ut`, never negative.
    pub fn time_until(&self, ut: f64) -> f64 {
        (self.event_ut - ut).max(0.0)
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// An event prediction paired with the burn it calls for.
#[derive(Clone, Debug, PartialEq)]
pub struct EventForecast {
    pub prediction: EventPrediction,
    /// `None` for events without a velocity change
    pub burn: Option<BurnEstimate>,
    /// Universal time the burn should start (s)
    pub burn_start_ut: Option<f64>,
}

impl EventForecast {
    pub fn new(prediction: EventPrediction, burn: Option<BurnEstimate>) -> Self {
        let burn_start_ut = burn.filter(BurnEstimate::is_possible).map(|burn| {
            prediction.event_ut - burn.duration * prediction.kind.burn_lead_fraction()
        });
        Self {
            prediction,
            burn,
            burn_start_ut,
        }
    }

    /// Seconds until the burn should start; negative once it is overdue.
    pub fn time_to_burn(&self, ut: f64) -> Option<f64> {
        self.burn_start_ut.map(|start| start - ut)
    }
}

/// What a predictor sees on a refresh.
#[derive(Clone, Copy, Debug)]
pub struct PredictionInput<'a> {
    pub ctx: &'a FlightContext,
    /// Structural scan of the vessel, when one is cached
    pub inventory: Option<&'a PropulsionInventory>,
    /// Universal time of the refresh (s)
    pub ut: f64,
}

impl<'a> PredictionInput<'a> {
    pub fn new(ctx: &'a FlightContext, ut: f64) -> Self {
        Self {
            ctx,
            inventory: None,
            ut,
        }
    }

    pub fn with_inventory(mut self, inventory: Option<&'a PropulsionInventory>) -> Self {
        self.inventory = inventory;
        self
    }
}

/// One kind of event prediction.
pub trait EventPredictor {
    /// Name used in log messages.
    const NAME: &'static str;

    fn enabled(settings: &ForecastSettings) -> bool;

    /// Cheap check that the event can happen at all in `ctx`.
    ///
    /// A slot whose predictor stops applying (target deselected, node
    /// deleted, vessel landed) drops its cached result immediately instead
    /// of waiting for the next refresh.
    fn applies(ctx: &FlightContext) -> bool;

    /// Compute the prediction. `Ok(None)` means the event does not apply.
    fn predict(
        input: &PredictionInput<'_>,
        settings: &ForecastSettings,
    ) -> Result<Option<EventPrediction>, ForecastError>;
}

/// A predictor plus its throttled result.
#[derive(Clone, Debug)]
pub struct PredictorSlot<P> {
    cache: Throttled<PredictionOutcome<EventPrediction>>,
    predictor: std::marker::PhantomData<P>,
}

impl<P> Default for PredictorSlot<P> {
    fn default() -> Self {
        Self {
            cache: Throttled::default(),
            predictor: std::marker::PhantomData,
        }
    }
}

impl<P: EventPredictor> PredictorSlot<P> {
    /// Refresh if due at real time `now` and return the current outcome.
    ///
    /// A missing input (no active vessel), a disabled predictor, or a
    /// context the predictor no longer applies to resets the slot to absent.
    pub fn update(
        &mut self,
        input: Option<PredictionInput<'_>>,
        now: f64,
        settings: &ForecastSettings,
    ) -> &PredictionOutcome<EventPrediction> {
        let input = input.filter(|input| P::enabled(settings) && P::applies(input.ctx));
        let Some(input) = input else {
            self.reset();
            return self.cache.get();
        };

        self.cache.set_ttl(settings.refresh_interval);
        self.cache.refresh_with(now, |previous| {
            let outcome = PredictionOutcome::from(P::predict(&input, settings));
            if let PredictionOutcome::Failed(err) = &outcome {
                warn!("{} prediction failed: {err}", P::NAME);
            }
            outcome.or_previous(previous)
        })
    }

    pub fn outcome(&self) -> &PredictionOutcome<EventPrediction> {
        self.cache.get()
    }

    /// Recompute on the next update.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Drop the current result and recompute on the next update.
    pub fn reset(&mut self) {
        self.cache.overwrite(PredictionOutcome::Absent);
        self.cache.invalidate();
    }
}
