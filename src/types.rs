//! Core types and constants shared by the forecasting engine.

use bevy::prelude::*;

/// System set containing every forecasting system.
///
/// Host apps that feed a [`FlightContext`](crate::context::FlightContext)
/// should update it before this set runs.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForecastSystems {
    /// Vessel snapshot refresh and thrust aggregation (runs first)
    VesselState,
    /// Event predictors and report publishing
    Predict,
}

/// Physical constants (SI units unless noted)

/// Standard gravity (m/s²), used to turn Isp into mass flow
pub const G0: f64 = 9.80665;

/// Net thrust below this (kN) means the vessel cannot accelerate
pub const THRUST_EPSILON: f64 = 1e-6;

/// Accelerations smaller than this (m/s²) are treated as zero
pub const ACCEL_EPSILON: f64 = 1e-6;

/// Default refresh interval for throttled computations (seconds of real time)
pub const DEFAULT_REFRESH_INTERVAL: f64 = 0.25;

/// Simulation clock tracking universal time.
#[derive(Resource, Clone, Debug)]
pub struct SimulationTime {
    /// Current universal time in seconds
    pub current: f64,
    /// Time warp multiplier (1.0 = real time)
    pub warp: f64,
    /// Whether simulation is paused
    pub paused: bool,
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::at_ut(0.0)
    }
}

impl SimulationTime {
    /// Create a clock starting at a specific universal time
    pub fn at_ut(seconds: f64) -> Self {
        Self {
            current: seconds,
            warp: 1.0,
            paused: false,
        }
    }
}

/// Pair of clocks handed to every predictor call.
///
/// `real` drives refresh throttling, `ut` drives orbital math.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    /// Real elapsed seconds since app start
    pub real: f64,
    /// Universal time in seconds
    pub ut: f64,
}

impl Clock {
    pub fn new(real: f64, ut: f64) -> Self {
        Self { real, ut }
    }
}
