//! Error type shared by the forecasting engine.

/// Internal failure of a forecast computation.
///
/// An inapplicable scenario (no target, already landed, ...) is never an
/// error; it is reported as [`PredictionOutcome::Absent`](crate::prediction::PredictionOutcome).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("position is {radius} m from the body center (inside the body core)")]
    InsideBody { radius: f64 },

    #[error("degenerate orbit: specific angular momentum {angular_momentum} m²/s")]
    DegenerateOrbit { angular_momentum: f64 },

    #[error("parabolic orbit (specific energy {energy} m²/s²) cannot be propagated")]
    ParabolicOrbit { energy: f64 },

    #[error("invalid gravitational parameter {0} (must be positive)")]
    InvalidGravitationalParameter(f64),

    #[error("non-finite {quantity} during {stage}")]
    NonFinite {
        quantity: &'static str,
        stage: &'static str,
    },

    #[error("vessel '{0}' has no parts")]
    EmptyVessel(String),

    #[error("invalid setting {name} = {value}")]
    InvalidSetting { name: &'static str, value: f64 },
}

/// Check that a computed quantity is finite.
pub(crate) fn ensure_finite(
    value: f64,
    quantity: &'static str,
    stage: &'static str,
) -> Result<f64, ForecastError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ForecastError::NonFinite { quantity, stage })
    }
}
