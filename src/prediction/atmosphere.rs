//! Atmosphere boundary crossings.

use super::{EventKind, EventPrediction, EventPredictor, PredictionInput};
use crate::context::FlightContext;
use crate::error::{ForecastError, ensure_finite};
use crate::orbit::Orbit;
use crate::settings::{AtmosphereSettings, ForecastSettings};

/// Predicts the next atmosphere entry or exit.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtmospherePredictor;

impl EventPredictor for AtmospherePredictor {
    const NAME: &'static str = "atmosphere transition";

    fn enabled(settings: &ForecastSettings) -> bool {
        settings.atmosphere.enabled
    }

    fn applies(ctx: &FlightContext) -> bool {
        ctx.body.atmosphere_radius().is_some() && !ctx.situation.is_grounded()
    }

    fn predict(
        input: &PredictionInput<'_>,
        settings: &ForecastSettings,
    ) -> Result<Option<EventPrediction>, ForecastError> {
        predict_atmosphere_transition(input.ctx, input.ut, &settings.atmosphere)
    }
}

/// Bisect `f` on `[lower, upper]`, where `f(lower)` and `f(upper)` differ in sign.
///
/// Keeps whichever half still brackets the root and returns the final midpoint.
pub fn bisect(mut lower: f64, mut upper: f64, iterations: usize, f: impl Fn(f64) -> f64) -> f64 {
    let mut f_lower = f(lower);
    for _ in 0..iterations {
        let mid = 0.5 * (lower + upper);
        let f_mid = f(mid);
        if (f_mid < 0.0) == (f_lower < 0.0) {
            lower = mid;
            f_lower = f_mid;
        } else {
            upper = mid;
        }
    }
    0.5 * (lower + upper)
}

/// Step along `orbit` from `ut` looking for a crossing of `boundary`.
///
/// Returns `None` if the vessel reaches `surface` first or the look-ahead
/// runs out.
pub fn find_boundary_crossing(
    orbit: &Orbit,
    ut: f64,
    boundary: f64,
    surface: f64,
    settings: &AtmosphereSettings,
) -> Option<f64> {
    let height = |t: f64| orbit.radius_at(t) - boundary;
    let horizon = ut + settings.max_look_ahead;

    let mut t0 = ut;
    let mut h0 = height(t0);
    while t0 < horizon {
        let t1 = (t0 + settings.step).min(horizon);
        let h1 = height(t1);
        if (h1 < 0.0) != (h0 < 0.0) {
            return Some(bisect(t0, t1, settings.bisection_iterations, height));
        }
        if h1 + boundary < surface {
            return None;
        }
        t0 = t1;
        h0 = h1;
    }
    None
}

/// Predict the next atmosphere entry (from outside) or exit (from inside).
pub fn predict_atmosphere_transition(
    ctx: &FlightContext,
    ut: f64,
    settings: &AtmosphereSettings,
) -> Result<Option<EventPrediction>, ForecastError> {
    let Some(boundary) = ctx.body.atmosphere_radius() else {
        return Ok(None);
    };
    if ctx.situation.is_grounded() {
        return Ok(None);
    }

    let orbit = ctx.orbit(ut)?;
    let inside = ctx.position.length() < boundary;

    let kind = if inside {
        if !(orbit.is_hyperbolic() || orbit.apoapsis() > boundary) {
            return Ok(None);
        }
        EventKind::AtmosphereExit
    } else {
        if orbit.periapsis() >= boundary {
            return Ok(None);
        }
        if orbit.is_hyperbolic() && orbit.is_outbound_at(ut) {
            return Ok(None);
        }
        EventKind::AtmosphereEntry
    };

    let Some(crossing) = find_boundary_crossing(&orbit, ut, boundary, ctx.body.radius, settings) else {
        return Ok(None);
    };
    let crossing = ensure_finite(crossing, "crossing time", "atmosphere prediction")?;

    Ok(Some(EventPrediction::new(kind, crossing)))
}
