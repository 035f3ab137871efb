//! Planned maneuver nodes.

use super::{EventKind, EventPrediction, EventPredictor, PredictionInput};
use crate::context::FlightContext;
use crate::error::{ForecastError, ensure_finite};
use crate::settings::ForecastSettings;

/// Below this (m/s) a node plans no burn at all.
const MIN_NODE_DV: f64 = 1e-6;

/// Reports the next planned maneuver node.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManeuverPredictor;

impl EventPredictor for ManeuverPredictor {
    const NAME: &'static str = "maneuver";

    fn enabled(settings: &ForecastSettings) -> bool {
        settings.maneuver.enabled
    }

    fn applies(ctx: &FlightContext) -> bool {
        ctx.maneuver.is_some()
    }

    fn predict(
        input: &PredictionInput<'_>,
        _settings: &ForecastSettings,
    ) -> Result<Option<EventPrediction>, ForecastError> {
        predict_maneuver(input.ctx, input.ut)
    }
}

/// The context's maneuver node, if it lies in the future and plans a burn.
pub fn predict_maneuver(
    ctx: &FlightContext,
    ut: f64,
) -> Result<Option<EventPrediction>, ForecastError> {
    let Some(node) = ctx.maneuver else {
        return Ok(None);
    };
    let node_ut = ensure_finite(node.ut, "node time", "maneuver prediction")?;
    if node_ut <= ut {
        return Ok(None);
    }

    let dv = ensure_finite(node.delta_v.length(), "node delta-v", "maneuver prediction")?;
    if dv < MIN_NODE_DV {
        return Ok(None);
    }

    Ok(Some(
        EventPrediction::new(EventKind::ManeuverNode, node_ut).with_required_dv(dv),
    ))
}
