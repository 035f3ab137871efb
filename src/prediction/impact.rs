//! Surface impact prediction.
//!
//! Treats the remaining descent as a straight fall under constant net
//! acceleration: gravity minus the centrifugal relief from horizontal
//! motion. Thrust and drag are ignored, so the prediction answers "when do
//! I hit the ground if I do nothing".

use bevy::math::DVec3;

use super::{EventKind, EventPrediction, EventPredictor, PredictionInput};
use crate::context::FlightContext;
use crate::error::{ForecastError, ensure_finite};
use crate::settings::{ForecastSettings, ImpactSettings};
use crate::types::ACCEL_EPSILON;
use crate::vessel::{Collider, PropulsionInventory};

/// Predicts when the vessel hits the surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImpactPredictor;

impl EventPredictor for ImpactPredictor {
    const NAME: &'static str = "impact";

    fn enabled(settings: &ForecastSettings) -> bool {
        settings.impact.enabled
    }

    fn applies(ctx: &FlightContext) -> bool {
        !ctx.situation.is_grounded()
    }

    fn predict(
        input: &PredictionInput<'_>,
        settings: &ForecastSettings,
    ) -> Result<Option<EventPrediction>, ForecastError> {
        predict_impact(input.ctx, input.inventory, input.ut, &settings.impact)
    }
}

/// The part of the vessel that touches down first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowestPoint {
    /// Vessel-center radius minus the lowest collider radius (m)
    pub offset: f64,
    /// Crash tolerance of the lowest part (m/s)
    pub crash_tolerance: f64,
}

/// Find the lowest point among colliding parts.
///
/// Only the `max_parts` parts whose origins sit nearest the body center are
/// examined. Uses the inventory's collider list when it describes `ctx.vessel`.
pub fn lowest_point(
    ctx: &FlightContext,
    inventory: Option<&PropulsionInventory>,
    max_parts: usize,
) -> Option<LowestPoint> {
    let parts = &ctx.vessel.parts;
    let candidate = |index: usize| -> Option<(f64, Collider)> {
        let part = parts.get(index)?;
        let collider = part.collider?;
        Some(((ctx.position + part.offset).length(), collider))
    };

    let mut candidates: Vec<(f64, Collider)> = match inventory {
        Some(inventory) if inventory.matches(&ctx.vessel) => inventory
            .colliding_parts
            .iter()
            .filter_map(|&index| candidate(index))
            .collect(),
        _ => (0..parts.len()).filter_map(candidate).collect(),
    };

    if candidates.len() > max_parts {
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.truncate(max_parts);
    }

    let (radius, collider) = candidates
        .into_iter()
        .map(|(origin_radius, collider)| (origin_radius - collider.radius, collider))
        .min_by(|a, b| a.0.total_cmp(&b.0))?;

    Some(LowestPoint {
        offset: ctx.position.length() - radius,
        crash_tolerance: collider.crash_tolerance,
    })
}

/// Net downward acceleration (m/s²): gravity less centrifugal relief.
///
/// a = GM/r² − v_h²/r
#[inline]
pub fn net_downward_acceleration(gm: f64, radius: f64, horizontal_speed: f64) -> f64 {
    gm / (radius * radius) - horizontal_speed * horizontal_speed / radius
}

/// Time (s) to fall `clearance` meters starting at `fall_speed` with
/// constant downward acceleration `accel`.
///
/// Solves 0 = c − v·t − ½·a·t² for the positive root. Returns `None` when
/// the vessel turns around before reaching the ground.
pub fn fall_time(clearance: f64, fall_speed: f64, accel: f64) -> Option<f64> {
    let clearance = clearance.max(0.0);
    if accel.abs() < ACCEL_EPSILON {
        return Some(clearance / fall_speed);
    }

    let discriminant = fall_speed * fall_speed + 2.0 * accel * clearance;
    if discriminant < 0.0 {
        return None;
    }

    // Rationalized root, no cancellation when a·c is small
    Some(2.0 * clearance / (fall_speed + discriminant.sqrt()))
}

/// Predict the next surface impact.
pub fn predict_impact(
    ctx: &FlightContext,
    inventory: Option<&PropulsionInventory>,
    ut: f64,
    settings: &ImpactSettings,
) -> Result<Option<EventPrediction>, ForecastError> {
    if ctx.situation.is_grounded() {
        return Ok(None);
    }

    let fall_speed = -ctx.vertical_speed();
    if fall_speed < settings.min_fall_speed {
        return Ok(None);
    }

    let periapsis_altitude = match ctx.orbit(ut) {
        Ok(orbit) => orbit.periapsis() - ctx.body.radius,
        // Radial fall goes straight through the center
        Err(ForecastError::DegenerateOrbit { .. }) => -ctx.body.radius,
        Err(err) => return Err(err),
    };
    if periapsis_altitude >= ctx.body.safe_altitude() {
        return Ok(None);
    }

    let lowest = lowest_point(ctx, inventory, settings.max_parts_examined).unwrap_or(LowestPoint {
        offset: 0.0,
        crash_tolerance: 0.0,
    });

    let over_water = ctx.body.has_ocean && ctx.terrain_altitude < 0.0;
    let clearance = if over_water {
        ctx.altitude() - lowest.offset
    } else {
        ctx.altitude_above_terrain() - lowest.offset
    };

    let radius = ctx.position.length();
    let horizontal_speed = ctx.horizontal_speed();
    let accel = net_downward_acceleration(ctx.body.gm, radius, horizontal_speed);

    let Some(time) = fall_time(clearance, fall_speed, accel) else {
        return Ok(None);
    };
    let time = ensure_finite(time, "fall time", "impact prediction")?;
    if time > settings.max_time_until {
        return Ok(None);
    }

    let vertical_at_impact = fall_speed + accel * time;
    let impact_speed = ensure_finite(
        DVec3::new(vertical_at_impact, horizontal_speed, 0.0).length(),
        "impact speed",
        "impact prediction",
    )?;

    // Water landings are never classified as survivable
    let survivable = impact_speed < lowest.crash_tolerance && !over_water;
    let kind = if over_water {
        EventKind::Splash
    } else if survivable {
        EventKind::Touchdown
    } else {
        EventKind::Impact
    };

    let mut prediction = EventPrediction::new(kind, ut + time).with_required_dv(impact_speed);
    prediction.impact_speed = Some(impact_speed);
    prediction.survivable = Some(survivable);
    Ok(Some(prediction))
}
