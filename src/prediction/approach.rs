//! Closest approach to the selected target.
//!
//! Both vessel and target are propagated on their own conics around the same
//! body. The search samples one orbital period, then repeatedly zooms in on
//! the best sample.

use std::f64::consts::TAU;

use super::{EventKind, EventPrediction, EventPredictor, PredictionInput};
use crate::context::FlightContext;
use crate::error::{ForecastError, ensure_finite};
use crate::orbit::Orbit;
use crate::settings::{ApproachSettings, ForecastSettings};

/// Predicts the next closest approach to the target.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClosestApproachPredictor;

impl EventPredictor for ClosestApproachPredictor {
    const NAME: &'static str = "closest approach";

    fn enabled(settings: &ForecastSettings) -> bool {
        settings.approach.enabled
    }

    fn applies(ctx: &FlightContext) -> bool {
        ctx.target.is_some() && !ctx.situation.is_grounded()
    }

    fn predict(
        input: &PredictionInput<'_>,
        settings: &ForecastSettings,
    ) -> Result<Option<EventPrediction>, ForecastError> {
        predict_closest_approach(input.ctx, input.ut, &settings.approach)
    }
}

/// Time and separation of the closest approach found by [`find_closest_approach`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Approach {
    pub ut: f64,
    pub distance: f64,
}

/// Length of the search window (s): one period, or 2π/n on a hyperbola.
pub fn search_window(orbit: &Orbit) -> f64 {
    orbit.period().unwrap_or(TAU / orbit.mean_motion)
}

/// Find the time of minimum separation between two orbits within
/// `[start, start + window]`.
///
/// Each pass samples `samples` evenly spaced times and keeps the best. The
/// next pass searches one sample width either side of it, never before
/// `start`.
pub fn find_closest_approach(
    vessel: &Orbit,
    target: &Orbit,
    start: f64,
    window: f64,
    samples: usize,
    iterations: usize,
) -> Approach {
    let samples = samples.max(2);
    let separation = |ut: f64| (vessel.position_at(ut) - target.position_at(ut)).length();

    let mut best = Approach {
        ut: start,
        distance: separation(start),
    };
    let mut lower = start;
    let mut upper = start + window;

    for _ in 0..iterations.max(1) {
        let width = (upper - lower) / (samples - 1) as f64;
        for i in 0..samples {
            let ut = lower + width * i as f64;
            let distance = separation(ut);
            if distance < best.distance {
                best = Approach { ut, distance };
            }
        }
        lower = (best.ut - width).max(start);
        upper = best.ut + width;
    }

    best
}

/// Predict the closest approach to the context's target.
pub fn predict_closest_approach(
    ctx: &FlightContext,
    ut: f64,
    settings: &ApproachSettings,
) -> Result<Option<EventPrediction>, ForecastError> {
    let Some(target) = ctx.target.as_ref() else {
        return Ok(None);
    };
    if ctx.situation.is_grounded() || target.situation.is_grounded() {
        return Ok(None);
    }
    if target.body != ctx.body.name {
        return Ok(None);
    }

    let separation = (target.position - ctx.position).length();
    let relative_speed = (target.velocity - ctx.velocity).length();
    if separation < settings.min_separation && relative_speed < settings.min_relative_speed {
        return Ok(None);
    }

    let vessel_orbit = ctx.orbit(ut)?;
    let target_orbit = Orbit::from_state_vectors(target.position, target.velocity, ctx.body.gm, ut)?;

    let window = ensure_finite(search_window(&vessel_orbit), "search window", "closest approach")?;
    let approach = find_closest_approach(
        &vessel_orbit,
        &target_orbit,
        ut,
        window,
        settings.samples,
        settings.iterations,
    );
    let distance = ensure_finite(approach.distance, "separation", "closest approach")?;
    if distance > settings.max_distance {
        return Ok(None);
    }

    let relative_speed = ensure_finite(
        (target_orbit.velocity_at(approach.ut) - vessel_orbit.velocity_at(approach.ut)).length(),
        "relative speed",
        "closest approach",
    )?;

    let mut prediction =
        EventPrediction::new(EventKind::ClosestApproach, approach.ut).with_required_dv(relative_speed);
    prediction.distance = Some(distance);
    Ok(Some(prediction))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use bevy::math::DVec3;

    use super::*;
    use crate::context::{Situation, Target};
    use crate::test_utils::fixtures::{self, KERBIN_GM, KERBIN_RADIUS};

    fn circular(radius: f64, phase: f64) -> (DVec3, DVec3) {
        let v = (KERBIN_GM / radius).sqrt();
        (
            DVec3::new(radius * phase.cos(), radius * phase.sin(), 0.0),
            DVec3::new(-v * phase.sin(), v * phase.cos(), 0.0),
        )
    }

    fn target_at(position: DVec3, velocity: DVec3) -> Target {
        Target {
            name: "Station".into(),
            situation: Situation::Orbiting,
            body: "Kerbin".into(),
            position,
            velocity,
        }
    }

    #[test]
    fn test_coplanar_circular_orbits_converge_to_radius_difference() {
        let r1 = KERBIN_RADIUS + 100_000.0;
        let r2 = KERBIN_RADIUS + 102_000.0;
        let (p1, v1) = circular(r1, 0.0);
        let (p2, v2) = circular(r2, 0.3);
        let vessel = Orbit::from_state_vectors(p1, v1, KERBIN_GM, 0.0).unwrap();
        let target = Orbit::from_state_vectors(p2, v2, KERBIN_GM, 0.0).unwrap();

        // Synodic period is far longer than one orbit; look far enough to line up
        let synodic = TAU / (vessel.mean_motion - target.mean_motion);
        let approach = find_closest_approach(&vessel, &target, 0.0, synodic, 20, 8);
        assert_relative_eq!(approach.distance, r2 - r1, max_relative = 1e-3);
    }

    #[test]
    fn test_search_from_different_start_times_agrees() {
        let r1 = KERBIN_RADIUS + 100_000.0;
        let r2 = KERBIN_RADIUS + 102_000.0;
        let (p1, v1) = circular(r1, 0.0);
        let (p2, v2) = circular(r2, 0.3);
        let vessel = Orbit::from_state_vectors(p1, v1, KERBIN_GM, 0.0).unwrap();
        let target = Orbit::from_state_vectors(p2, v2, KERBIN_GM, 0.0).unwrap();
        let synodic = TAU / (vessel.mean_motion - target.mean_motion);

        for fraction in [0.0, 0.25, 0.5, 0.7] {
            let start = synodic * fraction;
            let approach = find_closest_approach(&vessel, &target, start, synodic, 20, 8);
            assert!(approach.ut >= start);
            assert_relative_eq!(approach.distance, r2 - r1, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_search_never_looks_into_the_past() {
        let (p1, v1) = circular(KERBIN_RADIUS + 100_000.0, 0.0);
        let (p2, v2) = circular(KERBIN_RADIUS + 100_000.0, -0.01);
        let vessel = Orbit::from_state_vectors(p1, v1, KERBIN_GM, 500.0).unwrap();
        let target = Orbit::from_state_vectors(p2, v2, KERBIN_GM, 500.0).unwrap();

        let window = search_window(&vessel);
        let approach = find_closest_approach(&vessel, &target, 500.0, window, 20, 8);
        assert!(approach.ut >= 500.0);
    }

    #[test]
    fn test_rendezvous_reports_relative_speed() {
        let r = KERBIN_RADIUS + 100_000.0;
        let (p1, v1) = circular(r, 0.0);
        // Target slightly higher, 1 km ahead, drifting back relative to us
        let (p2, v2) = circular(r + 500.0, 1_000.0 / r);
        let ctx = fixtures::low_orbit_context(100_000.0).with_target(target_at(p2, v2));
        assert_eq!(ctx.position, p1);
        assert_eq!(ctx.velocity, v1);

        let prediction = predict_closest_approach(&ctx, 0.0, &ApproachSettings::default())
            .unwrap()
            .unwrap();
        assert_eq!(prediction.kind, EventKind::ClosestApproach);
        let distance = prediction.distance.unwrap();
        assert!(distance <= 1_200.0, "distance = {distance}");
        assert!(distance >= 400.0, "distance = {distance}");
        assert!(prediction.required_dv.unwrap() < 5.0);
    }

    #[test]
    fn test_docked_target_is_absent() {
        let ctx = fixtures::low_orbit_context(100_000.0);
        let position = ctx.position + DVec3::new(0.5, 0.0, 0.0);
        let velocity = ctx.velocity + DVec3::new(0.001, 0.0, 0.0);
        let ctx = ctx.with_target(target_at(position, velocity));
        assert_eq!(
            predict_closest_approach(&ctx, 0.0, &ApproachSettings::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_target_around_other_body_is_absent() {
        let ctx = fixtures::low_orbit_context(100_000.0);
        let mut target = target_at(ctx.position * 1.01, ctx.velocity);
        target.body = "Mun".into();
        let ctx = ctx.with_target(target);
        assert_eq!(
            predict_closest_approach(&ctx, 0.0, &ApproachSettings::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_landed_target_is_absent() {
        let ctx = fixtures::low_orbit_context(100_000.0);
        let mut target = target_at(ctx.position * 1.001, ctx.velocity);
        target.situation = Situation::Landed;
        let ctx = ctx.with_target(target);
        assert_eq!(
            predict_closest_approach(&ctx, 0.0, &ApproachSettings::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_distant_approach_is_absent() {
        let r = KERBIN_RADIUS + 100_000.0;
        let (p2, v2) = circular(r + 50_000.0, 1.0);
        let ctx = fixtures::low_orbit_context(100_000.0).with_target(target_at(p2, v2));
        assert_eq!(
            predict_closest_approach(&ctx, 0.0, &ApproachSettings::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_hyperbolic_window_uses_mean_motion() {
        let r = KERBIN_RADIUS + 100_000.0;
        let v = (2.0 * KERBIN_GM / r).sqrt() * 1.2;
        let orbit =
            Orbit::from_state_vectors(DVec3::new(r, 0.0, 0.0), DVec3::new(0.0, v, 0.0), KERBIN_GM, 0.0)
                .unwrap();
        assert_relative_eq!(search_window(&orbit), TAU / orbit.mean_motion);
    }
}
