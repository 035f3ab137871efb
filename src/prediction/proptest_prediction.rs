//! Property-based tests for the event predictors.

use proptest::prelude::*;

use super::atmosphere::bisect;
use super::impact::fall_time;
use super::{EventForecast, EventKind, EventPrediction};
use crate::burn::BurnEstimate;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The fall time satisfies c = v·t + ½·a·t² whenever it exists.
    #[test]
    fn prop_fall_time_solves_kinematics(
        clearance in 0.0f64..50_000.0,
        fall_speed in 1.0f64..2_000.0,
        accel in -5.0f64..20.0,
    ) {
        if let Some(t) = fall_time(clearance, fall_speed, accel) {
            prop_assert!(t >= 0.0);
            prop_assert!(t.is_finite());
            let fallen = fall_speed * t + 0.5 * accel * t * t;
            let tolerance = 1e-6 * clearance.max(1.0);
            prop_assert!(
                (fallen - clearance).abs() < tolerance,
                "fell {} m instead of {} m (t = {}, a = {})", fallen, clearance, t, accel
            );
        } else {
            // Only a decelerating fall can stop short of the ground
            prop_assert!(accel < 0.0);
            prop_assert!(fall_speed * fall_speed < -2.0 * accel * clearance);
        }
    }

    /// Faster falls never take longer.
    #[test]
    fn prop_fall_time_monotone_in_speed(
        clearance in 1.0f64..10_000.0,
        fall_speed in 1.0f64..500.0,
        extra in 0.0f64..500.0,
        accel in 0.0f64..10.0,
    ) {
        let slow = fall_time(clearance, fall_speed, accel);
        let fast = fall_time(clearance, fall_speed + extra, accel);
        prop_assert!(fast.zip(slow).is_some_and(|(fast, slow)| fast <= slow + 1e-9));
    }

    /// Bisection converges to the crossing of a linear function.
    #[test]
    fn prop_bisect_linear_root(
        root in 0.0f64..30.0,
        slope in prop_oneof![-100.0f64..-0.1, 0.1f64..100.0],
    ) {
        let found = bisect(0.0, 30.0, 30, |t| slope * (t - root));
        prop_assert!((found - root).abs() < 1e-6);
    }

    /// A burn never starts after the event it serves.
    #[test]
    fn prop_burn_start_precedes_event(
        event_ut in 0.0f64..1e6,
        duration in 0.0f64..1e4,
        landing in any::<bool>(),
    ) {
        let kind = if landing { EventKind::Impact } else { EventKind::ClosestApproach };
        let forecast = EventForecast::new(
            EventPrediction::new(kind, event_ut).with_required_dv(10.0),
            Some(BurnEstimate { duration, insufficient_fuel: false, required_dv: 10.0 }),
        );
        let start = forecast.burn_start_ut.unwrap();
        prop_assert!(start <= event_ut);
        prop_assert!(start >= event_ut - duration - 1e-9);
    }
}
