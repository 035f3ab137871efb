//! Property-based tests for conic propagation.

use bevy::math::DVec3;
use proptest::prelude::*;
use std::f64::consts::TAU;

use crate::orbit::{Orbit, solve_eccentric_anomaly, solve_hyperbolic_anomaly};
use crate::test_utils::fixtures::{KERBIN_GM, KERBIN_RADIUS};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The elliptic Kepler solver satisfies M = E − e·sin(E).
    #[test]
    fn prop_eccentric_anomaly_solves_kepler(
        mean_anomaly in 0.0f64..TAU,
        eccentricity in 0.0f64..0.95,
    ) {
        let e_anom = solve_eccentric_anomaly(mean_anomaly, eccentricity);
        let residual = e_anom - eccentricity * e_anom.sin() - mean_anomaly;
        prop_assert!(residual.abs() < 1e-8, "residual {}", residual);
    }

    /// The hyperbolic Kepler solver satisfies M = e·sinh(H) − H.
    #[test]
    fn prop_hyperbolic_anomaly_solves_kepler(
        mean_anomaly in -50.0f64..50.0,
        eccentricity in 1.05f64..5.0,
    ) {
        let h = solve_hyperbolic_anomaly(mean_anomaly, eccentricity);
        let residual = eccentricity * h.sinh() - h - mean_anomaly;
        prop_assert!(residual.abs() < 1e-8 * mean_anomaly.abs().max(1.0), "residual {}", residual);
    }

    /// Propagation conserves specific energy and angular momentum.
    #[test]
    fn prop_propagation_conserves_invariants(
        altitude in 80_000.0f64..2_000_000.0,
        speed_factor in 0.85f64..1.3,
        flight_path in -0.3f64..0.3,
        inclination in 0.0f64..3.0,
        dt in 0.0f64..20_000.0,
    ) {
        let r = KERBIN_RADIUS + altitude;
        let speed = (KERBIN_GM / r).sqrt() * speed_factor;
        let position = DVec3::new(r, 0.0, 0.0);
        let velocity = DVec3::new(
            speed * flight_path.sin(),
            speed * flight_path.cos() * inclination.cos(),
            speed * flight_path.cos() * inclination.sin(),
        );
        let orbit = Orbit::from_state_vectors(position, velocity, KERBIN_GM, 0.0).unwrap();

        let energy = |p: DVec3, v: DVec3| 0.5 * v.length_squared() - KERBIN_GM / p.length();
        let p1 = orbit.position_at(dt);
        let v1 = orbit.velocity_at(dt);

        let e0 = energy(position, velocity);
        let e1 = energy(p1, v1);
        prop_assert!(((e1 - e0) / e0).abs() < 1e-8, "energy drift {} -> {}", e0, e1);

        let h0 = position.cross(velocity);
        let h1 = p1.cross(v1);
        prop_assert!((h1 - h0).length() / h0.length() < 1e-8);
    }
}
