//! Test utilities for forecasting tests.
//!
//! Provides fixtures for stock bodies, craft and flight contexts, and
//! assertions for orbital invariants.

/// Fixtures for creating test flights.
pub mod fixtures {
    use crate::body::CelestialBody;
    use crate::context::{FlightContext, Situation};
    use crate::scenarios;
    use crate::vessel::Vessel;

    pub use crate::scenarios::{KERBIN_GM, KERBIN_RADIUS, MUN_GM, MUN_RADIUS};

    pub fn kerbin() -> CelestialBody {
        scenarios::kerbin()
    }

    pub fn mun() -> CelestialBody {
        scenarios::mun()
    }

    /// 3.7 t lander with a 60 kN engine and 2 t of propellant.
    pub fn lander() -> Vessel {
        scenarios::lander()
    }

    /// 6.8 t stage with a 215 kN engine and 4 t of propellant.
    pub fn orbiter() -> Vessel {
        scenarios::orbiter()
    }

    /// Orbiter in a circular equatorial Kerbin orbit at `altitude`.
    ///
    /// The vessel sits on the +X axis moving toward +Y.
    pub fn low_orbit_context(altitude: f64) -> FlightContext {
        let (position, velocity) = scenarios::circular_state(KERBIN_GM, KERBIN_RADIUS + altitude, 0.0);
        FlightContext::new(orbiter(), kerbin(), position, velocity).with_situation(Situation::Orbiting)
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use bevy::math::DVec3;

    /// Compute specific orbital energy (energy per unit mass).
    ///
    /// E = v²/2 - GM/r
    pub fn orbital_energy(gm: f64, pos: DVec3, vel: DVec3) -> f64 {
        0.5 * vel.length_squared() - gm / pos.length()
    }

    /// Assert that energy is conserved within tolerance.
    ///
    /// # Panics
    /// Panics if relative energy drift exceeds tolerance.
    pub fn assert_energy_conserved(initial_energy: f64, final_energy: f64, tolerance: f64) {
        let drift = if initial_energy.abs() > 1e-10 {
            ((final_energy - initial_energy) / initial_energy).abs()
        } else {
            (final_energy - initial_energy).abs()
        };
        assert!(
            drift <= tolerance,
            "Energy not conserved: initial={initial_energy:.6e}, final={final_energy:.6e}, drift={drift:.6e}, tolerance={tolerance:.6e}"
        );
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    use crate::forecast::ForecastPlugin;
    use crate::time::TimePlugin;

    /// Create a minimal Bevy app for testing without rendering.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }

    /// Headless app with the clock and forecaster installed.
    pub fn forecast_app() -> App {
        let mut app = headless_app();
        app.add_plugins((TimePlugin, ForecastPlugin));
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_orbit_is_circular() {
        let ctx = fixtures::low_orbit_context(100_000.0);
        let orbit = ctx.orbit(0.0).unwrap();
        assert!(orbit.eccentricity < 1e-9);
        assert!((ctx.altitude() - 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_propagation_conserves_energy() {
        let ctx = fixtures::low_orbit_context(250_000.0);
        let orbit = ctx.orbit(0.0).unwrap();
        let initial = assertions::orbital_energy(fixtures::KERBIN_GM, ctx.position, ctx.velocity);
        let later = assertions::orbital_energy(
            fixtures::KERBIN_GM,
            orbit.position_at(12_345.0),
            orbit.velocity_at(12_345.0),
        );
        assertions::assert_energy_conserved(initial, later, 1e-10);
    }

    #[test]
    fn test_forecast_app_publishes_report() {
        let mut app = bevy_test::forecast_app();
        app.insert_resource(fixtures::low_orbit_context(100_000.0));
        app.update();
        let report = app.world().resource::<crate::forecast::ForecastReport>();
        assert!(report.thrust > 0.0);
    }
}
