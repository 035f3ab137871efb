//! Integration tests for the preset flights.

use std::collections::HashSet;

use bevy::prelude::*;
use burn_forecast::context::FlightContext;
use burn_forecast::forecast::{ForecastPlugin, ForecastReport, Forecaster};
use burn_forecast::prediction::EventKind;
use burn_forecast::scenarios::{SCENARIOS, ScenarioPlugin, get_scenario};
use burn_forecast::settings::ForecastSettings;
use burn_forecast::time::TimePlugin;
use burn_forecast::types::{Clock, SimulationTime};

#[test]
fn test_scenario_ids_and_names_unique() {
    let ids: HashSet<_> = SCENARIOS.iter().map(|s| s.id).collect();
    let names: HashSet<_> = SCENARIOS.iter().map(|s| s.name).collect();
    assert_eq!(ids.len(), SCENARIOS.len());
    assert_eq!(names.len(), SCENARIOS.len());
}

#[test]
fn test_scenarios_have_positive_warp() {
    for scenario in SCENARIOS {
        assert!(scenario.warp > 0.0, "{} has no warp", scenario.id);
        assert!(!scenario.description.is_empty());
    }
}

#[test]
fn test_every_scenario_starts_in_flight() {
    for scenario in SCENARIOS {
        let ctx = (scenario.build)();
        assert!(!ctx.situation.is_grounded(), "{} starts grounded", scenario.id);
        assert!(ctx.altitude_above_terrain() > 0.0, "{} starts underground", scenario.id);
        assert!(ctx.orbit(0.0).is_ok(), "{} has no usable orbit", scenario.id);
    }
}

#[test]
fn test_every_scenario_has_thrust() {
    let settings = ForecastSettings::default();
    for scenario in SCENARIOS {
        let ctx = (scenario.build)();
        let mut forecaster = Forecaster::default();
        let report = forecaster.tick(Some(&ctx), Clock::new(0.0, 0.0), &settings);
        assert!(report.thrust > 0.0, "{} cannot burn", scenario.id);
        assert!(report.mass > 0.0);
    }
}

#[test]
fn test_get_scenario_lookup() {
    assert!(get_scenario("mun_descent").is_some());
    assert!(get_scenario("nonexistent").is_none());
}

#[test]
fn test_mun_descent_runs_in_app() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins((
        TimePlugin,
        ForecastPlugin,
        ScenarioPlugin::default(),
    ));

    // Startup inserts the context; the next frame forecasts it
    app.update();
    app.update();

    assert!(app.world().get_resource::<FlightContext>().is_some());
    let report = app.world().resource::<ForecastReport>();
    let upcoming = report.upcoming();
    assert!(
        upcoming
            .iter()
            .any(|f| f.prediction.kind == EventKind::Impact),
        "descent should forecast an impact"
    );
    assert!(app.world().resource::<SimulationTime>().current >= 0.0);
}
