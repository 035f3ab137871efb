//! Burn Forecast - headless demo
//!
//! Runs a preset flight for a few seconds and logs the forecast.
//!
//! Usage: `burn_forecast [SCENARIO] [--frames N]`

use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use burn_forecast::ForecastReport;
use burn_forecast::forecast::ForecastPlugin;
use burn_forecast::scenarios::{SCENARIOS, Scenario, ScenarioPlugin, get_scenario};
use burn_forecast::time::TimePlugin;
use burn_forecast::types::{ForecastSystems, SimulationTime};

/// Sleep between frames, for roughly 20 frames per second
const FRAME_TIME: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "burn_forecast")]
#[command(about = "Run a preset flight headless and log its burn forecast")]
#[command(version)]
struct Cli {
    /// Preset flight to run
    #[arg(value_parser = parse_scenario, default_value = "mun_descent")]
    scenario: &'static Scenario,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 120)]
    frames: usize,
}

fn parse_scenario(id: &str) -> Result<&'static Scenario, String> {
    get_scenario(id).ok_or_else(|| {
        let known: Vec<&str> = SCENARIOS.iter().map(|s| s.id).collect();
        format!("unknown scenario '{id}' (available: {})", known.join(", "))
    })
}

fn main() {
    let cli = Cli::parse();
    let scenario = cli.scenario;

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins((
            TimePlugin,
            ForecastPlugin,
            ScenarioPlugin {
                scenario: scenario.id,
            },
        ))
        .add_systems(Update, log_report.after(ForecastSystems::Predict));
    app.finish();
    app.cleanup();

    for _ in 0..cli.frames {
        app.update();
        std::thread::sleep(FRAME_TIME);
    }
}

/// Log the report once per second of real time.
fn log_report(
    report: Res<ForecastReport>,
    sim_time: Res<SimulationTime>,
    time: Res<Time>,
    mut last_logged: Local<Option<f64>>,
) {
    let now = time.elapsed_secs_f64();
    if last_logged.is_some_and(|at| now - at < 1.0) {
        return;
    }
    *last_logged = Some(now);

    info!(
        "UT {:.1} s: {:.2} t, {:.1} kN",
        sim_time.current, report.mass, report.thrust
    );

    let upcoming = report.upcoming();
    if upcoming.is_empty() {
        info!("  no upcoming events");
    }
    for forecast in upcoming {
        let prediction = &forecast.prediction;
        let mut line = format!(
            "  {} in {:.1} s",
            prediction.label(),
            prediction.time_until(sim_time.current)
        );
        if let Some(distance) = prediction.distance {
            line.push_str(&format!(" at {distance:.0} m"));
        }
        if let Some(burn) = forecast.burn {
            line.push_str(&format!(
                ", {:.1} m/s burn of {:.1} s",
                burn.required_dv, burn.duration
            ));
            if burn.insufficient_fuel {
                line.push_str(" (insufficient fuel)");
            }
        }
        if let Some(start) = forecast.time_to_burn(sim_time.current) {
            line.push_str(&format!(", start in {start:.1} s"));
        }
        info!("{line}");
    }
}
