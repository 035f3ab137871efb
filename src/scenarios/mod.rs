//! Synthetic flight scenarios for demos and tests.
//!
//! Provides stock bodies, stock craft, and a set of preset flights covering
//! each predictor:
//! - Mun powered descent (impact)
//! - Low orbit rendezvous (closest approach)
//! - Aerobraking pass (atmosphere entry)
//! - Deep-space transfer burn (maneuver node)

pub mod presets;

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::body::CelestialBody;
use crate::context::{FlightContext, Situation};
use crate::orbit::Orbit;
use crate::time::advance_time;
use crate::types::{ForecastSystems, SimulationTime};
use crate::vessel::{EngineModule, Part, Propellant, ResourceContainer, Vessel, VesselId};

pub use presets::SCENARIOS;

pub const KERBIN_RADIUS: f64 = 600_000.0;
pub const KERBIN_GM: f64 = 3.5316e12;
pub const MUN_RADIUS: f64 = 200_000.0;
pub const MUN_GM: f64 = 6.5138398e10;
pub const KERBOL_RADIUS: f64 = 261_600_000.0;
pub const KERBOL_GM: f64 = 1.1723328e18;

/// Density of stock liquid fuel and oxidizer (t per unit)
const LFO_DENSITY: f64 = 0.005;

pub fn kerbin() -> CelestialBody {
    CelestialBody::new("Kerbin", KERBIN_RADIUS, KERBIN_GM)
        .with_atmosphere(70_000.0)
        .with_ocean()
        .with_max_terrain(6_767.0)
}

pub fn mun() -> CelestialBody {
    CelestialBody::new("Mun", MUN_RADIUS, MUN_GM).with_max_terrain(7_061.0)
}

pub fn kerbol() -> CelestialBody {
    CelestialBody::new("Kerbol", KERBOL_RADIUS, KERBOL_GM).with_atmosphere(600_000.0)
}

fn lfo_engine(max_thrust: f64, vacuum_isp: f64) -> EngineModule {
    EngineModule::new(max_thrust, vacuum_isp, DVec3::Y)
        .with_propellant(Propellant::new("LiquidFuel", 0.9, LFO_DENSITY))
        .with_propellant(Propellant::new("Oxidizer", 1.1, LFO_DENSITY))
}

fn lfo_tank(name: &str, dry_mass: f64, liquid_fuel: f64) -> Part {
    Part::new(name, dry_mass)
        .with_resource(ResourceContainer::new("LiquidFuel", liquid_fuel, LFO_DENSITY))
        .with_resource(ResourceContainer::new(
            "Oxidizer",
            liquid_fuel * 11.0 / 9.0,
            LFO_DENSITY,
        ))
}

/// Small single-engine lander standing on landing legs.
pub fn lander() -> Vessel {
    Vessel::new(VesselId(1), "Mun Lander")
        .with_part(
            Part::new("command pod", 0.8)
                .at(DVec3::new(0.0, 1.5, 0.0))
                .with_collider(0.7, 14.0)
                .with_resource(ResourceContainer::new("ElectricCharge", 50.0, 0.0)),
        )
        .with_part(lfo_tank("fuel tank", 0.25, 180.0).with_collider(0.6, 6.0))
        .with_part(
            Part::new("terrier engine", 0.5)
                .at(DVec3::new(0.0, -1.0, 0.0))
                .with_collider(0.5, 7.0)
                .with_engine(lfo_engine(60.0, 345.0)),
        )
        .with_part(
            Part::new("landing legs", 0.15)
                .at(DVec3::new(0.0, -1.5, 0.0))
                .with_collider(0.4, 12.0),
        )
}

/// Orbital transfer stage.
pub fn orbiter() -> Vessel {
    Vessel::new(VesselId(2), "Transfer Stage")
        .with_part(
            Part::new("command pod", 0.8)
                .at(DVec3::new(0.0, 3.0, 0.0))
                .with_collider(0.7, 14.0),
        )
        .with_part(lfo_tank("long tank", 0.5, 360.0).with_collider(0.7, 6.0))
        .with_part(
            Part::new("swivel engine", 1.5)
                .at(DVec3::new(0.0, -2.5, 0.0))
                .with_collider(0.6, 7.0)
                .with_engine(lfo_engine(215.0, 320.0)),
        )
}

/// State vectors for a circular equatorial orbit at `radius`, `phase` radians
/// from the +X axis.
pub fn circular_state(gm: f64, radius: f64, phase: f64) -> (DVec3, DVec3) {
    let v = (gm / radius).sqrt();
    (
        DVec3::new(radius * phase.cos(), radius * phase.sin(), 0.0),
        DVec3::new(-v * phase.sin(), v * phase.cos(), 0.0),
    )
}

/// A predefined flight.
#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    /// Unique identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Brief description
    pub description: &'static str,
    /// Time warp to run the scenario at
    pub warp: f64,
    /// Builds the flight context at the scenario start
    pub build: fn() -> FlightContext,
}

/// Get a scenario by ID.
pub fn get_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

/// The running scenario and the conics its vessel and target follow.
#[derive(Resource, Clone, Debug, Default)]
pub struct CurrentScenario {
    pub id: &'static str,
    /// Vessel trajectory; `None` once it has come to rest
    pub vessel_orbit: Option<Orbit>,
    pub target_orbit: Option<Orbit>,
}

/// Plugin loading a scenario at startup and moving the vessel along its orbit.
pub struct ScenarioPlugin {
    pub scenario: &'static str,
}

impl Default for ScenarioPlugin {
    fn default() -> Self {
        Self {
            scenario: presets::MUN_DESCENT.id,
        }
    }
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(CurrentScenario {
            id: self.scenario,
            ..Default::default()
        })
        .add_systems(Startup, load_current_scenario)
        .add_systems(
            Update,
            propagate_flight
                .after(advance_time)
                .before(ForecastSystems::VesselState),
        );
    }
}

/// Insert the flight context for the current scenario.
fn load_current_scenario(
    mut commands: Commands,
    mut current: ResMut<CurrentScenario>,
    mut sim_time: ResMut<SimulationTime>,
) {
    let Some(scenario) = get_scenario(current.id) else {
        warn!("Unknown scenario ID: {}", current.id);
        return;
    };

    info!("Loading scenario: {} ({})", scenario.name, scenario.id);

    let ctx = (scenario.build)();
    let ut = sim_time.current;

    current.vessel_orbit = match ctx.orbit(ut) {
        Ok(orbit) => Some(orbit),
        Err(err) => {
            warn!("Scenario '{}' vessel cannot be propagated: {err}", scenario.id);
            None
        }
    };
    current.target_orbit = ctx.target.as_ref().and_then(|target| {
        Orbit::from_state_vectors(target.position, target.velocity, ctx.body.gm, ut).ok()
    });

    sim_time.warp = scenario.warp;

    info!(
        "Scenario loaded: '{}' at {:.1} km above {}, {:.1} m/s",
        ctx.vessel.name,
        ctx.altitude() / 1000.0,
        ctx.body.name,
        ctx.velocity.length()
    );
    commands.insert_resource(ctx);
}

/// Move vessel and target along their conics to the current universal time.
fn propagate_flight(
    mut current: ResMut<CurrentScenario>,
    sim_time: Res<SimulationTime>,
    ctx: Option<ResMut<FlightContext>>,
) {
    let Some(mut ctx) = ctx else {
        return;
    };
    let ut = sim_time.current;

    if let Some(orbit) = current.vessel_orbit.as_ref() {
        ctx.position = orbit.position_at(ut);
        ctx.velocity = orbit.velocity_at(ut);
        ctx.surface_velocity = ctx.velocity;

        if ctx.altitude_above_terrain() <= 0.0 {
            info!("'{}' reached the surface of {}", ctx.vessel.name, ctx.body.name);
            ctx.situation = Situation::Landed;
            ctx.surface_velocity = DVec3::ZERO;
            current.vessel_orbit = None;
        }
    }

    if let (Some(orbit), Some(target)) = (current.target_orbit.as_ref(), ctx.target.as_mut()) {
        target.position = orbit.position_at(ut);
        target.velocity = orbit.velocity_at(ut);
    }
}
