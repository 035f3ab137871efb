//! Common test utilities for integration tests.
#![allow(dead_code)]

use bevy::math::DVec3;
use burn_forecast::context::{FlightContext, Situation};
use burn_forecast::scenarios::{KERBIN_GM, KERBIN_RADIUS, circular_state, kerbin, orbiter};
use burn_forecast::types::G0;
use burn_forecast::vessel::{EngineModule, Part, Propellant, ResourceContainer, Vessel, VesselId};

/// Density of the single test propellant (t per unit).
pub const FUEL_DENSITY: f64 = 0.005;

/// A 10 t craft with one 50 kN engine burning 1 kg/s, carrying `fuel_kg` of fuel.
pub fn reference_craft(fuel_kg: f64) -> Vessel {
    let fuel_tons = fuel_kg / 1000.0;
    let isp = 50.0 / (0.001 * G0);
    Vessel::new(VesselId(42), "Reference")
        .with_part(
            Part::new("tank", 10.0 - fuel_tons).with_resource(ResourceContainer::new(
                "LiquidFuel",
                fuel_tons / FUEL_DENSITY,
                FUEL_DENSITY,
            )),
        )
        .with_part(Part::new("engine", 0.0).with_engine(
            EngineModule::new(50.0, isp, DVec3::Y)
                .with_propellant(Propellant::new("LiquidFuel", 1.0, FUEL_DENSITY)),
        ))
}

/// Circular equatorial Kerbin orbit at `altitude`, on the +X axis.
pub fn circular_orbit(altitude: f64) -> (DVec3, DVec3) {
    circular_state(KERBIN_GM, KERBIN_RADIUS + altitude, 0.0)
}

/// Flight context for `vessel` in a circular Kerbin orbit.
pub fn orbiting(vessel: Vessel, altitude: f64) -> FlightContext {
    let (position, velocity) = circular_orbit(altitude);
    FlightContext::new(vessel, kerbin(), position, velocity).with_situation(Situation::Orbiting)
}

/// Stock orbiter in a circular Kerbin orbit.
pub fn stock_orbiting(altitude: f64) -> FlightContext {
    orbiting(orbiter(), altitude)
}
