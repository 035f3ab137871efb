//! Preset scenario definitions.
//!
//! Each scenario puts one predictor front and center.

use bevy::math::DVec3;

use super::{
    KERBIN_GM, KERBIN_RADIUS, KERBOL_GM, MUN_RADIUS, Scenario, circular_state, kerbin, kerbol,
    lander, mun, orbiter,
};
use crate::context::{FlightContext, ManeuverNode, Situation, Target};

/// All available preset scenarios.
pub static SCENARIOS: &[Scenario] = &[MUN_DESCENT, RENDEZVOUS, AEROBRAKE, DEEP_SPACE_NODE];

/// Scenario 1: Mun Descent (Default)
///
/// A lander 3 km above a 1 km plateau, falling at 40 m/s with 60 m/s of
/// horizontal speed left to kill.
pub static MUN_DESCENT: Scenario = Scenario {
    id: "mun_descent",
    name: "Mun Descent",
    description: "Unpowered fall toward the Mun. When must the suicide burn start?",
    warp: 1.0,
    build: mun_descent,
};

/// Scenario 2: Low Orbit Rendezvous
///
/// A station 300 m higher and 2 km ahead in a 100 km Kerbin orbit.
pub static RENDEZVOUS: Scenario = Scenario {
    id: "rendezvous",
    name: "Low Orbit Rendezvous",
    description: "Catch up with a station just ahead. Closest approach and matching burn.",
    warp: 20.0,
    build: rendezvous,
};

/// Scenario 3: Aerobraking Pass
///
/// Coasting at a 90 km apoapsis with the periapsis dipped to 35 km.
pub static AEROBRAKE: Scenario = Scenario {
    id: "aerobrake",
    name: "Aerobraking Pass",
    description: "Periapsis inside the atmosphere. Time to entry and exit.",
    warp: 50.0,
    build: aerobrake,
};

/// Scenario 4: Deep-Space Node
///
/// Solar orbit at Kerbin's distance with an escape burn planned half an
/// hour out.
pub static DEEP_SPACE_NODE: Scenario = Scenario {
    id: "deep_space_node",
    name: "Deep-Space Node",
    description: "Heliocentric cruise with a 950 m/s node ahead. When to light the engine?",
    warp: 100.0,
    build: deep_space_node,
};

fn mun_descent() -> FlightContext {
    let position = DVec3::new(0.0, MUN_RADIUS + 4_000.0, 0.0);
    let velocity = DVec3::new(60.0, -40.0, 0.0);
    FlightContext::new(lander(), mun(), position, velocity)
        .with_situation(Situation::SubOrbital)
        .with_terrain_altitude(1_000.0)
}

fn rendezvous() -> FlightContext {
    let radius = KERBIN_RADIUS + 100_000.0;
    let (position, velocity) = circular_state(KERBIN_GM, radius, 0.0);
    let (target_position, target_velocity) =
        circular_state(KERBIN_GM, radius + 300.0, 2_000.0 / radius);

    FlightContext::new(orbiter(), kerbin(), position, velocity).with_target(Target {
        name: "Kerbin Station".into(),
        situation: Situation::Orbiting,
        body: "Kerbin".into(),
        position: target_position,
        velocity: target_velocity,
    })
}

fn aerobrake() -> FlightContext {
    let r_a = KERBIN_RADIUS + 90_000.0;
    let r_p = KERBIN_RADIUS + 35_000.0;
    let a = 0.5 * (r_a + r_p);
    let v_a = (KERBIN_GM * (2.0 / r_a - 1.0 / a)).sqrt();
    FlightContext::new(
        orbiter(),
        kerbin(),
        DVec3::new(r_a, 0.0, 0.0),
        DVec3::new(0.0, v_a, 0.0),
    )
}

fn deep_space_node() -> FlightContext {
    let (position, velocity) = circular_state(KERBOL_GM, 13_599_840_256.0, 0.0);
    FlightContext::new(orbiter(), kerbol(), position, velocity).with_maneuver(ManeuverNode {
        ut: 1_800.0,
        delta_v: DVec3::new(0.0, 950.0, 0.0),
    })
}
