//! Thrust and propellant consumption aggregation.
//!
//! Engines are summed as vectors: two engines canted away from each other
//! deliver less net thrust than the sum of their magnitudes.

use bevy::math::DVec3;

use super::VesselSnapshot;
use crate::tally::ResourceTally;
use crate::types::{G0, THRUST_EPSILON};

/// Net propulsive capability for the current tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThrustAggregate {
    /// Magnitude of the summed thrust vector (kN)
    pub thrust: f64,
    /// Summed thrust vector (kN)
    pub thrust_vector: DVec3,
    /// Mass flow per propellant kind (t/s)
    pub consumption: ResourceTally,
    /// Engines that contributed thrust
    pub firing_engines: usize,
}

impl ThrustAggregate {
    pub fn can_accelerate(&self) -> bool {
        self.thrust > THRUST_EPSILON
    }
}

/// Mass flow rate (t/s) of an engine producing `thrust` kN at `isp` seconds.
///
/// mdot = F / (Isp × g0)
#[inline]
pub fn mass_flow_rate(thrust: f64, isp: f64) -> f64 {
    if isp <= 0.0 {
        return 0.0;
    }
    thrust / (isp * G0)
}

/// Aggregate thrust and consumption over the snapshot's active engines.
///
/// An engine whose mass-bearing propellant has run dry since the snapshot
/// was taken does not fire this tick.
pub fn aggregate_thrust(snapshot: &VesselSnapshot, infinite_propellant: bool) -> ThrustAggregate {
    let mut aggregate = ThrustAggregate::default();

    for engine in &snapshot.active_engines {
        if engine.thrust_limit <= 0.0 {
            continue;
        }
        let thrust = engine.limited_thrust();

        if !infinite_propellant {
            let mut flows: Vec<(&str, f64)> = Vec::with_capacity(engine.propellants.len());
            let mut total_mass_ratio = 0.0;
            let mut starved = false;
            for propellant in &engine.propellants {
                if propellant.is_ignorable() {
                    continue;
                }
                if !snapshot.available.has(&propellant.name) {
                    starved = true;
                    break;
                }
                total_mass_ratio += propellant.mass_ratio();
                flows.push((propellant.name.as_str(), propellant.mass_ratio()));
            }
            if starved {
                continue;
            }

            let total_flow = mass_flow_rate(thrust, engine.vacuum_isp);
            if total_mass_ratio > 0.0 {
                for (name, mass_ratio) in flows {
                    aggregate
                        .consumption
                        .add(name, total_flow * mass_ratio / total_mass_ratio);
                }
            }
        }

        aggregate.thrust_vector += engine.forward * thrust;
        aggregate.firing_engines += 1;
    }

    aggregate.thrust = aggregate.thrust_vector.length();
    aggregate
}
