//! Burn-time solver.
//!
//! Given a required velocity change and the vessel's current propulsive
//! capability, estimate how long the engines must fire. The variable-mass
//! model uses the Tsiolkovsky rocket equation, so acceleration rises as
//! propellant is burned. When the tracked propellant cannot deliver the full
//! velocity change, the estimate continues at the dry vessel's acceleration
//! and flags the burn as short on fuel.
//!
//! Units: thrust in kN, mass in tons, flow in t/s, so thrust / mass is m/s²
//! and thrust / flow is m/s.

use crate::tally::ResourceTally;
use crate::types::THRUST_EPSILON;
use crate::vessel::{ThrustAggregate, VesselSnapshot};

/// Which kinematic model to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BurnModel {
    /// Constant acceleration at the current mass
    Simple,
    /// Mass decreases as propellant burns
    #[default]
    VariableMass,
}

/// Result of a burn-time estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurnEstimate {
    /// Burn duration in seconds; infinite when the vessel cannot thrust
    pub duration: f64,
    /// Tracked propellant runs out before the velocity change is reached
    pub insufficient_fuel: bool,
    /// Requested velocity change (m/s)
    pub required_dv: f64,
}

impl BurnEstimate {
    /// Estimate for a vessel with no usable thrust.
    pub fn no_thrust(required_dv: f64) -> Self {
        Self {
            duration: f64::INFINITY,
            insufficient_fuel: false,
            required_dv,
        }
    }

    pub fn is_possible(&self) -> bool {
        self.duration.is_finite()
    }
}

/// Inputs to the solver, borrowed from the current tick's vessel state.
#[derive(Clone, Copy, Debug)]
pub struct BurnInputs<'a> {
    /// Current total mass (t)
    pub mass: f64,
    /// Net thrust (kN)
    pub thrust: f64,
    /// Mass flow per propellant kind (t/s)
    pub consumption: &'a ResourceTally,
    /// Available propellant per kind (t)
    pub available: &'a ResourceTally,
}

impl<'a> BurnInputs<'a> {
    pub fn new(snapshot: &'a VesselSnapshot, aggregate: &'a ThrustAggregate) -> Self {
        Self {
            mass: snapshot.total_mass,
            thrust: aggregate.thrust,
            consumption: &aggregate.consumption,
            available: &snapshot.available,
        }
    }
}

/// Longest burn (s) before the scarcest consumed propellant runs out.
///
/// Returns 0 if any consumed kind is unavailable, and infinity if nothing
/// is consumed at all.
pub fn max_burn_time(consumption: &ResourceTally, available: &ResourceTally) -> f64 {
    let mut max_time = f64::INFINITY;
    for (kind, rate) in consumption.iter() {
        if rate <= 0.0 {
            continue;
        }
        if !available.has(kind) {
            return 0.0;
        }
        max_time = max_time.min(available[kind] / rate);
    }
    max_time
}

/// Constant-acceleration burn time: dV × m / F.
#[inline]
pub fn simple_burn_time(required_dv: f64, mass: f64, thrust: f64) -> f64 {
    required_dv * mass / thrust
}

/// Velocity change (m/s) from burning `fuel_mass` out of `mass` at exhaust velocity `ve`.
#[inline]
pub fn rocket_delta_v(exhaust_velocity: f64, mass: f64, fuel_mass: f64) -> f64 {
    exhaust_velocity * (mass / (mass - fuel_mass)).ln()
}

/// Estimate the burn needed to change velocity by `required_dv`.
pub fn estimate_burn(required_dv: f64, inputs: BurnInputs<'_>, model: BurnModel) -> BurnEstimate {
    let required_dv = required_dv.max(0.0);

    if inputs.thrust <= THRUST_EPSILON || inputs.mass <= 0.0 {
        return BurnEstimate::no_thrust(required_dv);
    }

    let total_rate = inputs.consumption.sum();
    if model == BurnModel::Simple || total_rate <= 0.0 {
        return BurnEstimate {
            duration: simple_burn_time(required_dv, inputs.mass, inputs.thrust),
            insufficient_fuel: false,
            required_dv,
        };
    }

    let max_time = max_burn_time(inputs.consumption, inputs.available);
    let exhaust_velocity = inputs.thrust / total_rate;
    let needed_fuel = inputs.mass * (1.0 - (-required_dv / exhaust_velocity).exp());
    let time_needed = needed_fuel / total_rate;

    if time_needed <= max_time {
        return BurnEstimate {
            duration: time_needed,
            insufficient_fuel: false,
            required_dv,
        };
    }

    // Out of propellant: burn what there is, then extrapolate the remainder
    // at the dry vessel's acceleration.
    let burned = (total_rate * max_time).min(inputs.mass);
    let dry_mass = inputs.mass - burned;
    let achieved_dv = rocket_delta_v(exhaust_velocity, inputs.mass, burned);
    let best_accel = inputs.thrust / dry_mass;
    let remaining_dv = (required_dv - achieved_dv).max(0.0);
    let duration = max_time + remaining_dv / best_accel;

    BurnEstimate {
        duration: if duration.is_finite() {
            duration
        } else {
            f64::INFINITY
        },
        insufficient_fuel: true,
        required_dv,
    }
}
