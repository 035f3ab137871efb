//! Property-based tests for the burn-time solver.

use proptest::prelude::*;

use crate::burn::{BurnInputs, BurnModel, estimate_burn, max_burn_time, simple_burn_time};
use crate::tally::ResourceTally;

fn single_propellant(rate: f64, available: f64) -> (ResourceTally, ResourceTally) {
    let mut consumption = ResourceTally::new();
    consumption.add("LiquidFuel", rate);
    let mut tanks = ResourceTally::new();
    tanks.add("LiquidFuel", available);
    (consumption, tanks)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Estimates are never NaN and never negative.
    #[test]
    fn prop_duration_well_formed(
        dv in 0.0f64..1e5,
        mass in 0.1f64..500.0,
        thrust in 0.0f64..5_000.0,
        rate in 0.0f64..1.0,
        fuel_fraction in 0.0f64..1.0,
    ) {
        let (consumption, available) = single_propellant(rate, mass * fuel_fraction);
        let inputs = BurnInputs { mass, thrust, consumption: &consumption, available: &available };
        let estimate = estimate_burn(dv, inputs, BurnModel::VariableMass);
        prop_assert!(!estimate.duration.is_nan());
        prop_assert!(estimate.duration >= 0.0);
    }

    /// Shedding mass makes the variable-mass burn no longer than the
    /// constant-acceleration one.
    #[test]
    fn prop_variable_mass_not_slower_than_simple(
        dv in 0.0f64..5_000.0,
        mass in 1.0f64..100.0,
        thrust in 1.0f64..2_000.0,
        isp in 200.0f64..450.0,
        fuel_fraction in 0.0f64..0.9,
    ) {
        let rate = thrust / (isp * crate::types::G0);
        let (consumption, available) = single_propellant(rate, mass * fuel_fraction);
        let inputs = BurnInputs { mass, thrust, consumption: &consumption, available: &available };

        let variable = estimate_burn(dv, inputs, BurnModel::VariableMass);
        let simple = simple_burn_time(dv, mass, thrust);
        prop_assert!(variable.duration <= simple * (1.0 + 1e-9) + 1e-9);
    }

    /// Running short on fuel is flagged exactly when the burn outlasts the tanks.
    #[test]
    fn prop_insufficient_flag_matches_tank_limit(
        dv in 1.0f64..5_000.0,
        mass in 1.0f64..100.0,
        thrust in 1.0f64..2_000.0,
        fuel_fraction in 0.0f64..0.9,
    ) {
        let rate = thrust / (300.0 * crate::types::G0);
        let (consumption, available) = single_propellant(rate, mass * fuel_fraction);
        let inputs = BurnInputs { mass, thrust, consumption: &consumption, available: &available };

        let estimate = estimate_burn(dv, inputs, BurnModel::VariableMass);
        let limit = max_burn_time(&consumption, &available);
        if estimate.insufficient_fuel {
            prop_assert!(estimate.duration >= limit);
        } else {
            prop_assert!(estimate.duration <= limit * (1.0 + 1e-12));
        }
    }

    /// More required delta-v never means a shorter burn.
    #[test]
    fn prop_duration_monotone_in_dv(
        dv in 0.0f64..3_000.0,
        extra in 0.0f64..3_000.0,
        fuel_fraction in 0.0f64..0.9,
    ) {
        let (consumption, available) = single_propellant(0.01, 20.0 * fuel_fraction);
        let inputs = BurnInputs { mass: 20.0, thrust: 30.0, consumption: &consumption, available: &available };

        let short = estimate_burn(dv, inputs, BurnModel::VariableMass).duration;
        let long = estimate_burn(dv + extra, inputs, BurnModel::VariableMass).duration;
        prop_assert!(long >= short - 1e-9 * short.max(1.0));
    }
}
