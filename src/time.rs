//! Universal time advancement for headless hosts.
//!
//! Real games own their clock and overwrite [`SimulationTime`] every frame.
//! The demo binary and tests use this plugin instead.

use bevy::prelude::*;

use crate::types::{ForecastSystems, SimulationTime};

/// Plugin advancing universal time from Bevy's frame clock.
pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationTime>()
            .add_systems(Update, advance_time.before(ForecastSystems::VesselState));
    }
}

/// Advance universal time based on warp and pause state.
pub fn advance_time(mut sim_time: ResMut<SimulationTime>, time: Res<Time>) {
    if sim_time.paused {
        return;
    }

    sim_time.current += time.delta_secs_f64() * sim_time.warp;
}
