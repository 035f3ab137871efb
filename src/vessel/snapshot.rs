//! Throttled vessel state: mass, active engines, available propellant.

use bevy::math::DVec3;
use bevy::prelude::*;

use super::{PropulsionInventory, Propellant, Vessel};
use crate::cache::Throttled;
use crate::tally::ResourceTally;
use crate::types::DEFAULT_REFRESH_INTERVAL;

/// An engine module that can fire at snapshot time.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEngine {
    /// Index of the owning part
    pub part: usize,
    pub min_thrust: f64,
    pub max_thrust: f64,
    pub thrust_limit: f64,
    pub vacuum_isp: f64,
    pub forward: DVec3,
    pub propellants: Vec<Propellant>,
}

impl ActiveEngine {
    /// Thrust at the current limiter setting (kN).
    pub fn limited_thrust(&self) -> f64 {
        self.min_thrust + (self.max_thrust - self.min_thrust) * self.thrust_limit
    }
}

/// Vessel state captured at the last refresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VesselSnapshot {
    /// Total mass including resources (t)
    pub total_mass: f64,
    pub active_engines: Vec<ActiveEngine>,
    /// Available propellant mass per kind (t)
    pub available: ResourceTally,
}

impl VesselSnapshot {
    /// Capture the current state of `vessel`, visiting only inventoried parts.
    pub fn capture(
        vessel: &Vessel,
        inventory: &PropulsionInventory,
        infinite_propellant: bool,
    ) -> Self {
        let mut snapshot = Self {
            total_mass: vessel.total_mass(),
            ..Default::default()
        };

        for &index in &inventory.engine_parts {
            let Some(part) = vessel.parts.get(index) else {
                continue;
            };
            for engine in &part.engines {
                if !engine.is_operational() {
                    continue;
                }
                if !infinite_propellant && engine.is_starved() {
                    continue;
                }
                snapshot.active_engines.push(ActiveEngine {
                    part: index,
                    min_thrust: engine.min_thrust,
                    max_thrust: engine.max_thrust,
                    thrust_limit: engine.thrust_limit,
                    vacuum_isp: engine.vacuum_isp,
                    forward: engine.forward.normalize_or_zero(),
                    propellants: engine.propellants.clone(),
                });
            }
        }

        for &index in &inventory.tank_parts {
            let Some(part) = vessel.parts.get(index) else {
                continue;
            };
            for resource in &part.resources {
                if resource.density <= 0.0 || !resource.flow_enabled {
                    continue;
                }
                snapshot.available.add(&resource.name, resource.mass());
            }
        }

        snapshot
    }
}

/// What a [`VesselStateCache::update`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChange {
    /// Cached snapshot still fresh
    Unchanged,
    /// Refresh interval elapsed, snapshot recaptured
    Refreshed,
    /// Vessel identity or part count changed, inventory rebuilt
    Rebuilt,
}

/// Inventory plus throttled snapshot for the active vessel.
#[derive(Clone, Debug)]
pub struct VesselStateCache {
    inventory: Option<PropulsionInventory>,
    snapshot: Throttled<Option<VesselSnapshot>>,
}

impl Default for VesselStateCache {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

impl VesselStateCache {
    pub fn new(refresh_interval: f64) -> Self {
        Self {
            inventory: None,
            snapshot: Throttled::new(refresh_interval, None),
        }
    }

    pub fn set_refresh_interval(&mut self, interval: f64) {
        self.snapshot.set_ttl(interval);
    }

    /// Bring the cache up to date with `vessel` at real time `now`.
    pub fn update(&mut self, vessel: &Vessel, now: f64, infinite_propellant: bool) -> StateChange {
        let structural_change = !self
            .inventory
            .as_ref()
            .is_some_and(|inventory| inventory.matches(vessel));

        if structural_change {
            debug!(
                "Rebuilding propulsion inventory for '{}' ({} parts)",
                vessel.name,
                vessel.part_count()
            );
            self.inventory = Some(PropulsionInventory::scan(vessel));
            self.snapshot.invalidate();
        }

        if !self.snapshot.is_stale(now) {
            return StateChange::Unchanged;
        }

        let Some(inventory) = self.inventory.as_ref() else {
            return StateChange::Unchanged;
        };
        let snapshot = VesselSnapshot::capture(vessel, inventory, infinite_propellant);
        self.snapshot.store(now, Some(snapshot));

        if structural_change {
            StateChange::Rebuilt
        } else {
            StateChange::Refreshed
        }
    }

    /// Forget the vessel entirely (no active vessel this tick).
    pub fn clear(&mut self) {
        self.inventory = None;
        self.snapshot.invalidate();
        self.snapshot.overwrite(None);
    }

    pub fn inventory(&self) -> Option<&PropulsionInventory> {
        self.inventory.as_ref()
    }

    pub fn snapshot(&self) -> Option<&VesselSnapshot> {
        self.snapshot.get().as_ref()
    }
}
