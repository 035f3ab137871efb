//! Structural scan of a vessel's propulsion-relevant parts.
//!
//! Rebuilt only when the vessel identity or part count changes, so the
//! per-tick snapshot refresh only touches parts that matter.

use super::{Vessel, VesselId};

/// Indices of the parts that carry engines, tanks, or colliders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropulsionInventory {
    pub vessel_id: VesselId,
    pub part_count: usize,
    /// Parts with at least one engine module
    pub engine_parts: Vec<usize>,
    /// Parts with at least one resource container
    pub tank_parts: Vec<usize>,
    /// Parts that collide with terrain
    pub colliding_parts: Vec<usize>,
}

impl PropulsionInventory {
    /// Scan every part of `vessel`.
    pub fn scan(vessel: &Vessel) -> Self {
        let mut inventory = Self {
            vessel_id: vessel.id,
            part_count: vessel.part_count(),
            ..Default::default()
        };

        for (index, part) in vessel.parts.iter().enumerate() {
            if !part.engines.is_empty() {
                inventory.engine_parts.push(index);
            }
            if !part.resources.is_empty() {
                inventory.tank_parts.push(index);
            }
            if part.collider.is_some() {
                inventory.colliding_parts.push(index);
            }
        }

        inventory
    }

    /// True if `vessel` is structurally the craft this inventory describes.
    pub fn matches(&self, vessel: &Vessel) -> bool {
        self.vessel_id == vessel.id && self.part_count == vessel.part_count()
    }
}
