//! Vessel model consumed by the forecasting engine.
//!
//! This is the host-agnostic description of a craft: parts carrying engine
//! modules and resource containers. Hosts translate their own part tree into
//! a [`Vessel`] once per frame (or keep one around and mutate it).
//!
//! Units: mass in tons, thrust in kN, Isp in seconds, distances in meters.

pub mod inventory;
pub mod snapshot;
pub mod thrust;

use bevy::math::DVec3;

pub use inventory::PropulsionInventory;
pub use snapshot::{ActiveEngine, StateChange, VesselSnapshot, VesselStateCache};
pub use thrust::{ThrustAggregate, aggregate_thrust};

/// Stable identity of a vessel across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VesselId(pub u64);

/// A propellant drawn by an engine module.
#[derive(Clone, Debug, PartialEq)]
pub struct Propellant {
    /// Resource name, matching [`ResourceContainer::name`]
    pub name: String,
    /// Mixture ratio in resource units
    pub ratio: f64,
    /// Density in tons per unit. Zero marks a massless, ignorable resource.
    pub density: f64,
    /// Host-reported starvation flag (nothing left to draw from)
    pub deprived: bool,
}

impl Propellant {
    pub fn new(name: impl Into<String>, ratio: f64, density: f64) -> Self {
        Self {
            name: name.into(),
            ratio,
            density,
            deprived: false,
        }
    }

    /// Massless resources (electric charge and the like) never limit a burn.
    pub fn is_ignorable(&self) -> bool {
        self.density <= 0.0
    }

    /// Mixture ratio by mass.
    pub fn mass_ratio(&self) -> f64 {
        self.ratio * self.density
    }
}

/// An engine module mounted on a part.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineModule {
    /// Engine has been activated
    pub ignited: bool,
    /// Engine has flamed out
    pub flameout: bool,
    /// Minimum thrust at zero throttle (kN)
    pub min_thrust: f64,
    /// Maximum thrust at full throttle (kN)
    pub max_thrust: f64,
    /// Thrust limiter setting in [0, 1]
    pub thrust_limit: f64,
    /// Vacuum specific impulse (s)
    pub vacuum_isp: f64,
    /// Thrust direction in the world frame (unit vector)
    pub forward: DVec3,
    pub propellants: Vec<Propellant>,
}

impl EngineModule {
    /// Ignited engine with full thrust limit pointing along `forward`.
    pub fn new(max_thrust: f64, vacuum_isp: f64, forward: DVec3) -> Self {
        Self {
            ignited: true,
            flameout: false,
            min_thrust: 0.0,
            max_thrust,
            thrust_limit: 1.0,
            vacuum_isp,
            forward: forward.normalize_or_zero(),
            propellants: Vec::new(),
        }
    }

    pub fn with_propellant(mut self, propellant: Propellant) -> Self {
        self.propellants.push(propellant);
        self
    }

    pub fn with_thrust_limit(mut self, limit: f64) -> Self {
        self.thrust_limit = limit.clamp(0.0, 1.0);
        self
    }

    /// Ignited and not flamed out.
    pub fn is_operational(&self) -> bool {
        self.ignited && !self.flameout
    }

    /// True if any mass-bearing propellant is deprived.
    pub fn is_starved(&self) -> bool {
        self.propellants
            .iter()
            .any(|p| !p.is_ignorable() && p.deprived)
    }

    /// Thrust at the current limiter setting (kN).
    pub fn limited_thrust(&self) -> f64 {
        self.min_thrust + (self.max_thrust - self.min_thrust) * self.thrust_limit
    }
}

/// A resource stored in a part.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceContainer {
    pub name: String,
    /// Amount in resource units
    pub amount: f64,
    /// Density in tons per unit
    pub density: f64,
    /// Flow state; disabled tanks do not feed engines
    pub flow_enabled: bool,
}

impl ResourceContainer {
    pub fn new(name: impl Into<String>, amount: f64, density: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            density,
            flow_enabled: true,
        }
    }

    /// Stored mass in tons.
    pub fn mass(&self) -> f64 {
        self.amount * self.density
    }
}

/// Collision geometry of a part, approximated by a sphere around its origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    /// Bounding radius (m)
    pub radius: f64,
    /// Impact speed the part survives (m/s)
    pub crash_tolerance: f64,
}

/// A single part of a vessel.
#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    pub name: String,
    /// Mass without resources (t)
    pub dry_mass: f64,
    /// Part origin relative to the vessel position, world frame (m)
    pub offset: DVec3,
    /// `None` for parts that do not collide with terrain
    pub collider: Option<Collider>,
    pub engines: Vec<EngineModule>,
    pub resources: Vec<ResourceContainer>,
}

impl Part {
    pub fn new(name: impl Into<String>, dry_mass: f64) -> Self {
        Self {
            name: name.into(),
            dry_mass,
            offset: DVec3::ZERO,
            collider: None,
            engines: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn at(mut self, offset: DVec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_collider(mut self, radius: f64, crash_tolerance: f64) -> Self {
        self.collider = Some(Collider {
            radius,
            crash_tolerance,
        });
        self
    }

    pub fn with_engine(mut self, engine: EngineModule) -> Self {
        self.engines.push(engine);
        self
    }

    pub fn with_resource(mut self, resource: ResourceContainer) -> Self {
        self.resources.push(resource);
        self
    }

    /// Dry mass plus stored resources (t).
    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.resources.iter().map(ResourceContainer::mass).sum::<f64>()
    }
}

/// A craft made of parts.
#[derive(Clone, Debug, PartialEq)]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
    pub parts: Vec<Part>,
}

impl Vessel {
    pub fn new(id: VesselId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Total mass including resources (t).
    pub fn total_mass(&self) -> f64 {
        self.parts.iter().map(Part::total_mass).sum()
    }
}
