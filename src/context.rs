//! Per-tick flight context supplied by the host.
//!
//! The host game (or a test) inserts a [`FlightContext`] resource describing
//! the active vessel and its surroundings. Removing the resource means "no
//! active vessel" and every prediction resets to absent.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::body::CelestialBody;
use crate::error::ForecastError;
use crate::orbit::Orbit;
use crate::vessel::Vessel;

/// Flight situation as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Situation {
    PreLaunch,
    Landed,
    Splashed,
    Flying,
    SubOrbital,
    #[default]
    Orbiting,
    Escaping,
}

impl Situation {
    /// Resting on the ground or in the water.
    pub fn is_grounded(self) -> bool {
        matches!(self, Self::PreLaunch | Self::Landed | Self::Splashed)
    }
}

/// A selected rendezvous target.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub name: String,
    pub situation: Situation,
    /// Name of the body the target orbits
    pub body: String,
    /// Position relative to that body's center (m)
    pub position: DVec3,
    /// Orbital velocity (m/s)
    pub velocity: DVec3,
}

/// A planned burn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManeuverNode {
    /// Universal time of the node (s)
    pub ut: f64,
    /// Planned velocity change (m/s)
    pub delta_v: DVec3,
}

/// Everything the forecaster needs to know about the active vessel this tick.
#[derive(Resource, Clone, Debug)]
pub struct FlightContext {
    pub vessel: Vessel,
    pub situation: Situation,
    pub body: CelestialBody,
    /// Vessel position relative to the body center (m)
    pub position: DVec3,
    /// Orbital (inertial) velocity (m/s)
    pub velocity: DVec3,
    /// Velocity relative to the rotating surface (m/s)
    pub surface_velocity: DVec3,
    /// Terrain height above sea level directly below the vessel (m)
    pub terrain_altitude: f64,
    pub target: Option<Target>,
    pub maneuver: Option<ManeuverNode>,
}

impl FlightContext {
    /// Context for a vessel in flight. Surface velocity defaults to orbital velocity.
    pub fn new(vessel: Vessel, body: CelestialBody, position: DVec3, velocity: DVec3) -> Self {
        Self {
            vessel,
            situation: Situation::default(),
            body,
            position,
            velocity,
            surface_velocity: velocity,
            terrain_altitude: 0.0,
            target: None,
            maneuver: None,
        }
    }

    pub fn with_situation(mut self, situation: Situation) -> Self {
        self.situation = situation;
        self
    }

    pub fn with_surface_velocity(mut self, surface_velocity: DVec3) -> Self {
        self.surface_velocity = surface_velocity;
        self
    }

    pub fn with_terrain_altitude(mut self, altitude: f64) -> Self {
        self.terrain_altitude = altitude;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_maneuver(mut self, node: ManeuverNode) -> Self {
        self.maneuver = Some(node);
        self
    }

    /// Local "up" unit vector.
    pub fn up(&self) -> DVec3 {
        self.position.normalize_or_zero()
    }

    /// Altitude above sea level (m).
    pub fn altitude(&self) -> f64 {
        self.position.length() - self.body.radius
    }

    /// Altitude above the terrain directly below (m).
    pub fn altitude_above_terrain(&self) -> f64 {
        self.altitude() - self.terrain_altitude
    }

    /// Surface-relative vertical speed (m/s); negative when descending.
    pub fn vertical_speed(&self) -> f64 {
        self.surface_velocity.dot(self.up())
    }

    /// Surface-relative horizontal speed (m/s).
    pub fn horizontal_speed(&self) -> f64 {
        let up = self.up();
        (self.surface_velocity - up * self.surface_velocity.dot(up)).length()
    }

    /// Conic orbit through the current state vectors at universal time `ut`.
    pub fn orbit(&self, ut: f64) -> Result<Orbit, ForecastError> {
        Orbit::from_state_vectors(self.position, self.velocity, self.body.gm, ut)
    }

    /// Position and velocity of the vessel relative to the target.
    pub fn relative_state(&self) -> Option<(DVec3, DVec3)> {
        self.target
            .as_ref()
            .map(|target| (target.position - self.position, target.velocity - self.velocity))
    }
}
