//! Celestial bodies vessels orbit and land on.

/// A spherical reference body.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    /// Mean radius at sea level (m)
    pub radius: f64,
    /// Gravitational parameter GM (m³/s²)
    pub gm: f64,
    /// Height of the atmosphere boundary above sea level (m), if any
    pub atmosphere_depth: Option<f64>,
    /// Whether the body has a sea at altitude zero
    pub has_ocean: bool,
    /// Highest terrain point above sea level (m)
    pub max_terrain_altitude: f64,
}

impl CelestialBody {
    pub fn new(name: impl Into<String>, radius: f64, gm: f64) -> Self {
        Self {
            name: name.into(),
            radius,
            gm,
            atmosphere_depth: None,
            has_ocean: false,
            max_terrain_altitude: 0.0,
        }
    }

    pub fn with_atmosphere(mut self, depth: f64) -> Self {
        self.atmosphere_depth = Some(depth);
        self
    }

    pub fn with_ocean(mut self) -> Self {
        self.has_ocean = true;
        self
    }

    pub fn with_max_terrain(mut self, altitude: f64) -> Self {
        self.max_terrain_altitude = altitude;
        self
    }

    /// Altitude above which nothing on the surface can be hit.
    ///
    /// With an ocean the sea surface counts, so this is never below zero.
    pub fn safe_altitude(&self) -> f64 {
        if self.has_ocean {
            self.max_terrain_altitude.max(0.0)
        } else {
            self.max_terrain_altitude
        }
    }

    /// Radius of the atmosphere boundary (m), if the body has one.
    pub fn atmosphere_radius(&self) -> Option<f64> {
        self.atmosphere_depth
            .filter(|depth| *depth > 0.0)
            .map(|depth| self.radius + depth)
    }

    /// Surface gravity (m/s²).
    pub fn surface_gravity(&self) -> f64 {
        self.gm / (self.radius * self.radius)
    }
}
