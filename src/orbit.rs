//! Two-body conic orbits built from state vectors.
//!
//! Supports elliptic and hyperbolic trajectories in 3D. Kepler's equation is
//! solved with Newton's method in both regimes. Positions are relative to the
//! reference body's center; times are universal time in seconds.

use bevy::math::DVec3;
use std::f64::consts::{PI, TAU};

use crate::error::ForecastError;

/// Below this specific angular momentum (m²/s) the orbit is a radial line.
const MIN_ANGULAR_MOMENTUM: f64 = 1e-6;

/// Eccentricities closer to 1 than this are rejected as parabolic.
const PARABOLIC_TOLERANCE: f64 = 1e-9;

/// Below this eccentricity the periapsis direction is undefined.
const CIRCULAR_TOLERANCE: f64 = 1e-11;

/// Keplerian orbit around a point mass.
#[derive(Clone, Debug, PartialEq)]
pub struct Orbit {
    /// Gravitational parameter of the reference body (m³/s²)
    pub gm: f64,
    /// Semi-major axis (m). Negative for hyperbolic orbits.
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Semi-latus rectum (m)
    pub semi_latus_rectum: f64,
    /// Mean motion (rad/s)
    pub mean_motion: f64,
    /// Mean anomaly at `epoch` (rad)
    pub mean_anomaly_at_epoch: f64,
    /// Universal time the state vectors were sampled at (s)
    pub epoch: f64,
    /// Unit vector toward periapsis
    periapsis_dir: DVec3,
    /// Unit vector 90° ahead of periapsis in the orbital plane
    normal_dir: DVec3,
}

/// A point on an orbit, used transiently by the search predictors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSample {
    pub ut: f64,
    pub position: DVec3,
}

impl Orbit {
    /// Build an orbit from position (m) and velocity (m/s) at universal time `epoch`.
    pub fn from_state_vectors(
        position: DVec3,
        velocity: DVec3,
        gm: f64,
        epoch: f64,
    ) -> Result<Self, ForecastError> {
        if gm.is_nan() || gm <= 0.0 {
            return Err(ForecastError::InvalidGravitationalParameter(gm));
        }
        let r = position.length();
        if r < 1.0 {
            return Err(ForecastError::InsideBody { radius: r });
        }

        let h_vec = position.cross(velocity);
        let h = h_vec.length();
        if h < MIN_ANGULAR_MOMENTUM {
            return Err(ForecastError::DegenerateOrbit {
                angular_momentum: h,
            });
        }

        // Specific orbital energy: E = v²/2 - GM/r
        let energy = 0.5 * velocity.length_squared() - gm / r;

        // Eccentricity vector points at periapsis
        let e_vec = velocity.cross(h_vec) / gm - position / r;
        let eccentricity = e_vec.length();
        if (eccentricity - 1.0).abs() < PARABOLIC_TOLERANCE {
            return Err(ForecastError::ParabolicOrbit { energy });
        }

        let semi_latus_rectum = h * h / gm;
        let semi_major_axis = semi_latus_rectum / (1.0 - eccentricity * eccentricity);

        let w = h_vec / h;
        let periapsis_dir = if eccentricity > CIRCULAR_TOLERANCE {
            e_vec / eccentricity
        } else {
            position / r
        };
        let normal_dir = w.cross(periapsis_dir);

        let true_anomaly = position.dot(normal_dir).atan2(position.dot(periapsis_dir));

        let (mean_motion, mean_anomaly_at_epoch) = if eccentricity < 1.0 {
            let a = semi_major_axis;
            let n = (gm / (a * a * a)).sqrt();
            let ecc_anomaly = true_to_eccentric_anomaly(true_anomaly, eccentricity);
            (n, ecc_anomaly - eccentricity * ecc_anomaly.sin())
        } else {
            let a = -semi_major_axis;
            let n = (gm / (a * a * a)).sqrt();
            let hyp_anomaly = true_to_hyperbolic_anomaly(true_anomaly, eccentricity);
            (n, eccentricity * hyp_anomaly.sinh() - hyp_anomaly)
        };

        Ok(Self {
            gm,
            semi_major_axis,
            eccentricity,
            semi_latus_rectum,
            mean_motion,
            mean_anomaly_at_epoch,
            epoch,
            periapsis_dir,
            normal_dir,
        })
    }

    pub fn is_hyperbolic(&self) -> bool {
        self.eccentricity > 1.0
    }

    /// Periapsis radius (m).
    pub fn periapsis(&self) -> f64 {
        self.semi_latus_rectum / (1.0 + self.eccentricity)
    }

    /// Apoapsis radius (m); infinite for hyperbolic orbits.
    pub fn apoapsis(&self) -> f64 {
        if self.is_hyperbolic() {
            f64::INFINITY
        } else {
            self.semi_latus_rectum / (1.0 - self.eccentricity)
        }
    }

    /// Orbital period (s); `None` for hyperbolic orbits.
    pub fn period(&self) -> Option<f64> {
        if self.is_hyperbolic() {
            None
        } else {
            Some(TAU / self.mean_motion)
        }
    }

    /// Mean anomaly at universal time `ut`.
    pub fn mean_anomaly_at(&self, ut: f64) -> f64 {
        self.mean_anomaly_at_epoch + self.mean_motion * (ut - self.epoch)
    }

    /// True anomaly at universal time `ut`.
    pub fn true_anomaly_at(&self, ut: f64) -> f64 {
        let mean_anomaly = self.mean_anomaly_at(ut);
        if self.is_hyperbolic() {
            let h = solve_hyperbolic_anomaly(mean_anomaly, self.eccentricity);
            hyperbolic_to_true_anomaly(h, self.eccentricity)
        } else {
            let e = solve_eccentric_anomaly(mean_anomaly, self.eccentricity);
            eccentric_to_true_anomaly(e, self.eccentricity)
        }
    }

    /// Radius at true anomaly `nu` (m).
    pub fn radius_at_true_anomaly(&self, nu: f64) -> f64 {
        self.semi_latus_rectum / (1.0 + self.eccentricity * nu.cos())
    }

    /// Distance from the body center at universal time `ut` (m).
    pub fn radius_at(&self, ut: f64) -> f64 {
        self.radius_at_true_anomaly(self.true_anomaly_at(ut))
    }

    /// Position relative to the body center at universal time `ut` (m).
    pub fn position_at(&self, ut: f64) -> DVec3 {
        let nu = self.true_anomaly_at(ut);
        let r = self.radius_at_true_anomaly(nu);
        (self.periapsis_dir * nu.cos() + self.normal_dir * nu.sin()) * r
    }

    /// Orbital velocity at universal time `ut` (m/s).
    pub fn velocity_at(&self, ut: f64) -> DVec3 {
        let nu = self.true_anomaly_at(ut);
        let scale = (self.gm / self.semi_latus_rectum).sqrt();
        (self.periapsis_dir * -nu.sin() + self.normal_dir * (self.eccentricity + nu.cos())) * scale
    }

    pub fn sample(&self, ut: f64) -> OrbitSample {
        OrbitSample {
            ut,
            position: self.position_at(ut),
        }
    }

    /// True if the body is moving away from periapsis at `ut`.
    pub fn is_outbound_at(&self, ut: f64) -> bool {
        self.true_anomaly_at(ut).sin() > 0.0
    }
}

/// Solve Kepler's equation M = E - e·sin(E) for the eccentric anomaly.
pub fn solve_eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    // Normalize mean anomaly to [0, 2π)
    let m = mean_anomaly.rem_euclid(TAU);

    let mut e_anomaly = if eccentricity < 0.8 { m } else { PI };

    for _ in 0..50 {
        let f = e_anomaly - eccentricity * e_anomaly.sin() - m;
        let f_prime = 1.0 - eccentricity * e_anomaly.cos();
        let delta = f / f_prime;
        e_anomaly -= delta;

        if delta.abs() < 1e-12 {
            break;
        }
    }

    e_anomaly
}

/// Solve the hyperbolic Kepler equation M = e·sinh(H) - H.
pub fn solve_hyperbolic_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut h = (mean_anomaly / eccentricity).asinh();

    for _ in 0..50 {
        let f = eccentricity * h.sinh() - h - mean_anomaly;
        let f_prime = eccentricity * h.cosh() - 1.0;
        let delta = f / f_prime;
        h -= delta;

        if delta.abs() < 1e-12 {
            break;
        }
    }

    h
}

/// ν = 2·atan2(√(1+e)·sin(E/2), √(1-e)·cos(E/2))
pub fn eccentric_to_true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    let y = (1.0 + eccentricity).sqrt() * half.sin();
    let x = (1.0 - eccentricity).sqrt() * half.cos();
    2.0 * y.atan2(x)
}

pub fn true_to_eccentric_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let half = true_anomaly / 2.0;
    let y = (1.0 - eccentricity).sqrt() * half.sin();
    let x = (1.0 + eccentricity).sqrt() * half.cos();
    2.0 * y.atan2(x)
}

/// ν = 2·atan(√((e+1)/(e-1))·tanh(H/2))
pub fn hyperbolic_to_true_anomaly(hyperbolic_anomaly: f64, eccentricity: f64) -> f64 {
    let factor = ((eccentricity + 1.0) / (eccentricity - 1.0)).sqrt();
    2.0 * (factor * (hyperbolic_anomaly / 2.0).tanh()).atan()
}

pub fn true_to_hyperbolic_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let factor = ((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt();
    // Clamp keeps atanh finite right at the asymptotes
    let x = (factor * (true_anomaly / 2.0).tan()).clamp(-1.0 + 1e-15, 1.0 - 1e-15);
    2.0 * x.atanh()
}
