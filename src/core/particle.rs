use borsh::{BorshDeserialize, BorshSerialize};

use crate::core::{Vec2, EPS};
use crate::error::{Error, Result};

/// A hard disk with unit mass.
///
/// Fields:
/// - `id`: stable identifier, equal to the particle's index in the population
/// - `center`: disk center
/// - `radius`: disk radius (uniform across the population)
/// - `velocity`: current velocity
/// - `wall_collisions`, `pair_collisions`: realized-collision counters
#[derive(Debug, Clone, Copy, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Particle {
    pub id: u32,
    pub center: Vec2,
    pub radius: f64,
    pub velocity: Vec2,
    pub wall_collisions: u32,
    pub pair_collisions: u32,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` is non-positive or any component
    ///   is NaN/inf.
    pub fn new(id: u32, center: Vec2, radius: f64, velocity: Vec2) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !center.is_finite() {
            return Err(Error::InvalidParam("center must be finite".into()));
        }
        if !velocity.is_finite() {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            center,
            radius,
            velocity,
            wall_collisions: 0,
            pair_collisions: 0,
        })
    }

    /// Whether the two disks overlap within tolerance.
    #[inline]
    pub fn overlaps(&self, other: &Particle) -> bool {
        let shift = self.center - other.center;
        let touch = self.radius + other.radius;
        shift.length_squared() <= touch * touch - EPS
    }

    /// Kinetic energy for unit mass: 1/2 |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.velocity.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_ok() -> Result<()> {
        let p = Particle::new(1, Vec2::new(2.0, 3.0), 0.5, Vec2::new(-1.0, 0.25))?;
        assert_eq!(p.id, 1);
        assert_eq!(p.center, Vec2::new(2.0, 3.0));
        assert_eq!(p.velocity, Vec2::new(-1.0, 0.25));
        assert_eq!(p.wall_collisions, 0);
        assert_eq!(p.pair_collisions, 0);
        Ok(())
    }

    #[test]
    fn invalid_radius_rejected() {
        let err = Particle::new(0, Vec2::ZERO, 0.0, Vec2::ZERO).unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn non_finite_center_rejected() {
        let err = Particle::new(0, Vec2::new(f64::NAN, 0.0), 1.0, Vec2::ZERO).unwrap_err();
        assert!(err.to_string().contains("center"));
    }

    #[test]
    fn overlap_detection() -> Result<()> {
        let a = Particle::new(0, Vec2::new(0.0, 0.0), 1.0, Vec2::ZERO)?;
        let b = Particle::new(1, Vec2::new(1.5, 0.0), 1.0, Vec2::ZERO)?;
        let c = Particle::new(2, Vec2::new(4.0, 0.0), 1.0, Vec2::ZERO)?;
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        // Exact touching is not an overlap.
        let d = Particle::new(3, Vec2::new(2.0, 0.0), 1.0, Vec2::ZERO)?;
        assert!(!a.overlaps(&d));
        Ok(())
    }

    #[test]
    fn kinetic_energy_computed() -> Result<()> {
        let p = Particle::new(7, Vec2::ZERO, 1.0, Vec2::new(3.0, 4.0))?;
        assert!((p.kinetic_energy() - 12.5).abs() < 1e-12);
        Ok(())
    }
}
