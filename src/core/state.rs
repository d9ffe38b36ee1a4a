use crate::core::{Particle, Vec2, EPS};
use crate::error::{Error, Result};

/// Authoritative simulation state: a square box of side `box_len` holding
/// `particles.len()` disks of uniform `radius`, evolved for exactly `steps`
/// unit-time rounds.
///
/// Invariants (checked at construction, preserved by the resolver):
/// - every center lies within `[radius, box_len - radius]` on both axes
/// - particle ids equal their positions in the array
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub box_len: f64,
    pub radius: f64,
    pub steps: u32,
    pub particles: Vec<Particle>,
}

impl SimulationState {
    pub fn new(box_len: f64, radius: f64, steps: u32, particles: Vec<Particle>) -> Result<Self> {
        if !box_len.is_finite() || box_len <= 0.0 {
            return Err(Error::InvalidParam("box side must be finite and > 0".into()));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if box_len < 2.0 * radius {
            return Err(Error::InvalidParam(
                "box side must be at least 2 * radius".into(),
            ));
        }
        if particles.is_empty() {
            return Err(Error::InvalidParam("population must not be empty".into()));
        }
        for (idx, p) in particles.iter().enumerate() {
            if p.id as usize != idx {
                return Err(Error::InvalidParam(format!(
                    "particle at position {idx} carries id {}",
                    p.id
                )));
            }
            if (p.radius - radius).abs() > EPS {
                return Err(Error::InvalidParam(format!(
                    "particle {idx} has radius {} in a population of radius {radius}",
                    p.radius
                )));
            }
            let lo = radius - EPS;
            let hi = box_len - radius + EPS;
            if p.center.x < lo || p.center.x > hi || p.center.y < lo || p.center.y > hi {
                return Err(Error::InvalidParam(format!(
                    "particle {idx} starts outside the box interior"
                )));
            }
        }
        Ok(Self {
            box_len,
            radius,
            steps,
            particles,
        })
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Total momentum (diagnostic; walls exchange momentum with the box, so
    /// this is only conserved between wall contacts).
    pub fn momentum(&self) -> Vec2 {
        self.particles
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.velocity)
    }
}
