//! Random non-overlapping population placement.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{rng, Rng, SeedableRng};

use crate::core::{Particle, Vec2};
use crate::error::{Error, Result};

/// Generate `n` non-overlapping disks of the given `radius` inside
/// `[0, box_len]²` by rejection sampling.
///
/// Centers are uniform over the box interior. Speeds are uniform in
/// `[box_len/(8·radius), box_len/4]` with a uniform direction; an empty speed
/// range is an invalid-parameter error. A fixed `seed` makes the population
/// reproducible.
pub fn random_population(
    n: usize,
    box_len: f64,
    radius: f64,
    seed: Option<u64>,
) -> Result<Vec<Particle>> {
    if n == 0 {
        return Err(Error::InvalidParam("population must not be empty".into()));
    }
    if box_len < 2.0 * radius {
        return Err(Error::InvalidParam(
            "box side must be at least 2 * radius".into(),
        ));
    }
    let speed_min = box_len / (8.0 * radius);
    let speed_max = box_len / 4.0;
    if speed_min > speed_max {
        return Err(Error::InvalidParam(format!(
            "empty speed range [{speed_min}, {speed_max}]; radius too small for this box"
        )));
    }

    let mut rng: StdRng = match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    };

    let mut particles: Vec<Particle> = Vec::with_capacity(n);
    let max_attempts = 1_000_000usize;
    for id in 0..(n as u32) {
        let mut attempts = 0usize;
        let center = loop {
            if attempts >= max_attempts {
                return Err(Error::InvalidParam(format!(
                    "failed to place particle {id} without overlap; try fewer particles or a smaller radius"
                )));
            }
            attempts += 1;
            let candidate = Vec2::new(
                rng.random_range(radius..=box_len - radius),
                rng.random_range(radius..=box_len - radius),
            );
            if !overlaps_existing(&particles, candidate, radius) {
                break candidate;
            }
        };

        let speed = rng.random_range(speed_min..=speed_max);
        let angle = rng.random_range(0.0..TAU);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

        particles.push(Particle::new(id, center, radius, velocity)?);
    }

    Ok(particles)
}

fn overlaps_existing(existing: &[Particle], center: Vec2, radius: f64) -> bool {
    existing.iter().any(|p| {
        let shift = center - p.center;
        shift.length_squared() < 4.0 * radius * radius
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_respects_the_box_and_never_overlaps() -> Result<()> {
        let particles = random_population(40, 50.0, 1.0, Some(99))?;
        assert_eq!(particles.len(), 40);
        for p in &particles {
            assert!(p.center.x >= 1.0 && p.center.x <= 49.0);
            assert!(p.center.y >= 1.0 && p.center.y <= 49.0);
        }
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                assert!(!a.overlaps(b), "disks {} and {} overlap", a.id, b.id);
            }
        }
        Ok(())
    }

    #[test]
    fn speeds_land_in_the_sampling_range() -> Result<()> {
        let particles = random_population(10, 40.0, 1.0, Some(7))?;
        for p in &particles {
            let speed = p.velocity.length();
            assert!(speed >= 5.0 - 1e-12 && speed <= 10.0 + 1e-12);
        }
        Ok(())
    }

    #[test]
    fn same_seed_reproduces_the_population() -> Result<()> {
        let a = random_population(25, 60.0, 1.0, Some(4242))?;
        let b = random_population(25, 60.0, 1.0, Some(4242))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn too_small_a_radius_empties_the_speed_range() {
        // speed_min = L/(8r) exceeds speed_max = L/4 whenever r < 0.5.
        let err = random_population(5, 20.0, 0.25, Some(1)).unwrap_err();
        assert!(err.to_string().contains("speed range"));
    }

    #[test]
    fn impossible_packing_gives_up_with_an_error() {
        // Nine unit disks cannot fit a 4x4 box.
        let err = random_population(9, 4.0, 1.0, Some(5)).unwrap_err();
        assert!(err.to_string().contains("without overlap"));
    }
}
