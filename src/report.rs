//! Textual reporting of simulation state.

use std::io::Write;

use crate::core::Particle;
use crate::error::Result;

/// Write one `round id x y vx vy` line per particle.
pub fn write_round<W: Write>(out: &mut W, round: u32, particles: &[Particle]) -> Result<()> {
    for p in particles {
        writeln!(
            out,
            "{} {} {:10.8} {:10.8} {:10.8} {:10.8}",
            round, p.id, p.center.x, p.center.y, p.velocity.x, p.velocity.y
        )?;
    }
    Ok(())
}

/// Write the final `round id x y vx vy pairCollisions wallCollisions` line
/// per particle.
pub fn write_summary<W: Write>(out: &mut W, round: u32, particles: &[Particle]) -> Result<()> {
    for p in particles {
        writeln!(
            out,
            "{} {} {:10.8} {:10.8} {:10.8} {:10.8} {} {}",
            round,
            p.id,
            p.center.x,
            p.center.y,
            p.velocity.x,
            p.velocity.y,
            p.pair_collisions,
            p.wall_collisions
        )?;
    }
    Ok(())
}
