//! Per-step conflict resolution: turn the gathered candidate events into a
//! consistent next state.
//!
//! Only the first event per particle per round is honored; later contacts in
//! the same round are deferred to the next round's candidate computation.

use crate::core::event::{event_order, CollisionEvent, Contact};
use crate::core::physics::{
    advance, resolve_pair_collision, resolve_wall_collision, time_to_wall_contact,
};
use crate::core::{Particle, SimulationState, EPS};
use crate::error::{Error, Result};

/// What a round of conflict resolution produced.
#[derive(Debug, Default)]
pub struct StepOutcome {
    /// Pair-collision participants, in resolution order. These are the
    /// particles whose state must reach every worker before the next round;
    /// wall-only changes are reproduced by each worker on its own.
    pub modified: Vec<Particle>,
    /// Realized wall collisions this round.
    pub wall_events: u32,
    /// Realized pair collisions this round.
    pub pair_events: u32,
}

/// Apply one round of collisions to `state`.
///
/// Events are sorted by the total order of [`event_order`]; the scan honors
/// at most one event per particle. Each honored event advances its
/// participants to the contact time, applies the collision, and advances them
/// through the remainder of the unit step assuming no further contact.
/// Particles untouched by any event drift for the full step.
pub fn resolve_step(
    state: &mut SimulationState,
    mut events: Vec<CollisionEvent>,
) -> Result<StepOutcome> {
    let n = state.particles.len();
    let box_len = state.box_len;
    for ev in &events {
        let in_range = match ev.contact {
            Contact::Wall { p } => (p as usize) < n,
            Contact::Pair { a, b } => (a as usize) < n && (b as usize) < n,
        };
        if !in_range {
            return Err(Error::Protocol(format!(
                "candidate event references a particle outside the population: {ev:?}"
            )));
        }
    }
    events.sort_by(event_order);

    let mut resolved = vec![false; n];
    let mut outcome = StepOutcome::default();

    for ev in &events {
        match ev.contact {
            Contact::Wall { p } => {
                let p = p as usize;
                if resolved[p] {
                    continue;
                }
                let disk = &mut state.particles[p];
                advance(disk, ev.time, box_len);
                resolve_wall_collision(disk, box_len);
                resolved[p] = true;
                if 1.0 - ev.time > EPS {
                    advance(disk, 1.0 - ev.time, box_len);
                }
                outcome.wall_events += 1;
            }
            Contact::Pair { a, b } => {
                let (ai, bi) = (a as usize, b as usize);
                if resolved[ai] || resolved[bi] {
                    continue;
                }
                // Contact::pair normalizes a < b, so the split is safe.
                let (head, tail) = state.particles.split_at_mut(bi);
                let (da, db) = (&mut head[ai], &mut tail[0]);
                advance(da, ev.time, box_len);
                advance(db, ev.time, box_len);
                resolve_pair_collision(da, db)?;
                resolved[ai] = true;
                resolved[bi] = true;
                if 1.0 - ev.time > EPS {
                    advance(da, 1.0 - ev.time, box_len);
                    advance(db, 1.0 - ev.time, box_len);
                }
                outcome.modified.push(state.particles[ai]);
                outcome.modified.push(state.particles[bi]);
                outcome.pair_events += 1;
            }
        }
    }

    for (idx, disk) in state.particles.iter_mut().enumerate() {
        if !resolved[idx] {
            advance(disk, 1.0, box_len);
        }
    }

    Ok(outcome)
}

/// Advance every particle through one unit step as if only walls existed.
///
/// This is the pass each worker runs over its entire local cache once per
/// round: wall outcomes are reproducible from local state alone, so the
/// coordinator only has to broadcast pair-collision participants.
pub fn advance_wall_only(particles: &mut [Particle], box_len: f64) {
    for disk in particles.iter_mut() {
        let wall_time = time_to_wall_contact(disk, box_len);
        if wall_time + EPS >= 0.0 && wall_time <= 1.0 + EPS {
            advance(disk, wall_time, box_len);
            resolve_wall_collision(disk, box_len);
            if 1.0 - wall_time > EPS {
                advance(disk, 1.0 - wall_time, box_len);
            }
        } else {
            advance(disk, 1.0, box_len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec2;

    fn two_disk_state(
        radius: f64,
        a: (f64, f64, f64, f64),
        b: (f64, f64, f64, f64),
    ) -> Result<SimulationState> {
        let particles = vec![
            Particle::new(0, Vec2::new(a.0, a.1), radius, Vec2::new(a.2, a.3))?,
            Particle::new(1, Vec2::new(b.0, b.1), radius, Vec2::new(b.2, b.3))?,
        ];
        SimulationState::new(10.0, radius, 1, particles)
    }

    #[test]
    fn no_events_means_free_flight() -> Result<()> {
        let mut state = two_disk_state(1.0, (1.0, 5.0, 1.0, 0.0), (9.0, 5.0, -1.0, 0.0))?;
        let outcome = resolve_step(&mut state, Vec::new())?;
        assert!(outcome.modified.is_empty());
        assert_eq!(state.particles[0].center, Vec2::new(2.0, 5.0));
        assert_eq!(state.particles[1].center, Vec2::new(8.0, 5.0));
        Ok(())
    }

    #[test]
    fn pair_event_swaps_velocities_and_reports_both_modified() -> Result<()> {
        let mut state = two_disk_state(0.5, (4.0, 5.0, 1.0, 0.0), (6.0, 5.0, -1.0, 0.0))?;
        let events = vec![CollisionEvent::pair(0, 1, 0.5)?];
        let outcome = resolve_step(&mut state, events)?;

        assert_eq!(outcome.pair_events, 1);
        assert_eq!(outcome.modified.len(), 2);
        let p0 = &state.particles[0];
        let p1 = &state.particles[1];
        assert!((p0.velocity.x - -1.0).abs() < EPS);
        assert!((p1.velocity.x - 1.0).abs() < EPS);
        // Advanced to contact at 0.5, then back out for the remaining 0.5.
        assert!((p0.center.x - 4.0).abs() < EPS);
        assert!((p1.center.x - 6.0).abs() < EPS);
        assert_eq!(p0.pair_collisions, 1);
        assert_eq!(p1.pair_collisions, 1);
        Ok(())
    }

    #[test]
    fn at_most_one_event_per_particle_per_round() -> Result<()> {
        let mut state = two_disk_state(0.5, (4.0, 5.0, 1.0, 0.0), (6.0, 5.0, -1.0, 0.0))?;
        // A later wall event for particle 0 and a duplicate pair event must
        // both lose to the first resolution.
        let events = vec![
            CollisionEvent::pair(0, 1, 0.5)?,
            CollisionEvent::pair(0, 1, 0.5)?,
            CollisionEvent::wall(0, 0.9)?,
        ];
        let outcome = resolve_step(&mut state, events)?;
        assert_eq!(outcome.pair_events, 1);
        assert_eq!(outcome.wall_events, 0);
        assert_eq!(state.particles[0].pair_collisions, 1);
        assert_eq!(state.particles[0].wall_collisions, 0);
        Ok(())
    }

    #[test]
    fn wall_beats_pair_on_an_exact_time_tie() -> Result<()> {
        // Particle 0 reaches the x=0 wall at t=1 exactly as particle 1 would
        // reach it; the wall sentinel sorts first, resolves particle 0, and
        // the pair event is dropped.
        let mut state = two_disk_state(1.0, (2.0, 5.0, -1.0, 0.0), (5.0, 5.0, -2.0, 0.0))?;
        let events = vec![
            CollisionEvent::pair(0, 1, 1.0)?,
            CollisionEvent::wall(0, 1.0)?,
        ];
        let outcome = resolve_step(&mut state, events)?;
        assert_eq!(outcome.wall_events, 1);
        assert_eq!(outcome.pair_events, 0);
        let p0 = &state.particles[0];
        assert_eq!(p0.center, Vec2::new(1.0, 5.0));
        assert!((p0.velocity.x - 1.0).abs() < EPS);
        assert_eq!(p0.wall_collisions, 1);
        // Particle 1 was left unresolved and drifted the whole step.
        assert_eq!(state.particles[1].center, Vec2::new(3.0, 5.0));
        assert_eq!(state.particles[1].pair_collisions, 0);
        Ok(())
    }

    #[test]
    fn out_of_range_participant_is_a_protocol_error() -> Result<()> {
        let mut state = two_disk_state(1.0, (2.0, 5.0, 0.0, 0.0), (5.0, 5.0, 0.0, 0.0))?;
        let events = vec![CollisionEvent::wall(9, 0.5)?];
        assert!(matches!(
            resolve_step(&mut state, events),
            Err(Error::Protocol(_))
        ));
        Ok(())
    }

    #[test]
    fn wall_only_pass_matches_the_resolver_for_wall_contacts() -> Result<()> {
        let mut resolved = two_disk_state(1.0, (2.0, 5.0, -2.0, 0.0), (8.0, 2.0, 0.5, 0.5))?;
        let mut swept = resolved.particles.clone();

        let events = vec![CollisionEvent::wall(0, 0.5)?];
        resolve_step(&mut resolved, events)?;
        advance_wall_only(&mut swept, 10.0);

        assert_eq!(swept, resolved.particles);
        Ok(())
    }
}
