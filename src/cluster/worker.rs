//! Worker role: compute candidate events for an assigned slice of the
//! population, round after round.

use tracing::trace;

use crate::cluster::codec::Message;
use crate::cluster::link::WorkerLink;
use crate::core::partition::assignments;
use crate::core::physics::{time_to_pair_contact, time_to_wall_contact};
use crate::core::{advance_wall_only, CollisionEvent, Particle, EPS};
use crate::error::{Error, Result};

/// Run the worker side of the protocol to completion.
///
/// Each round: refresh the local particle cache from the coordinator's
/// broadcast (the full array in round 1, pair-collision participants after
/// that), emit every candidate contact in `[0, 1]` (within tolerance) for the
/// assigned base indices, then advance the whole cache through the round as
/// if only walls existed — which is exactly what the coordinator assumes
/// every worker does for particles absent from the next delta.
pub fn run(link: &WorkerLink) -> Result<()> {
    let (n, box_len, steps) = match link.receive()? {
        Message::Params {
            n, box_len, steps, ..
        } => (n as usize, box_len, steps),
        other => {
            return Err(Error::Protocol(format!(
                "expected run parameters, got {other:?}"
            )))
        }
    };

    let bases = assignments(link.worker_count(), link.rank(), n);
    let mut particles: Vec<Particle> = Vec::new();

    for round in 1..=steps {
        match (round, link.receive()?) {
            (1, Message::FullState(all)) => {
                if all.len() != n {
                    return Err(Error::Protocol(format!(
                        "initial state holds {} particles, expected {n}",
                        all.len()
                    )));
                }
                particles = all;
            }
            (_, Message::Delta(delta)) if round > 1 => {
                for p in delta {
                    let idx = p.id as usize;
                    if idx >= n {
                        return Err(Error::Protocol(format!(
                            "delta particle id {} outside the population",
                            p.id
                        )));
                    }
                    particles[idx] = p;
                }
            }
            (_, other) => {
                return Err(Error::Protocol(format!(
                    "unexpected broadcast in round {round}: {other:?}"
                )))
            }
        }

        let mut events = Vec::new();
        for &base in &bases {
            for partner in base + 1..n {
                let t = time_to_pair_contact(&particles[base], &particles[partner]);
                if t + EPS >= 0.0 && t <= 1.0 + EPS {
                    events.push(CollisionEvent::pair(base as u32, partner as u32, t)?);
                }
            }
            let t = time_to_wall_contact(&particles[base], box_len);
            if t + EPS >= 0.0 && t <= 1.0 + EPS {
                events.push(CollisionEvent::wall(base as u32, t)?);
            }
        }
        trace!(
            rank = link.rank(),
            round,
            candidates = events.len(),
            "candidates computed"
        );
        link.send(&Message::Events(events))?;

        advance_wall_only(&mut particles, box_len);
    }

    Ok(())
}
