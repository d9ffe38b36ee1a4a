//! Coordinator role: owns the authoritative state, drives the round loop.

use tracing::debug;

use crate::cluster::codec::Message;
use crate::cluster::link::CoordinatorLink;
use crate::core::{resolve_step, CollisionEvent, SimulationState};
use crate::error::{Error, Result};

/// Cumulative tallies for a completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub wall_collisions: u64,
    pub pair_collisions: u64,
}

/// Run the coordinator side of the protocol to completion.
///
/// Per round: broadcast the full state (round 1) or the previous round's
/// modified particles (later rounds), gather candidate events from every
/// rank in ascending rank order, resolve, then hand the updated state to
/// `on_round` (the reporting seam). Gather order only affects buffer layout;
/// the resolver sorts all events before applying them.
pub fn run<F>(state: &mut SimulationState, link: &CoordinatorLink, mut on_round: F) -> Result<RunStats>
where
    F: FnMut(u32, &SimulationState) -> Result<()>,
{
    link.broadcast(&Message::Params {
        n: state.num_particles() as u32,
        box_len: state.box_len,
        radius: state.radius,
        steps: state.steps,
    })?;

    let mut stats = RunStats::default();
    let mut modified = Vec::new();

    for round in 1..=state.steps {
        if round == 1 {
            link.broadcast(&Message::FullState(state.particles.clone()))?;
        } else {
            link.broadcast(&Message::Delta(std::mem::take(&mut modified)))?;
        }

        let mut events: Vec<CollisionEvent> = Vec::new();
        for rank in 0..link.worker_count() {
            match link.receive(rank)? {
                Message::Events(batch) => events.extend(batch),
                other => {
                    return Err(Error::Protocol(format!(
                        "expected events from rank {rank}, got {other:?}"
                    )))
                }
            }
        }

        let gathered = events.len();
        let outcome = resolve_step(state, events)?;
        stats.wall_collisions += u64::from(outcome.wall_events);
        stats.pair_collisions += u64::from(outcome.pair_events);
        debug!(
            round,
            gathered,
            wall = outcome.wall_events,
            pair = outcome.pair_events,
            "round resolved"
        );
        modified = outcome.modified;

        on_round(round, state)?;
    }

    Ok(stats)
}
