//! Round-synchronous distributed execution: one coordinator owning the
//! authoritative state, `W` workers computing candidate events over disjoint
//! slices of the population. All cross-node state travels as encoded frames;
//! nothing is shared.

pub mod codec;
pub mod coordinator;
pub mod link;
pub mod worker;

use std::thread;
use std::time::Duration;

use tracing::{error, info};

pub use coordinator::RunStats;

use crate::core::SimulationState;
use crate::error::{Error, Result};
use link::channel_links;

/// How a run is executed.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Number of worker nodes (at least 1).
    pub workers: usize,
    /// Deadline for any single protocol receive. A worker or coordinator
    /// silent past this point fails the run with `Error::PeerUnavailable`.
    pub round_timeout: Duration,
}

impl ClusterConfig {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            round_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Evolve `state` through its configured number of rounds on an in-process
/// cluster of one coordinator (the calling thread) and `config.workers`
/// worker threads.
///
/// `on_round` runs on the coordinator after every resolved round; reporting
/// hangs off this seam. The final state is independent of the worker count.
pub fn run_simulation<F>(
    state: &mut SimulationState,
    config: &ClusterConfig,
    on_round: F,
) -> Result<RunStats>
where
    F: FnMut(u32, &SimulationState) -> Result<()>,
{
    if config.workers == 0 {
        return Err(Error::InvalidParam(
            "a run needs at least one worker".into(),
        ));
    }

    info!(
        particles = state.num_particles(),
        box_len = state.box_len,
        rounds = state.steps,
        workers = config.workers,
        "starting run"
    );

    let (coord_link, worker_links) = channel_links(config.workers, config.round_timeout);

    let stats = thread::scope(|scope| {
        let handles: Vec<_> = worker_links
            .into_iter()
            .map(|wl| scope.spawn(move || worker::run(&wl)))
            .collect();

        let coord_result = coordinator::run(state, &coord_link, on_round);
        // Closing the links lets any worker still waiting on a broadcast
        // observe the disconnect instead of running out its timeout.
        drop(coord_link);

        let mut worker_failure: Option<Error> = None;
        for (rank, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(rank, error = %e, "worker failed");
                    worker_failure.get_or_insert(e);
                }
                Err(_) => {
                    error!(rank, "worker panicked");
                    worker_failure.get_or_insert(Error::PeerUnavailable {
                        rank,
                        reason: "worker panicked".into(),
                    });
                }
            }
        }

        match (coord_result, worker_failure) {
            (Ok(stats), None) => Ok(stats),
            (Err(e), _) => Err(e),
            (Ok(_), Some(e)) => Err(e),
        }
    })?;

    info!(
        wall_collisions = stats.wall_collisions,
        pair_collisions = stats.pair_collisions,
        "run complete"
    );
    Ok(stats)
}
