//! Message channels between the coordinator and its workers.
//!
//! The protocol only needs ordered, reliable, whole-frame delivery within a
//! round: one-to-all broadcast downstream and per-rank point-to-point
//! upstream. Frames are the byte vectors produced by [`crate::cluster::codec`],
//! carried here over in-process `std::sync::mpsc` channels. Every receive has
//! an explicit deadline so a dead peer surfaces as
//! [`Error::PeerUnavailable`] instead of blocking the round forever.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::cluster::codec::{self, Message};
use crate::error::{Error, Result};

/// Coordinator-side endpoint: broadcast downstream, gather upstream.
pub struct CoordinatorLink {
    downlinks: Vec<Sender<Vec<u8>>>,
    uplinks: Vec<Receiver<Vec<u8>>>,
    timeout: Duration,
}

/// Worker-side endpoint for one rank.
pub struct WorkerLink {
    rank: usize,
    worker_count: usize,
    downlink: Receiver<Vec<u8>>,
    uplink: Sender<Vec<u8>>,
    timeout: Duration,
}

/// Build the channel pairs connecting one coordinator to `worker_count`
/// workers.
pub fn channel_links(worker_count: usize, timeout: Duration) -> (CoordinatorLink, Vec<WorkerLink>) {
    let mut downlinks = Vec::with_capacity(worker_count);
    let mut uplinks = Vec::with_capacity(worker_count);
    let mut workers = Vec::with_capacity(worker_count);

    for rank in 0..worker_count {
        let (down_tx, down_rx) = channel();
        let (up_tx, up_rx) = channel();
        downlinks.push(down_tx);
        uplinks.push(up_rx);
        workers.push(WorkerLink {
            rank,
            worker_count,
            downlink: down_rx,
            uplink: up_tx,
            timeout,
        });
    }

    (
        CoordinatorLink {
            downlinks,
            uplinks,
            timeout,
        },
        workers,
    )
}

impl CoordinatorLink {
    pub fn worker_count(&self) -> usize {
        self.downlinks.len()
    }

    /// Send the same message to every worker.
    pub fn broadcast(&self, msg: &Message) -> Result<()> {
        let frame = codec::encode(msg)?;
        for (rank, tx) in self.downlinks.iter().enumerate() {
            tx.send(frame.clone()).map_err(|_| Error::PeerUnavailable {
                rank,
                reason: "downlink closed".into(),
            })?;
        }
        Ok(())
    }

    /// Receive the next message from the given rank, bounded by the round
    /// timeout.
    pub fn receive(&self, rank: usize) -> Result<Message> {
        let frame = self.uplinks[rank]
            .recv_timeout(self.timeout)
            .map_err(|e| Error::PeerUnavailable {
                rank,
                reason: match e {
                    RecvTimeoutError::Timeout => "timed out".into(),
                    RecvTimeoutError::Disconnected => "uplink closed".into(),
                },
            })?;
        codec::decode(&frame)
    }
}

impl WorkerLink {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Receive the next broadcast from the coordinator, bounded by the round
    /// timeout.
    pub fn receive(&self) -> Result<Message> {
        let frame = self
            .downlink
            .recv_timeout(self.timeout)
            .map_err(|e| Error::PeerUnavailable {
                rank: self.rank,
                reason: match e {
                    RecvTimeoutError::Timeout => "coordinator timed out".into(),
                    RecvTimeoutError::Disconnected => "coordinator gone".into(),
                },
            })?;
        codec::decode(&frame)
    }

    /// Send a message up to the coordinator.
    pub fn send(&self, msg: &Message) -> Result<()> {
        let frame = codec::encode(msg)?;
        self.uplink.send(frame).map_err(|_| Error::PeerUnavailable {
            rank: self.rank,
            reason: "coordinator gone".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_reaches_every_rank() -> Result<()> {
        let (coord, workers) = channel_links(3, Duration::from_secs(1));
        let msg = Message::Events(Vec::new());
        coord.broadcast(&msg)?;
        for w in &workers {
            assert_eq!(w.receive()?, msg);
        }
        Ok(())
    }

    #[test]
    fn upstream_frames_arrive_per_rank() -> Result<()> {
        let (coord, workers) = channel_links(2, Duration::from_secs(1));
        workers[1].send(&Message::Events(Vec::new()))?;
        workers[0].send(&Message::Events(Vec::new()))?;
        // Gather order is by rank, not send order.
        assert!(matches!(coord.receive(0)?, Message::Events(_)));
        assert!(matches!(coord.receive(1)?, Message::Events(_)));
        Ok(())
    }

    #[test]
    fn silent_peer_times_out() {
        let (coord, _workers) = channel_links(1, Duration::from_millis(10));
        assert!(matches!(
            coord.receive(0),
            Err(Error::PeerUnavailable { rank: 0, .. })
        ));
    }

    #[test]
    fn dropped_coordinator_fails_the_worker_send() {
        let (coord, workers) = channel_links(1, Duration::from_millis(10));
        drop(coord);
        assert!(matches!(
            workers[0].send(&Message::Events(Vec::new())),
            Err(Error::PeerUnavailable { .. })
        ));
    }
}
