//! Distributed elastic collision simulation of uniform hard disks in a
//! square box.
//!
//! The population advances in discrete unit-time rounds. Each round, worker
//! nodes compute candidate contact events for disjoint slices of the
//! population ([`core::partition`]), a coordinator resolves them into a
//! consistent state update ([`core::resolver`]), and a broadcast/gather
//! protocol ([`cluster`]) keeps every node's view consistent without shared
//! memory.

pub mod cluster;
pub mod core;
pub mod error;
pub mod generate;
pub mod input;
pub mod report;

pub use crate::cluster::{run_simulation, ClusterConfig, RunStats};
pub use crate::core::SimulationState;
