//! Simulation core: value types, the physics kernel, the per-step conflict
//! resolver, and the static work partitioner. Everything here is pure state
//! manipulation; message passing lives in [`crate::cluster`].

pub mod event;
pub mod partition;
pub mod particle;
pub mod physics;
pub mod resolver;
pub mod state;
pub mod vec2;

pub use event::{event_order, CollisionEvent, Contact};
pub use particle::Particle;
pub use resolver::{advance_wall_only, resolve_step, StepOutcome};
pub use state::SimulationState;
pub use vec2::Vec2;

/// Numerical tolerance for time and geometric comparisons, used throughout
/// the kernel, the event order, and the resolver.
pub const EPS: f64 = 1e-8;
