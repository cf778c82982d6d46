//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed timestep only (the accumulator in `tick` slices frame time)
//! - Seeded RNG only
//! - Stable iteration order (registry snapshots sorted by collider handle)
//! - No rendering or platform dependencies

pub mod actuator;
pub mod physics;
pub mod registry;
pub mod resolver;
pub mod spawner;
pub mod state;
pub mod tick;

pub use actuator::ActuatorController;
pub use physics::PhysicsWorld;
pub use registry::{BallRecord, EntityRegistry};
pub use spawner::{SpawnParams, SpawnScheduler};
pub use state::{BallColor, GamePhase, GameState};
pub use tick::{FrameInput, GameLoop, tick};
