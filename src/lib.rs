//! Rail Sort - a color-sorting arcade game core
//!
//! Colored balls roll down an inclined rail onto a table; the player slides a
//! four-compartment sorting box beneath the rail's mouth to catch each ball in
//! the compartment matching its color.
//!
//! Core modules:
//! - `sim`: Deterministic fixed-timestep simulation over a rapier3d world
//! - `config`: Data-driven tuning and the miss-policy switch
//!
//! Rendering, input capture, and HUD live outside this crate: they feed a
//! clamped target coordinate and start/pause/resume triggers in through
//! [`sim::FrameInput`], and read ball poses, score, and phase back out each
//! frame.

pub mod config;
pub mod sim;

pub use config::{GameConfig, MissPolicy};
pub use sim::{BallColor, FrameInput, GameLoop, GamePhase, GameState};

/// Timing and scene geometry constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Frame delta cap; prevents spiral-of-death catch-up after a stall
    pub const FRAME_DT_CAP: f32 = 0.1;
    /// Maximum fixed steps per rendered frame
    pub const MAX_SUBSTEPS: u32 = 12;

    /// Ball radius
    pub const BALL_RADIUS: f32 = 0.25;
    /// Drop zone: balls appear at the top of the rail with zero velocity
    pub const DROP_Y: f32 = 4.6;
    pub const DROP_Z: f32 = -6.0;

    /// Sorting box center height and depth; only x is actuated
    pub const BOX_Y: f32 = 0.55;
    pub const BOX_Z: f32 = 0.6;
    /// Compartment centers relative to the box body, left to right
    pub const COMPARTMENT_OFFSETS: [f32; 4] = [-1.2, -0.4, 0.4, 1.2];
}
