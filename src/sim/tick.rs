//! Fixed timestep driver
//!
//! Accumulates rendered-frame deltas into fixed 120 Hz steps. Each step runs
//! actuator -> physics -> resolver -> bounds cleanup, exactly once. The spawn
//! scheduler ticks once per rendered frame with the frame delta, not per
//! fixed step.

use crate::config::GameConfig;
use crate::consts::{FRAME_DT_CAP, MAX_SUBSTEPS, SIM_DT};
use crate::sim::resolver;
use crate::sim::state::{GamePhase, GameState};

/// Per-frame input from the platform layer. The target coordinate is the
/// pointer ray's intersection with the operating plane, already clamped
/// upstream; triggers are single-shot with no payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Latest target coordinate for the sorting box
    pub target: Option<f32>,
    /// Start or restart a session
    pub start: bool,
    /// Freeze the simulation (e.g. on loss of focus)
    pub pause: bool,
    /// Leave the paused state
    pub resume: bool,
}

/// Advance the simulation by exactly one fixed step.
pub fn tick(state: &mut GameState) {
    state.time_ticks += 1;
    state.actuator.update(&mut state.physics, SIM_DT);
    let events = state.physics.step();
    resolver::resolve(state, &events);
    resolver::sweep_out_of_bounds(state);
}

/// Render-driven game loop: owns the simulation context and slices variable
/// wall-clock time into fixed steps.
pub struct GameLoop {
    pub state: GameState,
    accumulator: f32,
}

impl GameLoop {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            state: GameState::new(config, seed),
            accumulator: 0.0,
        }
    }

    /// Run one rendered frame's worth of simulation. `frame_dt` is the
    /// wall-clock delta since the previous call, in seconds.
    pub fn frame(&mut self, frame_dt: f32, input: &FrameInput) {
        // The latest target always lands, even while paused; it only takes
        // effect on the next tick.
        if let Some(target) = input.target {
            self.state.actuator.set_target(target);
        }

        match self.state.phase {
            GamePhase::Menu | GamePhase::Result if input.start => {
                self.state.start();
                self.accumulator = 0.0;
            }
            GamePhase::Playing if input.pause => {
                self.state.phase = GamePhase::Paused;
                log::info!("paused");
            }
            GamePhase::Paused if input.resume => {
                self.state.phase = GamePhase::Playing;
                self.accumulator = 0.0;
                log::info!("resumed");
            }
            _ => {}
        }

        // Single gate: nothing below runs unless actively playing. Paused
        // sessions freeze entirely, physics included.
        if self.state.phase != GamePhase::Playing {
            return;
        }

        let dt = frame_dt.min(FRAME_DT_CAP);

        // Frame-coupled spawning (see spawner module docs).
        let spawns = self
            .state
            .spawner
            .frame(dt, &self.state.config, self.state.registry.len());
        self.state.apply_spawns(&spawns);

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT
            && substeps < MAX_SUBSTEPS
            && self.state.phase == GamePhase::Playing
        {
            tick(&mut self.state);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}
