//! Game tuning and mode configuration
//!
//! Loaded from a JSON file when one is supplied; defaults mirror the shipped
//! arcade balance. Everything here is plain data so sessions stay
//! reproducible from (config, seed) alone.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// What a lost or missorted ball costs the player.
///
/// Both policies shipped in earlier builds; the mode is an explicit choice
/// here rather than a hardcoded rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissPolicy {
    /// Subtract a score penalty; the session never ends on misses.
    ScorePenalty,
    /// Lose a life; the session ends when lives reach zero.
    #[default]
    LoseLife,
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub miss_policy: MissPolicy,
    /// Fixed RNG seed; `None` lets the caller pick one
    pub seed: Option<u64>,

    // === Scoring ===
    pub match_reward: i64,
    /// Score subtracted per miss under [`MissPolicy::ScorePenalty`]
    pub miss_penalty: i64,
    /// Starting lives under [`MissPolicy::LoseLife`]
    pub start_lives: u8,

    // === Spawning ===
    /// Interval between spawns at the start of a session (seconds)
    pub spawn_base_interval: f32,
    /// Interval floor the difficulty ramp cannot cross (seconds)
    pub spawn_min_interval: f32,
    /// Per-wave interval multiplier
    pub spawn_ramp: f32,
    /// Wave length for the difficulty ramp (seconds)
    pub wave_seconds: f32,
    /// Live-ball ceiling; spawn requests beyond it are dropped
    pub live_ball_cap: usize,
    /// Horizontal half-range of drop zone jitter
    pub drop_jitter: f32,

    // === Actuator ===
    /// Symmetric travel limit R of the sorting box
    pub actuator_range: f32,
    /// Exponential damping rate constant k
    pub actuator_rate: f32,

    // === Out-of-bounds envelope ===
    /// Balls below this height count as missed
    pub floor_y: f32,
    /// Horizontal/depth displacement beyond which a ball counts as missed
    pub bounds_xz: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            miss_policy: MissPolicy::default(),
            seed: None,

            match_reward: 10,
            miss_penalty: 5,
            start_lives: 3,

            spawn_base_interval: 1.0,
            spawn_min_interval: 0.35,
            spawn_ramp: 0.9,
            wave_seconds: 10.0,
            live_ball_cap: 30,
            drop_jitter: 1.4,

            actuator_range: 3.5,
            actuator_rate: 12.0,

            floor_y: -2.0,
            bounds_xz: 12.0,
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }
}
