//! Spawn scheduling and difficulty ramp
//!
//! Frame-coupled by design: the timer advances with rendered-frame deltas,
//! not fixed steps, so spawn timing is only approximately real-time under
//! heavy frame drops. Known limitation carried over from the original
//! cabinet build; do not "fix" it silently.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::sim::state::BallColor;

/// One spawn decision: which color, and where along the drop zone.
#[derive(Debug, Clone, Copy)]
pub struct SpawnParams {
    pub color: BallColor,
    pub x: f32,
}

pub struct SpawnScheduler {
    rng: Pcg32,
    seed: u64,
    /// Elapsed play time (seconds); drives the difficulty ramp
    elapsed: f32,
    /// Seconds accumulated since the last spawn attempt
    timer: f32,
    /// Current interval threshold, recomputed every frame
    interval: f32,
    /// Previous spawn's color, excluded from the next draw
    last_color: Option<BallColor>,
}

/// Spawn interval for a given elapsed play time: ramps down 10% per wave,
/// floored so late game stays playable.
pub(crate) fn spawn_interval(config: &GameConfig, elapsed: f32) -> f32 {
    let wave = (elapsed / config.wave_seconds).floor() as i32;
    (config.spawn_base_interval * config.spawn_ramp.powi(wave)).max(config.spawn_min_interval)
}

impl SpawnScheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            elapsed: 0.0,
            timer: 0.0,
            interval: 0.0,
            last_color: None,
        }
    }

    /// Reset for a fresh session; reseeds the RNG so replays reproduce.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.elapsed = 0.0;
        self.timer = 0.0;
        self.interval = 0.0;
        self.last_color = None;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Advance one rendered frame. Returns the spawns to perform; requests
    /// beyond the live-ball ceiling are dropped while the timer still
    /// advances (no backlog queue).
    pub fn frame(&mut self, dt: f32, config: &GameConfig, live: usize) -> Vec<SpawnParams> {
        self.elapsed += dt;
        self.interval = spawn_interval(config, self.elapsed);
        self.timer += dt;

        let mut live = live;
        let mut spawns = Vec::new();
        while self.timer >= self.interval {
            self.timer -= self.interval;
            if live >= config.live_ball_cap {
                log::debug!("live-ball ceiling ({}) reached, dropping spawn", config.live_ball_cap);
                continue;
            }
            spawns.push(self.draw(config));
            live += 1;
        }
        spawns
    }

    /// Immediate spawn request outside the timer (used at session start).
    pub fn request_now(&mut self, config: &GameConfig) -> SpawnParams {
        self.draw(config)
    }

    fn draw(&mut self, config: &GameConfig) -> SpawnParams {
        let color = self.pick_color();
        let x = self.rng.random_range(-config.drop_jitter..=config.drop_jitter);
        SpawnParams { color, x }
    }

    /// Uniform draw over the 4 colors, excluding the previous spawn's color.
    fn pick_color(&mut self) -> BallColor {
        let color = match self.last_color {
            None => BallColor::ALL[self.rng.random_range(0..BallColor::ALL.len())],
            Some(last) => {
                let mut pool = [last; 3];
                let mut n = 0;
                for candidate in BallColor::ALL {
                    if candidate != last {
                        pool[n] = candidate;
                        n += 1;
                    }
                }
                pool[self.rng.random_range(0..n)]
            }
        };
        self.last_color = Some(color);
        color
    }
}
