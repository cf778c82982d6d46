//! Rail Sort headless demo
//!
//! Runs a seeded session with a simple autopilot steering the box so the
//! matching compartment sits under the lowest falling ball, and logs the
//! score trajectory. Useful for eyeballing balance changes without a
//! renderer; the real cabinet wires `GameLoop::frame` to its render/input
//! layer instead.

use std::path::Path;

use rail_sort::consts::COMPARTMENT_OFFSETS;
use rail_sort::{FrameInput, GameConfig, GameLoop, GamePhase};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEMO_SECONDS: u32 = 90;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(Path::new(&path))?,
        None => GameConfig::default(),
    };
    let seed = config.seed.unwrap_or(0x5EED_BA11);
    log::info!("demo session, seed {seed}");

    let mut game = GameLoop::new(config, seed);
    game.frame(
        FRAME_DT,
        &FrameInput {
            start: true,
            ..Default::default()
        },
    );

    for frame in 1..DEMO_SECONDS * 60 {
        let input = FrameInput {
            target: autopilot_target(&game),
            ..Default::default()
        };
        game.frame(FRAME_DT, &input);

        if game.state.phase == GamePhase::Result {
            break;
        }
        if frame % 600 == 0 {
            log::info!(
                "t={:>3}s score={} lives={} live_balls={}",
                frame / 60,
                game.state.score,
                game.state.lives,
                game.state.live_balls()
            );
        }
    }

    println!(
        "final score: {} ({} balls spawned, {} still live)",
        game.state.score,
        game.state.total_spawned,
        game.state.live_balls()
    );
    Ok(())
}

/// Pick the lowest falling ball and aim the box so that ball's compartment
/// sits underneath it.
fn autopilot_target(game: &GameLoop) -> Option<f32> {
    let mut best: Option<(f32, f32)> = None; // (ball height, desired box center)
    game.state.for_each_ball(|_, color, pos, _| {
        let desired = pos.x - COMPARTMENT_OFFSETS[color.index()];
        if best.is_none_or(|(y, _)| pos.y < y) {
            best = Some((pos.y, desired));
        }
    });
    let range = game.state.config.actuator_range;
    best.map(|(_, x)| x.clamp(-range, range))
}
