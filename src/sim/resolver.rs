//! Scoring and miss resolution
//!
//! Consumes the sensor begin-intersection events drained from the physics
//! step, plus an independent out-of-bounds sweep each tick. Every despawn
//! funnels through the registry, so a handle can never dangle across a tick
//! boundary and an event for an already-removed ball is a no-op.

use rapier3d::prelude::CollisionEvent;

use crate::sim::state::GameState;

/// Apply scoring rules for this tick's sensor events.
pub fn resolve(state: &mut GameState, events: &[CollisionEvent]) {
    for event in events {
        let CollisionEvent::Started(a, b, _) = *event else {
            continue;
        };
        // One side must be a live ball, the other a compartment sensor.
        // A ball removed earlier this tick fails the registry check and the
        // event is dropped.
        let (ball, other) = if state.registry.contains(a) {
            (a, b)
        } else if state.registry.contains(b) {
            (b, a)
        } else {
            continue;
        };
        let Some(compartment_color) = state.compartment_color(other) else {
            continue;
        };
        let Some(&record) = state.registry.get(ball) else {
            continue;
        };

        if record.color == compartment_color {
            state.score += state.config.match_reward;
            log::info!(
                "caught {} ball #{} -> score {}",
                record.color.as_str(),
                record.visual,
                state.score
            );
        } else {
            log::info!(
                "{} ball #{} landed in the {} compartment",
                record.color.as_str(),
                record.visual,
                compartment_color.as_str()
            );
            state.apply_miss();
        }
        state.registry.remove(&mut state.physics, ball);
    }
}

/// Despawn any ball that has left the play envelope; each counts as a miss,
/// independent of any compartment intersection.
pub fn sweep_out_of_bounds(state: &mut GameState) {
    for handle in state.registry.snapshot() {
        let Some(&record) = state.registry.get(handle) else {
            continue;
        };
        let Some(body) = state.physics.bodies.get(record.body) else {
            continue;
        };
        let t = *body.translation();
        let out = t.y < state.config.floor_y
            || t.x.abs() > state.config.bounds_xz
            || t.z.abs() > state.config.bounds_xz;
        if out {
            log::debug!(
                "ball #{} left bounds at ({:.1}, {:.1}, {:.1})",
                record.visual,
                t.x,
                t.y,
                t.z
            );
            state.apply_miss();
            state.registry.remove(&mut state.physics, handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, MissPolicy};
    use crate::sim::spawner::SpawnParams;
    use crate::sim::state::BallColor;
    use rapier3d::prelude::{nalgebra, CollisionEventFlags};

    fn playing_state(policy: MissPolicy) -> GameState {
        let mut config = GameConfig::default();
        config.miss_policy = policy;
        let mut state = GameState::new(config, 9);
        state.start();
        // Drop the scheduler's opening ball so tests track only their own.
        for handle in state.registry.snapshot() {
            state.registry.remove(&mut state.physics, handle);
        }
        state
    }

    fn spawn_colored(state: &mut GameState, color: BallColor) -> rapier3d::prelude::ColliderHandle {
        state.apply_spawns(&[SpawnParams { color, x: 0.0 }]);
        state.registry.snapshot()[0]
    }

    #[test]
    fn test_matching_compartment_scores() {
        let mut state = playing_state(MissPolicy::LoseLife);
        let ball = spawn_colored(&mut state, BallColor::Red);
        let (red_sensor, _) = state.compartments()[0];

        let events = [CollisionEvent::Started(
            ball,
            red_sensor,
            CollisionEventFlags::SENSOR,
        )];
        resolve(&mut state, &events);

        assert_eq!(state.score, state.config.match_reward);
        assert_eq!(state.lives, state.config.start_lives);
        assert!(state.registry.is_empty());
    }

    #[test]
    fn test_mismatch_applies_policy_and_despawns() {
        let mut state = playing_state(MissPolicy::ScorePenalty);
        let ball = spawn_colored(&mut state, BallColor::Red);
        let (green_sensor, _) = state.compartments()[1];

        // Handle order in the event must not matter.
        let events = [CollisionEvent::Started(
            green_sensor,
            ball,
            CollisionEventFlags::SENSOR,
        )];
        resolve(&mut state, &events);

        assert_eq!(state.score, -state.config.miss_penalty);
        assert!(state.registry.is_empty());
    }

    #[test]
    fn test_duplicate_events_handled_once() {
        let mut state = playing_state(MissPolicy::LoseLife);
        let ball = spawn_colored(&mut state, BallColor::Red);
        let (red_sensor, _) = state.compartments()[0];

        let event = CollisionEvent::Started(ball, red_sensor, CollisionEventFlags::SENSOR);
        resolve(&mut state, &[event, event]);

        // The second event found no registry entry and was dropped.
        assert_eq!(state.score, state.config.match_reward);
    }

    #[test]
    fn test_ball_to_ball_events_ignored() {
        let mut state = playing_state(MissPolicy::LoseLife);
        state.apply_spawns(&[
            SpawnParams {
                color: BallColor::Red,
                x: -0.5,
            },
            SpawnParams {
                color: BallColor::Blue,
                x: 0.5,
            },
        ]);
        let handles = state.registry.snapshot();

        let events = [CollisionEvent::Started(
            handles[0],
            handles[1],
            CollisionEventFlags::empty(),
        )];
        resolve(&mut state, &events);

        assert_eq!(state.score, 0);
        assert_eq!(state.live_balls(), 2);
    }

    #[test]
    fn test_out_of_bounds_counts_as_miss() {
        let mut state = playing_state(MissPolicy::LoseLife);
        let ball = spawn_colored(&mut state, BallColor::Yellow);
        let body = state.registry.get(ball).unwrap().body;
        state
            .physics
            .bodies
            .get_mut(body)
            .unwrap()
            .set_translation(rapier3d::prelude::vector![0.0, -5.0, 0.0], true);

        sweep_out_of_bounds(&mut state);

        assert_eq!(state.lives, state.config.start_lives - 1);
        assert!(state.registry.is_empty());
    }

    #[test]
    fn test_in_bounds_ball_survives_sweep() {
        let mut state = playing_state(MissPolicy::LoseLife);
        spawn_colored(&mut state, BallColor::Green);
        sweep_out_of_bounds(&mut state);
        assert_eq!(state.live_balls(), 1);
        assert_eq!(state.lives, state.config.start_lives);
    }
}
