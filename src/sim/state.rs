//! Session state and scene construction
//!
//! [`GameState`] is the explicit simulation context: it owns the physics
//! world, the ball registry, the actuator and spawner, plus
//! score/lives/phase. Restart rebuilds the session in place; there is no
//! process-global mutable state anywhere.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::config::{GameConfig, MissPolicy};
use crate::consts::*;
use crate::sim::actuator::ActuatorController;
use crate::sim::physics::PhysicsWorld;
use crate::sim::registry::{BallRecord, EntityRegistry};
use crate::sim::spawner::{SpawnParams, SpawnScheduler};

/// Ball and compartment colors, in fixed left-to-right compartment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallColor {
    Red,
    Green,
    Yellow,
    Blue,
}

impl BallColor {
    pub const ALL: [BallColor; 4] = [
        BallColor::Red,
        BallColor::Green,
        BallColor::Yellow,
        BallColor::Blue,
    ];

    /// Compartment slot for this color, left to right.
    pub fn index(self) -> usize {
        match self {
            BallColor::Red => 0,
            BallColor::Green => 1,
            BallColor::Yellow => 2,
            BallColor::Blue => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BallColor::Red => "red",
            BallColor::Green => "green",
            BallColor::Yellow => "yellow",
            BallColor::Blue => "blue",
        }
    }
}

/// High-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for an explicit start
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen: no spawning, no physics stepping
    Paused,
    /// Terminal until restart
    Result,
}

/// Complete simulation context for one session.
pub struct GameState {
    pub config: GameConfig,
    pub physics: PhysicsWorld,
    pub registry: EntityRegistry,
    pub actuator: ActuatorController,
    pub spawner: SpawnScheduler,
    /// Sensor collider -> assigned color; static for the session
    compartments: Vec<(ColliderHandle, BallColor)>,
    pub phase: GamePhase,
    pub score: i64,
    pub lives: u8,
    pub total_spawned: u32,
    pub time_ticks: u64,
    next_visual: u32,
}

impl GameState {
    /// Build the scene (table, rail, sorting box with one sensor per color)
    /// and an idle session in the menu phase.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut physics = PhysicsWorld::new();
        build_scenery(&mut physics);
        let (box_body, compartments) = build_sorting_box(&mut physics);

        let actuator =
            ActuatorController::new(box_body, config.actuator_range, config.actuator_rate);
        let spawner = SpawnScheduler::new(seed);
        let lives = config.start_lives;

        Self {
            config,
            physics,
            registry: EntityRegistry::new(),
            actuator,
            spawner,
            compartments,
            phase: GamePhase::Menu,
            score: 0,
            lives,
            total_spawned: 0,
            time_ticks: 0,
            next_visual: 0,
        }
    }

    /// Reset session state and enter play, spawning the first ball
    /// immediately. Also serves as restart from the result screen.
    pub fn start(&mut self) {
        for handle in self.registry.snapshot() {
            self.registry.remove(&mut self.physics, handle);
        }
        self.score = 0;
        self.lives = self.config.start_lives;
        self.total_spawned = 0;
        self.time_ticks = 0;
        self.actuator.reset();
        self.spawner.reset();

        let first = self.spawner.request_now(&self.config);
        self.apply_spawns(&[first]);
        self.phase = GamePhase::Playing;
        log::info!("session started ({:?} mode)", self.config.miss_policy);
    }

    /// Create physics entities and registry records for this frame's spawn
    /// decisions.
    pub fn apply_spawns(&mut self, spawns: &[SpawnParams]) {
        for params in spawns {
            self.spawn_ball(params.color, params.x);
        }
    }

    fn spawn_ball(&mut self, color: BallColor, x: f32) {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![x, DROP_Y, DROP_Z])
            .ccd_enabled(true)
            .build();
        let body_handle = self.physics.bodies.insert(body);
        let collider = ColliderBuilder::ball(BALL_RADIUS)
            .restitution(0.3)
            .friction(0.6)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle =
            self.physics
                .colliders
                .insert_with_parent(collider, body_handle, &mut self.physics.bodies);

        let visual = self.next_visual;
        self.next_visual += 1;
        self.registry.register(BallRecord {
            body: body_handle,
            collider: collider_handle,
            color,
            visual,
        });
        self.total_spawned += 1;
        log::debug!("spawned {} ball #{visual} at x={x:.2}", color.as_str());
    }

    /// Color assigned to a compartment sensor, if the handle is one.
    pub fn compartment_color(&self, handle: ColliderHandle) -> Option<BallColor> {
        self.compartments
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, color)| *color)
    }

    /// Sensor handles with their colors, left to right.
    pub fn compartments(&self) -> &[(ColliderHandle, BallColor)] {
        &self.compartments
    }

    /// Apply the configured consequence of a missed or missorted ball.
    pub fn apply_miss(&mut self) {
        match self.config.miss_policy {
            MissPolicy::ScorePenalty => {
                self.score -= self.config.miss_penalty;
            }
            MissPolicy::LoseLife => {
                self.lives = self.lives.saturating_sub(1);
                if self.lives == 0 && self.phase == GamePhase::Playing {
                    self.phase = GamePhase::Result;
                    log::info!("out of lives, final score {}", self.score);
                }
            }
        }
    }

    pub fn live_balls(&self) -> usize {
        self.registry.len()
    }

    /// Visit every tracked ball's pose, in stable visual-binding order, for
    /// render synchronization.
    pub fn for_each_ball(&self, mut f: impl FnMut(u32, BallColor, Vec3, Quat)) {
        for handle in self.registry.snapshot() {
            let Some(record) = self.registry.get(handle) else {
                continue;
            };
            let Some(body) = self.physics.bodies.get(record.body) else {
                continue;
            };
            let t = body.translation();
            let q = body.rotation().quaternion().coords;
            f(
                record.visual,
                record.color,
                Vec3::new(t.x, t.y, t.z),
                Quat::from_xyzw(q.x, q.y, q.z, q.w),
            );
        }
    }

    /// Current sorting box center, for render synchronization.
    pub fn box_center(&self) -> Vec3 {
        Vec3::new(self.actuator.current(), BOX_Y, BOX_Z)
    }
}

/// Static scenery: the table the box slides over and the inclined rail the
/// balls roll down.
fn build_scenery(physics: &mut PhysicsWorld) {
    // Table top surface at y = 0; short in depth so stray balls roll off the
    // edge and fall past the miss threshold instead of piling up.
    let table = physics.bodies.insert(
        RigidBodyBuilder::fixed()
            .translation(vector![0.0, -0.25, 0.3])
            .build(),
    );
    physics.colliders.insert_with_parent(
        ColliderBuilder::cuboid(6.0, 0.25, 1.2).friction(0.4).build(),
        table,
        &mut physics.bodies,
    );

    // Rail, tipped about x so its mouth (toward +z, above the box) sits low.
    let rail = physics.bodies.insert(
        RigidBodyBuilder::fixed()
            .translation(vector![0.0, 3.2, -3.3])
            .rotation(vector![0.28, 0.0, 0.0])
            .build(),
    );
    physics.colliders.insert_with_parent(
        ColliderBuilder::cuboid(2.0, 0.08, 3.0).friction(0.1).build(),
        rail,
        &mut physics.bodies,
    );
}

/// Kinematic sorting box: solid bottom, outer walls, and partitions, plus one
/// sensor volume per compartment in fixed color order.
fn build_sorting_box(
    physics: &mut PhysicsWorld,
) -> (RigidBodyHandle, Vec<(ColliderHandle, BallColor)>) {
    let body = physics.bodies.insert(
        RigidBodyBuilder::kinematic_position_based()
            .translation(vector![0.0, BOX_Y, BOX_Z])
            .build(),
    );

    physics.colliders.insert_with_parent(
        ColliderBuilder::cuboid(1.7, 0.05, 0.5)
            .translation(vector![0.0, -0.3, 0.0])
            .build(),
        body,
        &mut physics.bodies,
    );
    for i in 0..5 {
        let x = -1.6 + i as f32 * 0.8;
        physics.colliders.insert_with_parent(
            ColliderBuilder::cuboid(0.04, 0.3, 0.5)
                .translation(vector![x, 0.0, 0.0])
                .build(),
            body,
            &mut physics.bodies,
        );
    }
    for z in [-0.5_f32, 0.5] {
        physics.colliders.insert_with_parent(
            ColliderBuilder::cuboid(1.7, 0.3, 0.04)
                .translation(vector![0.0, 0.0, z])
                .build(),
            body,
            &mut physics.bodies,
        );
    }

    let mut compartments = Vec::with_capacity(COMPARTMENT_OFFSETS.len());
    for (offset, color) in COMPARTMENT_OFFSETS.iter().zip(BallColor::ALL) {
        let sensor = ColliderBuilder::cuboid(0.32, 0.2, 0.42)
            .translation(vector![*offset, 0.0, 0.0])
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = physics
            .colliders
            .insert_with_parent(sensor, body, &mut physics.bodies);
        compartments.push((handle, color));
    }

    (body, compartments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let state = GameState::new(GameConfig::default(), 1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.registry.is_empty());
        assert_eq!(state.compartments().len(), 4);
    }

    #[test]
    fn test_compartments_cover_each_color_once() {
        let state = GameState::new(GameConfig::default(), 1);
        for (i, color) in BallColor::ALL.iter().enumerate() {
            let (handle, assigned) = state.compartments()[i];
            assert_eq!(assigned, *color);
            assert_eq!(state.compartment_color(handle), Some(*color));
        }
    }

    #[test]
    fn test_start_resets_and_spawns_one() {
        let mut state = GameState::new(GameConfig::default(), 5);
        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.live_balls(), 1);
        assert_eq!(state.total_spawned, 1);

        // Dirty the session, then restart.
        state.score = 123;
        state.lives = 1;
        state.start();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, state.config.start_lives);
        assert_eq!(state.live_balls(), 1);
    }

    #[test]
    fn test_miss_policies() {
        let mut penalty_cfg = GameConfig::default();
        penalty_cfg.miss_policy = MissPolicy::ScorePenalty;
        let mut state = GameState::new(penalty_cfg, 5);
        state.start();
        state.apply_miss();
        assert_eq!(state.score, -(state.config.miss_penalty));
        assert_eq!(state.phase, GamePhase::Playing);

        let mut lives_cfg = GameConfig::default();
        lives_cfg.miss_policy = MissPolicy::LoseLife;
        lives_cfg.start_lives = 2;
        let mut state = GameState::new(lives_cfg, 5);
        state.start();
        state.apply_miss();
        assert_eq!(state.lives, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        state.apply_miss();
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Result);
    }

    #[test]
    fn test_for_each_ball_reports_spawned_poses() {
        let mut state = GameState::new(GameConfig::default(), 5);
        state.apply_spawns(&[
            SpawnParams {
                color: BallColor::Red,
                x: -1.0,
            },
            SpawnParams {
                color: BallColor::Blue,
                x: 1.0,
            },
        ]);

        let mut seen = Vec::new();
        state.for_each_ball(|visual, color, pos, _| seen.push((visual, color, pos.x)));
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().any(|(_, c, x)| *c == BallColor::Red && *x == -1.0));
        assert!(seen.iter().any(|(_, c, x)| *c == BallColor::Blue && *x == 1.0));
    }
}
