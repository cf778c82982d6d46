//! Kinematic control of the sorting box
//!
//! The externally supplied target coordinate is clamped to the actuation
//! range, the current coordinate is exponentially damped toward it
//! (frame-rate independent), and the result is issued as the box body's next
//! kinematic position. Height and depth are preserved; only x is actuated.

use rapier3d::prelude::*;

use crate::sim::physics::PhysicsWorld;

pub struct ActuatorController {
    body: RigidBodyHandle,
    target: f32,
    current: f32,
    /// Symmetric travel limit R
    range: f32,
    /// Damping rate constant k
    rate: f32,
}

impl ActuatorController {
    pub fn new(body: RigidBodyHandle, range: f32, rate: f32) -> Self {
        Self {
            body,
            target: 0.0,
            current: 0.0,
            range,
            rate,
        }
    }

    /// Latest pointer-derived target. Upstream already clamps to [-R, R];
    /// the clamp here just keeps the invariant local.
    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(-self.range, self.range);
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Recenter on session start.
    pub fn reset(&mut self) {
        self.target = 0.0;
        self.current = 0.0;
    }

    /// Damp toward the target and command the box's next kinematic position.
    pub fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        let alpha = 1.0 - (-self.rate * dt).exp();
        self.current += (self.target - self.current) * alpha;

        if let Some(body) = physics.bodies.get_mut(self.body) {
            let t = *body.translation();
            body.set_next_kinematic_translation(vector![self.current, t.y, t.z]);
        }
    }
}
