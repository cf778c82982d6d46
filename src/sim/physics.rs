//! Ownership of the rapier3d world
//!
//! One fixed step per call; sensor begin/end events are drained through a
//! channel collector and returned to the caller, so collision handling is
//! event-driven rather than a per-tick pair scan.

use crossbeam::channel::{Receiver, unbounded};
use rapier3d::prelude::*;

use crate::consts::SIM_DT;

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    events: ChannelEventCollector,
    collision_rx: Receiver<CollisionEvent>,
    contact_force_rx: Receiver<ContactForceEvent>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let (collision_tx, collision_rx) = unbounded();
        let (contact_force_tx, contact_force_rx) = unbounded();

        let mut integration = IntegrationParameters::default();
        integration.dt = SIM_DT;

        Self {
            gravity: vector![0.0, -9.81, 0.0],
            integration,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            events: ChannelEventCollector::new(collision_tx, contact_force_tx),
            collision_rx,
            contact_force_rx,
        }
    }

    /// Advance the world by one fixed step and drain the collision events it
    /// produced.
    pub fn step(&mut self) -> Vec<CollisionEvent> {
        self.pipeline.step(
            &self.gravity,
            &self.integration,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.events,
        );

        let mut events = Vec::new();
        while let Ok(event) = self.collision_rx.try_recv() {
            events.push(event);
        }
        // Contact force events are not used; keep the channel from backing up.
        while self.contact_force_rx.try_recv().is_ok() {}
        events
    }

    /// Remove a body and its attached colliders. Returns false if the handle
    /// was already gone.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
