//! Ball entity registry
//!
//! Maps collider handles to game-domain records. [`EntityRegistry::remove`]
//! is the single despawn path, and it removes the physics body in the same
//! call, so a registry entry always resolves to a live body and a recycled
//! handle can never alias a stale entry.

use std::collections::HashMap;

use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::sim::physics::PhysicsWorld;
use crate::sim::state::BallColor;

/// A tracked ball
#[derive(Debug, Clone, Copy)]
pub struct BallRecord {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub color: BallColor,
    /// Binding for the render collaborator's mesh lookup
    pub visual: u32,
}

#[derive(Default)]
pub struct EntityRegistry {
    balls: HashMap<ColliderHandle, BallRecord>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.balls.contains_key(&handle)
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&BallRecord> {
        self.balls.get(&handle)
    }

    /// Track a newly spawned ball. A duplicate collider handle means the
    /// physics layer recycled a handle we failed to release; log it and keep
    /// the existing record rather than corrupting it.
    pub fn register(&mut self, record: BallRecord) {
        if self.balls.contains_key(&record.collider) {
            log::warn!(
                "duplicate collider handle {:?} in registry, ignoring",
                record.collider
            );
            return;
        }
        self.balls.insert(record.collider, record);
    }

    /// Remove a ball and its physics body. Idempotent: a stale handle is a
    /// no-op (the ball was already despawned this tick).
    pub fn remove(&mut self, physics: &mut PhysicsWorld, handle: ColliderHandle) -> bool {
        let Some(record) = self.balls.remove(&handle) else {
            log::debug!("remove for stale handle {handle:?}, ignoring");
            return false;
        };
        physics.remove_body(record.body);
        true
    }

    /// Stable snapshot of live handles, sorted so iteration order is
    /// deterministic and removal mid-scan cannot skip or double-visit.
    pub fn snapshot(&self) -> Vec<ColliderHandle> {
        let mut handles: Vec<ColliderHandle> = self.balls.keys().copied().collect();
        handles.sort_by_key(|h| h.into_raw_parts());
        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_RADIUS;
    use rapier3d::prelude::*;

    fn spawn_test_ball(physics: &mut PhysicsWorld) -> BallRecord {
        let body = physics
            .bodies
            .insert(RigidBodyBuilder::dynamic().translation(vector![0.0, 1.0, 0.0]).build());
        let collider = physics.colliders.insert_with_parent(
            ColliderBuilder::ball(BALL_RADIUS).build(),
            body,
            &mut physics.bodies,
        );
        BallRecord {
            body,
            collider,
            color: BallColor::Red,
            visual: 0,
        }
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut physics = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();
        let record = spawn_test_ball(&mut physics);
        registry.register(record);
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(&mut physics, record.collider));
        assert!(registry.is_empty());
        assert!(physics.bodies.get(record.body).is_none());

        // Second removal is a no-op, not an error.
        assert!(!registry.remove(&mut physics, record.collider));
    }

    #[test]
    fn test_duplicate_register_keeps_existing() {
        let mut physics = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();
        let record = spawn_test_ball(&mut physics);
        registry.register(record);

        let dup = BallRecord {
            color: BallColor::Blue,
            visual: 99,
            ..record
        };
        registry.register(dup);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(record.collider).unwrap().visual, 0);
    }

    #[test]
    fn test_snapshot_survives_removal_mid_scan() {
        let mut physics = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();
        for _ in 0..3 {
            registry.register(spawn_test_ball(&mut physics));
        }

        let mut visited = 0;
        for handle in registry.snapshot() {
            visited += 1;
            registry.remove(&mut physics, handle);
        }
        assert_eq!(visited, 3);
        assert!(registry.is_empty());
    }
}
