//! Binding between an entity and a rigid body in the physics world.
//!
//! The binding only stores a [`BodyHandle`]; the body itself lives in the
//! [`PhysicsWorld`](crate::resources::physics::PhysicsWorld) which owns its
//! creation and destruction. Destroying the body does not remove this
//! component. Readers must go through the physics world, whose accessors
//! return `None` for a stale handle.

use bevy_ecs::prelude::Component;

use crate::resources::physics::BodyHandle;

/// Weak reference from an entity to its simulated body.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body: BodyHandle,
}

impl PhysicsBody {
    pub fn new(body: BodyHandle) -> Self {
        Self { body }
    }
}
