//! Physics to transform synchronization.
//!
//! Runs in the logic phase, before any render system reads transforms:
//!
//! 1. Advance the physics world according to its step policy (by default one
//!    fixed step, whatever the frame delta).
//! 2. For every entity with [`Transform3D`] and [`PhysicsBody`], read the
//!    body's center of mass and orientation and overwrite the transform's
//!    position and rotation with them.
//! 3. Rebuild the entity's local and world matrices.
//!
//! Without a physics world in the context the system does nothing; entities
//! whose body handle went stale are skipped.

use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::components::physicsbody::PhysicsBody;
use crate::components::transform3d::Transform3D;
use crate::resources::worldcontext::WorldContext;
use crate::resources::worldtime::WorldTime;
use crate::schedule::system::{FrameSystem, Requirements};

pub const PHYSICS_SYNC: &str = "physics_sync";

/// Step the simulation and copy body poses into the bound transforms.
pub fn physics_sync_system(world: &mut World, ctx: &mut WorldContext, entities: &[Entity]) {
    let Some(physics) = ctx.physics.as_mut() else {
        return;
    };

    let frame_delta = world
        .get_resource::<WorldTime>()
        .map(|time| time.delta)
        .unwrap_or(0.0);
    let steps = physics.advance_frame(frame_delta);
    trace!("physics advanced {} step(s)", steps);

    for &entity in entities {
        let Some(binding) = world.get::<PhysicsBody>(entity).copied() else {
            continue;
        };
        let (Some(position), Some(rotation)) = (
            physics.body_position(binding.body),
            physics.body_orientation(binding.body),
        ) else {
            debug!("Entity {:?} is bound to a destroyed body, skipping", entity);
            continue;
        };
        if let Some(mut transform) = world.get_mut::<Transform3D>(entity) {
            transform.sync_pose(position, rotation);
        }
    }
}

/// Per-entity system over `Transform3D + PhysicsBody`.
pub fn physics_sync(world: &mut World) -> FrameSystem {
    let requirements = Requirements::new()
        .with::<Transform3D>(world)
        .with::<PhysicsBody>(world);
    FrameSystem::per_entity(PHYSICS_SYNC, requirements, world, physics_sync_system)
}
