//! Respawn of dynamic bodies.
//!
//! When a [`RespawnRequest`] is pending, every dynamic body bound to an
//! entity is teleported to a random pose above the floor with its linear
//! velocity cleared. The physics world stays authoritative: the new pose
//! reaches the transforms through the next physics sync.

use bevy_ecs::prelude::*;
use log::{debug, info};
use raylib::math::{Quaternion, Vector3};

use crate::components::physicsbody::PhysicsBody;
use crate::resources::respawn::RespawnRequest;
use crate::resources::worldcontext::WorldContext;
use crate::schedule::system::{FrameSystem, Requirements};

pub const RESPAWN: &str = "respawn";

/// Random drop pose: x and z in [-5, -1], y in [5, 14], normalized random rotation.
pub fn random_pose(rng: &mut fastrand::Rng) -> (Vector3, Quaternion) {
    let position = Vector3 {
        x: rng.i32(-5..0) as f32,
        y: rng.i32(5..15) as f32,
        z: rng.i32(-5..0) as f32,
    };

    let mut rotation = Quaternion {
        x: rng.f32(),
        y: rng.f32(),
        z: rng.f32(),
        w: rng.f32(),
    };
    let norm = (rotation.x * rotation.x
        + rotation.y * rotation.y
        + rotation.z * rotation.z
        + rotation.w * rotation.w)
        .sqrt();
    if norm > f32::EPSILON {
        rotation.x /= norm;
        rotation.y /= norm;
        rotation.z /= norm;
        rotation.w /= norm;
    } else {
        rotation = Quaternion::identity();
    }

    (position, rotation)
}

/// Consume a pending request and re-drop every dynamic body among `entities`.
pub fn respawn_bodies(
    world: &mut World,
    ctx: &mut WorldContext,
    entities: &[Entity],
    rng: &mut fastrand::Rng,
) {
    let requested = world
        .get_resource_mut::<RespawnRequest>()
        .is_some_and(|mut request| request.take());
    if !requested {
        return;
    }
    let Some(physics) = ctx.physics.as_mut() else {
        return;
    };

    let mut moved = 0;
    for &entity in entities {
        let Some(binding) = world.get::<PhysicsBody>(entity) else {
            continue;
        };
        if !physics.is_dynamic(binding.body) {
            continue;
        }
        let (position, rotation) = random_pose(rng);
        physics.set_body_position(binding.body, position);
        physics.set_body_orientation(binding.body, rotation);
        physics.set_body_linear_velocity(binding.body, Vector3::zero());
        debug!(
            "Respawned {:?} at ({:.1}, {:.1}, {:.1})",
            entity, position.x, position.y, position.z
        );
        moved += 1;
    }
    info!("Respawned {} dynamic bodies", moved);
}

/// Per-entity system over `PhysicsBody`, owning its random generator.
pub fn respawn(world: &mut World, seed: u64) -> FrameSystem {
    let requirements = Requirements::new().with::<PhysicsBody>(world);
    let mut rng = fastrand::Rng::with_seed(seed);
    FrameSystem::per_entity(RESPAWN, requirements, world, move |world, ctx, entities| {
        respawn_bodies(world, ctx, entities, &mut rng)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_pose_ranges_and_unit_rotation() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let (position, rotation) = random_pose(&mut rng);
            assert!((-5.0..=-1.0).contains(&position.x));
            assert!((5.0..=14.0).contains(&position.y));
            assert!((-5.0..=-1.0).contains(&position.z));
            let len = (rotation.x * rotation.x
                + rotation.y * rotation.y
                + rotation.z * rotation.z
                + rotation.w * rotation.w)
                .sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_same_seed_same_pose() {
        let mut a = fastrand::Rng::with_seed(42);
        let mut b = fastrand::Rng::with_seed(42);
        let (pa, ra) = random_pose(&mut a);
        let (pb, rb) = random_pose(&mut b);
        assert_eq!((pa.x, pa.y, pa.z), (pb.x, pb.y, pb.z));
        assert_eq!((ra.x, ra.w), (rb.x, rb.w));
    }
}
