//! Trace-level body telemetry.
//!
//! Logs the position and linear velocity of every named, bound body. Enable
//! with `RUST_LOG=rigidframe::systems::telemetry=trace`.

use bevy_ecs::name::Name;
use bevy_ecs::prelude::*;
use log::{Level, log_enabled, trace};

use crate::components::physicsbody::PhysicsBody;
use crate::resources::worldcontext::WorldContext;
use crate::schedule::system::{FrameSystem, Requirements};

pub const BODY_TELEMETRY: &str = "body_telemetry";

pub fn body_telemetry_system(world: &mut World, ctx: &mut WorldContext, entities: &[Entity]) {
    if !log_enabled!(Level::Trace) {
        return;
    }
    let Some(physics) = ctx.physics.as_ref() else {
        return;
    };
    for &entity in entities {
        let (Some(name), Some(binding)) = (world.get::<Name>(entity), world.get::<PhysicsBody>(entity))
        else {
            continue;
        };
        let (Some(p), Some(v)) = (
            physics.body_position(binding.body),
            physics.body_linear_velocity(binding.body),
        ) else {
            continue;
        };
        trace!(
            "{}: pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2})",
            name.as_str(),
            p.x,
            p.y,
            p.z,
            v.x,
            v.y,
            v.z
        );
    }
}

pub fn body_telemetry(world: &mut World) -> FrameSystem {
    let requirements = Requirements::new()
        .with::<Name>(world)
        .with::<PhysicsBody>(world);
    FrameSystem::per_entity(BODY_TELEMETRY, requirements, world, body_telemetry_system)
}
