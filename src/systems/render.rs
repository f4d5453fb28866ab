//! Render bracket systems.
//!
//! Thin wrappers over raylib's immediate-mode drawing. Each bracket call is
//! issued by its own system in its own phase, and every call first advances
//! the [`RenderBracket`](crate::resources::renderbracket::RenderBracket) in the
//! context. A rejected transition skips the raylib call, so Begin/End pairs
//! never get unbalanced.
//!
//! Phase layout: `begin_frame` → `begin_camera` → `draw_models` →
//! `end_camera` → `draw_overlay` → `end_frame`.
//!
//! These systems need an open raylib window.

use bevy_ecs::name::Name;
use bevy_ecs::prelude::*;
use log::{trace, warn};
use raylib::ffi;
use raylib::math::Vector3;
use raylib::prelude::Color;

use crate::components::drawstyle::DrawStyle;
use crate::components::model::ModelRef;
use crate::components::transform3d::Transform3D;
use crate::resources::modelstore::ModelStore;
use crate::resources::worldcontext::WorldContext;
use crate::schedule::system::{FrameSystem, Requirements};

pub fn begin_frame_system(_world: &mut World, ctx: &mut WorldContext) {
    if let Err(e) = ctx.bracket.begin_frame() {
        warn!("Render: {}", e);
        return;
    }
    unsafe {
        ffi::BeginDrawing();
        ffi::ClearBackground(Color::RAYWHITE.into());
    }
}

pub fn begin_camera_system(_world: &mut World, ctx: &mut WorldContext) {
    let Some(camera) = ctx.camera else {
        return;
    };
    if let Err(e) = ctx.bracket.begin_camera() {
        warn!("Render: {}", e);
        return;
    }
    unsafe {
        ffi::BeginMode3D(camera.to_ffi());
    }
}

/// Draw every model at its entity's world matrix, then the ground grid.
pub fn draw_models_system(world: &mut World, ctx: &mut WorldContext, entities: &[Entity]) {
    if !ctx.bracket.camera_open() {
        return;
    }
    let Some(models) = world.get_non_send_resource::<ModelStore>() else {
        return;
    };

    for &entity in entities {
        let (Some(transform), Some(model_ref)) =
            (world.get::<Transform3D>(entity), world.get::<ModelRef>(entity))
        else {
            continue;
        };
        let Some(model) = models.get(&model_ref.key) else {
            continue;
        };
        let style = world.get::<DrawStyle>(entity).copied().unwrap_or_default();
        if let Some(name) = world.get::<Name>(entity) {
            trace!("draw {} as {:?}", name.as_str(), style);
        }

        let mut raw: ffi::Model = **model;
        raw.transform = transform.world_matrix.into();
        unsafe {
            ffi::DrawModelWires(raw, Vector3::zero().into(), 1.0, style.color().into());
        }
    }

    unsafe {
        ffi::DrawGrid(10, 1.0);
    }
}

pub fn end_camera_system(_world: &mut World, ctx: &mut WorldContext) {
    if ctx.camera.is_none() {
        return;
    }
    if let Err(e) = ctx.bracket.end_camera() {
        warn!("Render: {}", e);
        return;
    }
    unsafe {
        ffi::EndMode3D();
    }
}

/// 2D overlay, drawn after the camera block.
pub fn draw_overlay_system(_world: &mut World, ctx: &mut WorldContext) {
    if ctx.bracket.camera_open() {
        return;
    }
    unsafe {
        ffi::DrawFPS(10, 10);
    }
}

pub fn end_frame_system(_world: &mut World, ctx: &mut WorldContext) {
    if let Err(e) = ctx.bracket.end_frame() {
        warn!("Render: {}", e);
        return;
    }
    unsafe {
        ffi::EndDrawing();
    }
    ctx.bracket.settle();
}

pub fn begin_frame() -> FrameSystem {
    FrameSystem::unconditional("begin_frame", begin_frame_system)
}

pub fn begin_camera() -> FrameSystem {
    FrameSystem::unconditional("begin_camera", begin_camera_system)
}

pub fn draw_models(world: &mut World) -> FrameSystem {
    let requirements = Requirements::new()
        .with::<Transform3D>(world)
        .with::<ModelRef>(world);
    FrameSystem::per_entity("draw_models", requirements, world, draw_models_system)
}

pub fn end_camera() -> FrameSystem {
    FrameSystem::unconditional("end_camera", end_camera_system)
}

pub fn draw_overlay() -> FrameSystem {
    FrameSystem::unconditional("draw_overlay", draw_overlay_system)
}

pub fn end_frame() -> FrameSystem {
    FrameSystem::unconditional("end_frame", end_frame_system)
}
