//! Scene setup and teardown.
//!
//! Declares the seven frame phases, builds the [`FrameScheduler`] with the
//! logic (and optionally render) systems, and spawns the demo scene: a
//! static floor and a dynamic cube dropped onto it.
//!
//! ```text
//! logic_update -> begin_render -> begin_camera -> update_camera
//!              -> end_camera -> render -> end_render
//! ```

use bevy_ecs::name::Name;
use bevy_ecs::prelude::*;
use log::info;
use raylib::math::{Quaternion, Vector3};
use thiserror::Error;

use crate::components::drawstyle::DrawStyle;
use crate::components::model::ModelRef;
use crate::components::physicsbody::PhysicsBody;
use crate::components::transform3d::Transform3D;
use crate::resources::physics::{BoxBody, Motion, PhysicsError, PhysicsWorld};
use crate::resources::respawn::RespawnRequest;
use crate::resources::worldtime::WorldTime;
use crate::schedule::phase::{PhaseError, PhaseGraph, PhaseId};
use crate::schedule::scheduler::FrameScheduler;
use crate::systems::logic::logic_update;
use crate::systems::physics::physics_sync;
use crate::systems::render;
use crate::systems::respawn::respawn;
use crate::systems::telemetry::body_telemetry;

pub const LOGIC_UPDATE_PHASE: PhaseId = PhaseId::new("logic_update");
pub const BEGIN_RENDER_PHASE: PhaseId = PhaseId::new("begin_render");
pub const BEGIN_CAMERA_PHASE: PhaseId = PhaseId::new("begin_camera");
pub const UPDATE_CAMERA_PHASE: PhaseId = PhaseId::new("update_camera");
pub const END_CAMERA_PHASE: PhaseId = PhaseId::new("end_camera");
pub const RENDER_PHASE: PhaseId = PhaseId::new("render");
pub const END_RENDER_PHASE: PhaseId = PhaseId::new("end_render");

pub const CUBE_MODEL: &str = "cube";
const RESPAWN_SEED: u64 = 0x5eed;

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Phase setup failed: {0}")]
    Phase(#[from] PhaseError),

    #[error("Physics initialization failed: {0}")]
    Physics(#[from] PhysicsError),
}

/// Whether render systems are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Draw through raylib; needs an open window.
    Window,
    /// Simulation only.
    Headless,
}

/// Entities and bodies created by [`spawn_scene`].
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub floor: Entity,
    pub cube: Entity,
}

/// The seven-phase chain the frame loop runs.
pub fn frame_phases() -> Result<PhaseGraph, PhaseError> {
    let mut graph = PhaseGraph::new();
    graph
        .add_root(LOGIC_UPDATE_PHASE)?
        .add_after(BEGIN_RENDER_PHASE, LOGIC_UPDATE_PHASE)?
        .add_after(BEGIN_CAMERA_PHASE, BEGIN_RENDER_PHASE)?
        .add_after(UPDATE_CAMERA_PHASE, BEGIN_CAMERA_PHASE)?
        .add_after(END_CAMERA_PHASE, UPDATE_CAMERA_PHASE)?
        .add_after(RENDER_PHASE, END_CAMERA_PHASE)?
        .add_after(END_RENDER_PHASE, RENDER_PHASE)?;
    Ok(graph)
}

/// Build the scheduler with every system of the frame.
///
/// Also inserts the resources the systems read if they are missing.
pub fn build_scheduler(world: &mut World, mode: RenderMode) -> Result<FrameScheduler, SetupError> {
    if !world.contains_resource::<WorldTime>() {
        world.insert_resource(WorldTime::default());
    }
    if !world.contains_resource::<RespawnRequest>() {
        world.insert_resource(RespawnRequest::default());
    }

    let graph = frame_phases()?;
    let mut scheduler = FrameScheduler::new(&graph)?;

    scheduler
        .add_system(LOGIC_UPDATE_PHASE, logic_update())?
        .add_system(LOGIC_UPDATE_PHASE, respawn(world, RESPAWN_SEED))?
        .add_system(LOGIC_UPDATE_PHASE, physics_sync(world))?
        .add_system(LOGIC_UPDATE_PHASE, body_telemetry(world))?;

    if mode == RenderMode::Window {
        scheduler
            .add_system(BEGIN_RENDER_PHASE, render::begin_frame())?
            .add_system(BEGIN_CAMERA_PHASE, render::begin_camera())?
            .add_system(UPDATE_CAMERA_PHASE, render::draw_models(world))?
            .add_system(END_CAMERA_PHASE, render::end_camera())?
            .add_system(RENDER_PHASE, render::draw_overlay())?
            .add_system(END_RENDER_PHASE, render::end_frame())?;
    }

    info!(
        "Scheduler ready ({:?}): {}",
        mode,
        scheduler.system_names().join(", ")
    );
    Ok(scheduler)
}

/// Create the floor and cube bodies and their entities.
pub fn spawn_scene(world: &mut World, physics: &mut PhysicsWorld) -> Scene {
    let identity = Quaternion::identity();

    let floor_position = Vector3::new(0.0, -1.0, 0.0);
    let floor_body = physics.create_box(BoxBody {
        half_extents: Vector3::new(10.0, 0.5, 10.0),
        position: floor_position,
        rotation: identity,
        motion: Motion::Static,
    });
    // Unit cube mesh scaled to the full box size.
    let floor = world
        .spawn((
            Name::new("Floor"),
            Transform3D::from_position(floor_position).with_scale(Vector3::new(20.0, 0.5, 20.0)),
            PhysicsBody::new(floor_body),
            ModelRef::new(CUBE_MODEL),
            DrawStyle::Ground,
        ))
        .id();

    let cube_position = Vector3::new(0.0, 2.0, 0.0);
    let cube_body = physics.create_box(BoxBody {
        half_extents: Vector3::new(0.5, 0.5, 0.5),
        position: cube_position,
        rotation: identity,
        motion: Motion::Dynamic,
    });
    let cube = world
        .spawn((
            Name::new("Cube"),
            Transform3D::from_position(cube_position),
            PhysicsBody::new(cube_body),
            ModelRef::new(CUBE_MODEL),
            DrawStyle::Prop,
        ))
        .id();

    info!("Scene spawned: floor {:?}, cube {:?}", floor, cube);
    Scene { floor, cube }
}

/// Destroy every bound body and despawn its entity.
///
/// Bodies go first so no binding outlives the physics world unnoticed.
pub fn teardown_scene(world: &mut World, physics: &mut PhysicsWorld) {
    let bound: Vec<(Entity, PhysicsBody)> = world
        .query::<(Entity, &PhysicsBody)>()
        .iter(world)
        .map(|(entity, binding)| (entity, *binding))
        .collect();

    for (entity, binding) in bound {
        physics.destroy_body(binding.body);
        world.despawn(entity);
    }
    info!("Scene torn down, {} bodies left", physics.body_count());
}
