//! Rigidframe main entry point.
//!
//! A fixed-phase frame loop keeping a scene in sync with a rigid-body
//! simulation, written in Rust using:
//! - **raylib** for windowing, input and wireframe drawing
//! - **bevy_ecs** for entity and component storage
//! - **rapier3d** for the rigid-body simulation
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing), create the physics world
//! 2. Spawn the floor and the falling cube, build the seven-phase scheduler
//! 3. Each frame: update time, poll input, run every phase once
//! 4. Destroy bodies, unload models, close the window
//!
//! # Running
//!
//! ```sh
//! cargo run --release
//! cargo run --release -- --headless --frames 300
//! ```
//!
//! Press `R` to throw the cube back into the air.

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod components;
mod game;
mod resources;
mod schedule;
mod systems;

use crate::components::transform3d::Transform3D;
use crate::game::{RenderMode, Scene, build_scheduler, spawn_scene, teardown_scene};
use crate::resources::modelstore::ModelStore;
use crate::resources::physics::PhysicsWorld;
use crate::resources::respawn::RespawnRequest;
use crate::resources::simconfig::{DEFAULT_CONFIG_PATH, SimConfig};
use crate::resources::worldcontext::WorldContext;
use crate::resources::worldtime::WorldTime;
use crate::schedule::scheduler::FrameScheduler;
use crate::systems::time::update_world_time;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};
use raylib::ffi::KeyboardKey;
use std::path::PathBuf;

const DEFAULT_HEADLESS_FRAMES: u64 = 600;

/// Rigidframe: rigid bodies in a fixed-phase frame loop
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Run the simulation without opening a window.
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames (headless default: 600).
    #[arg(long, value_name = "N")]
    frames: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = SimConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}, using defaults", e);
    }

    // --------------- Physics + ECS world ---------------
    let mut physics = match PhysicsWorld::new(config.physics_settings()) {
        Ok(physics) => physics,
        Err(e) => {
            error!("Failed to initialize physics: {e}");
            std::process::exit(1);
        }
    };

    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(RespawnRequest::default());
    let scene = spawn_scene(&mut world, &mut physics);

    let mode = if cli.headless {
        RenderMode::Headless
    } else {
        RenderMode::Window
    };
    let mut scheduler = match build_scheduler(&mut world, mode) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let mut ctx = WorldContext::new()
        .with_physics(physics)
        .with_camera(config.camera());
    world.insert_resource(config.clone());

    match mode {
        RenderMode::Headless => {
            let frames = cli.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES);
            run_headless(&mut world, &mut ctx, &mut scheduler, &config, frames);
        }
        RenderMode::Window => {
            run_windowed(&mut world, &mut ctx, &mut scheduler, &config, cli.frames);
        }
    }

    report(&world, &scene);

    info!("clean up");
    if let Some(physics) = ctx.physics.as_mut() {
        teardown_scene(&mut world, physics);
    }
    info!("finish");
}

fn run_headless(
    world: &mut World,
    ctx: &mut WorldContext,
    scheduler: &mut FrameScheduler,
    config: &SimConfig,
    frames: u64,
) {
    info!("Running {} headless frames", frames);
    for _ in 0..frames {
        update_world_time(world, config.fixed_step);
        scheduler.run_frame(world, ctx);
    }
}

fn run_windowed(
    world: &mut World,
    ctx: &mut WorldContext,
    scheduler: &mut FrameScheduler,
    config: &SimConfig,
    frames: Option<u64>,
) {
    let (mut rl, _thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .title(&config.title)
        .build();
    rl.set_target_fps(config.target_fps);

    // Models need the GL context, so they are loaded after the window opens.
    let mut models = ModelStore::new();
    models.load_unit_cube(game::CUBE_MODEL);
    world.insert_non_send_resource(models);

    info!("Starting main loop");
    while !rl.window_should_close() && frames.is_none_or(|limit| scheduler.frame_count() < limit) {
        let dt = rl.get_frame_time();
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            world.resource_mut::<RespawnRequest>().request();
        }
        update_world_time(world, dt);
        scheduler.run_frame(world, ctx);
    }

    // Unload models while the window is still open.
    world.remove_non_send_resource::<ModelStore>();
}

fn report(world: &World, scene: &Scene) {
    if let Some(cube) = world.get::<Transform3D>(scene.cube) {
        info!(
            "Cube at ({:.3}, {:.3}, {:.3})",
            cube.position.x, cube.position.y, cube.position.z
        );
    }
    if let Some(floor) = world.get::<Transform3D>(scene.floor) {
        info!("Floor at y={:.3}", floor.position.y);
    }
}
