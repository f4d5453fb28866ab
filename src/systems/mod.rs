//! Frame systems.
//!
//! Submodules overview
//! - [`logic`] – per-frame logic hook
//! - [`physics`] – step the physics world and sync bound transforms
//! - [`render`] – raylib frame and camera brackets, model and overlay drawing
//! - [`respawn`] – re-drop dynamic bodies on request
//! - [`telemetry`] – trace logging of body position and velocity
//! - [`time`] – update frame time before the schedule runs

pub mod logic;
pub mod physics;
pub mod render;
pub mod respawn;
pub mod telemetry;
pub mod time;
