//! Rigidframe library.
//!
//! Exposes the frame scheduler, the physics-to-transform sync and the scene
//! components for use by the binary and by integration tests.

pub mod components;
pub mod game;
pub mod resources;
pub mod schedule;
pub mod systems;
