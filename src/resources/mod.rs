//! Long-lived data used by systems.
//!
//! Overview
//! - `camera3d` – perspective camera handed to raylib's 3D mode
//! - `modelstore` – loaded raylib models keyed by string (non-send)
//! - `physics` – rigid-body world, body handles and step policy
//! - `renderbracket` – Begin/End pairing state for the render systems
//! - `respawn` – pending request to re-drop dynamic bodies
//! - `simconfig` – INI-backed configuration with safe defaults
//! - `worldcontext` – frame-lifetime context passed to every system
//! - `worldtime` – frame time and delta
pub mod camera3d;
pub mod modelstore;
pub mod physics;
pub mod renderbracket;
pub mod respawn;
pub mod simconfig;
pub mod worldcontext;
pub mod worldtime;
