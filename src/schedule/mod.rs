//! Per-frame scheduling.
//!
//! - [`phase`] – phase identifiers and the dependency graph resolved at setup
//! - [`system`] – unconditional and per-entity frame systems
//! - [`scheduler`] – runs every system once per frame in phase order

pub mod phase;
pub mod scheduler;
pub mod system;
