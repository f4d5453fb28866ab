//! ECS components for scene entities.
//!
//! Submodules overview:
//! - [`drawstyle`] – presentation tag selecting the wireframe color
//! - [`model`] – key of the model drawn for an entity
//! - [`physicsbody`] – weak binding from an entity to a rigid body
//! - [`transform3d`] – position, rotation, scale and derived matrices

pub mod drawstyle;
pub mod model;
pub mod physicsbody;
pub mod transform3d;
