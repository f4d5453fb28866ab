//! Frame-lifetime context shared by every system.
//!
//! The [`WorldContext`] is created before the frame loop and dropped after
//! it. It is not an ECS resource: the
//! [`FrameScheduler`](crate::schedule::scheduler::FrameScheduler) passes it by
//! `&mut` into each system call, so only the running system can touch it.
//!
//! Every field is optional from the systems' point of view. A partially
//! initialized context (no physics yet, no camera during shutdown) turns the
//! affected systems into no-ops for the frame.

use crate::resources::camera3d::SceneCamera;
use crate::resources::physics::PhysicsWorld;
use crate::resources::renderbracket::RenderBracket;

#[derive(Default)]
pub struct WorldContext {
    pub physics: Option<PhysicsWorld>,
    pub camera: Option<SceneCamera>,
    pub bracket: RenderBracket,
}

impl WorldContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_physics(mut self, physics: PhysicsWorld) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn with_camera(mut self, camera: SceneCamera) -> Self {
        self.camera = Some(camera);
        self
    }
}
