//! Shared 3D camera.
//!
//! Plain-data perspective camera kept in the
//! [`WorldContext`](super::worldcontext::WorldContext) and handed to raylib
//! when the camera block opens.

use raylib::ffi;
use raylib::math::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCamera {
    pub position: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self::looking_at_origin(Vector3::new(10.0, 10.0, 10.0), 45.0)
    }
}

impl SceneCamera {
    /// Y-up perspective camera aimed at the world origin.
    pub fn looking_at_origin(position: Vector3, fovy: f32) -> Self {
        Self {
            position,
            target: Vector3::zero(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fovy,
        }
    }

    pub fn to_ffi(&self) -> ffi::Camera3D {
        ffi::Camera3D {
            position: self.position.into(),
            target: self.target.into(),
            up: self.up.into(),
            fovy: self.fovy,
            projection: ffi::CameraProjection::CAMERA_PERSPECTIVE as i32,
        }
    }
}
