//! Spatial state of an entity in the 3D scene.
//!
//! [`Transform3D`] holds position, rotation and scale plus the two matrices
//! derived from them. The matrices follow raylib's multiplication order:
//!
//! - `local_matrix = scale * rotation` (scale applied first)
//! - `world_matrix = local_matrix * translation(position)`
//!
//! There is no parent/child composition: every entity's world matrix depends
//! only on its own transform.
//!
//! When the entity also carries a [`PhysicsBody`](super::physicsbody::PhysicsBody),
//! the physics sync system overwrites `position` and `rotation` every frame and
//! calls [`Transform3D::sync_pose`]. Writes to those fields from anywhere else
//! are discarded at that point.

use bevy_ecs::prelude::Component;
use raylib::math::{Matrix, Quaternion, Vector3};

#[derive(Component, Clone, Copy, Debug)]
pub struct Transform3D {
    pub position: Vector3,
    pub rotation: Quaternion,
    pub scale: Vector3,
    /// Scale then rotation.
    pub local_matrix: Matrix,
    /// Local matrix followed by translation to `position`.
    pub world_matrix: Matrix,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::new(Vector3::zero(), Quaternion::identity(), Vector3::one())
    }
}

impl Transform3D {
    /// Create a transform with identity matrices.
    ///
    /// Matrices are filled on the first [`recompute_matrices`](Self::recompute_matrices)
    /// (or physics sync), as for freshly spawned entities.
    pub fn new(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        Self {
            position,
            rotation,
            scale,
            local_matrix: Matrix::identity(),
            world_matrix: Matrix::identity(),
        }
    }

    pub fn from_position(position: Vector3) -> Self {
        Self::new(position, Quaternion::identity(), Vector3::one())
    }

    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    /// Rebuild `local_matrix` and `world_matrix` from position, rotation and scale.
    pub fn recompute_matrices(&mut self) {
        let scale = Matrix::scale(self.scale.x, self.scale.y, self.scale.z);
        let rotation = self.rotation.to_matrix();
        let translation = Matrix::translate(self.position.x, self.position.y, self.position.z);

        self.local_matrix = scale * rotation;
        self.world_matrix = self.local_matrix * translation;
    }

    /// Overwrite the pose with authoritative values and rebuild the matrices.
    pub fn sync_pose(&mut self, position: Vector3, rotation: Quaternion) {
        self.position = position;
        self.rotation = rotation;
        self.recompute_matrices();
    }
}

/// Matrix elements in raylib's column-major field order (`m0..m15`).
pub fn matrix_elements(m: &Matrix) -> [f32; 16] {
    [
        m.m0, m.m1, m.m2, m.m3, m.m4, m.m5, m.m6, m.m7, m.m8, m.m9, m.m10, m.m11, m.m12, m.m13,
        m.m14, m.m15,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn matrix_approx_eq(a: &Matrix, b: &Matrix) -> bool {
        matrix_elements(a)
            .iter()
            .zip(matrix_elements(b).iter())
            .all(|(x, y)| (x - y).abs() < EPSILON)
    }

    #[test]
    fn test_default_is_identity() {
        let t = Transform3D::default();
        assert_eq!(t.position.y, 0.0);
        assert_eq!(t.scale.x, 1.0);
        assert_eq!(t.rotation.w, 1.0);
        assert!(matrix_approx_eq(&t.local_matrix, &Matrix::identity()));
        assert!(matrix_approx_eq(&t.world_matrix, &Matrix::identity()));
    }

    #[test]
    fn test_translation_only() {
        let mut t = Transform3D::from_position(Vector3::new(0.0, 2.0, 0.0));
        t.recompute_matrices();

        assert!(matrix_approx_eq(&t.local_matrix, &Matrix::identity()));
        assert!(matrix_approx_eq(
            &t.world_matrix,
            &Matrix::translate(0.0, 2.0, 0.0)
        ));
        let m = matrix_elements(&t.world_matrix);
        assert_eq!(m[12], 0.0);
        assert_eq!(m[13], 2.0);
        assert_eq!(m[14], 0.0);
        assert_eq!(m[15], 1.0);
    }

    #[test]
    fn test_local_matrix_is_scale_without_rotation() {
        let mut t = Transform3D::from_position(Vector3::new(0.0, -1.0, 0.0))
            .with_scale(Vector3::new(20.0, 0.5, 20.0));
        t.recompute_matrices();

        assert!(matrix_approx_eq(
            &t.local_matrix,
            &Matrix::scale(20.0, 0.5, 20.0)
        ));
        let m = matrix_elements(&t.world_matrix);
        assert!((m[0] - 20.0).abs() < EPSILON);
        assert!((m[5] - 0.5).abs() < EPSILON);
        assert!((m[13] + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_translation_is_not_scaled() {
        let mut t = Transform3D::from_position(Vector3::new(1.0, 2.0, 3.0))
            .with_scale(Vector3::new(4.0, 4.0, 4.0));
        t.recompute_matrices();

        let m = matrix_elements(&t.world_matrix);
        assert!((m[12] - 1.0).abs() < EPSILON);
        assert!((m[13] - 2.0).abs() < EPSILON);
        assert!((m[14] - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_scale_applied_before_rotation() {
        // 90 degrees about Z: x axis maps onto y axis
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let rotation = Quaternion {
            x: 0.0,
            y: 0.0,
            z: half,
            w: half,
        };
        let mut t = Transform3D::new(Vector3::zero(), rotation, Vector3::new(2.0, 1.0, 1.0));
        t.recompute_matrices();

        let expected = Matrix::scale(2.0, 1.0, 1.0) * rotation.to_matrix();
        assert!(matrix_approx_eq(&t.local_matrix, &expected));
        assert!(matrix_approx_eq(&t.world_matrix, &expected));
    }

    #[test]
    fn test_sync_pose_overwrites_position_and_rotation() {
        let mut t = Transform3D::from_position(Vector3::new(9.0, 9.0, 9.0));
        t.sync_pose(
            Vector3::new(1.0, 3.0, -2.0),
            Quaternion {
                x: 0.0,
                y: 0.0,
                z: 0.0,
                w: 1.0,
            },
        );

        assert_eq!(t.position.x, 1.0);
        assert_eq!(t.position.y, 3.0);
        assert_eq!(t.position.z, -2.0);
        let m = matrix_elements(&t.world_matrix);
        assert!((m[12] - 1.0).abs() < EPSILON);
        assert!((m[13] - 3.0).abs() < EPSILON);
        assert!((m[14] + 2.0).abs() < EPSILON);
    }
}
