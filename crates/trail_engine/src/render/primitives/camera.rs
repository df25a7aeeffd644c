//! 3D camera
//!
//! Perspective camera with position/target/up orientation. Matrices are
//! computed on demand; callers that render many chains per frame should
//! compute [`Camera::view_projection`] once and reuse it.

use crate::foundation::math::{Mat4, Point3, Vec3};

/// 3D camera for perspective projection
///
/// Uses a right-handed Y-up coordinate system. The camera supplies two
/// things to chain rendering: the eye position (camera-facing billboards
/// depend on it) and the view-projection matrix folded into the
/// projection×model uniform.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin with Y-up
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Point the camera at a new target without moving it
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// View matrix (world to view space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection × view matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_matrix_places_eye_at_origin() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
        let view = camera.view_matrix();

        let eye = view.transform_point(&Point3::from(camera.position));
        assert_relative_eq!(eye.x, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(eye.z, 0.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_view_projection_composes() {
        let camera = Camera::perspective(Vec3::new(1.0, 2.0, 3.0), 75.0, 1.0, 0.1, 50.0);
        let composed = camera.view_projection();
        let manual = camera.projection_matrix() * camera.view_matrix();
        assert_relative_eq!(composed, manual, epsilon = 1.0e-6);
    }
}
