//! Camera component

use crate::ecs::Component;
use crate::foundation::math::{utils::deg_to_rad, Mat4};
use super::LocalToWorld;

/// Perspective camera lens
///
/// The pose comes from the entity's [`LocalToWorld`].
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,

    /// Width / height
    pub aspect: f32,

    /// Near clip distance
    pub near: f32,

    /// Far clip distance
    pub far: f32,
}

impl Component for Camera {}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 500.0,
        }
    }
}

impl Camera {
    /// Right-handed OpenGL-style projection (depth in [-1, 1])
    pub fn projection(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, deg_to_rad(self.fov_degrees), self.near, self.far)
    }

    /// View matrix for a camera placed at `pose`
    ///
    /// Falls back to identity when the pose is singular.
    pub fn view(pose: &LocalToWorld) -> Mat4 {
        pose.matrix.try_inverse().unwrap_or_else(Mat4::identity)
    }

    /// Projection * view
    pub fn view_projection(&self, pose: &LocalToWorld) -> Mat4 {
        self.projection() * Self::view(pose)
    }

    /// Update the aspect ratio after a viewport resize
    ///
    /// Degenerate sizes (zero height) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}
