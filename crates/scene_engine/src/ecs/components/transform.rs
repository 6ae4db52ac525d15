//! Transform components
//!
//! [`Transform`] is the editable local TRS of an entity, relative to its
//! parent. [`LocalToWorld`] is the derived world matrix written by
//! [`crate::ecs::systems::hierarchy::propagate_transforms`] and read by the
//! renderer, the shadow pass and the selection pass.

use crate::ecs::Component;
use crate::foundation::math::{compose_trs, decompose_trs, Mat4, Point3, Quat, Vec3};

/// Local transform relative to the parent (or the world for roots)
///
/// Y-up, right-handed; forward is -Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Translation
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Component for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set rotation from quaternion
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set rotation from Euler angles (radians)
    #[must_use]
    pub fn with_rotation_euler(mut self, roll: f32, pitch: f32, yaw: f32) -> Self {
        self.rotation = Quat::from_euler_angles(roll, pitch, yaw);
        self
    }

    /// Builder pattern: Set scale (uniform)
    #[must_use]
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local matrix (TRS order)
    pub fn matrix(&self) -> Mat4 {
        compose_trs(&self.position, &self.rotation, &self.scale)
    }

    /// Local -Z axis
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Local +X axis
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    /// Local +Y axis
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }
}

/// World matrix of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct LocalToWorld {
    /// Column-major world matrix
    pub matrix: Mat4,
}

impl Component for LocalToWorld {}

impl Default for LocalToWorld {
    fn default() -> Self {
        Self {
            matrix: Mat4::identity(),
        }
    }
}

impl LocalToWorld {
    /// Wrap a world matrix
    pub fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// World matrix of a root transform
    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(transform.matrix())
    }

    /// World-space translation
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.matrix.m14, self.matrix.m24, self.matrix.m34)
    }

    /// Decompose back into a TRS transform (shear is lost)
    pub fn to_transform(&self) -> Transform {
        let (position, rotation, scale) = decompose_trs(&self.matrix);
        Transform {
            position,
            rotation,
            scale,
        }
    }

    /// Map a world-space point into this entity's local space
    ///
    /// Used to turn a dragged world position into a child's local
    /// translation. `None` for singular matrices.
    pub fn world_to_local_point(&self, world: &Vec3) -> Option<Vec3> {
        let inverse = self.matrix.try_inverse()?;
        Some(inverse.transform_point(&Point3::from(*world)).coords)
    }
}
