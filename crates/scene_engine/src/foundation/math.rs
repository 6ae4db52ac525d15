//! Math utilities and types
//!
//! Provides the fundamental math types shared by scene components and the
//! frame consumers that read them.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Build a TRS matrix (translation * rotation * scale)
pub fn compose_trs(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
        * rotation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(scale)
}

/// Split an affine TRS matrix back into position, rotation and scale
///
/// Shear is not representable and is discarded. A zero scale axis yields an
/// identity rotation rather than NaNs.
pub fn decompose_trs(matrix: &Mat4) -> (Vec3, Quat, Vec3) {
    let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

    let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
    let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
    let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
    let scale = Vec3::new(scale_x, scale_y, scale_z);

    if scale_x == 0.0 || scale_y == 0.0 || scale_z == 0.0 {
        return (position, Quat::identity(), scale);
    }

    let rotation_matrix = Mat3::new(
        matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
        matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
        matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
    );
    let rotation = Quat::from_matrix(&rotation_matrix);

    (position, rotation, scale)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}
