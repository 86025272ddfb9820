/// Named constructors for 3x3 linear transforms
///
/// Rotations assume a left-handed coordinate system and the row-vector
/// convention of [`crate::algebra`].
use crate::algebra::{Matrix3x3, Vector3};

/// Non-uniform scale along the three axes
#[rustfmt::skip]
pub fn scale(x: f32, y: f32, z: f32) -> Matrix3x3 {
    Matrix3x3::new(
        x, 0.0, 0.0,
        0.0, y, 0.0,
        0.0, 0.0, z,
    )
}

pub fn uniform_scale(s: f32) -> Matrix3x3 {
    scale(s, s, s)
}

#[rustfmt::skip]
pub fn rotation_around_x_axis(radians: f32) -> Matrix3x3 {
    let (sin, cos) = radians.sin_cos();
    Matrix3x3::new(
        1.0, 0.0, 0.0,
        0.0, cos, sin,
        0.0, -sin, cos,
    )
}

#[rustfmt::skip]
pub fn rotation_around_y_axis(radians: f32) -> Matrix3x3 {
    let (sin, cos) = radians.sin_cos();
    Matrix3x3::new(
        cos, 0.0, -sin,
        0.0, 1.0, 0.0,
        sin, 0.0, cos,
    )
}

#[rustfmt::skip]
pub fn rotation_around_z_axis(radians: f32) -> Matrix3x3 {
    let (sin, cos) = radians.sin_cos();
    Matrix3x3::new(
        cos, sin, 0.0,
        -sin, cos, 0.0,
        0.0, 0.0, 1.0,
    )
}

/// Rotation around an arbitrary axis (Rodrigues' formula).
///
/// The axis is normalized here; a zero-length axis has no direction and
/// produces a non-finite matrix.
pub fn rotation_around_axis(axis: &Vector3, radians: f32) -> Matrix3x3 {
    debug_assert!(axis.norm() > f32::EPSILON, "rotation axis must not be zero-length");

    let a = axis.normalize();
    let (sin, cos) = radians.sin_cos();
    let t = 1.0 - cos;

    Matrix3x3::new(
        a.x * a.x * t + cos,
        a.x * a.y * t + a.z * sin,
        a.x * a.z * t - a.y * sin,
        a.x * a.y * t - a.z * sin,
        a.y * a.y * t + cos,
        a.y * a.z * t + a.x * sin,
        a.x * a.z * t + a.y * sin,
        a.y * a.z * t - a.x * sin,
        a.z * a.z * t + cos,
    )
}
