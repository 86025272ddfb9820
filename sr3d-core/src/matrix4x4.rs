/// Named constructors for 4x4 affine and projective transforms
///
/// Linear parts occupy the upper-left 3x3 block and translation lives in the
/// last row, as required by the row-vector convention.
use crate::algebra::{Matrix3x3, Matrix4x4, Vector3};
use crate::matrix3x3;

/// Embed a linear transform into a homogeneous one
#[rustfmt::skip]
pub fn from_linear(m: &Matrix3x3) -> Matrix4x4 {
    Matrix4x4::new(
        m[(0, 0)], m[(0, 1)], m[(0, 2)], 0.0,
        m[(1, 0)], m[(1, 1)], m[(1, 2)], 0.0,
        m[(2, 0)], m[(2, 1)], m[(2, 2)], 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

pub fn scale(x: f32, y: f32, z: f32) -> Matrix4x4 {
    from_linear(&matrix3x3::scale(x, y, z))
}

pub fn uniform_scale(s: f32) -> Matrix4x4 {
    from_linear(&matrix3x3::uniform_scale(s))
}

pub fn rotation_around_x_axis(radians: f32) -> Matrix4x4 {
    from_linear(&matrix3x3::rotation_around_x_axis(radians))
}

pub fn rotation_around_y_axis(radians: f32) -> Matrix4x4 {
    from_linear(&matrix3x3::rotation_around_y_axis(radians))
}

pub fn rotation_around_z_axis(radians: f32) -> Matrix4x4 {
    from_linear(&matrix3x3::rotation_around_z_axis(radians))
}

pub fn rotation_around_axis(axis: &Vector3, radians: f32) -> Matrix4x4 {
    from_linear(&matrix3x3::rotation_around_axis(axis, radians))
}

#[rustfmt::skip]
pub fn translation(x: f32, y: f32, z: f32) -> Matrix4x4 {
    Matrix4x4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        x, y, z, 1.0,
    )
}

/// Camera-to-clip perspective projection.
///
/// Copies camera-space z into w for the projective divide. After the divide
/// x and y are in [-1, 1] inside the field of view, and depth goes from 0 on
/// the near plane to 1 on the far plane.
#[rustfmt::skip]
pub fn clip_space(horizontal_fov: f32, vertical_fov: f32, near: f32, far: f32) -> Matrix4x4 {
    debug_assert!(far > near, "far plane must lie beyond the near plane");

    let x_scale = 1.0 / (horizontal_fov / 2.0).tan();
    let y_scale = 1.0 / (vertical_fov / 2.0).tan();
    let depth_scale = far / (far - near);

    Matrix4x4::new(
        x_scale, 0.0, 0.0, 0.0,
        0.0, y_scale, 0.0, 0.0,
        0.0, 0.0, depth_scale, 1.0,
        0.0, 0.0, -near * depth_scale, 0.0,
    )
}
