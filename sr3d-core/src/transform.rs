/// Object placement and local-to-clip matrix composition
use tracing::trace;

use crate::algebra::{Matrix4x4, Vector3};
use crate::camera::Camera;
use crate::matrix4x4;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerRotation {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Rotations applied in order: X, Y, Z
    pub fn matrix(&self) -> Matrix4x4 {
        matrix4x4::rotation_around_x_axis(self.x)
            * matrix4x4::rotation_around_y_axis(self.y)
            * matrix4x4::rotation_around_z_axis(self.z)
    }
}

/// Where an object sits in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vector3,
    pub rotation: EulerRotation,
    pub scale: f32,
}

impl Placement {
    pub fn at(position: Vector3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Local-to-world transform: rotate, scale, then move into place
    pub fn local_to_world(&self) -> Matrix4x4 {
        let p = self.position;
        self.rotation.matrix()
            * matrix4x4::uniform_scale(self.scale)
            * matrix4x4::translation(p.x, p.y, p.z)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: EulerRotation::default(),
            scale: 1.0,
        }
    }
}

/// Transform builder for a draw call
pub struct Transform;

impl Transform {
    /// Compose the stages of a draw into one matrix.
    ///
    /// Row vectors meet the stages left to right: local to world, world to
    /// camera, camera to clip.
    pub fn local_to_clip(
        local_to_world: &Matrix4x4,
        world_to_camera: &Matrix4x4,
        camera_to_clip: &Matrix4x4,
    ) -> Matrix4x4 {
        local_to_world * world_to_camera * camera_to_clip
    }

    /// The local-to-clip matrix for drawing `placement` through `camera`
    pub fn for_draw(placement: &Placement, camera: &Camera) -> Matrix4x4 {
        trace!(
            position = ?placement.position,
            camera = ?camera.position(),
            "composing local-to-clip"
        );
        Self::local_to_clip(
            &placement.local_to_world(),
            &camera.world_to_camera(),
            &camera.camera_to_clip(),
        )
    }
}
