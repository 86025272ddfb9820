/// First-person camera: position, orthonormal basis and projection parameters
use crate::algebra::{Matrix4x4, Vector3};
use crate::{matrix3x3, matrix4x4};

/// Camera in a left-handed world.
///
/// `right`, `up` and `forward` always form an orthonormal basis with
/// `right = up × forward`. Mutated in place by input handling between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vector3,
    forward: Vector3,
    up: Vector3,
    right: Vector3,
    horizontal_fov: f32,
    vertical_fov: f32,
    near_plane_z: f32,
    far_plane_z: f32,
}

impl Camera {
    /// `aspect_ratio` is height / width. The vertical field of view is
    /// `horizontal_fov * aspect_ratio`, which is what [`matrix4x4::clip_space`]
    /// is paired with; it is not the tangent-exact conversion.
    ///
    /// `forward` and `up` must not be parallel.
    pub fn new(
        position: Vector3,
        forward: Vector3,
        up: Vector3,
        horizontal_fov: f32,
        aspect_ratio: f32,
        near_plane_z: f32,
        far_plane_z: f32,
    ) -> Self {
        let forward = forward.normalize();
        let right = up.cross(&forward).normalize();
        let up = forward.cross(&right);

        Self {
            position,
            forward,
            up,
            right,
            horizontal_fov,
            vertical_fov: horizontal_fov * aspect_ratio,
            near_plane_z,
            far_plane_z,
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn forward(&self) -> Vector3 {
        self.forward
    }

    pub fn up(&self) -> Vector3 {
        self.up
    }

    pub fn right(&self) -> Vector3 {
        self.right
    }

    pub fn horizontal_fov(&self) -> f32 {
        self.horizontal_fov
    }

    pub fn vertical_fov(&self) -> f32 {
        self.vertical_fov
    }

    pub fn near_plane_z(&self) -> f32 {
        self.near_plane_z
    }

    pub fn far_plane_z(&self) -> f32 {
        self.far_plane_z
    }

    /// Re-derive the vertical field of view for a new viewport shape.
    /// Position, basis and horizontal field of view are unchanged.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.vertical_fov = self.horizontal_fov * aspect_ratio;
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward * distance;
    }

    pub fn move_backward(&mut self, distance: f32) {
        self.position -= self.forward * distance;
    }

    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right * distance;
    }

    pub fn move_left(&mut self, distance: f32) {
        self.position -= self.right * distance;
    }

    pub fn move_up(&mut self, distance: f32) {
        self.position += self.up * distance;
    }

    pub fn move_down(&mut self, distance: f32) {
        self.position -= self.up * distance;
    }

    /// Turn around the up axis; positive angles turn toward the right
    pub fn yaw(&mut self, radians: f32) {
        let rotation = matrix3x3::rotation_around_axis(&self.up, radians);
        self.forward = self.forward * rotation;
        self.right = self.right * rotation;

        // Re-derive the basis so rounding errors do not accumulate
        self.right = self.up.cross(&self.forward).normalize();
        self.forward = self.right.cross(&self.up).normalize();
    }

    /// World-to-camera transform: move the camera to the origin, then rotate
    /// its basis onto the axes (right to +X, up to +Y, forward to +Z).
    #[rustfmt::skip]
    pub fn world_to_camera(&self) -> Matrix4x4 {
        let p = self.position;
        let (r, u, f) = (self.right, self.up, self.forward);

        let translation = matrix4x4::translation(-p.x, -p.y, -p.z);
        let rotation = Matrix4x4::new(
            r.x, u.x, f.x, 0.0,
            r.y, u.y, f.y, 0.0,
            r.z, u.z, f.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        translation * rotation
    }

    /// Camera-to-clip projection built from this camera's field of view and planes
    pub fn camera_to_clip(&self) -> Matrix4x4 {
        matrix4x4::clip_space(
            self.horizontal_fov,
            self.vertical_fov,
            self.near_plane_z,
            self.far_plane_z,
        )
    }
}

impl Default for Camera {
    /// At the origin looking down +Z with a 90 degree field of view
    fn default() -> Self {
        Self::new(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_2,
            1.0,
            0.01,
            20.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{homogeneous_point, is_orthonormal_basis};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_orthonormal(camera: &Camera) {
        assert!(
            is_orthonormal_basis(&camera.right(), &camera.up(), &camera.forward()),
            "basis drifted: {camera:?}"
        );
        assert_relative_eq!(camera.up().cross(&camera.forward()), camera.right(), epsilon = 1e-4);
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(0.0, 1.0, 0.0),
            FRAC_PI_2,
            480.0 / 640.0,
            0.01,
            20.0,
        );

        assert_relative_eq!(camera.right(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.forward(), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(camera.horizontal_fov(), FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(camera.vertical_fov(), FRAC_PI_2 * 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_construction_orthonormalizes_tilted_up() {
        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 0.5),
            1.0,
            1.0,
            0.1,
            10.0,
        );
        assert_orthonormal(&camera);
        assert_relative_eq!(camera.up(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio_keeps_pose() {
        let mut camera = Camera::default();
        camera.move_forward(1.5);
        camera.yaw(0.4);
        let before = camera.clone();

        camera.set_aspect_ratio(0.5);
        assert_relative_eq!(camera.vertical_fov(), FRAC_PI_2 * 0.5, epsilon = 1e-6);
        assert_eq!(camera.horizontal_fov(), before.horizontal_fov());
        assert_eq!(camera.position(), before.position());
        assert_eq!(camera.forward(), before.forward());
        assert_eq!(camera.right(), before.right());
    }

    #[test]
    fn test_movement() {
        let mut camera = Camera::default();
        camera.move_forward(2.0);
        camera.move_right(1.0);
        camera.move_up(0.5);
        assert_relative_eq!(camera.position(), Vector3::new(1.0, 0.5, 2.0), epsilon = 1e-6);

        camera.move_backward(2.0);
        camera.move_left(1.0);
        camera.move_down(0.5);
        assert_relative_eq!(camera.position(), Vector3::zeros(), epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_turns_right() {
        let mut camera = Camera::default();
        camera.yaw(FRAC_PI_2);

        assert_relative_eq!(camera.forward(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.right(), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(camera.up(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);

        camera.yaw(-FRAC_PI_2);
        assert_relative_eq!(camera.forward(), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_basis_survives_random_walk() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut camera = Camera::default();

        for _ in 0..50 {
            let amount: f32 = rng.gen_range(-PI..PI);
            match rng.gen_range(0..7) {
                0 => camera.yaw(amount),
                1 => camera.move_forward(amount),
                2 => camera.move_backward(amount),
                3 => camera.move_left(amount),
                4 => camera.move_right(amount),
                5 => camera.move_up(amount),
                _ => camera.move_down(amount),
            }
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn test_world_to_camera() {
        let mut camera = Camera::default();
        camera.move_forward(3.0);
        camera.move_right(-1.0);
        camera.yaw(0.6);
        let view = camera.world_to_camera();

        // The camera sits at the origin of its own space
        let eye = homogeneous_point(&camera.position()) * view;
        assert_relative_eq!(eye, homogeneous_point(&Vector3::zeros()), epsilon = 1e-5);

        // A point straight ahead lands on +Z at its distance
        let ahead = homogeneous_point(&(camera.position() + camera.forward() * 4.0)) * view;
        assert_relative_eq!(ahead, homogeneous_point(&Vector3::new(0.0, 0.0, 4.0)), epsilon = 1e-5);

        let right = homogeneous_point(&(camera.position() + camera.right())) * view;
        assert_relative_eq!(right, homogeneous_point(&Vector3::new(1.0, 0.0, 0.0)), epsilon = 1e-5);
    }

    #[test]
    fn test_camera_to_clip_uses_planes() {
        let camera = Camera::default();
        let projection = camera.camera_to_clip();
        let near = homogeneous_point(&Vector3::new(0.0, 0.0, camera.near_plane_z())) * projection;
        let far = homogeneous_point(&Vector3::new(0.0, 0.0, camera.far_plane_z())) * projection;

        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }
}
