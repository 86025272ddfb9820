/// Demo scenes: a mesh plus where it sits in the world
use sr3d_core::{
    AttributeId, Color, InterpolationMode, Mesh, MeshAttribute, Placement, Vector2, Vector3,
};

/// Distance from the camera at which loaded meshes are placed
const VIEW_DISTANCE: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct Scene {
    pub mesh: Mesh,
    pub placement: Placement,
}

impl Scene {
    /// Single triangle 1.5 units in front of the camera, with linear vertex
    /// colors and perspective-correct texture coordinates
    pub fn colored_triangle() -> Self {
        let mut mesh = Mesh::new(
            vec![
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(-1.0, -1.0, 0.0),
                Vector3::new(1.0, -1.0, 0.0),
            ],
            vec![0, 1, 2],
        );
        let indices = vec![0, 1, 2];

        mesh.add_attribute(MeshAttribute::new(
            AttributeId::COLOR,
            vec![
                Color::GREEN.with_alpha(0.0),
                Color::RED.with_alpha(0.0),
                Color::BLUE.with_alpha(1.0),
            ],
            indices.clone(),
            InterpolationMode::Linear,
        ));
        mesh.add_attribute(MeshAttribute::new(
            AttributeId::TEXCOORD,
            vec![Vector2::new(0.5, 0.0), Vector2::new(0.0, 1.0), Vector2::new(1.0, 1.0)],
            indices,
            InterpolationMode::PerspectiveCorrect,
        ));

        Self {
            mesh,
            placement: Placement::at(Vector3::new(0.0, 0.0, 1.5)),
        }
    }

    pub fn cube() -> Self {
        let mut placement = Placement::at(Vector3::new(0.0, 0.0, VIEW_DISTANCE));
        placement.rotation.rotate(0.3, 0.3, 0.0);

        Self {
            mesh: Mesh::cube(1.5),
            placement,
        }
    }

    /// Center an arbitrary mesh on its bounding box and scale it to unit size
    pub fn fitted(mut mesh: Mesh) -> Self {
        let mut placement = Placement::at(Vector3::new(0.0, 0.0, VIEW_DISTANCE));
        let Some(first) = mesh.positions.first().copied() else {
            return Self { mesh, placement };
        };

        let (min, max) = mesh
            .positions
            .iter()
            .fold((first, first), |(min, max), p| (min.inf(p), max.sup(p)));
        let center = (min + max) * 0.5;
        let radius = (max - min).norm() * 0.5;

        for p in &mut mesh.positions {
            *p -= center;
        }
        if radius > f32::EPSILON {
            placement.scale = 1.0 / radius;
        }

        Self { mesh, placement }
    }
}
