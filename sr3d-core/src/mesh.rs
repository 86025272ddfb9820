/// Triangle meshes and their per-vertex attribute containers
use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::algebra::{Vector2, Vector3};
use crate::color::Color;
use crate::interpolation::{interpolate, Interpolate, InterpolationMode, Weights};
use crate::shader::PixelAttributes;

/// Identifier of a vertex attribute within a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub u32);

impl AttributeId {
    pub const COLOR: AttributeId = AttributeId(0);
    pub const TEXCOORD: AttributeId = AttributeId(1);
    pub const NORMAL: AttributeId = AttributeId(2);
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One vertex attribute bound to a mesh's triangles.
///
/// `indices` maps every triangle corner to a slot in `values`, three per
/// triangle. Indexing is independent from the mesh positions, so flat data
/// (one normal per face) and shared data (one color per position) both fit.
#[derive(Debug, Clone)]
pub struct MeshAttribute<T> {
    pub id: AttributeId,
    pub values: Vec<T>,
    pub indices: Vec<usize>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolate> MeshAttribute<T> {
    /// Bind values to triangle corners. Indices are not checked here, see
    /// [`Mesh::validate`].
    pub fn new(
        id: AttributeId,
        values: Vec<T>,
        indices: Vec<usize>,
        interpolation: InterpolationMode,
    ) -> Self {
        Self {
            id,
            values,
            indices,
            interpolation,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The three corner values of a triangle
    pub fn triangle_values(&self, triangle: usize) -> [T; 3] {
        let corners = &self.indices[triangle * 3..triangle * 3 + 3];
        debug_assert!(
            corners.iter().all(|&i| i < self.values.len()),
            "attribute {} index out of range for {} values",
            self.id,
            self.values.len()
        );

        [
            self.values[corners[0]],
            self.values[corners[1]],
            self.values[corners[2]],
        ]
    }

    /// Value at a pixel of `triangle`, using this attribute's interpolation mode
    pub fn interpolate(&self, triangle: usize, weights: Weights, clip_w: [f32; 3]) -> T {
        interpolate(&self.triangle_values(triangle), weights, clip_w, self.interpolation)
    }

    fn check(&self, mesh_triangles: usize) -> Result<(), MeshError> {
        if self.indices.len() != mesh_triangles * 3 {
            return Err(MeshError::AttributeTriangleMismatch {
                id: self.id,
                count: self.indices.len(),
                expected: mesh_triangles * 3,
            });
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i >= self.values.len()) {
            return Err(MeshError::AttributeIndexOutOfRange {
                id: self.id,
                index,
                len: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Attribute value types a mesh can store, one container list per type
pub trait AttributeKind: Interpolate {
    fn attributes(mesh: &Mesh) -> &[MeshAttribute<Self>];
    fn attributes_mut(mesh: &mut Mesh) -> &mut Vec<MeshAttribute<Self>>;
    fn pixel_values(pixel: &PixelAttributes) -> &[(AttributeId, Self)];
    fn pixel_values_mut(pixel: &mut PixelAttributes) -> &mut Vec<(AttributeId, Self)>;
}

macro_rules! attribute_kind {
    ($ty:ty, $field:ident) => {
        impl AttributeKind for $ty {
            fn attributes(mesh: &Mesh) -> &[MeshAttribute<Self>] {
                &mesh.$field
            }

            fn attributes_mut(mesh: &mut Mesh) -> &mut Vec<MeshAttribute<Self>> {
                &mut mesh.$field
            }

            fn pixel_values(pixel: &PixelAttributes) -> &[(AttributeId, Self)] {
                &pixel.$field
            }

            fn pixel_values_mut(pixel: &mut PixelAttributes) -> &mut Vec<(AttributeId, Self)> {
                &mut pixel.$field
            }
        }
    };
}

attribute_kind!(Color, colors);
attribute_kind!(Vector2, vector2s);
attribute_kind!(Vector3, vector3s);

/// Violations of the mesh indexing invariants
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    #[error("position index {index} out of range for {len} positions")]
    PositionIndexOutOfRange { index: usize, len: usize },
    #[error("attribute {id} has {count} indices, mesh needs {expected}")]
    AttributeTriangleMismatch {
        id: AttributeId,
        count: usize,
        expected: usize,
    },
    #[error("attribute {id} index {index} out of range for {len} values")]
    AttributeIndexOutOfRange {
        id: AttributeId,
        index: usize,
        len: usize,
    },
}

/// Indexed triangle geometry with any number of vertex attributes
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vector3>,
    pub indices: Vec<usize>,
    pub colors: Vec<MeshAttribute<Color>>,
    pub vector2s: Vec<MeshAttribute<Vector2>>,
    pub vector3s: Vec<MeshAttribute<Vector3>>,
}

impl Mesh {
    pub fn new(positions: Vec<Vector3>, indices: Vec<usize>) -> Self {
        Self {
            positions,
            indices,
            ..Self::default()
        }
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self::new(Vec::with_capacity(triangles * 3), Vec::with_capacity(triangles * 3))
    }

    /// Append a triangle with its own three positions
    pub fn add_triangle(&mut self, corners: [Vector3; 3]) {
        let base = self.positions.len();
        self.positions.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangle_positions(&self, triangle: usize) -> [Vector3; 3] {
        let corners = &self.indices[triangle * 3..triangle * 3 + 3];
        [
            self.positions[corners[0]],
            self.positions[corners[1]],
            self.positions[corners[2]],
        ]
    }

    /// Unit normal from the triangle's winding, `None` for degenerate triangles
    pub fn face_normal(&self, triangle: usize) -> Option<Vector3> {
        let [v0, v1, v2] = self.triangle_positions(triangle);
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).try_normalize(f32::EPSILON)
    }

    pub fn add_attribute<T: AttributeKind>(&mut self, attribute: MeshAttribute<T>) {
        T::attributes_mut(self).push(attribute);
    }

    /// Look up an attribute by id; `None` when the mesh does not carry it
    pub fn attribute<T: AttributeKind>(&self, id: AttributeId) -> Option<&MeshAttribute<T>> {
        T::attributes(self).iter().find(|a| a.id == id)
    }

    /// Check the indexing invariants that construction leaves to the caller
    pub fn validate(&self) -> Result<(), MeshError> {
        let result = self.check();
        if let Err(e) = &result {
            warn!(error = %e, triangles = self.triangle_count(), "invalid mesh");
        }
        result
    }

    fn check(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(self.indices.len()));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i >= self.positions.len()) {
            return Err(MeshError::PositionIndexOutOfRange {
                index,
                len: self.positions.len(),
            });
        }

        let triangles = self.triangle_count();
        self.colors.iter().try_for_each(|a| a.check(triangles))?;
        self.vector2s.iter().try_for_each(|a| a.check(triangles))?;
        self.vector3s.iter().try_for_each(|a| a.check(triangles))?;
        Ok(())
    }

    /// Cube centered at the origin.
    ///
    /// Carries per-corner colors (shared with position indexing), per-face
    /// texture coordinates and flat per-face normals.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners = vec![
            Vector3::new(-h, -h, -h),
            Vector3::new(h, -h, -h),
            Vector3::new(h, h, -h),
            Vector3::new(-h, h, -h),
            Vector3::new(-h, -h, h),
            Vector3::new(h, -h, h),
            Vector3::new(h, h, h),
            Vector3::new(-h, h, h),
        ];

        // Each face is a quad split into (a, b, c) and (a, c, d)
        let faces: [([usize; 4], Vector3); 6] = [
            ([4, 5, 6, 7], Vector3::new(0.0, 0.0, 1.0)),
            ([0, 3, 2, 1], Vector3::new(0.0, 0.0, -1.0)),
            ([3, 7, 6, 2], Vector3::new(0.0, 1.0, 0.0)),
            ([0, 1, 5, 4], Vector3::new(0.0, -1.0, 0.0)),
            ([1, 2, 6, 5], Vector3::new(1.0, 0.0, 0.0)),
            ([0, 4, 7, 3], Vector3::new(-1.0, 0.0, 0.0)),
        ];

        let mut indices = Vec::with_capacity(36);
        let mut normals = Vec::with_capacity(6);
        let mut normal_indices = Vec::with_capacity(36);
        let mut uv_indices = Vec::with_capacity(36);
        for (face, ([a, b, c, d], normal)) in faces.into_iter().enumerate() {
            indices.extend_from_slice(&[a, b, c, a, c, d]);
            normals.push(normal);
            normal_indices.extend_from_slice(&[face; 6]);
            uv_indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        }

        let colors: Vec<Color> = corners
            .iter()
            .map(|p| {
                let channel = |v: f32| if v > 0.0 { 1.0 } else { 0.2 };
                Color::rgb(channel(p.x), channel(p.y), channel(p.z))
            })
            .collect();
        let uvs = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];

        let mut mesh = Self::new(corners, indices.clone());
        mesh.add_attribute(MeshAttribute::new(
            AttributeId::COLOR,
            colors,
            indices,
            InterpolationMode::PerspectiveCorrect,
        ));
        mesh.add_attribute(MeshAttribute::new(
            AttributeId::TEXCOORD,
            uvs,
            uv_indices,
            InterpolationMode::PerspectiveCorrect,
        ));
        mesh.add_attribute(MeshAttribute::new(
            AttributeId::NORMAL,
            normals,
            normal_indices,
            InterpolationMode::Linear,
        ));
        mesh
    }
}
