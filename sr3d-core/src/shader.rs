/// Shader contract between the rasterizer and per-variant shading code
use crate::algebra::{homogeneous_point, Matrix4x4, Vector2, Vector3, Vector4};
use crate::color::Color;
use crate::interpolation::Weights;
use crate::mesh::{AttributeId, AttributeKind, Mesh};

/// A shading variant (flat color, texture mapping, lighting, ...).
///
/// The rasterizer hands it the draw's local-to-clip matrix once, asks it to
/// transform every vertex, and then asks for a color per covered pixel.
pub trait Shader {
    fn set_local_to_clip(&mut self, transform: Matrix4x4);

    fn local_to_clip(&self) -> &Matrix4x4;

    /// Object-space position to clip space
    fn vertex(&self, position: &Vector3) -> Vector4 {
        homogeneous_point(position) * self.local_to_clip()
    }

    /// Color of a pixel from its interpolated attributes
    fn shade(&self, attributes: &PixelAttributes) -> Color;
}

/// Interpolated attribute values at one pixel, keyed by attribute id.
///
/// Meant to be reused across pixels: [`PixelAttributes::evaluate`] clears the
/// previous values but keeps the storage.
#[derive(Debug, Clone, Default)]
pub struct PixelAttributes {
    pub(crate) colors: Vec<(AttributeId, Color)>,
    pub(crate) vector2s: Vec<(AttributeId, Vector2)>,
    pub(crate) vector3s: Vec<(AttributeId, Vector3)>,
}

impl PixelAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.colors.clear();
        self.vector2s.clear();
        self.vector3s.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.vector2s.is_empty() && self.vector3s.is_empty()
    }

    /// Insert or replace a value
    pub fn set<T: AttributeKind>(&mut self, id: AttributeId, value: T) {
        let values = T::pixel_values_mut(self);
        match values.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = value,
            None => values.push((id, value)),
        }
    }

    /// `None` when the mesh being drawn has no such attribute
    pub fn get<T: AttributeKind>(&self, id: AttributeId) -> Option<T> {
        T::pixel_values(self)
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|&(_, value)| value)
    }

    /// Evaluate every attribute of `mesh` at a pixel of `triangle`
    pub fn evaluate(&mut self, mesh: &Mesh, triangle: usize, weights: Weights, clip_w: [f32; 3]) {
        self.clear();
        self.fill::<Color>(mesh, triangle, weights, clip_w);
        self.fill::<Vector2>(mesh, triangle, weights, clip_w);
        self.fill::<Vector3>(mesh, triangle, weights, clip_w);
    }

    fn fill<T: AttributeKind>(
        &mut self,
        mesh: &Mesh,
        triangle: usize,
        weights: Weights,
        clip_w: [f32; 3],
    ) {
        let values = T::pixel_values_mut(self);
        for attribute in T::attributes(mesh) {
            values.push((attribute.id, attribute.interpolate(triangle, weights, clip_w)));
        }
    }
}
