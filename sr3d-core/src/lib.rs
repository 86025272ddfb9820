/// SR3D Core Library - Geometric core of a software rasterizer
///
/// Transform algebra, camera model, mesh attribute containers and the
/// per-pixel attribute interpolation contract. Everything here is pure value
/// arithmetic; scan conversion, depth testing and presentation belong to the
/// renderer using this crate.

pub mod algebra;
pub mod camera;
pub mod color;
pub mod interpolation;
pub mod matrix3x3;
pub mod matrix4x4;
pub mod mesh;
pub mod shader;
pub mod transform;

// Re-export commonly used types
pub use algebra::{Matrix3x3, Matrix4x4, Vector2, Vector3, Vector4};
pub use camera::Camera;
pub use color::Color;
pub use interpolation::{Interpolate, InterpolationMode, Weights};
pub use mesh::{AttributeId, AttributeKind, Mesh, MeshAttribute, MeshError};
pub use shader::{PixelAttributes, Shader};
pub use transform::{EulerRotation, Placement, Transform};
