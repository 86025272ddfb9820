/// STL mesh loader for binary and ASCII formats
///
/// STL stores unshared triangles with one normal per facet, so the loaded
/// mesh carries a flat `NORMAL` attribute indexed per face.
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};
use sr3d_core::{AttributeId, InterpolationMode, Mesh, MeshAttribute, MeshError, Vector3};
use thiserror::Error;
use tracing::debug;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),
    #[error("binary STL declares {declared} triangles but holds {available}")]
    Truncated { declared: usize, available: usize },
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
    #[error(transparent)]
    InvalidMesh(#[from] MeshError),
}

/// Accumulates facets into a mesh with a per-face normal attribute
struct FacetCollector {
    mesh: Mesh,
    normals: Vec<Vector3>,
}

impl FacetCollector {
    fn with_capacity(triangles: usize) -> Self {
        Self {
            mesh: Mesh::with_capacity(triangles),
            normals: Vec::with_capacity(triangles),
        }
    }

    fn push(&mut self, normal: Vector3, corners: [Vector3; 3]) {
        self.mesh.add_triangle(corners);
        let triangle = self.mesh.triangle_count() - 1;

        // Many exporters leave the stored normal zeroed
        let normal = normal
            .try_normalize(f32::EPSILON)
            .or_else(|| self.mesh.face_normal(triangle))
            .unwrap_or_else(Vector3::zeros);
        self.normals.push(normal);
    }

    fn finish(self) -> Result<Mesh, LoadError> {
        let Self { mut mesh, normals } = self;
        let indices = (0..normals.len()).flat_map(|face| [face; 3]).collect();
        mesh.add_attribute(MeshAttribute::new(
            AttributeId::NORMAL,
            normals,
            indices,
            InterpolationMode::Linear,
        ));
        mesh.validate()?;

        debug!(triangles = mesh.triangle_count(), "loaded STL mesh");
        Ok(mesh)
    }
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(LoadError::TooSmall(data.len()));
    }

    let body = &data[HEADER_LEN..];
    let (body, declared) = le_u32::<_, nom::error::Error<&[u8]>>(body)
        .map_err(|_| LoadError::TooSmall(data.len()))?;
    let declared = declared as usize;
    let available = body.len() / FACET_LEN;
    if available < declared {
        return Err(LoadError::Truncated { declared, available });
    }

    let (_, facets) = count(binary_facet, declared)(body)
        .map_err(|_| LoadError::Truncated { declared, available })?;

    let mut collector = FacetCollector::with_capacity(declared);
    for (normal, corners) in facets {
        collector.push(normal, corners);
    }
    collector.finish()
}

fn binary_vector3(input: &[u8]) -> IResult<&[u8], Vector3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], (Vector3, [Vector3; 3])> {
    let (input, normal) = binary_vector3(input)?;
    let (input, (v0, v1, v2)) = tuple((binary_vector3, binary_vector3, binary_vector3))(input)?;
    // Attribute byte count, unused
    let (input, _) = le_u16(input)?;
    Ok((input, (normal, [v0, v1, v2])))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, LoadError> {
    match ascii_solid(input) {
        Ok((_, facets)) => {
            let mut collector = FacetCollector::with_capacity(facets.len());
            for (normal, corners) in facets {
                collector.push(normal, corners);
            }
            collector.finish()
        }
        Err(e) => Err(LoadError::Ascii(format!("{e:?}"))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<(Vector3, [Vector3; 3])>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // Optional name
    let (input, _) = not_line_ending(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, (Vector3, [Vector3; 3])> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = ascii_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v0) = ascii_vertex(input)?;
    let (input, v1) = ascii_vertex(input)?;
    let (input, v2) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, (normal, [v0, v1, v2])))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vector3> {
    preceded(preceded(multispace0, tag("vertex")), ascii_vector3)(input)
}

fn ascii_vector3(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    // Binary files may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}
