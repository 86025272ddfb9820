/// Shader variants used by the terminal renderer
use sr3d_core::algebra::normalize_checked;
use sr3d_core::{AttributeId, Color, Matrix4x4, PixelAttributes, Shader, Vector2, Vector3};

/// Interpolated `COLOR` attribute, white when the mesh has none
#[derive(Debug, Clone)]
pub struct ColorShader {
    local_to_clip: Matrix4x4,
}

impl ColorShader {
    pub fn new() -> Self {
        Self {
            local_to_clip: Matrix4x4::identity(),
        }
    }
}

impl Default for ColorShader {
    fn default() -> Self {
        Self::new()
    }
}

impl Shader for ColorShader {
    fn set_local_to_clip(&mut self, transform: Matrix4x4) {
        self.local_to_clip = transform;
    }

    fn local_to_clip(&self) -> &Matrix4x4 {
        &self.local_to_clip
    }

    fn shade(&self, attributes: &PixelAttributes) -> Color {
        attributes.get(AttributeId::COLOR).unwrap_or(Color::WHITE)
    }
}

/// Checkerboard looked up from `TEXCOORD`.
///
/// Stands in for texture mapping: it reads texture coordinates the same way
/// a sampler would, so skewed squares show wrong interpolation immediately.
#[derive(Debug, Clone)]
pub struct CheckerShader {
    local_to_clip: Matrix4x4,
    pub tiles: f32,
    pub dark: Color,
    pub light: Color,
}

impl CheckerShader {
    pub fn new(tiles: f32) -> Self {
        Self {
            local_to_clip: Matrix4x4::identity(),
            tiles,
            dark: Color::rgb(0.15, 0.15, 0.15),
            light: Color::WHITE,
        }
    }

    fn sample(&self, uv: Vector2) -> Color {
        let u = (uv.x * self.tiles).floor() as i64;
        let v = (uv.y * self.tiles).floor() as i64;
        if (u + v).rem_euclid(2) == 0 {
            self.light
        } else {
            self.dark
        }
    }
}

impl Default for CheckerShader {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl Shader for CheckerShader {
    fn set_local_to_clip(&mut self, transform: Matrix4x4) {
        self.local_to_clip = transform;
    }

    fn local_to_clip(&self) -> &Matrix4x4 {
        &self.local_to_clip
    }

    fn shade(&self, attributes: &PixelAttributes) -> Color {
        match attributes.get::<Vector2>(AttributeId::TEXCOORD) {
            Some(uv) => self.sample(uv),
            None => self.dark,
        }
    }
}

/// Diffuse lighting from `NORMAL`, tinted by `COLOR` when present.
///
/// The light direction points from the surface toward the light and is
/// given in object space, like the normals it is compared with.
#[derive(Debug, Clone)]
pub struct LambertShader {
    local_to_clip: Matrix4x4,
    light_direction: Vector3,
    pub ambient: f32,
}

impl LambertShader {
    pub fn new(light_direction: Vector3, ambient: f32) -> Self {
        Self {
            local_to_clip: Matrix4x4::identity(),
            light_direction: normalize_checked(&light_direction)
                .unwrap_or_else(|| Vector3::new(0.0, 0.0, -1.0)),
            ambient,
        }
    }
}

impl Default for LambertShader {
    /// Light from above-left, behind a camera looking down +Z
    fn default() -> Self {
        Self::new(Vector3::new(-0.3, 0.5, -1.0), 0.15)
    }
}

impl Shader for LambertShader {
    fn set_local_to_clip(&mut self, transform: Matrix4x4) {
        self.local_to_clip = transform;
    }

    fn local_to_clip(&self) -> &Matrix4x4 {
        &self.local_to_clip
    }

    fn shade(&self, attributes: &PixelAttributes) -> Color {
        let base = attributes.get(AttributeId::COLOR).unwrap_or(Color::WHITE);
        // Interpolated normals are shorter than unit between diverging corners
        let diffuse = attributes
            .get::<Vector3>(AttributeId::NORMAL)
            .and_then(|n| normalize_checked(&n))
            .map_or(1.0, |n| n.dot(&self.light_direction).max(0.0));

        let intensity = (self.ambient + (1.0 - self.ambient) * diffuse).min(1.0);
        base.with_alpha(1.0) * intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_shader_fallback() {
        let shader = ColorShader::new();
        let mut pixel = PixelAttributes::new();
        assert_eq!(shader.shade(&pixel), Color::WHITE);

        pixel.set(AttributeId::COLOR, Color::RED);
        assert_eq!(shader.shade(&pixel), Color::RED);
    }

    #[test]
    fn test_checker_pattern() {
        let shader = CheckerShader::new(2.0);
        let mut pixel = PixelAttributes::new();
        assert_eq!(shader.shade(&pixel), shader.dark);

        pixel.set(AttributeId::TEXCOORD, Vector2::new(0.1, 0.1));
        assert_eq!(shader.shade(&pixel), shader.light);
        pixel.set(AttributeId::TEXCOORD, Vector2::new(0.6, 0.1));
        assert_eq!(shader.shade(&pixel), shader.dark);
        pixel.set(AttributeId::TEXCOORD, Vector2::new(0.6, 0.6));
        assert_eq!(shader.shade(&pixel), shader.light);
        pixel.set(AttributeId::TEXCOORD, Vector2::new(-0.1, 0.1));
        assert_eq!(shader.shade(&pixel), shader.dark);
    }

    #[test]
    fn test_lambert_lighting() {
        let shader = LambertShader::new(Vector3::new(0.0, 0.0, -2.0), 0.2);
        let mut pixel = PixelAttributes::new();

        pixel.set(AttributeId::NORMAL, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(shader.shade(&pixel), Color::WHITE);

        // Facing away leaves only the ambient term
        pixel.set(AttributeId::NORMAL, Vector3::new(0.0, 0.0, 1.0));
        let c = shader.shade(&pixel);
        assert!((c.r - 0.2).abs() < 1e-6);

        pixel.set(AttributeId::COLOR, Color::BLUE);
        pixel.set(AttributeId::NORMAL, Vector3::new(0.0, 0.0, -0.5));
        assert_eq!(shader.shade(&pixel), Color::BLUE);
    }
}
