/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use sr3d_core::{Color, Mesh, PixelAttributes, Shader, Vector4, Weights};
use std::io::Write;
use tracing::trace;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Triangles with a corner this close to the camera plane are dropped
const MIN_CLIP_W: f32 = 1e-5;

/// Height of a terminal cell relative to its width
pub const CELL_ASPECT: f32 = 2.0;

/// Per-draw counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles_drawn: usize,
    pub triangles_rejected: usize,
    pub pixels_shaded: usize,
}

/// A triangle after the projective divide and viewport mapping
struct ScreenTriangle {
    /// x, y in cells and depth in [0, 1]
    corners: [(f32, f32, f32); 3],
    clip_w: [f32; 3],
}

/// ASCII renderer that rasterizes meshes into a character and color buffer
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    pixel: PixelAttributes,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::BLACK; size],
            pixel: PixelAttributes::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Height / width of the viewport in square units, for the camera
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 * CELL_ASPECT / self.width.max(1) as f32
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::BLACK);
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn color_at(&self, x: usize, y: usize) -> Color {
        self.color_buffer[y * self.width + x]
    }

    /// Draw a mesh through a shader whose local-to-clip matrix is already set
    pub fn render_mesh(&mut self, mesh: &Mesh, shader: &dyn Shader) -> RenderStats {
        let mut stats = RenderStats::default();
        for triangle in 0..mesh.triangle_count() {
            match self.project_triangle(mesh, triangle, shader) {
                Some(screen) => {
                    stats.triangles_drawn += 1;
                    stats.pixels_shaded += self.rasterize_triangle(mesh, triangle, &screen, shader);
                }
                None => stats.triangles_rejected += 1,
            }
        }

        trace!(?stats, "rendered mesh");
        stats
    }

    fn project_triangle(
        &self,
        mesh: &Mesh,
        triangle: usize,
        shader: &dyn Shader,
    ) -> Option<ScreenTriangle> {
        let clip: [Vector4; 3] = mesh.triangle_positions(triangle).map(|p| shader.vertex(&p));

        // No near-plane clipping: triangles crossing the camera plane are skipped
        if clip.iter().any(|c| c.w <= MIN_CLIP_W) {
            return None;
        }

        let corners = clip.map(|c| {
            let (ndc_x, ndc_y, depth) = (c.x / c.w, c.y / c.w, c.z / c.w);
            let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f32;
            let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f32;
            (screen_x, screen_y, depth)
        });

        Some(ScreenTriangle {
            corners,
            clip_w: clip.map(|c| c.w),
        })
    }

    fn rasterize_triangle(
        &mut self,
        mesh: &Mesh,
        triangle: usize,
        screen: &ScreenTriangle,
        shader: &dyn Shader,
    ) -> usize {
        let [v0, v1, v2] = screen.corners;
        let (a, b, c) = ((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1));

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        let mut shaded = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some(weights) = barycentric(a, b, c, (px, py)) else {
                    // Degenerate in screen space
                    return shaded;
                };
                if weights.iter().any(|&w| w < 0.0) {
                    continue;
                }

                // Post-divide depth is linear in screen space
                let depth = weights[0] * v0.2 + weights[1] * v1.2 + weights[2] * v2.2;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.pixel.evaluate(mesh, triangle, weights, screen.clip_w);
                    let color = shader.shade(&self.pixel);

                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = luminosity_char(&color);
                    self.color_buffer[idx] = color;
                    shaded += 1;
                }
            }
        }
        shaded
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let (r, g, b) = self.color_buffer[idx].to_rgb8();

                writer.queue(SetForegroundColor(TermColor::Rgb { r, g, b }))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a color's brightness onto the character ramp; covered pixels are never blank
fn luminosity_char(color: &Color) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (color.luminance().clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(1, last)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: (f32, f32), v1: (f32, f32), v2: (f32, f32), p: (f32, f32)) -> Option<Weights> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some([w0, w1, w2])
}
