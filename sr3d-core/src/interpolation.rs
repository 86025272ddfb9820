/// Per-pixel evaluation of vertex attributes from barycentric weights
use std::ops::{Add, Mul};

/// Values that can be blended as a weighted sum of triangle corners.
///
/// Implemented for anything closed under addition and scaling by `f32`:
/// scalars, `Vector2`/`Vector3`/`Vector4`, and [`crate::Color`].
pub trait Interpolate: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl<T> Interpolate for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> {}

/// How an attribute varies across a projected triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationMode {
    /// Weights used as given; only correct for screen-space-linear data
    #[default]
    Linear,
    /// Weights corrected by each corner's clip-space w
    PerspectiveCorrect,
}

/// Barycentric weights of a pixel relative to the three triangle corners
pub type Weights = [f32; 3];

/// Turn screen-space weights into perspective-correct ones.
///
/// `w_i' = (w_i / clip_w_i) / Σ_j (w_j / clip_w_j)`. Every `clip_w` must be
/// positive; triangles reaching the camera plane have to be clipped first.
pub fn perspective_correct_weights(weights: Weights, clip_w: [f32; 3]) -> Weights {
    debug_assert!(
        clip_w.iter().all(|&w| w > 0.0),
        "perspective correction needs triangles in front of the camera, got w = {clip_w:?}"
    );

    let scaled = [
        weights[0] / clip_w[0],
        weights[1] / clip_w[1],
        weights[2] / clip_w[2],
    ];
    let sum = scaled[0] + scaled[1] + scaled[2];

    [scaled[0] / sum, scaled[1] / sum, scaled[2] / sum]
}

/// Weighted sum of the three corner values
pub fn blend<T: Interpolate>(values: &[T; 3], weights: Weights) -> T {
    values[0] * weights[0] + values[1] * weights[1] + values[2] * weights[2]
}

/// Evaluate an attribute at a pixel, honoring the interpolation mode
pub fn interpolate<T: Interpolate>(
    values: &[T; 3],
    weights: Weights,
    clip_w: [f32; 3],
    mode: InterpolationMode,
) -> T {
    match mode {
        InterpolationMode::Linear => blend(values, weights),
        InterpolationMode::PerspectiveCorrect => {
            blend(values, perspective_correct_weights(weights, clip_w))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Vector2;
    use crate::color::Color;
    use approx::assert_relative_eq;

    const MODES: [InterpolationMode; 2] = [
        InterpolationMode::Linear,
        InterpolationMode::PerspectiveCorrect,
    ];
    const CORNERS: [Weights; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    fn assert_color_eq(a: Color, b: Color) {
        assert_relative_eq!(a.r, b.r, epsilon = 1e-6);
        assert_relative_eq!(a.g, b.g, epsilon = 1e-6);
        assert_relative_eq!(a.b, b.b, epsilon = 1e-6);
        assert_relative_eq!(a.a, b.a, epsilon = 1e-6);
    }

    #[test]
    fn test_corners_reproduce_vertex_values() {
        let colors = [Color::RED, Color::GREEN, Color::BLUE];
        let clip_w = [0.5, 2.0, 7.0];

        for mode in MODES {
            for (corner, expected) in CORNERS.iter().zip(colors) {
                assert_eq!(interpolate(&colors, *corner, clip_w, mode), expected);
            }
        }
    }

    #[test]
    fn test_centroid_average_matches_in_both_modes() {
        let colors = [Color::RED, Color::GREEN, Color::BLUE];
        let third = 1.0 / 3.0;
        let average = Color::rgb(third, third, third);

        for mode in MODES {
            let c = interpolate(&colors, [third; 3], [1.0; 3], mode);
            assert_color_eq(c, average);
        }
    }

    #[test]
    fn test_equal_w_reduces_to_linear() {
        let uvs = [Vector2::new(0.5, 0.0), Vector2::new(0.0, 1.0), Vector2::new(1.0, 1.0)];
        let weights = [0.2, 0.5, 0.3];

        for w in [0.25, 1.0, 3.5] {
            let linear = interpolate(&uvs, weights, [w; 3], InterpolationMode::Linear);
            let correct = interpolate(&uvs, weights, [w; 3], InterpolationMode::PerspectiveCorrect);
            assert_relative_eq!(linear, correct, epsilon = 1e-6);

            let corrected = perspective_correct_weights(weights, [w; 3]);
            for (a, b) in corrected.iter().zip(weights) {
                assert_relative_eq!(*a, b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_perspective_correction_favors_near_vertex() {
        // Halfway along an edge in screen space is closer to the far vertex
        // in object space, so the near vertex gets the larger weight.
        let corrected = perspective_correct_weights([0.5, 0.5, 0.0], [1.0, 3.0, 2.0]);

        assert_relative_eq!(corrected[0], 0.75, epsilon = 1e-6);
        assert_relative_eq!(corrected[1], 0.25, epsilon = 1e-6);
        assert_eq!(corrected[2], 0.0);
        assert_relative_eq!(corrected.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_scalar_attribute() {
        let depth = interpolate(
            &[1.0f32, 2.0, 4.0],
            [0.25, 0.25, 0.5],
            [1.0; 3],
            InterpolationMode::Linear,
        );
        assert_relative_eq!(depth, 2.75, epsilon = 1e-6);
    }
}
