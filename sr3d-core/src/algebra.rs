/// Fixed-size vector and matrix types used across the rasterizer
///
/// All vectors are row vectors and transforms follow the row-vector
/// convention: `v' = v * M`, i.e. `v'[j] = Σ_i v[i] * M[(i, j)]`.
/// Chaining `v * A * B` applies `A` first.
use nalgebra::{Matrix3, Matrix4, RowVector2, RowVector3, RowVector4};

pub type Vector2 = RowVector2<f32>;
pub type Vector3 = RowVector3<f32>;
pub type Vector4 = RowVector4<f32>;

/// 3x3 matrix indexed as `[(row, column)]`
pub type Matrix3x3 = Matrix3<f32>;

/// 4x4 matrix indexed as `[(row, column)]`
pub type Matrix4x4 = Matrix4<f32>;

/// Tolerance used by the orthonormality checks
pub const BASIS_EPSILON: f32 = 1e-4;

/// Lift a 3D point to homogeneous coordinates (w = 1)
pub fn homogeneous_point(point: &Vector3) -> Vector4 {
    Vector4::new(point.x, point.y, point.z, 1.0)
}

/// Normalize a vector, or `None` when it is too short to have a direction.
///
/// `Vector3::normalize` on a zero vector yields NaNs; callers that cannot
/// rule that out go through here.
pub fn normalize_checked(v: &Vector3) -> Option<Vector3> {
    v.try_normalize(f32::EPSILON)
}

/// Whether three vectors form an orthonormal basis within `BASIS_EPSILON`
pub fn is_orthonormal_basis(a: &Vector3, b: &Vector3, c: &Vector3) -> bool {
    let unit = |v: &Vector3| (v.norm() - 1.0).abs() < BASIS_EPSILON;
    let orthogonal = |u: &Vector3, v: &Vector3| u.dot(v).abs() < BASIS_EPSILON;

    unit(a) && unit(b) && unit(c) && orthogonal(a, b) && orthogonal(b, c) && orthogonal(a, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_row_vector_times_matrix() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        #[rustfmt::skip]
        let m = Matrix3x3::new(
            1.0, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        );

        // result[j] = sum_i v[i] * m[i][j]
        let result = v * m;
        assert_relative_eq!(result, Vector3::new(30.0, 36.0, 42.0), epsilon = 1e-6);
    }

    #[test]
    fn test_vector_products() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);

        assert_eq!(x.dot(&y), 0.0);
        assert_relative_eq!(x.cross(&y), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!((x + y) * 2.0, Vector3::new(2.0, 2.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_homogeneous_point() {
        let p = homogeneous_point(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vector4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(p * Matrix4x4::identity(), p);
    }

    #[test]
    fn test_normalize_checked() {
        assert!(normalize_checked(&Vector3::zeros()).is_none());

        let n = normalize_checked(&Vector3::new(0.0, 3.0, 4.0)).unwrap();
        assert_relative_eq!(n, Vector3::new(0.0, 0.6, 0.8), epsilon = 1e-6);
    }

    #[test]
    fn test_orthonormal_basis() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        let z = Vector3::new(0.0, 0.0, 1.0);

        assert!(is_orthonormal_basis(&x, &y, &z));
        assert!(!is_orthonormal_basis(&x, &(y * 2.0), &z));
        assert!(!is_orthonormal_basis(&x, &x, &z));
    }
}
