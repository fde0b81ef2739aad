//! Rigid transforms.

use nalgebra::{IsometryMatrix3, Matrix3, Rotation3, Translation3, Vector3};

/// Rigid placement of a surface or layer in the global frame.
///
/// The rotation is stored as a full 3x3 matrix so that rotations handed over
/// by a detector description are kept bit-for-bit.
pub type Transform3 = IsometryMatrix3<f64>;

/// Build a transform from a rotation matrix and a translation.
///
/// The matrix is taken as-is; it is the caller's job to hand over an
/// orthonormal rotation.
///
/// # Example
///
/// ```
/// use tracking_types::{transform_from_parts, Vector3};
/// use nalgebra::Matrix3;
///
/// let t = transform_from_parts(Matrix3::identity(), Vector3::new(0.0, 0.0, 5.0));
/// assert_eq!(t.translation.vector.z, 5.0);
/// ```
#[must_use]
pub fn transform_from_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Transform3 {
    IsometryMatrix3::from_parts(
        Translation3::from(translation),
        Rotation3::from_matrix_unchecked(rotation),
    )
}

/// The local z axis of a transform expressed in the global frame.
#[must_use]
pub fn local_z_axis(transform: &Transform3) -> Vector3<f64> {
    transform.rotation.matrix().column(2).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_are_kept_exactly() {
        let rotation = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let t = transform_from_parts(rotation, Vector3::new(1.0, 2.0, 3.0));

        assert_eq!(*t.rotation.matrix(), rotation);
        assert_eq!(t.translation.vector, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_local_z_axis() {
        // Rotated by 90 degrees about x: local z points along -y
        let rotation = Matrix3::new(1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0);
        let t = transform_from_parts(rotation, Vector3::zeros());
        assert_eq!(local_z_axis(&t), Vector3::new(0.0, -1.0, 0.0));
    }
}
