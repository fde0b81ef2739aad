//! Conversion from description units and placements to internal ones.

use nalgebra::{Matrix3, Vector3};
use tracking_types::units::CM;
use tracking_types::{Transform3, transform_from_parts};

use crate::description::NativeTransform;

/// Convert a description length (centimeters) to internal units.
#[must_use]
pub fn to_internal_length(value: f64) -> f64 {
    value * CM
}

/// Convert a description placement to an internal transform.
///
/// The stored rotation is row-major, so the rotation columns are
/// `(r0, r3, r6)`, `(r1, r4, r7)` and `(r2, r5, r8)`. Only the translation
/// is rescaled.
///
/// # Example
///
/// ```
/// use tracking_layers::{NativeTransform, convert_transform};
///
/// let t = convert_transform(&NativeTransform::from_translation(1.0, 2.0, 3.0));
/// assert_eq!(t.translation.vector.z, 30.0);
/// ```
#[must_use]
pub fn convert_transform(native: &NativeTransform) -> Transform3 {
    let rotation = Matrix3::from_row_slice(&native.rotation);
    let [x, y, z] = native.translation;
    let translation = Vector3::new(
        to_internal_length(x),
        to_internal_length(y),
        to_internal_length(z),
    );
    transform_from_parts(rotation, translation)
}
