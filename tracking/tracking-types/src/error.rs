//! Error types for the geometry kernel.

use crate::LayerMaterialPosition;

/// Errors that can occur while constructing geometry kernel objects.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TrackingError {
    /// A binning axis needs at least one bin.
    #[error("binning axis needs at least one bin")]
    ZeroBins,

    /// A binning axis has an empty or inverted range.
    #[error("invalid binning range [{min}, {max})")]
    InvalidBinRange {
        /// Lower edge of the range.
        min: f64,
        /// Upper edge of the range.
        max: f64,
    },

    /// Arbitrary bin boundaries must be strictly increasing.
    #[error("bin boundaries must be strictly increasing")]
    UnsortedBoundaries,

    /// An approach descriptor lists the same position twice.
    #[error("approach surface position {0} is given more than once")]
    DuplicateApproachPosition(LayerMaterialPosition),
}

impl TrackingError {
    /// Create an invalid bin range error.
    #[must_use]
    pub fn invalid_bin_range(min: f64, max: f64) -> Self {
        Self::InvalidBinRange { min, max }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackingError::invalid_bin_range(5.0, 1.0);
        assert!(err.to_string().contains("[5, 1)"));

        let err = TrackingError::DuplicateApproachPosition(LayerMaterialPosition::Outer);
        assert!(err.to_string().contains("outer"));
    }
}
