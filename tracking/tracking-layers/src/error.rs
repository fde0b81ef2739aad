//! Error types for layer building.

use thiserror::Error;
use tracking_types::TrackingError;

/// Errors that can occur while turning detector elements into layers.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum LayerBuildError {
    /// The element's shape cannot be used to size or describe it.
    #[error("structural geometry error in element '{element}': {reason}")]
    StructuralGeometry {
        /// Name of the offending element.
        element: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A layer element carries no layer extension.
    #[error("element '{element}' has no layer extension")]
    MissingExtension {
        /// Name of the offending element.
        element: String,
    },

    /// The module axis convention cannot be read.
    #[error("element '{element}' has invalid axes '{axes}' (expected three of X, Y, Z)")]
    InvalidAxes {
        /// Name of the offending element.
        element: String,
        /// The axes string as given.
        axes: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// The layer creator could not build a layer.
    #[error("layer creation failed: {reason}")]
    LayerCreation {
        /// Description of the failure.
        reason: String,
    },

    /// A geometry kernel object could not be constructed.
    #[error(transparent)]
    Geometry(#[from] TrackingError),

    /// A failure while building the layer of a named element.
    #[error("cannot build layer '{element}': {source}")]
    InElement {
        /// Name of the layer element being built.
        element: String,
        /// The underlying failure.
        source: Box<LayerBuildError>,
    },
}

impl LayerBuildError {
    /// Create a structural geometry error.
    pub fn structural(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StructuralGeometry {
            element: element.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing extension error.
    pub fn missing_extension(element: impl Into<String>) -> Self {
        Self::MissingExtension {
            element: element.into(),
        }
    }

    /// Create an invalid axes error.
    pub fn invalid_axes(element: impl Into<String>, axes: impl Into<String>) -> Self {
        Self::InvalidAxes {
            element: element.into(),
            axes: axes.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a layer creation error.
    pub fn layer_creation(reason: impl Into<String>) -> Self {
        Self::LayerCreation {
            reason: reason.into(),
        }
    }

    /// Attribute the error to a layer element.
    ///
    /// Errors that already name an element are returned unchanged.
    #[must_use]
    pub fn in_element(self, element: impl Into<String>) -> Self {
        if self.element().is_some() {
            return self;
        }
        Self::InElement {
            element: element.into(),
            source: Box::new(self),
        }
    }

    /// Name of the element the error is about, if it concerns one.
    #[must_use]
    pub fn element(&self) -> Option<&str> {
        match self {
            Self::StructuralGeometry { element, .. }
            | Self::MissingExtension { element }
            | Self::InvalidAxes { element, .. }
            | Self::InElement { element, .. } => Some(element),
            _ => None,
        }
    }

    /// The error with any element attribution stripped.
    #[must_use]
    pub fn cause(&self) -> &Self {
        match self {
            Self::InElement { source, .. } => source.cause(),
            other => other,
        }
    }
}

/// Result type for layer building.
pub type Result<T> = std::result::Result<T, LayerBuildError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_display() {
        let err = LayerBuildError::structural("BarrelLayer0", "shape is not a tube segment");
        assert!(err.to_string().contains("BarrelLayer0"));
        assert!(err.to_string().contains("tube segment"));
        assert_eq!(err.element(), Some("BarrelLayer0"));
    }

    #[test]
    fn test_missing_extension() {
        let err = LayerBuildError::missing_extension("EndcapLayer3");
        assert!(err.to_string().contains("EndcapLayer3"));
    }

    #[test]
    fn test_invalid_axes() {
        let err = LayerBuildError::invalid_axes("module_4", "XXQ");
        assert!(err.to_string().contains("XXQ"));
        assert_eq!(err.element(), Some("module_4"));
    }

    #[test]
    fn test_geometry_passthrough() {
        let err = LayerBuildError::from(TrackingError::ZeroBins);
        assert_eq!(err.element(), None);
        assert!(err.to_string().contains("at least one bin"));
    }

    #[test]
    fn test_in_element_wraps_unnamed() {
        let err = LayerBuildError::layer_creation("no bins").in_element("BarrelLayer2");
        assert_eq!(err.element(), Some("BarrelLayer2"));
        assert_eq!(err.cause(), &LayerBuildError::layer_creation("no bins"));
        assert!(err.to_string().contains("BarrelLayer2"));
        assert!(err.to_string().contains("no bins"));
    }

    #[test]
    fn test_in_element_keeps_named() {
        let err = LayerBuildError::invalid_axes("module_1", "XY").in_element("BarrelLayer2");
        assert_eq!(err, LayerBuildError::invalid_axes("module_1", "XY"));
    }
}
