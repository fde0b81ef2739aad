//! Layer builder configuration.

use std::sync::Arc;

use tracking_types::BinningType;

use crate::creator::{DefaultLayerCreator, LayerCreator};
use crate::description::DetectorElement;
use crate::error::{LayerBuildError, Result};
use crate::region::Region;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration of a [`LayerBuilder`](crate::LayerBuilder).
///
/// The layer element lists are ordered; built layers come back in the same
/// order.
///
/// # Example
///
/// ```
/// use tracking_layers::{DetectorElement, Extension, LayerBuilderConfig, Shape};
///
/// let barrel = DetectorElement::new("BarrelLayer0", 1)
///     .with_shape(Shape::tube(3.0, 4.0, 50.0))
///     .with_extension(Extension::new());
///
/// let config = LayerBuilderConfig::new("Pixel").with_central_layers(vec![barrel]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayerBuilderConfig {
    /// Name reported by [`LayerProvider::identification`](crate::LayerProvider::identification).
    pub configuration_name: String,
    /// Layer elements of the endcap at negative z.
    pub negative_layers: Vec<DetectorElement>,
    /// Layer elements of the barrel.
    pub central_layers: Vec<DetectorElement>,
    /// Layer elements of the endcap at positive z.
    pub positive_layers: Vec<DetectorElement>,
    /// Radial binning of endcap surface arrays.
    pub b_type_r: BinningType,
    /// Azimuthal binning of all surface arrays.
    pub b_type_phi: BinningType,
    /// Longitudinal binning of barrel surface arrays.
    pub b_type_z: BinningType,
    /// Attach digitization modules to sensitive surfaces.
    pub build_digitization_modules: bool,
    /// Builds aggregate layers from their modules.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_layer_creator"))]
    pub layer_creator: Arc<dyn LayerCreator>,
}

fn default_layer_creator() -> Arc<dyn LayerCreator> {
    Arc::new(DefaultLayerCreator::default())
}

impl Default for LayerBuilderConfig {
    fn default() -> Self {
        Self {
            configuration_name: "LayerBuilder".to_string(),
            negative_layers: Vec::new(),
            central_layers: Vec::new(),
            positive_layers: Vec::new(),
            b_type_r: BinningType::Equidistant,
            b_type_phi: BinningType::Equidistant,
            b_type_z: BinningType::Equidistant,
            build_digitization_modules: false,
            layer_creator: default_layer_creator(),
        }
    }
}

impl LayerBuilderConfig {
    /// Create an empty configuration with the given name.
    #[must_use]
    pub fn new(configuration_name: impl Into<String>) -> Self {
        Self {
            configuration_name: configuration_name.into(),
            ..Default::default()
        }
    }

    /// Set the negative endcap layer elements.
    #[must_use]
    pub fn with_negative_layers(mut self, layers: Vec<DetectorElement>) -> Self {
        self.negative_layers = layers;
        self
    }

    /// Set the barrel layer elements.
    #[must_use]
    pub fn with_central_layers(mut self, layers: Vec<DetectorElement>) -> Self {
        self.central_layers = layers;
        self
    }

    /// Set the positive endcap layer elements.
    #[must_use]
    pub fn with_positive_layers(mut self, layers: Vec<DetectorElement>) -> Self {
        self.positive_layers = layers;
        self
    }

    /// Set the binning types (r, phi, z) of surface arrays.
    #[must_use]
    pub fn with_binning(mut self, r: BinningType, phi: BinningType, z: BinningType) -> Self {
        self.b_type_r = r;
        self.b_type_phi = phi;
        self.b_type_z = z;
        self
    }

    /// Attach digitization modules to sensitive surfaces.
    #[must_use]
    pub fn with_digitization_modules(mut self) -> Self {
        self.build_digitization_modules = true;
        self
    }

    /// Set the layer creator.
    #[must_use]
    pub fn with_layer_creator(mut self, creator: Arc<dyn LayerCreator>) -> Self {
        self.layer_creator = creator;
        self
    }

    /// Layer elements of a region.
    #[must_use]
    pub fn layers(&self, region: Region) -> &[DetectorElement] {
        match region {
            Region::Negative => &self.negative_layers,
            Region::Central => &self.central_layers,
            Region::Positive => &self.positive_layers,
        }
    }

    /// Validate the configuration.
    ///
    /// Every layer element must carry an extension, and declared support
    /// material must have at least one bin on both axes.
    pub fn validate(&self) -> Result<()> {
        if self.configuration_name.trim().is_empty() {
            return Err(LayerBuildError::invalid_config(
                "configuration name must not be empty",
            ));
        }

        for region in Region::ALL {
            for element in self.layers(region) {
                let extension = element
                    .extension()
                    .ok_or_else(|| LayerBuildError::missing_extension(element.name()))?;
                if let Some(support) = &extension.support_material {
                    let (bins_phi, bins_second) = support.bins;
                    if bins_phi == 0 || bins_second == 0 {
                        return Err(LayerBuildError::invalid_config(format!(
                            "{region} layer '{}' declares support material with zero bins ({bins_phi}, {bins_second})",
                            element.name()
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::description::{Extension, Shape};
    use tracking_types::LayerMaterialPosition;

    fn layer(name: &str) -> DetectorElement {
        DetectorElement::new(name, 0)
            .with_shape(Shape::tube(1.0, 2.0, 3.0))
            .with_extension(Extension::new())
    }

    #[test]
    fn test_default() {
        let config = LayerBuilderConfig::default();
        assert_eq!(config.configuration_name, "LayerBuilder");
        assert_eq!(config.b_type_phi, BinningType::Equidistant);
        assert!(!config.build_digitization_modules);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = LayerBuilderConfig::new("Strips")
            .with_negative_layers(vec![layer("n0")])
            .with_positive_layers(vec![layer("p0"), layer("p1")])
            .with_binning(
                BinningType::Arbitrary,
                BinningType::Equidistant,
                BinningType::Arbitrary,
            )
            .with_digitization_modules();

        assert_eq!(config.layers(Region::Negative).len(), 1);
        assert!(config.layers(Region::Central).is_empty());
        assert_eq!(config.layers(Region::Positive).len(), 2);
        assert_eq!(config.b_type_r, BinningType::Arbitrary);
        assert!(config.build_digitization_modules);
    }

    #[test]
    fn test_missing_extension_rejected() {
        let config = LayerBuilderConfig::new("Pixel")
            .with_central_layers(vec![DetectorElement::new("bare", 0)]);
        let err = config.validate().unwrap_err();
        assert_eq!(err, LayerBuildError::missing_extension("bare"));
    }

    #[test]
    fn test_zero_bins_rejected() {
        let bad = DetectorElement::new("disc", 0).with_extension(
            Extension::new().with_support_material((0, 4), LayerMaterialPosition::Inner),
        );
        let config = LayerBuilderConfig::new("Pixel").with_positive_layers(vec![bad]);
        assert!(matches!(
            config.validate(),
            Err(LayerBuildError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let config = LayerBuilderConfig::new("  ");
        assert!(config.validate().is_err());
    }
}
