//! Layer builder: orchestrates the per-layer pipeline for each region.

use tracing::{debug, trace};
use tracking_types::Layer;

use crate::annotate::annotate_layer;
use crate::assemble::{LayerParts, assemble_layer};
use crate::config::LayerBuilderConfig;
use crate::convert::convert_transform;
use crate::description::DetectorElement;
use crate::envelope::build_proto_layer;
use crate::error::{LayerBuildError, Result};
use crate::region::Region;
use crate::sensitive::collect_sensitive;
use crate::support::build_approach;

/// Source of the layers of a detector volume.
pub trait LayerProvider {
    /// Disc layers of the endcap at negative z.
    fn negative_layers(&self) -> Result<Vec<Layer>>;

    /// Cylinder layers of the barrel.
    fn central_layers(&self) -> Result<Vec<Layer>>;

    /// Disc layers of the endcap at positive z.
    fn positive_layers(&self) -> Result<Vec<Layer>>;

    /// Name of the provider.
    fn identification(&self) -> &str;
}

/// Builds tracking layers from detector-description elements.
///
/// Layers are recomputed on every call; the builder keeps no state besides
/// its configuration.
///
/// # Example
///
/// ```
/// use tracking_layers::{
///     DetectorElement, Extension, LayerBuilder, LayerBuilderConfig, LayerProvider, Shape,
/// };
///
/// let barrel = DetectorElement::new("BarrelLayer0", 1)
///     .with_shape(Shape::tube(10.0, 20.0, 50.0))
///     .with_extension(Extension::new());
/// let builder = LayerBuilder::new(
///     LayerBuilderConfig::new("Pixel").with_central_layers(vec![barrel]),
/// );
///
/// let layers = builder.central_layers().unwrap();
/// assert_eq!(layers.len(), 1);
/// assert!(layers[0].is_cylinder());
/// assert!(builder.negative_layers().unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    config: LayerBuilderConfig,
}

impl LayerBuilder {
    /// Create a builder.
    #[must_use]
    pub fn new(config: LayerBuilderConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    #[must_use]
    pub fn configuration(&self) -> &LayerBuilderConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_configuration(&mut self, config: LayerBuilderConfig) {
        self.config = config;
    }

    /// Build every layer of a region, in configuration order.
    ///
    /// # Errors
    ///
    /// Fails on the first layer element that cannot be built.
    pub fn build_layers(&self, region: Region) -> Result<Vec<Layer>> {
        let elements = self.config.layers(region);
        if elements.is_empty() {
            trace!(region = %region, "no layer elements handed over");
            return Ok(Vec::new());
        }

        debug!(
            builder = %self.config.configuration_name,
            region = %region,
            count = elements.len(),
            kind = if region.is_disc() { "disc" } else { "cylinder" },
            "building layers"
        );
        elements
            .iter()
            .map(|element| self.build_layer(element, region))
            .collect()
    }

    /// Build the layer of a single element.
    ///
    /// # Errors
    ///
    /// [`LayerBuildError::MissingExtension`] when the element carries no
    /// extension; otherwise whatever a pipeline stage reports. Failures that
    /// do not name an element themselves are wrapped in
    /// [`LayerBuildError::InElement`].
    pub fn build_layer(&self, element: &DetectorElement, region: Region) -> Result<Layer> {
        self.run_pipeline(element, region)
            .map_err(|e| e.in_element(element.name()))
    }

    fn run_pipeline(&self, element: &DetectorElement, region: Region) -> Result<Layer> {
        let extension = element
            .extension()
            .ok_or_else(|| LayerBuildError::missing_extension(element.name()))?;

        let surfaces = collect_sensitive(
            element,
            &extension.axes,
            self.config.build_digitization_modules,
        )?;
        let transform = convert_transform(element.world_transform());
        let proto = build_proto_layer(element, extension, region, &transform, &surfaces)?;
        let approach = extension
            .support_material
            .as_ref()
            .map(|support| build_approach(&proto, &transform, region, support))
            .transpose()?;

        trace!(
            element = element.name(),
            surfaces = surfaces.len(),
            min_r = proto.min_r,
            max_r = proto.max_r,
            min_z = proto.min_z,
            max_z = proto.max_z,
            "proto-layer"
        );

        let mut layer = assemble_layer(
            LayerParts {
                element,
                region,
                transform,
                proto,
                surfaces,
                approach,
            },
            &self.config,
        )?;
        annotate_layer(&mut layer, element.material(), &proto);
        Ok(layer)
    }
}

impl LayerProvider for LayerBuilder {
    fn negative_layers(&self) -> Result<Vec<Layer>> {
        self.build_layers(Region::Negative)
    }

    fn central_layers(&self) -> Result<Vec<Layer>> {
        self.build_layers(Region::Central)
    }

    fn positive_layers(&self) -> Result<Vec<Layer>> {
        self.build_layers(Region::Positive)
    }

    fn identification(&self) -> &str {
        &self.config.configuration_name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::description::{Extension, NativeTransform, Shape, VolumeMaterial};
    use tracking_types::{LayerMaterialPosition, TrackingError};

    fn endcap(name: &str, z: f64) -> DetectorElement {
        DetectorElement::new(name, 1)
            .with_transform(NativeTransform::from_translation(0.0, 0.0, z))
            .with_shape(Shape::tube(5.0, 30.0, 0.5))
            .with_extension(Extension::new())
    }

    #[test]
    fn test_identification() {
        let builder = LayerBuilder::new(LayerBuilderConfig::new("PixelEndcap"));
        assert_eq!(builder.identification(), "PixelEndcap");
    }

    #[test]
    fn test_layers_keep_order() {
        let config = LayerBuilderConfig::new("Pixel").with_positive_layers(vec![
            endcap("d2", 120.0),
            endcap("d0", 80.0),
            endcap("d1", 100.0),
        ]);
        let layers = LayerBuilder::new(config).positive_layers().unwrap();

        let zs: Vec<f64> = layers.iter().map(|l| l.transform().translation.vector.z).collect();
        assert_eq!(zs, vec![1200.0, 800.0, 1000.0]);
        assert!(layers.iter().all(Layer::is_disc));
    }

    #[test]
    fn test_missing_extension() {
        let bare = DetectorElement::new("bare", 1).with_shape(Shape::tube(1.0, 2.0, 3.0));
        let builder =
            LayerBuilder::new(LayerBuilderConfig::new("Pixel").with_central_layers(vec![bare]));
        assert_eq!(
            builder.central_layers().unwrap_err(),
            LayerBuildError::missing_extension("bare")
        );
    }

    #[test]
    fn test_support_material_and_bulk() {
        let element = endcap("disc", -100.0)
            .with_material(VolumeMaterial::silicon())
            .with_extension(
                Extension::new().with_support_material((12, 3), LayerMaterialPosition::Central),
            );
        let builder =
            LayerBuilder::new(LayerBuilderConfig::new("Pixel").with_negative_layers(vec![element]));
        let layer = builder.negative_layers().unwrap().remove(0);

        assert!(layer.material().is_some());
        let approach = layer.approach_descriptor().unwrap();
        assert_eq!(
            approach.positions(),
            &Region::Negative.approach_order()
        );
        let (position, _) = approach.material_surface().unwrap();
        assert_eq!(position, LayerMaterialPosition::Central);
    }

    #[test]
    fn test_zero_bins_name_the_layer() {
        let element = endcap("BarrelLayer7", 0.0).with_extension(
            Extension::new().with_support_material((0, 4), LayerMaterialPosition::Inner),
        );
        let builder =
            LayerBuilder::new(LayerBuilderConfig::new("Pixel").with_central_layers(vec![element]));
        let err = builder.central_layers().unwrap_err();

        assert_eq!(err.element(), Some("BarrelLayer7"));
        assert_eq!(err.cause(), &LayerBuildError::from(TrackingError::ZeroBins));
    }

    #[test]
    fn test_flat_tube_with_support_names_the_layer() {
        let element = DetectorElement::new("FlatBarrel", 3)
            .with_shape(Shape::tube(5.0, 30.0, 0.0))
            .with_extension(
                Extension::new().with_support_material((8, 4), LayerMaterialPosition::Outer),
            );
        let builder =
            LayerBuilder::new(LayerBuilderConfig::new("Pixel").with_central_layers(vec![element]));
        let err = builder.central_layers().unwrap_err();

        assert_eq!(err.element(), Some("FlatBarrel"));
        assert!(matches!(err.cause(), LayerBuildError::Geometry(_)));
    }

    #[test]
    fn test_set_configuration() {
        let mut builder = LayerBuilder::new(LayerBuilderConfig::default());
        builder.set_configuration(
            LayerBuilderConfig::new("Strips").with_positive_layers(vec![endcap("d", 50.0)]),
        );
        assert_eq!(builder.configuration().configuration_name, "Strips");
        assert_eq!(builder.positive_layers().unwrap().len(), 1);
    }
}
