//! Layer assembly.
//!
//! A layer element either is a measuring volume itself, in which case it
//! becomes a layer holding a single sensitive surface, or it aggregates
//! sensitive modules, in which case the configured [`LayerCreator`] builds
//! the layer from them.
//!
//! [`LayerCreator`]: crate::LayerCreator

use tracing::trace;
use tracking_types::{
    ApproachDescriptor, CylinderBounds, Layer, LayerType, ProtoLayer, RadialBounds, Surface,
    SurfaceArray, Transform3,
};

use crate::config::LayerBuilderConfig;
use crate::description::{DEFAULT_AXES, DetectorElement};
use crate::error::Result;
use crate::region::Region;
use crate::sensitive::create_sensitive_surface;

/// How a layer element is turned into a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assembly {
    /// The element is one sensitive volume.
    Sensitive,
    /// The element groups sensitive modules.
    Aggregate,
}

impl Assembly {
    /// Assembly mode of a layer element.
    #[must_use]
    pub fn of(element: &DetectorElement) -> Self {
        if element.is_sensitive() {
            Self::Sensitive
        } else {
            Self::Aggregate
        }
    }
}

/// Everything gathered about a layer element before it becomes a layer.
#[derive(Debug)]
pub struct LayerParts<'a> {
    /// The layer element.
    pub element: &'a DetectorElement,
    /// Region the layer belongs to.
    pub region: Region,
    /// Placement of the layer element.
    pub transform: Transform3,
    /// Extent and margins.
    pub proto: ProtoLayer,
    /// Sensitive surfaces collected below the element.
    pub surfaces: Vec<Surface>,
    /// Boundary surfaces, when support material was requested.
    pub approach: Option<ApproachDescriptor>,
}

/// Build the layer from its parts.
///
/// # Errors
///
/// Propagates sensitive surface and layer creator failures.
pub fn assemble_layer(parts: LayerParts<'_>, config: &LayerBuilderConfig) -> Result<Layer> {
    match Assembly::of(parts.element) {
        Assembly::Sensitive => sensitive_layer(parts, config.build_digitization_modules),
        Assembly::Aggregate => aggregate_layer(parts, config),
    }
}

fn sensitive_layer(parts: LayerParts<'_>, build_digitization_modules: bool) -> Result<Layer> {
    let LayerParts {
        element,
        region,
        transform,
        proto,
        surfaces,
        approach,
    } = parts;
    if !surfaces.is_empty() {
        trace!(
            element = element.name(),
            ignored = surfaces.len(),
            "sensitive layer replaces the modules below it"
        );
    }

    let surface = create_sensitive_surface(
        element,
        region.is_disc(),
        DEFAULT_AXES,
        build_digitization_modules,
    )?;
    let array = Some(SurfaceArray::single(surface));

    let layer = if region.is_disc() {
        Layer::disc(
            transform,
            RadialBounds::new(proto.min_r, proto.max_r),
            array,
            (proto.max_z - proto.min_z).abs(),
            approach,
            LayerType::Active,
        )
    } else {
        let half_z = 0.5 * (proto.max_z - proto.min_z).abs();
        Layer::cylinder(
            transform,
            CylinderBounds::new(proto.center_r(), half_z),
            array,
            (proto.max_r - proto.min_r).abs(),
            approach,
            LayerType::Active,
        )
    };
    Ok(layer)
}

fn aggregate_layer(parts: LayerParts<'_>, config: &LayerBuilderConfig) -> Result<Layer> {
    let creator = &config.layer_creator;
    if parts.region.is_disc() {
        creator.disc_layer(
            parts.surfaces,
            config.b_type_r,
            config.b_type_phi,
            &parts.proto,
            Some(parts.transform),
            parts.approach,
        )
    } else {
        creator.cylinder_layer(
            parts.surfaces,
            config.b_type_phi,
            config.b_type_z,
            &parts.proto,
            Some(parts.transform),
            parts.approach,
        )
    }
}
