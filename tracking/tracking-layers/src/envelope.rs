//! Layer extent and clearance margins.
//!
//! A layer is sized from the tight bounds of its modules plus margins. The
//! margins come either from an explicit envelope on the extension or from
//! the gap between the module bounds and the layer's own tube shape.

use tracing::{debug, warn};
use tracking_types::{ProtoLayer, Surface, Transform3, local_z_axis};

use crate::convert::to_internal_length;
use crate::description::{DetectorElement, Extension, Shape};
use crate::error::{LayerBuildError, Result};
use crate::region::Region;

/// Extent of a layer's tube shape in internal units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeExtent {
    /// Inner radius.
    pub r_min: f64,
    /// Outer radius.
    pub r_max: f64,
    /// Lower z.
    pub z_min: f64,
    /// Upper z.
    pub z_max: f64,
}

impl ShapeExtent {
    /// Extent of `element`'s tube segment placed by `transform`.
    ///
    /// Endcap layers take their z range from the placement along the local z
    /// axis, barrel layers are centred on zero.
    ///
    /// # Errors
    ///
    /// [`LayerBuildError::StructuralGeometry`] when the element has no shape
    /// or a shape other than a tube segment.
    pub fn of(element: &DetectorElement, region: Region, transform: &Transform3) -> Result<Self> {
        let (r_min, r_max, half_z) = match element.shape() {
            Some(Shape::TubeSegment {
                r_min,
                r_max,
                half_z,
                ..
            }) => (
                to_internal_length(*r_min),
                to_internal_length(*r_max),
                to_internal_length(*half_z),
            ),
            Some(other) => {
                return Err(LayerBuildError::structural(
                    element.name(),
                    format!("layer shape must be a tube segment, found {}", other.kind()),
                ));
            }
            None => {
                return Err(LayerBuildError::structural(
                    element.name(),
                    "layer has neither a tube shape nor envelope tolerances",
                ));
            }
        };

        let (z_min, z_max) = if region.is_disc() {
            let centre = transform.translation.vector;
            let axis = local_z_axis(transform);
            let a = (centre - axis * half_z).z;
            let b = (centre + axis * half_z).z;
            (a.min(b), a.max(b))
        } else {
            (-half_z.abs(), half_z.abs())
        };

        Ok(Self {
            r_min,
            r_max,
            z_min,
            z_max,
        })
    }

    /// Whether the tight bounds reach beyond this extent on any side.
    #[must_use]
    pub fn is_inside(&self, tight: &ProtoLayer) -> bool {
        self.r_min > tight.min_r
            || self.r_max < tight.max_r
            || self.z_min > tight.min_z
            || self.z_max < tight.max_z
    }
}

/// Compute the proto-layer of a layer element.
///
/// 1. With an explicit envelope, the margins are the declared values on both
///    sides. Without modules the bounds come from the tube shape.
/// 2. Otherwise the margins are the absolute gaps between the module bounds
///    and the tube shape. Without modules the tube shape is the extent and
///    the margins are zero.
///
/// # Errors
///
/// [`LayerBuildError::StructuralGeometry`] when the tube shape is needed but
/// missing or of another kind.
pub fn build_proto_layer(
    element: &DetectorElement,
    extension: &Extension,
    region: Region,
    transform: &Transform3,
    surfaces: &[Surface],
) -> Result<ProtoLayer> {
    if let Some(envelope) = extension.envelope {
        let mut pl = if surfaces.is_empty() {
            let extent = ShapeExtent::of(element, region, transform)?;
            ProtoLayer::new(extent.r_min, extent.r_max, extent.z_min, extent.z_max)
        } else {
            ProtoLayer::from_surfaces(surfaces)
        };
        pl.env_r = (envelope.r, envelope.r);
        pl.env_z = (envelope.z, envelope.z);
        debug!(
            element = element.name(),
            env_r = envelope.r,
            env_z = envelope.z,
            "using declared envelope"
        );
        return Ok(pl);
    }

    let extent = ShapeExtent::of(element, region, transform)?;
    if surfaces.is_empty() {
        return Ok(ProtoLayer::new(extent.r_min, extent.r_max, extent.z_min, extent.z_max));
    }

    let mut pl = ProtoLayer::from_surfaces(surfaces);
    if extent.is_inside(&pl) {
        warn!(
            element = element.name(),
            shape_r = ?(extent.r_min, extent.r_max),
            shape_z = ?(extent.z_min, extent.z_max),
            modules_r = ?(pl.min_r, pl.max_r),
            modules_z = ?(pl.min_z, pl.max_z),
            "layer shape does not enclose its modules; margins taken as absolute gaps"
        );
    }
    pl.env_r = ((extent.r_min - pl.min_r).abs(), (extent.r_max - pl.max_r).abs());
    pl.env_z = ((extent.z_min - pl.min_z).abs(), (extent.z_max - pl.max_z).abs());
    Ok(pl)
}
