//! Tracking layers.

use std::sync::Arc;

use crate::approach::ApproachDescriptor;
use crate::bounds::{CylinderBounds, RadialBounds, SurfaceBounds};
use crate::material::SurfaceMaterial;
use crate::surface::Surface;
use crate::surface_array::SurfaceArray;
use crate::transform::Transform3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Role of a layer during navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayerType {
    /// Carries material but no measurements.
    #[default]
    Passive,
    /// Holds sensitive surfaces.
    Active,
    /// Pure navigation aid.
    Navigation,
}

/// A cylinder (barrel) or disc (endcap) tracking layer.
///
/// The layer's surface representation carries its bulk material; the
/// approach descriptor, when present, carries the mapping proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    representation: Surface,
    thickness: f64,
    surface_array: Option<SurfaceArray>,
    approach: Option<ApproachDescriptor>,
    layer_type: LayerType,
}

impl Layer {
    /// Create a cylinder layer.
    #[must_use]
    pub fn cylinder(
        transform: Transform3,
        bounds: CylinderBounds,
        surface_array: Option<SurfaceArray>,
        thickness: f64,
        approach: Option<ApproachDescriptor>,
        layer_type: LayerType,
    ) -> Self {
        Self {
            representation: Surface::cylinder(transform, bounds),
            thickness,
            surface_array,
            approach,
            layer_type,
        }
    }

    /// Create a disc layer.
    #[must_use]
    pub fn disc(
        transform: Transform3,
        bounds: RadialBounds,
        surface_array: Option<SurfaceArray>,
        thickness: f64,
        approach: Option<ApproachDescriptor>,
        layer_type: LayerType,
    ) -> Self {
        Self {
            representation: Surface::disc(transform, bounds),
            thickness,
            surface_array,
            approach,
            layer_type,
        }
    }

    /// The surface standing in for the whole layer.
    #[must_use]
    pub fn surface_representation(&self) -> &Surface {
        &self.representation
    }

    /// Placement.
    #[must_use]
    pub fn transform(&self) -> &Transform3 {
        self.representation.transform()
    }

    /// Whether this is a barrel layer.
    #[must_use]
    pub fn is_cylinder(&self) -> bool {
        matches!(self.representation.bounds(), SurfaceBounds::Cylinder(_))
    }

    /// Whether this is an endcap layer.
    #[must_use]
    pub fn is_disc(&self) -> bool {
        matches!(self.representation.bounds(), SurfaceBounds::Disc(_))
    }

    /// Cylinder bounds of a barrel layer.
    #[must_use]
    pub fn cylinder_bounds(&self) -> Option<&CylinderBounds> {
        match self.representation.bounds() {
            SurfaceBounds::Cylinder(b) => Some(b),
            _ => None,
        }
    }

    /// Radial bounds of an endcap layer.
    #[must_use]
    pub fn radial_bounds(&self) -> Option<&RadialBounds> {
        match self.representation.bounds() {
            SurfaceBounds::Disc(b) => Some(b),
            _ => None,
        }
    }

    /// Layer thickness.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Sensitive surfaces, if any.
    #[must_use]
    pub fn surface_array(&self) -> Option<&SurfaceArray> {
        self.surface_array.as_ref()
    }

    /// Boundary surfaces, if any.
    #[must_use]
    pub fn approach_descriptor(&self) -> Option<&ApproachDescriptor> {
        self.approach.as_ref()
    }

    /// Navigation role.
    #[must_use]
    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    /// Bulk material of the layer.
    #[must_use]
    pub fn material(&self) -> Option<&Arc<SurfaceMaterial>> {
        self.representation.material()
    }

    /// Replace the bulk material of the layer.
    pub fn set_material(&mut self, material: Option<Arc<SurfaceMaterial>>) {
        self.representation.set_material(material);
    }
}
