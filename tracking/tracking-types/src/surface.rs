//! Surfaces.

use std::sync::Arc;

use nalgebra::{Point3, Vector3};

use crate::bounds::{CylinderBounds, PlanarBounds, RadialBounds, SurfaceBounds};
use crate::material::SurfaceMaterial;
use crate::transform::{Transform3, local_z_axis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Readout description shared by identical sensitive modules.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DigitizationModule {
    /// Readout pitch along local x and y.
    pub pitch: (f64, f64),
    /// Half thickness of the sensitive volume.
    pub half_thickness: f64,
    /// Lorentz angle of the charge drift.
    pub lorentz_angle: f64,
}

/// Link from a sensitive surface back to the detector element it measures.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceElement {
    /// Name of the detector element.
    pub name: String,
    /// Numeric identifier of the detector element.
    pub id: u64,
    /// Axis convention used to orient the module (e.g. `"XYZ"`).
    pub axes: String,
    /// Factor that converted the element's lengths into internal units.
    pub scalor: f64,
    /// Whether the element was read as a disc.
    pub is_disc: bool,
    /// Module thickness in internal units.
    pub thickness: f64,
    /// Shared digitization module, if any.
    pub digitization: Option<Arc<DigitizationModule>>,
}

/// A bounded surface placed in the global frame.
///
/// # Example
///
/// ```
/// use tracking_types::{RadialBounds, Surface, Transform3};
///
/// let disc = Surface::disc(Transform3::identity(), RadialBounds::new(50.0, 300.0));
/// assert!(!disc.is_sensitive());
/// assert_eq!(disc.bounds().kind(), "disc");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    transform: Transform3,
    bounds: SurfaceBounds,
    material: Option<Arc<SurfaceMaterial>>,
    element: Option<SurfaceElement>,
}

impl Surface {
    /// Create a surface with the given placement and bounds.
    #[must_use]
    pub fn new(transform: Transform3, bounds: SurfaceBounds) -> Self {
        Self {
            transform,
            bounds,
            material: None,
            element: None,
        }
    }

    /// Disc surface.
    #[must_use]
    pub fn disc(transform: Transform3, bounds: RadialBounds) -> Self {
        Self::new(transform, SurfaceBounds::Disc(bounds))
    }

    /// Cylinder surface.
    #[must_use]
    pub fn cylinder(transform: Transform3, bounds: CylinderBounds) -> Self {
        Self::new(transform, SurfaceBounds::Cylinder(bounds))
    }

    /// Planar surface.
    #[must_use]
    pub fn plane(transform: Transform3, bounds: PlanarBounds) -> Self {
        Self::new(transform, SurfaceBounds::Plane(bounds))
    }

    /// Attach material.
    #[must_use]
    pub fn with_material(mut self, material: Option<Arc<SurfaceMaterial>>) -> Self {
        self.material = material;
        self
    }

    /// Link the surface to a detector element.
    #[must_use]
    pub fn with_element(mut self, element: SurfaceElement) -> Self {
        self.element = Some(element);
        self
    }

    /// Replace the attached material.
    pub fn set_material(&mut self, material: Option<Arc<SurfaceMaterial>>) {
        self.material = material;
    }

    /// Placement.
    #[must_use]
    pub fn transform(&self) -> &Transform3 {
        &self.transform
    }

    /// Bounds.
    #[must_use]
    pub fn bounds(&self) -> &SurfaceBounds {
        &self.bounds
    }

    /// Attached material.
    #[must_use]
    pub fn material(&self) -> Option<&Arc<SurfaceMaterial>> {
        self.material.as_ref()
    }

    /// Detector element link.
    #[must_use]
    pub fn element(&self) -> Option<&SurfaceElement> {
        self.element.as_ref()
    }

    /// A surface is sensitive when it measures a detector element.
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.element.is_some()
    }

    /// Thickness of the linked element, zero for pure boundary surfaces.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.element.as_ref().map_or(0.0, |e| e.thickness)
    }

    /// Origin of the local frame in global coordinates.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::from(self.transform.translation.vector)
    }

    /// Local z axis in global coordinates.
    #[must_use]
    pub fn normal(&self) -> Vector3<f64> {
        local_z_axis(&self.transform)
    }

    /// Global position of a local point.
    #[must_use]
    pub fn local_to_global(&self, local: &Point3<f64>) -> Point3<f64> {
        self.transform.transform_point(local)
    }
}
