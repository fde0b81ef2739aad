//! Geometry kernel for tracking layers.
//!
//! This crate provides the value types the layer builder produces and
//! consumes:
//!
//! - [`Transform3`] - Rigid placement of surfaces and layers
//! - [`SurfaceBounds`] - Tagged disc / cylinder / planar bounds
//! - [`Surface`] - A bounded surface, optionally linked to a detector element
//! - [`ProtoLayer`] - Bounding envelope of a set of surfaces
//! - [`BinUtility`] - Multi-axis binning used for material grids and lookups
//! - [`Material`], [`MaterialProperties`], [`SurfaceMaterial`] - Material description
//! - [`ApproachDescriptor`] - The three boundary surfaces of a layer
//! - [`SurfaceArray`] - Lookup structure over a layer's sensitive surfaces
//! - [`Layer`] - The final cylinder or disc tracking layer
//!
//! # Units
//!
//! Lengths are in millimeters. The [`units`] module carries the conversion
//! constants for inputs given in other units.
//!
//! # Coordinate System
//!
//! Right-handed, with the beam along Z:
//! - R: transverse distance from the beam axis
//! - Phi: azimuth in `[-π, π)`
//! - Z: longitudinal position
//!
//! # Example
//!
//! ```
//! use tracking_types::{CylinderBounds, Layer, LayerType, Transform3};
//!
//! let layer = Layer::cylinder(
//!     Transform3::identity(),
//!     CylinderBounds::new(150.0, 500.0),
//!     None,
//!     2.0,
//!     None,
//!     LayerType::Passive,
//! );
//!
//! assert!(layer.is_cylinder());
//! assert!(layer.material().is_none());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_const_for_fn,  // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,    // Error docs added where non-obvious
    clippy::suboptimal_flops,      // mul_add style changes aren't always clearer
)]

mod approach;
mod binning;
mod bounds;
mod error;
mod layer;
mod material;
mod proto_layer;
mod surface;
mod surface_array;
mod transform;
pub mod units;

pub use approach::{ApproachDescriptor, LayerMaterialPosition};
pub use binning::{BinData, BinUtility, BinningOption, BinningType, BinningValue};
pub use bounds::{
    CylinderBounds, PlanarBounds, RadialBounds, RectangleBounds, SurfaceBounds, TrapezoidBounds,
};
pub use error::TrackingError;
pub use layer::{Layer, LayerType};
pub use material::{
    HomogeneousSurfaceMaterial, Material, MaterialProperties, SurfaceMaterial,
    SurfaceMaterialProxy,
};
pub use proto_layer::ProtoLayer;
pub use surface::{DigitizationModule, Surface, SurfaceElement};
pub use surface_array::{SurfaceArray, SurfaceGrid};
pub use transform::{Transform3, local_z_axis, transform_from_parts};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

/// Result type for geometry kernel operations.
pub type Result<T> = std::result::Result<T, TrackingError>;
