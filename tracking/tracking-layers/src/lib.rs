//! Tracking layers from a detector-description tree.
//!
//! Walks the layer elements handed over for the two endcaps and the barrel
//! and turns each into a [`Layer`]:
//!
//! 1. Collect the sensitive modules below the element ([`collect_sensitive`])
//! 2. Size the layer from the modules and the element's shape or declared
//!    envelope ([`build_proto_layer`])
//! 3. Optionally add approach surfaces carrying a material-mapping proxy
//!    ([`build_approach`])
//! 4. Assemble the layer, directly for a sensitive element or through the
//!    configured [`LayerCreator`] for an aggregate one
//! 5. Attach the element's bulk material ([`annotate_layer`])
//!
//! # Units
//!
//! The description is in centimeters (densities in g/cm³). Produced layers
//! are in the internal unit, millimeters. Envelope margins on an
//! [`Extension`] are taken as internal units.
//!
//! # Logging
//!
//! Progress is reported through `tracing` at debug and trace level; an
//! enclosing layer shape that does not contain its modules is reported as a
//! warning. No subscriber is installed.
//!
//! # Example
//!
//! ```
//! use tracking_layers::{
//!     DetectorElement, Extension, LayerBuilder, LayerBuilderConfig, LayerProvider,
//!     NativeTransform, Shape,
//! };
//!
//! let disc = DetectorElement::new("PixelEndcapP0", 7)
//!     .with_transform(NativeTransform::from_translation(0.0, 0.0, 60.0))
//!     .with_shape(Shape::tube(3.0, 15.0, 0.5))
//!     .with_extension(Extension::new());
//!
//! let builder = LayerBuilder::new(
//!     LayerBuilderConfig::new("PixelEndcap").with_positive_layers(vec![disc]),
//! );
//! let layers = builder.positive_layers().unwrap();
//!
//! let bounds = layers[0].radial_bounds().unwrap();
//! assert_eq!((bounds.r_min, bounds.r_max), (30.0, 150.0));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_const_for_fn,  // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,    // Error docs added where non-obvious
    clippy::module_name_repetitions, // LayerBuilder, LayerBuilderConfig read better in full
)]

mod annotate;
mod assemble;
mod builder;
mod config;
mod convert;
mod creator;
mod description;
mod envelope;
mod error;
mod region;
mod sensitive;
mod support;

pub use annotate::{annotate_layer, bulk_material};
pub use assemble::{Assembly, LayerParts, assemble_layer};
pub use builder::{LayerBuilder, LayerProvider};
pub use config::LayerBuilderConfig;
pub use convert::{convert_transform, to_internal_length};
pub use creator::{DefaultLayerCreator, LayerCreator};
pub use description::{
    DEFAULT_AXES, DetectorElement, Envelope, Extension, NativeTransform, Shape, SupportMaterial,
    Volume, VolumeMaterial,
};
pub use envelope::{ShapeExtent, build_proto_layer};
pub use error::{LayerBuildError, Result};
pub use region::Region;
pub use sensitive::{collect_sensitive, create_sensitive_surface};
pub use support::{build_approach, material_grid};

// Re-export the kernel so callers need a single dependency.
pub use tracking_types;
pub use tracking_types::Layer;
