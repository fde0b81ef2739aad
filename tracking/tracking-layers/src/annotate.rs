//! Bulk material of layers.

use std::sync::Arc;

use tracing::trace;
use tracking_types::units::{CM, CM3};
use tracking_types::{Layer, Material, MaterialProperties, ProtoLayer, SurfaceMaterial};

use crate::description::VolumeMaterial;

/// Homogeneous material of a layer volume, or `None` for vacuum.
///
/// Lengths are converted from centimeters and the density from g/cm³. The
/// slab thickness is the radial extent of the proto-layer.
#[must_use]
pub fn bulk_material(
    material: &VolumeMaterial,
    proto: &ProtoLayer,
) -> Option<Arc<SurfaceMaterial>> {
    if material.is_vacuum() {
        return None;
    }
    let converted = Material::new(
        material.rad_length * CM,
        material.int_length * CM,
        material.a,
        material.z,
        material.density / CM3,
    );
    let slab = MaterialProperties::new(converted, (proto.max_r - proto.min_r).abs());
    Some(Arc::new(SurfaceMaterial::homogeneous(slab)))
}

/// Attach the bulk material of `material` to the layer's surface
/// representation. Vacuum leaves the layer without material.
pub fn annotate_layer(layer: &mut Layer, material: &VolumeMaterial, proto: &ProtoLayer) {
    let bulk = bulk_material(material, proto);
    trace!(
        material = %material.name,
        attached = bulk.is_some(),
        "layer bulk material"
    );
    layer.set_material(bulk);
}
