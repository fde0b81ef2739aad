//! Detector-description tree.
//!
//! The input to layer building: a tree of placed detector elements, each with
//! a solid shape, a world transform, a volume (sensitivity + material) and an
//! optional per-layer [`Extension`]. Lengths are in centimeters, the unit of
//! the description; conversion to internal units happens while building.
//!
//! The tree is read-only for the builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracking_types::{DigitizationModule, LayerMaterialPosition, SurfaceMaterial};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis convention used when an element declares none.
pub const DEFAULT_AXES: &str = "XYZ";

/// World placement as stored by the description: a row-major 3x3 rotation
/// and a translation in centimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NativeTransform {
    /// Rotation matrix, row-major.
    pub rotation: [f64; 9],
    /// Translation in centimeters.
    pub translation: [f64; 3],
}

impl NativeTransform {
    /// Create a transform from its parts.
    #[must_use]
    pub const fn new(rotation: [f64; 9], translation: [f64; 3]) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// No rotation, no translation.
    #[must_use]
    pub const fn identity() -> Self {
        Self::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0], [0.0; 3])
    }

    /// Pure translation.
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self::new(Self::identity().rotation, [x, y, z])
    }
}

impl Default for NativeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Solid shape of a placed volume, lengths in centimeters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Shape {
    /// Tube segment around local z.
    TubeSegment {
        /// Inner radius.
        r_min: f64,
        /// Outer radius.
        r_max: f64,
        /// Half length along local z.
        half_z: f64,
        /// Start azimuth in radians.
        phi_min: f64,
        /// End azimuth in radians.
        phi_max: f64,
    },
    /// Box.
    Box {
        /// Half length along local x.
        half_x: f64,
        /// Half length along local y.
        half_y: f64,
        /// Half length along local z.
        half_z: f64,
    },
    /// Trapezoid in the local xy plane with constant thickness.
    Trapezoid {
        /// Half length along x at `-half_y`.
        half_x_min_y: f64,
        /// Half length along x at `+half_y`.
        half_x_max_y: f64,
        /// Half length along local y.
        half_y: f64,
        /// Half length along local z.
        half_z: f64,
    },
    /// Any solid the builder does not understand.
    Other {
        /// Name of the solid type.
        kind: String,
    },
}

impl Shape {
    /// Full tube.
    #[must_use]
    pub fn tube(r_min: f64, r_max: f64, half_z: f64) -> Self {
        Self::TubeSegment {
            r_min,
            r_max,
            half_z,
            phi_min: -std::f64::consts::PI,
            phi_max: std::f64::consts::PI,
        }
    }

    /// Short name of the solid type.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::TubeSegment { .. } => "tube segment",
            Self::Box { .. } => "box",
            Self::Trapezoid { .. } => "trapezoid",
            Self::Other { kind } => kind,
        }
    }
}

/// Bulk material of a volume, in description units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeMaterial {
    /// Material name.
    pub name: String,
    /// Radiation length in cm.
    pub rad_length: f64,
    /// Nuclear interaction length in cm.
    pub int_length: f64,
    /// Atomic mass.
    pub a: f64,
    /// Atomic number.
    pub z: f64,
    /// Density in g/cm³.
    pub density: f64,
}

impl VolumeMaterial {
    /// Create a named material.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        rad_length: f64,
        int_length: f64,
        a: f64,
        z: f64,
        density: f64,
    ) -> Self {
        Self {
            name: name.into(),
            rad_length,
            int_length,
            a,
            z,
            density,
        }
    }

    /// The description's vacuum.
    #[must_use]
    pub fn vacuum() -> Self {
        Self::new("Vacuum", f64::INFINITY, f64::INFINITY, 0.0, 0.0, 0.0)
    }

    /// Silicon.
    #[must_use]
    pub fn silicon() -> Self {
        Self::new("Silicon", 9.37, 46.52, 28.0855, 14.0, 2.329)
    }

    /// Whether the material is named vacuum, ignoring case.
    #[must_use]
    pub fn is_vacuum(&self) -> bool {
        self.name.eq_ignore_ascii_case("vacuum")
    }
}

impl Default for VolumeMaterial {
    fn default() -> Self {
        Self::vacuum()
    }
}

/// Explicit clearance around the modules of a layer, in internal units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Envelope {
    /// Radial margin, applied on both sides.
    pub r: f64,
    /// Longitudinal margin, applied on both sides.
    pub z: f64,
}

/// Request to mark a layer for material mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SupportMaterial {
    /// Bin counts: azimuthal first, then radial (discs) or longitudinal
    /// (cylinders).
    pub bins: (usize, usize),
    /// Approach surface that carries the mapping proxy.
    pub position: LayerMaterialPosition,
}

/// Per-element annotation read by the layer builder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Extension {
    /// Axis convention of the element's modules.
    pub axes: String,
    /// Explicit envelope; when absent the layer shape decides.
    pub envelope: Option<Envelope>,
    /// Support material request.
    pub support_material: Option<SupportMaterial>,
    /// Material of a sensitive module's surface.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub material: Option<Arc<SurfaceMaterial>>,
    /// Shared digitization module of a sensitive module.
    pub digitization: Option<Arc<DigitizationModule>>,
}

impl Default for Extension {
    fn default() -> Self {
        Self {
            axes: DEFAULT_AXES.to_string(),
            envelope: None,
            support_material: None,
            material: None,
            digitization: None,
        }
    }
}

impl Extension {
    /// Extension with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module axis convention.
    #[must_use]
    pub fn with_axes(mut self, axes: impl Into<String>) -> Self {
        self.axes = axes.into();
        self
    }

    /// Declare explicit envelope margins.
    #[must_use]
    pub fn with_envelope(mut self, r: f64, z: f64) -> Self {
        self.envelope = Some(Envelope { r, z });
        self
    }

    /// Request support material with the given binning and position.
    #[must_use]
    pub fn with_support_material(
        mut self,
        bins: (usize, usize),
        position: LayerMaterialPosition,
    ) -> Self {
        self.support_material = Some(SupportMaterial { bins, position });
        self
    }

    /// Set the module surface material.
    #[must_use]
    pub fn with_material(mut self, material: Arc<SurfaceMaterial>) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the shared digitization module.
    #[must_use]
    pub fn with_digitization(mut self, module: Arc<DigitizationModule>) -> Self {
        self.digitization = Some(module);
        self
    }
}

/// The placed volume behind an element.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Volume {
    /// Whether the volume is a measuring module.
    pub sensitive: bool,
    /// Bulk material.
    pub material: VolumeMaterial,
}

/// A node of the detector-description tree.
///
/// # Example
///
/// ```
/// use tracking_layers::{DetectorElement, Extension, NativeTransform, Shape};
///
/// let layer = DetectorElement::new("BarrelLayer0", 1)
///     .with_shape(Shape::tube(3.0, 4.0, 50.0))
///     .with_extension(Extension::new())
///     .with_child(
///         DetectorElement::new("module_0", 10)
///             .with_transform(NativeTransform::from_translation(3.5, 0.0, 0.0))
///             .with_shape(Shape::Box { half_x: 1.0, half_y: 0.02, half_z: 5.0 })
///             .sensitive(true),
///     );
///
/// assert_eq!(layer.children().count(), 1);
/// assert!(!layer.is_sensitive());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorElement {
    name: String,
    id: u64,
    world_transform: NativeTransform,
    shape: Option<Shape>,
    volume: Volume,
    extension: Option<Extension>,
    children: BTreeMap<String, DetectorElement>,
}

impl DetectorElement {
    /// Create an element at the origin with no shape, vacuum and no children.
    #[must_use]
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
            ..Self::default()
        }
    }

    /// Set the nominal world transform.
    #[must_use]
    pub fn with_transform(mut self, transform: NativeTransform) -> Self {
        self.world_transform = transform;
        self
    }

    /// Set the solid shape.
    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Mark the volume as sensitive or not.
    #[must_use]
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.volume.sensitive = sensitive;
        self
    }

    /// Set the bulk material.
    #[must_use]
    pub fn with_material(mut self, material: VolumeMaterial) -> Self {
        self.volume.material = material;
        self
    }

    /// Attach an extension.
    #[must_use]
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Add a child, keyed by its name. A child with the same name is replaced.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.add_child(child);
        self
    }

    /// Add a child in place, keyed by its name.
    pub fn add_child(&mut self, child: Self) {
        self.children.insert(child.name.clone(), child);
    }

    /// Element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric identifier.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Nominal world transform.
    #[must_use]
    pub fn world_transform(&self) -> &NativeTransform {
        &self.world_transform
    }

    /// Solid shape of the placement, if any.
    #[must_use]
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Placed volume.
    #[must_use]
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Whether the volume is a measuring module.
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.volume.sensitive
    }

    /// Bulk material of the volume.
    #[must_use]
    pub fn material(&self) -> &VolumeMaterial {
        &self.volume.material
    }

    /// Layer extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&Extension> {
        self.extension.as_ref()
    }

    /// Children in iteration order (sorted by name).
    pub fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.values()
    }

    /// Child by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.get(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_vacuum_is_case_insensitive() {
        for name in ["Vacuum", "VACUUM", "vacuum", "vAcUuM"] {
            let m = VolumeMaterial::new(name, 1.0, 1.0, 1.0, 1.0, 1.0);
            assert!(m.is_vacuum(), "{name} should be vacuum");
        }
        assert!(!VolumeMaterial::silicon().is_vacuum());
        assert!(!VolumeMaterial::new("VacuumChamberSteel", 1.0, 1.0, 1.0, 1.0, 1.0).is_vacuum());
    }

    #[test]
    fn test_children_sorted_by_name() {
        let e = DetectorElement::new("layer", 0)
            .with_child(DetectorElement::new("b", 2))
            .with_child(DetectorElement::new("a", 1))
            .with_child(DetectorElement::new("c", 3));
        let ids: Vec<u64> = e.children().map(DetectorElement::id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(e.child("b").map(DetectorElement::id), Some(2));
    }

    #[test]
    fn test_extension_defaults() {
        let ext = Extension::new();
        assert_eq!(ext.axes, DEFAULT_AXES);
        assert!(ext.envelope.is_none());
        assert!(ext.support_material.is_none());

        let ext = ext
            .with_envelope(1.0, 2.0)
            .with_support_material((20, 5), LayerMaterialPosition::Outer);
        assert_eq!(ext.envelope, Some(Envelope { r: 1.0, z: 2.0 }));
        assert_eq!(ext.support_material.map(|s| s.bins), Some((20, 5)));
    }

    #[test]
    fn test_shape_kind() {
        assert_eq!(Shape::tube(1.0, 2.0, 3.0).kind(), "tube segment");
        assert_eq!(
            Shape::Other {
                kind: "Cone".to_string()
            }
            .kind(),
            "Cone"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_description() {
        let json = r#"{
            "name": "BarrelLayer1",
            "id": 4,
            "shape": { "type": "tube_segment", "r_min": 10.0, "r_max": 20.0,
                       "half_z": 50.0, "phi_min": -3.14, "phi_max": 3.14 },
            "volume": { "sensitive": false,
                        "material": { "name": "Air", "rad_length": 30390.0,
                                      "int_length": 71130.0, "a": 14.6, "z": 7.3,
                                      "density": 0.0012 } },
            "extension": { "axes": "XZY",
                           "support_material": { "bins": [36, 10], "position": "outer" } }
        }"#;
        let element: DetectorElement = serde_json::from_str(json).unwrap();
        assert_eq!(element.name(), "BarrelLayer1");
        assert_eq!(element.world_transform(), &NativeTransform::identity());
        assert_eq!(element.material().name, "Air");
        let ext = element.extension().unwrap();
        assert_eq!(ext.axes, "XZY");
        assert_eq!(
            ext.support_material.map(|s| s.position),
            Some(LayerMaterialPosition::Outer)
        );

        let back = serde_json::to_string(&element).unwrap();
        let again: DetectorElement = serde_json::from_str(&back).unwrap();
        assert_eq!(again, element);
    }
}
