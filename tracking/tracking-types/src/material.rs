//! Material description.
//!
//! [`Material`] holds bulk properties, [`MaterialProperties`] adds a
//! thickness, and [`SurfaceMaterial`] is what a surface carries: either
//! homogeneous material or a proxy marking the surface for a later material
//! mapping pass.

use std::ops::MulAssign;

use crate::binning::BinUtility;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bulk material.
///
/// Lengths in millimeters, density in g/mm³.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    /// Radiation length X0.
    pub x0: f64,
    /// Nuclear interaction length L0.
    pub l0: f64,
    /// Atomic mass A.
    pub a: f64,
    /// Atomic number Z.
    pub z: f64,
    /// Density.
    pub rho: f64,
}

impl Material {
    /// Create a material from its bulk properties.
    #[must_use]
    pub const fn new(x0: f64, l0: f64, a: f64, z: f64, rho: f64) -> Self {
        Self { x0, l0, a, z, rho }
    }

    /// Empty space: infinite radiation and interaction lengths, no mass.
    #[must_use]
    pub const fn vacuum() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY, 0.0, 0.0, 0.0)
    }

    /// Whether this material carries no mass.
    #[must_use]
    pub fn is_vacuum(&self) -> bool {
        self.rho <= 0.0
    }

    /// `Z / A * rho`, the electron density factor used for energy loss.
    #[must_use]
    pub fn z_over_a_times_rho(&self) -> f64 {
        if self.a > 0.0 {
            self.z / self.a * self.rho
        } else {
            0.0
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::vacuum()
    }
}

/// A material slab of a given thickness.
///
/// # Example
///
/// ```
/// use tracking_types::{Material, MaterialProperties};
///
/// let slab = MaterialProperties::new(Material::new(1.0, 2.0, 3.0, 4.0, 5.0), 6.0);
/// assert_eq!(slab.thickness_in_x0(), 6.0);
/// assert_eq!(slab.thickness_in_l0(), 3.0);
///
/// let mut half = slab;
/// half *= 0.5;
/// assert_eq!(half.thickness(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaterialProperties {
    material: Material,
    thickness: f64,
    d_in_x0: f64,
    d_in_l0: f64,
}

impl MaterialProperties {
    /// A slab of `material` with the given thickness.
    #[must_use]
    pub fn new(material: Material, thickness: f64) -> Self {
        Self {
            material,
            thickness,
            d_in_x0: fraction(thickness, material.x0),
            d_in_l0: fraction(thickness, material.l0),
        }
    }

    /// A slab built directly from bulk values and a thickness.
    #[must_use]
    pub fn from_values(x0: f64, l0: f64, a: f64, z: f64, rho: f64, thickness: f64) -> Self {
        Self::new(Material::new(x0, l0, a, z, rho), thickness)
    }

    /// Average a stack of slabs into one.
    ///
    /// Thickness in X0 and L0 add up, density is averaged by thickness and
    /// A, Z by `rho * thickness`. With `unit_thickness` the result is
    /// rescaled to thickness 1 while keeping `rho * thickness` and the X0/L0
    /// fractions of the stack.
    #[must_use]
    pub fn compound(layers: &[Self], unit_thickness: bool) -> Self {
        let mut thickness = 0.0;
        let mut d_in_x0 = 0.0;
        let mut d_in_l0 = 0.0;
        let mut rho_t = 0.0;
        let mut a_w = 0.0;
        let mut z_w = 0.0;
        for layer in layers {
            let t = layer.thickness;
            let rho = layer.material.rho;
            thickness += t;
            d_in_x0 += layer.d_in_x0;
            d_in_l0 += layer.d_in_l0;
            rho_t += rho * t;
            a_w += layer.material.a * rho * t;
            z_w += layer.material.z * rho * t;
        }

        if thickness <= 0.0 || rho_t <= 0.0 {
            return Self::new(Material::vacuum(), thickness);
        }

        let (a, z) = (a_w / rho_t, z_w / rho_t);
        let (rho, reference) = if unit_thickness {
            (rho_t, 1.0)
        } else {
            (rho_t / thickness, thickness)
        };
        let material = Material::new(
            length_from_fraction(reference, d_in_x0),
            length_from_fraction(reference, d_in_l0),
            a,
            z,
            rho,
        );
        Self {
            material,
            thickness: reference,
            d_in_x0,
            d_in_l0,
        }
    }

    /// Underlying bulk material.
    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Slab thickness.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Thickness in units of radiation length.
    #[must_use]
    pub fn thickness_in_x0(&self) -> f64 {
        self.d_in_x0
    }

    /// Thickness in units of interaction length.
    #[must_use]
    pub fn thickness_in_l0(&self) -> f64 {
        self.d_in_l0
    }

    /// Radiation length.
    #[must_use]
    pub fn average_x0(&self) -> f64 {
        self.material.x0
    }

    /// Interaction length.
    #[must_use]
    pub fn average_l0(&self) -> f64 {
        self.material.l0
    }

    /// Atomic mass.
    #[must_use]
    pub fn average_a(&self) -> f64 {
        self.material.a
    }

    /// Atomic number.
    #[must_use]
    pub fn average_z(&self) -> f64 {
        self.material.z
    }

    /// Density.
    #[must_use]
    pub fn average_rho(&self) -> f64 {
        self.material.rho
    }

    /// `Z / A * rho` of the underlying material.
    #[must_use]
    pub fn z_over_a_times_rho(&self) -> f64 {
        self.material.z_over_a_times_rho()
    }
}

impl MulAssign<f64> for MaterialProperties {
    /// Scale the thickness, keeping the bulk material.
    fn mul_assign(&mut self, scale: f64) {
        self.thickness *= scale;
        self.d_in_x0 *= scale;
        self.d_in_l0 *= scale;
    }
}

fn fraction(thickness: f64, length: f64) -> f64 {
    if length.is_finite() && length > 0.0 {
        thickness / length
    } else {
        0.0
    }
}

fn length_from_fraction(thickness: f64, fraction: f64) -> f64 {
    if fraction > 0.0 {
        thickness / fraction
    } else {
        f64::INFINITY
    }
}

/// Material spread evenly over a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomogeneousSurfaceMaterial {
    properties: MaterialProperties,
}

impl HomogeneousSurfaceMaterial {
    /// Wrap a material slab.
    #[must_use]
    pub fn new(properties: MaterialProperties) -> Self {
        Self { properties }
    }

    /// The slab, identical everywhere on the surface.
    #[must_use]
    pub fn properties(&self) -> &MaterialProperties {
        &self.properties
    }
}

/// Marks a surface for material mapping.
///
/// Carries only the binning the mapping pass should fill; no material values.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterialProxy {
    bin_utility: BinUtility,
}

impl SurfaceMaterialProxy {
    /// Create a proxy over a binning.
    #[must_use]
    pub fn new(bin_utility: BinUtility) -> Self {
        Self { bin_utility }
    }

    /// Binning to be filled by material mapping.
    #[must_use]
    pub fn bin_utility(&self) -> &BinUtility {
        &self.bin_utility
    }
}

/// Material attached to a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceMaterial {
    /// Homogeneous material.
    Homogeneous(HomogeneousSurfaceMaterial),
    /// Placeholder for material mapping.
    Proxy(SurfaceMaterialProxy),
}

impl SurfaceMaterial {
    /// Homogeneous material from a slab.
    #[must_use]
    pub fn homogeneous(properties: MaterialProperties) -> Self {
        Self::Homogeneous(HomogeneousSurfaceMaterial::new(properties))
    }

    /// Proxy over a binning.
    #[must_use]
    pub fn proxy(bin_utility: BinUtility) -> Self {
        Self::Proxy(SurfaceMaterialProxy::new(bin_utility))
    }

    /// Whether this is a mapping placeholder.
    #[must_use]
    pub fn is_proxy(&self) -> bool {
        matches!(self, Self::Proxy(_))
    }

    /// Material slab, if this carries actual material.
    #[must_use]
    pub fn properties(&self) -> Option<&MaterialProperties> {
        match self {
            Self::Homogeneous(m) => Some(m.properties()),
            Self::Proxy(_) => None,
        }
    }
}
