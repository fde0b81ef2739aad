//! Approach descriptors.
//!
//! A layer is entered and left through boundary surfaces. The descriptor owns
//! exactly three of them, one per [`LayerMaterialPosition`], in the order they
//! were handed over. That order is kept because consumers iterate it.

use crate::error::TrackingError;
use crate::surface::Surface;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where on a layer its support material sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LayerMaterialPosition {
    /// Inner boundary (smaller radius or smaller z).
    #[default]
    Inner,
    /// The layer's own central surface.
    Central,
    /// Outer boundary (larger radius or larger z).
    Outer,
}

impl LayerMaterialPosition {
    /// Numeric code: inner = 0, central = 1, outer = 2.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Inner => 0,
            Self::Central => 1,
            Self::Outer => 2,
        }
    }
}

impl std::fmt::Display for LayerMaterialPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inner => write!(f, "inner"),
            Self::Central => write!(f, "central"),
            Self::Outer => write!(f, "outer"),
        }
    }
}

/// The three boundary surfaces of a layer.
///
/// # Example
///
/// ```
/// use tracking_types::{
///     ApproachDescriptor, CylinderBounds, LayerMaterialPosition, Surface, Transform3,
/// };
///
/// let cyl = |r| Surface::cylinder(Transform3::identity(), CylinderBounds::new(r, 100.0));
/// let descriptor = ApproachDescriptor::new([
///     (LayerMaterialPosition::Inner, cyl(10.0)),
///     (LayerMaterialPosition::Central, cyl(15.0)),
///     (LayerMaterialPosition::Outer, cyl(20.0)),
/// ])
/// .unwrap();
///
/// assert_eq!(descriptor.surfaces().len(), 3);
/// assert!(descriptor.material_surface().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApproachDescriptor {
    positions: [LayerMaterialPosition; 3],
    surfaces: [Surface; 3],
}

impl ApproachDescriptor {
    /// Take ownership of three tagged surfaces, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::DuplicateApproachPosition`] unless every
    /// position appears exactly once.
    pub fn new(entries: [(LayerMaterialPosition, Surface); 3]) -> crate::Result<Self> {
        let [(p0, s0), (p1, s1), (p2, s2)] = entries;
        if p0 == p1 || p0 == p2 {
            return Err(TrackingError::DuplicateApproachPosition(p0));
        }
        if p1 == p2 {
            return Err(TrackingError::DuplicateApproachPosition(p1));
        }
        Ok(Self {
            positions: [p0, p1, p2],
            surfaces: [s0, s1, s2],
        })
    }

    /// Surfaces in insertion order.
    #[must_use]
    pub fn surfaces(&self) -> &[Surface; 3] {
        &self.surfaces
    }

    /// Positions in insertion order.
    #[must_use]
    pub fn positions(&self) -> &[LayerMaterialPosition; 3] {
        &self.positions
    }

    /// Surface sitting at `position`.
    #[must_use]
    pub fn surface(&self, position: LayerMaterialPosition) -> &Surface {
        let slot = self
            .positions
            .iter()
            .position(|p| *p == position)
            .unwrap_or(0);
        &self.surfaces[slot]
    }

    /// Iterate `(position, surface)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerMaterialPosition, &Surface)> {
        self.positions.iter().copied().zip(self.surfaces.iter())
    }

    /// The first surface carrying material, with its position.
    #[must_use]
    pub fn material_surface(&self) -> Option<(LayerMaterialPosition, &Surface)> {
        self.iter().find(|(_, s)| s.material().is_some())
    }

    /// Give up the surfaces.
    #[must_use]
    pub fn into_surfaces(self) -> [Surface; 3] {
        self.surfaces
    }
}
