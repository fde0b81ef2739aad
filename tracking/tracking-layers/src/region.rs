//! Detector regions.

use tracking_types::LayerMaterialPosition;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The three regions a layer builder serves.
///
/// Endcaps (negative and positive) hold disc layers, the barrel holds
/// cylinder layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Region {
    /// Endcap at negative z.
    Negative,
    /// Barrel.
    Central,
    /// Endcap at positive z.
    Positive,
}

impl Region {
    /// All regions in build order.
    pub const ALL: [Self; 3] = [Self::Negative, Self::Central, Self::Positive];

    /// Whether layers in this region are discs.
    #[must_use]
    pub const fn is_disc(self) -> bool {
        !matches!(self, Self::Central)
    }

    /// Order in which the three approach surfaces are handed to the
    /// descriptor.
    #[must_use]
    pub const fn approach_order(self) -> [LayerMaterialPosition; 3] {
        use LayerMaterialPosition::{Central, Inner, Outer};
        match self {
            Self::Negative => [Inner, Outer, Central],
            Self::Central | Self::Positive => [Inner, Central, Outer],
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "negative"),
            Self::Central => write!(f, "central"),
            Self::Positive => write!(f, "positive"),
        }
    }
}
