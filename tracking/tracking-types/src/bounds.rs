//! Surface bounds.
//!
//! Bounds are expressed in the local frame of the surface they belong to.
//! [`SurfaceBounds`] tags the concrete shape so that disc, cylinder and planar
//! surfaces share one [`Surface`](crate::Surface) type.

use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Annulus bounds of a disc, in the local xy plane.
///
/// # Example
///
/// ```
/// use tracking_types::RadialBounds;
///
/// // Radii are ordered automatically
/// let bounds = RadialBounds::new(200.0, 100.0);
/// assert_eq!(bounds.r_min, 100.0);
/// assert_eq!(bounds.r_max, 200.0);
/// assert!(bounds.contains_r(150.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadialBounds {
    /// Inner radius.
    pub r_min: f64,
    /// Outer radius.
    pub r_max: f64,
}

impl RadialBounds {
    /// Create disc bounds from two radii, ordering them if needed.
    #[must_use]
    pub fn new(r_min: f64, r_max: f64) -> Self {
        Self {
            r_min: r_min.min(r_max),
            r_max: r_min.max(r_max),
        }
    }

    /// Radial width of the annulus.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.r_max - self.r_min
    }

    /// Check whether a radius lies within the annulus (edges included).
    #[inline]
    #[must_use]
    pub fn contains_r(&self, r: f64) -> bool {
        r >= self.r_min && r <= self.r_max
    }
}

/// Bounds of a cylinder centred on its local origin along local z.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CylinderBounds {
    /// Radius.
    pub r: f64,
    /// Half length along the cylinder axis.
    pub half_z: f64,
}

impl CylinderBounds {
    /// Create cylinder bounds. Negative values are taken by magnitude.
    #[must_use]
    pub fn new(r: f64, half_z: f64) -> Self {
        Self {
            r: r.abs(),
            half_z: half_z.abs(),
        }
    }
}

/// Rectangle centred on the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RectangleBounds {
    /// Half length along local x.
    pub half_x: f64,
    /// Half length along local y.
    pub half_y: f64,
}

impl RectangleBounds {
    /// Create rectangle bounds from half lengths.
    #[must_use]
    pub fn new(half_x: f64, half_y: f64) -> Self {
        Self {
            half_x: half_x.abs(),
            half_y: half_y.abs(),
        }
    }
}

/// Symmetric trapezoid, short side at `-half_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrapezoidBounds {
    /// Half length along local x at `-half_y`.
    pub min_half_x: f64,
    /// Half length along local x at `+half_y`.
    pub max_half_x: f64,
    /// Half length along local y.
    pub half_y: f64,
}

impl TrapezoidBounds {
    /// Create trapezoid bounds.
    #[must_use]
    pub fn new(min_half_x: f64, max_half_x: f64, half_y: f64) -> Self {
        Self {
            min_half_x: min_half_x.abs(),
            max_half_x: max_half_x.abs(),
            half_y: half_y.abs(),
        }
    }
}

/// Bounds of a planar surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlanarBounds {
    /// Rectangular module.
    Rectangle(RectangleBounds),
    /// Trapezoidal module.
    Trapezoid(TrapezoidBounds),
}

impl PlanarBounds {
    /// Corner points in the local frame, counter-clockwise.
    #[must_use]
    pub fn vertices(&self) -> Vec<Vector2<f64>> {
        match self {
            Self::Rectangle(b) => vec![
                Vector2::new(-b.half_x, -b.half_y),
                Vector2::new(b.half_x, -b.half_y),
                Vector2::new(b.half_x, b.half_y),
                Vector2::new(-b.half_x, b.half_y),
            ],
            Self::Trapezoid(b) => vec![
                Vector2::new(-b.min_half_x, -b.half_y),
                Vector2::new(b.min_half_x, -b.half_y),
                Vector2::new(b.max_half_x, b.half_y),
                Vector2::new(-b.max_half_x, b.half_y),
            ],
        }
    }
}

/// Shape-specific bounds of a [`Surface`](crate::Surface).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SurfaceBounds {
    /// Planar module.
    Plane(PlanarBounds),
    /// Disc perpendicular to its local z axis.
    Disc(RadialBounds),
    /// Cylinder around its local z axis.
    Cylinder(CylinderBounds),
}

impl SurfaceBounds {
    /// Short name of the bounds kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Plane(_) => "plane",
            Self::Disc(_) => "disc",
            Self::Cylinder(_) => "cylinder",
        }
    }
}
