//! Proto-layer: the bounding envelope of a not-yet-built layer.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector2};

use crate::bounds::SurfaceBounds;
use crate::surface::Surface;

/// Tight extent of a set of surfaces plus clearance margins.
///
/// `env_r` and `env_z` are `(inner, outer)` margins added around the tight
/// bounds when the final layer is sized.
///
/// # Example
///
/// ```
/// use tracking_types::ProtoLayer;
///
/// let mut pl = ProtoLayer::new(100.0, 200.0, -500.0, 500.0);
/// pl.env_r = (1.0, 2.0);
/// assert_eq!(pl.radial_extent(), 100.0);
/// assert_eq!(pl.outer_r(), 202.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtoLayer {
    /// Smallest transverse radius.
    pub min_r: f64,
    /// Largest transverse radius.
    pub max_r: f64,
    /// Smallest z.
    pub min_z: f64,
    /// Largest z.
    pub max_z: f64,
    /// Smallest azimuth.
    pub min_phi: f64,
    /// Largest azimuth.
    pub max_phi: f64,
    /// Radial margins `(inner, outer)`.
    pub env_r: (f64, f64),
    /// Longitudinal margins `(inner, outer)`.
    pub env_z: (f64, f64),
}

impl ProtoLayer {
    /// A proto-layer with explicit bounds, full azimuth and no margins.
    ///
    /// Bounds are ordered automatically.
    #[must_use]
    pub fn new(min_r: f64, max_r: f64, min_z: f64, max_z: f64) -> Self {
        Self {
            min_r: min_r.min(max_r),
            max_r: min_r.max(max_r),
            min_z: min_z.min(max_z),
            max_z: min_z.max(max_z),
            min_phi: -PI,
            max_phi: PI,
            env_r: (0.0, 0.0),
            env_z: (0.0, 0.0),
        }
    }

    /// An inverted proto-layer that any extent will overwrite.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min_r: f64::INFINITY,
            max_r: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
            min_phi: f64::INFINITY,
            max_phi: f64::NEG_INFINITY,
            env_r: (0.0, 0.0),
            env_z: (0.0, 0.0),
        }
    }

    /// Tight bounds of a set of surfaces.
    ///
    /// Planar modules contribute the corners of both faces (the element
    /// thickness apart) with the minimum radius taken as the closest approach
    /// of each edge to the beam axis. Discs and cylinders contribute their
    /// radial bounds and centre position, widened by half their thickness.
    ///
    /// Returns [`ProtoLayer::empty`] for an empty slice.
    #[must_use]
    pub fn from_surfaces(surfaces: &[Surface]) -> Self {
        let mut pl = Self::empty();
        for surface in surfaces {
            pl.extend(surface);
        }
        pl
    }

    /// Whether no surface has been accounted for yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_r > self.max_r || self.min_z > self.max_z
    }

    /// `max_r - min_r`.
    #[must_use]
    pub fn radial_extent(&self) -> f64 {
        self.max_r - self.min_r
    }

    /// `max_z - min_z`.
    #[must_use]
    pub fn z_extent(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Mid radius of the tight bounds.
    #[must_use]
    pub fn center_r(&self) -> f64 {
        0.5 * (self.min_r + self.max_r)
    }

    /// Mid z of the tight bounds.
    #[must_use]
    pub fn center_z(&self) -> f64 {
        0.5 * (self.min_z + self.max_z)
    }

    /// Inner radius including the margin.
    #[must_use]
    pub fn inner_r(&self) -> f64 {
        self.min_r - self.env_r.0
    }

    /// Outer radius including the margin.
    #[must_use]
    pub fn outer_r(&self) -> f64 {
        self.max_r + self.env_r.1
    }

    /// Lower z including the margin.
    #[must_use]
    pub fn inner_z(&self) -> f64 {
        self.min_z - self.env_z.0
    }

    /// Upper z including the margin.
    #[must_use]
    pub fn outer_z(&self) -> f64 {
        self.max_z + self.env_z.1
    }

    fn extend(&mut self, surface: &Surface) {
        let half_t = 0.5 * surface.thickness();
        match surface.bounds() {
            SurfaceBounds::Plane(bounds) => {
                let vertices = bounds.vertices();
                // One pass without a linked element, both faces otherwise
                let sides: &[f64] = if surface.is_sensitive() {
                    &[-half_t, half_t]
                } else {
                    &[0.0]
                };
                for &loc_z in sides {
                    for (iv, vertex) in vertices.iter().enumerate() {
                        let previous = vertices[if iv == 0 { vertices.len() - 1 } else { iv - 1 }];
                        let p2 = surface.local_to_global(&Point3::new(vertex.x, vertex.y, loc_z));
                        let p1 =
                            surface.local_to_global(&Point3::new(previous.x, previous.y, loc_z));
                        self.max_z = self.max_z.max(p2.z);
                        self.min_z = self.min_z.min(p2.z);
                        self.max_r = self.max_r.max(p2.x.hypot(p2.y));
                        self.min_r = self.min_r.min(radial_distance(&p1, &p2));
                        let phi = p2.y.atan2(p2.x);
                        self.max_phi = self.max_phi.max(phi);
                        self.min_phi = self.min_phi.min(phi);
                    }
                }
            }
            SurfaceBounds::Cylinder(bounds) => {
                let z = surface.center().z;
                self.max_z = self.max_z.max(z + bounds.half_z + half_t);
                self.min_z = self.min_z.min(z - bounds.half_z - half_t);
                self.max_r = self.max_r.max(bounds.r + half_t);
                self.min_r = self.min_r.min(bounds.r - half_t);
                self.max_phi = PI;
                self.min_phi = -PI;
            }
            SurfaceBounds::Disc(bounds) => {
                let z = surface.center().z;
                self.max_z = self.max_z.max(z + half_t);
                self.min_z = self.min_z.min(z - half_t);
                self.max_r = self.max_r.max(bounds.r_max);
                self.min_r = self.min_r.min(bounds.r_min);
                self.max_phi = PI;
                self.min_phi = -PI;
            }
        }
    }
}

/// Closest transverse distance of the segment `p1 -> p2` to the beam axis.
fn radial_distance(p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    let a = Vector2::new(p1.x, p1.y);
    let d = Vector2::new(p2.x, p2.y) - a;
    let len2 = d.norm_squared();
    if len2 <= f64::EPSILON {
        return a.norm();
    }
    let t = (-a.dot(&d) / len2).clamp(0.0, 1.0);
    (a + d * t).norm()
}
