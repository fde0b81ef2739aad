//! Layer creation from collected surfaces.
//!
//! The builder hands a layer's sensitive surfaces, its proto-layer and its
//! approach descriptor to a [`LayerCreator`], which decides the final layer
//! dimensions and arranges the surfaces for lookup.

use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};
use tracing::debug;
use tracking_types::{
    ApproachDescriptor, BinData, BinUtility, BinningOption, BinningType, BinningValue,
    CylinderBounds, Layer, LayerType, ProtoLayer, RadialBounds, Surface, SurfaceArray, Transform3,
    transform_from_parts,
};

use crate::error::{LayerBuildError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Turns surfaces plus a proto-layer into a layer.
///
/// Implementations are shared between builders and threads.
pub trait LayerCreator: std::fmt::Debug + Send + Sync {
    /// Build a barrel layer binned in azimuth and z.
    ///
    /// # Errors
    ///
    /// [`LayerBuildError::LayerCreation`] when the surfaces cannot be
    /// arranged.
    fn cylinder_layer(
        &self,
        surfaces: Vec<Surface>,
        b_type_phi: BinningType,
        b_type_z: BinningType,
        proto: &ProtoLayer,
        transform: Option<Transform3>,
        approach: Option<ApproachDescriptor>,
    ) -> Result<Layer>;

    /// Build an endcap layer binned in radius and azimuth.
    ///
    /// # Errors
    ///
    /// [`LayerBuildError::LayerCreation`] when the surfaces cannot be
    /// arranged.
    fn disc_layer(
        &self,
        surfaces: Vec<Surface>,
        b_type_r: BinningType,
        b_type_phi: BinningType,
        proto: &ProtoLayer,
        transform: Option<Transform3>,
        approach: Option<ApproachDescriptor>,
    ) -> Result<Layer>;
}

/// Sizes layers from the proto-layer including its margins and bins the
/// surfaces by their centres.
///
/// The number of bins along an axis is the number of distinct centre
/// positions along it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DefaultLayerCreator {
    /// Centres closer than this along r or z share a bin.
    pub position_tolerance: f64,
    /// Centres closer than this in azimuth (radians) share a bin.
    pub phi_tolerance: f64,
}

impl Default for DefaultLayerCreator {
    fn default() -> Self {
        Self {
            position_tolerance: 1e-3,
            phi_tolerance: 1e-3,
        }
    }
}

/// One axis of a surface grid.
struct AxisRequest {
    value: BinningValue,
    kind: BinningType,
    option: BinningOption,
    range: (f64, f64),
    tolerance: f64,
}

impl DefaultLayerCreator {
    /// Create a creator with default tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position tolerance.
    #[must_use]
    pub fn with_position_tolerance(mut self, tolerance: f64) -> Self {
        self.position_tolerance = tolerance;
        self
    }

    /// Set the azimuth tolerance.
    #[must_use]
    pub fn with_phi_tolerance(mut self, tolerance: f64) -> Self {
        self.phi_tolerance = tolerance;
        self
    }

    fn phi_axis(&self, kind: BinningType) -> AxisRequest {
        AxisRequest {
            value: BinningValue::Phi,
            kind,
            option: BinningOption::Closed,
            range: (-PI, PI),
            tolerance: self.phi_tolerance,
        }
    }

    fn open_axis(&self, value: BinningValue, kind: BinningType, min: f64, max: f64) -> AxisRequest {
        let range = if max - min > self.position_tolerance {
            (min, max)
        } else {
            (min - self.position_tolerance, max + self.position_tolerance)
        };
        AxisRequest {
            value,
            kind,
            option: BinningOption::Open,
            range,
            tolerance: self.position_tolerance,
        }
    }

    fn surface_array(
        surfaces: Vec<Surface>,
        axes: [AxisRequest; 2],
    ) -> Result<Option<SurfaceArray>> {
        if surfaces.is_empty() {
            return Ok(None);
        }
        let [first, second] = axes;
        let mut bins = BinUtility::new(bin_axis(&surfaces, &first)?);
        bins += BinUtility::new(bin_axis(&surfaces, &second)?);
        Ok(Some(SurfaceArray::binned(surfaces, bins)))
    }
}

impl LayerCreator for DefaultLayerCreator {
    fn cylinder_layer(
        &self,
        surfaces: Vec<Surface>,
        b_type_phi: BinningType,
        b_type_z: BinningType,
        proto: &ProtoLayer,
        transform: Option<Transform3>,
        approach: Option<ApproachDescriptor>,
    ) -> Result<Layer> {
        let radius = 0.5 * (proto.inner_r() + proto.outer_r());
        let half_z = 0.5 * (proto.outer_z() - proto.inner_z()).abs();
        let thickness = proto.radial_extent() + proto.env_r.0 + proto.env_r.1;
        let transform = transform.unwrap_or_else(|| {
            let z = 0.5 * (proto.inner_z() + proto.outer_z());
            transform_from_parts(Matrix3::identity(), Vector3::new(0.0, 0.0, z))
        });

        let layer_type = layer_type_for(&surfaces);
        let count = surfaces.len();
        let array = Self::surface_array(
            surfaces,
            [
                self.phi_axis(b_type_phi),
                self.open_axis(BinningValue::Z, b_type_z, proto.min_z, proto.max_z),
            ],
        )?;

        debug!(
            radius,
            half_z,
            thickness,
            surfaces = count,
            "created cylinder layer"
        );
        Ok(Layer::cylinder(
            transform,
            CylinderBounds::new(radius, half_z),
            array,
            thickness,
            approach,
            layer_type,
        ))
    }

    fn disc_layer(
        &self,
        surfaces: Vec<Surface>,
        b_type_r: BinningType,
        b_type_phi: BinningType,
        proto: &ProtoLayer,
        transform: Option<Transform3>,
        approach: Option<ApproachDescriptor>,
    ) -> Result<Layer> {
        let bounds = RadialBounds::new(proto.inner_r(), proto.outer_r());
        let thickness = proto.z_extent() + proto.env_z.0 + proto.env_z.1;
        let transform = transform.unwrap_or_else(|| {
            let z = 0.5 * (proto.inner_z() + proto.outer_z());
            transform_from_parts(Matrix3::identity(), Vector3::new(0.0, 0.0, z))
        });

        let layer_type = layer_type_for(&surfaces);
        let count = surfaces.len();
        let array = Self::surface_array(
            surfaces,
            [
                self.open_axis(BinningValue::R, b_type_r, proto.min_r, proto.max_r),
                self.phi_axis(b_type_phi),
            ],
        )?;

        debug!(
            r_min = bounds.r_min,
            r_max = bounds.r_max,
            thickness,
            surfaces = count,
            "created disc layer"
        );
        Ok(Layer::disc(transform, bounds, array, thickness, approach, layer_type))
    }
}

fn layer_type_for(surfaces: &[Surface]) -> LayerType {
    if surfaces.is_empty() {
        LayerType::Passive
    } else {
        LayerType::Active
    }
}

/// Sorted centre positions along an axis, merging those within `tolerance`.
fn distinct_positions(mut values: Vec<f64>, tolerance: f64) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    let mut distinct: Vec<f64> = Vec::with_capacity(values.len());
    for v in values {
        if distinct.last().is_none_or(|last| v - last > tolerance) {
            distinct.push(v);
        }
    }
    distinct
}

fn bin_axis(surfaces: &[Surface], request: &AxisRequest) -> Result<BinData> {
    let centres = surfaces
        .iter()
        .map(|s| request.value.value_of(&s.center()))
        .collect();
    let keys = distinct_positions(centres, request.tolerance);
    let (min, max) = request.range;

    let axis = match request.kind {
        BinningType::Equidistant => {
            BinData::equidistant(keys.len(), min, max, request.option, request.value)
        }
        BinningType::Arbitrary => {
            let mut boundaries = Vec::with_capacity(keys.len() + 1);
            boundaries.push(min);
            boundaries.extend(keys.windows(2).map(|w| 0.5 * (w[0] + w[1])));
            boundaries.push(max);
            BinData::arbitrary(boundaries, request.option, request.value)
        }
    };
    axis.map_err(|e| {
        LayerBuildError::layer_creation(format!("cannot bin surfaces in {}: {e}", request.value))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use tracking_types::{PlanarBounds, RectangleBounds};

    /// Stave of modules facing the beam at radius `r`, one per (phi, z).
    fn barrel_modules(r: f64, phis: &[f64], zs: &[f64]) -> Vec<Surface> {
        let mut out = Vec::new();
        for &phi in phis {
            for &z in zs {
                let (s, c) = phi.sin_cos();
                // local x tangential, local y along z, normal radial
                let rotation = Matrix3::new(-s, 0.0, c, c, 0.0, s, 0.0, 1.0, 0.0);
                out.push(Surface::plane(
                    transform_from_parts(rotation, Vector3::new(r * c, r * s, z)),
                    PlanarBounds::Rectangle(RectangleBounds::new(5.0, 20.0)),
                ));
            }
        }
        out
    }

    #[test]
    fn test_cylinder_dimensions() {
        let mut pl = ProtoLayer::new(100.0, 110.0, -300.0, 300.0);
        pl.env_r = (1.0, 2.0);
        pl.env_z = (3.0, 5.0);
        let layer = DefaultLayerCreator::new()
            .cylinder_layer(
                Vec::new(),
                BinningType::Equidistant,
                BinningType::Equidistant,
                &pl,
                None,
                None,
            )
            .unwrap();

        let bounds = layer.cylinder_bounds().unwrap();
        assert_relative_eq!(bounds.r, 0.5 * (99.0 + 112.0));
        assert_relative_eq!(bounds.half_z, 0.5 * (305.0 + 303.0));
        assert_relative_eq!(layer.thickness(), 13.0);
        assert_relative_eq!(layer.transform().translation.vector.z, 1.0);
        assert_eq!(layer.layer_type(), LayerType::Passive);
        assert!(layer.surface_array().is_none());
    }

    #[test]
    fn test_disc_dimensions() {
        let mut pl = ProtoLayer::new(50.0, 300.0, 1000.0, 1010.0);
        pl.env_r = (5.0, 5.0);
        pl.env_z = (2.0, 2.0);
        let given = transform_from_parts(Matrix3::identity(), Vector3::new(0.0, 0.0, 1004.0));
        let layer = DefaultLayerCreator::new()
            .disc_layer(
                Vec::new(),
                BinningType::Equidistant,
                BinningType::Equidistant,
                &pl,
                Some(given),
                None,
            )
            .unwrap();

        let bounds = layer.radial_bounds().unwrap();
        assert_relative_eq!(bounds.r_min, 45.0);
        assert_relative_eq!(bounds.r_max, 305.0);
        assert_relative_eq!(layer.thickness(), 14.0);
        assert_eq!(layer.transform(), &given);
    }

    #[test]
    fn test_equidistant_binning_counts_distinct_centres() {
        let phis: Vec<f64> = (0..8).map(|i| -PI + (f64::from(i) + 0.5) * PI / 4.0).collect();
        let zs = [-200.0, 0.0, 200.0];
        let surfaces = barrel_modules(100.0, &phis, &zs);
        let pl = ProtoLayer::from_surfaces(&surfaces);

        let layer = DefaultLayerCreator::new()
            .cylinder_layer(
                surfaces,
                BinningType::Equidistant,
                BinningType::Equidistant,
                &pl,
                None,
                None,
            )
            .unwrap();

        assert_eq!(layer.layer_type(), LayerType::Active);
        let array = layer.surface_array().unwrap();
        assert_eq!(array.len(), 24);
        match array {
            SurfaceArray::Binned(grid) => assert_eq!(grid.bins().bins_per_axis(), vec![8, 3]),
            SurfaceArray::Single(_) => panic!("expected a binned array"),
        }

        // A point at a module centre finds that module
        let (s, c) = phis[2].sin_cos();
        let hits = array.surfaces_at(&Point3::new(100.0 * c, 100.0 * s, 200.0));
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].center().z, 200.0);
    }

    #[test]
    fn test_arbitrary_binning_uses_midpoints() {
        let surfaces = barrel_modules(100.0, &[0.0], &[-100.0, 0.0, 250.0]);
        let pl = ProtoLayer::from_surfaces(&surfaces);
        let layer = DefaultLayerCreator::new()
            .cylinder_layer(
                surfaces,
                BinningType::Equidistant,
                BinningType::Arbitrary,
                &pl,
                None,
                None,
            )
            .unwrap();

        let SurfaceArray::Binned(grid) = layer.surface_array().unwrap() else {
            panic!("expected a binned array");
        };
        let z_axis = &grid.bins().data()[1];
        assert_eq!(z_axis.kind(), BinningType::Arbitrary);
        assert_eq!(z_axis.bins(), 3);
        let b = z_axis.boundaries();
        assert_relative_eq!(b[1], -50.0);
        assert_relative_eq!(b[2], 125.0);
        assert_relative_eq!(b[0], pl.min_z);
        assert_relative_eq!(b[3], pl.max_z);
    }

    #[test]
    fn test_distinct_positions() {
        let d = distinct_positions(vec![3.0, 1.0, 1.0005, 2.0, 3.0], 1e-3);
        assert_eq!(d, vec![1.0, 2.0, 3.0]);
        assert!(distinct_positions(Vec::new(), 1e-3).is_empty());
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let creator = DefaultLayerCreator::new().with_position_tolerance(0.5);
        let axis = creator.open_axis(BinningValue::Z, BinningType::Equidistant, 7.0, 7.0);
        assert_eq!(axis.range, (6.5, 7.5));
    }
}
