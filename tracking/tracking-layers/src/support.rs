//! Support material: approach surfaces carrying a material-mapping proxy.
//!
//! A layer that asks for support material gets three boundary surfaces.
//! Exactly one of them, the one named by the request, carries a
//! [`SurfaceMaterial::Proxy`] whose grid later receives mapped material.

use std::sync::Arc;

use tracing::debug;
use tracking_types::{
    ApproachDescriptor, BinData, BinUtility, BinningOption, BinningValue, CylinderBounds,
    LayerMaterialPosition, ProtoLayer, RadialBounds, Surface, SurfaceMaterial, Transform3,
    local_z_axis, transform_from_parts,
};

use crate::description::SupportMaterial;
use crate::error::Result;
use crate::region::Region;

/// Material grid of a layer: azimuth first, then radius (discs) or z
/// (cylinders) in the layer's local frame.
///
/// # Errors
///
/// Fails when a bin count is zero or the layer extent along the second axis
/// is degenerate.
pub fn material_grid(
    proto: &ProtoLayer,
    transform: &Transform3,
    region: Region,
    bins: (usize, usize),
) -> Result<BinUtility> {
    let (bins_phi, bins_second) = bins;
    let mut grid = BinUtility::new(BinData::phi(bins_phi)?);
    let second = if region.is_disc() {
        BinData::equidistant(
            bins_second,
            proto.min_r,
            proto.max_r,
            BinningOption::Open,
            BinningValue::R,
        )?
    } else {
        let half_z = 0.5 * proto.z_extent().abs();
        BinData::equidistant(
            bins_second,
            -half_z,
            half_z,
            BinningOption::Open,
            BinningValue::Z,
        )?
    };
    grid += BinUtility::new(second).with_transform(*transform);
    Ok(grid)
}

/// Build the approach descriptor of a layer with support material.
///
/// Discs get three discs over `[min_r, max_r]`: two one thickness apart
/// around the layer centre along its normal, the third at the centre.
/// Cylinders get three cylinders at `min_r`, the mid radius and `max_r`.
/// Surfaces are handed over in [`Region::approach_order`].
///
/// # Errors
///
/// Propagates grid construction failures.
pub fn build_approach(
    proto: &ProtoLayer,
    transform: &Transform3,
    region: Region,
    support: &SupportMaterial,
) -> Result<ApproachDescriptor> {
    let grid = material_grid(proto, transform, region, support.bins)?;
    let proxy = Arc::new(SurfaceMaterial::proxy(grid));

    let [mut inner, mut central, mut outer] = if region.is_disc() {
        disc_boundaries(proto, transform)
    } else {
        cylinder_boundaries(proto, transform)
    };
    let target = match support.position {
        LayerMaterialPosition::Inner => &mut inner,
        LayerMaterialPosition::Central => &mut central,
        LayerMaterialPosition::Outer => &mut outer,
    };
    target.set_material(Some(proxy));

    debug!(
        region = %region,
        position = %support.position,
        bins_phi = support.bins.0,
        bins_second = support.bins.1,
        "attached material proxy"
    );

    let surfaces = [inner, central, outer];
    let entries = region
        .approach_order()
        .map(|position| (position, surfaces[position.index()].clone()));
    Ok(ApproachDescriptor::new(entries)?)
}

/// Inner, central and outer discs of an endcap layer.
fn disc_boundaries(proto: &ProtoLayer, transform: &Transform3) -> [Surface; 3] {
    let thickness = (proto.min_z - proto.max_z).abs() + proto.env_z.0 + proto.env_z.1;
    let bounds = RadialBounds::new(proto.min_r, proto.max_r);
    let centre = transform.translation.vector;
    let axis = local_z_axis(transform);
    let rotation = *transform.rotation.matrix();

    let mut inner_pos = centre - axis * (0.5 * thickness);
    let mut outer_pos = centre + axis * (0.5 * thickness);
    if inner_pos.z > outer_pos.z {
        std::mem::swap(&mut inner_pos, &mut outer_pos);
    }

    [
        Surface::disc(transform_from_parts(rotation, inner_pos), bounds),
        Surface::disc(*transform, bounds),
        Surface::disc(transform_from_parts(rotation, outer_pos), bounds),
    ]
}

/// Inner, central and outer cylinders of a barrel layer.
fn cylinder_boundaries(proto: &ProtoLayer, transform: &Transform3) -> [Surface; 3] {
    let half_z = 0.5 * proto.z_extent().abs();
    [proto.min_r, proto.center_r(), proto.max_r]
        .map(|r| Surface::cylinder(*transform, CylinderBounds::new(r, half_z)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::LayerBuildError;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};
    use tracking_types::{SurfaceBounds, TrackingError};

    fn endcap_proto() -> ProtoLayer {
        let mut pl = ProtoLayer::new(50.0, 300.0, 1000.0, 1010.0);
        pl.env_z = (2.0, 3.0);
        pl
    }

    fn endcap_transform() -> Transform3 {
        transform_from_parts(Matrix3::identity(), Vector3::new(0.0, 0.0, 1005.0))
    }

    #[test]
    fn test_disc_grid() {
        let grid =
            material_grid(&endcap_proto(), &endcap_transform(), Region::Positive, (36, 5)).unwrap();
        assert_eq!(grid.bins_per_axis(), vec![36, 5]);
        let axes = grid.data();
        assert_eq!(axes[0].value(), BinningValue::Phi);
        assert_eq!(axes[0].option(), BinningOption::Closed);
        assert_eq!(axes[1].value(), BinningValue::R);
        assert_eq!(axes[1].option(), BinningOption::Open);
        assert_relative_eq!(axes[1].min(), 50.0);
        assert_relative_eq!(axes[1].max(), 300.0);
        assert!(grid.transform().is_some());
    }

    #[test]
    fn test_cylinder_grid() {
        let pl = ProtoLayer::new(100.0, 120.0, -400.0, 400.0);
        let grid = material_grid(&pl, &Transform3::identity(), Region::Central, (24, 8)).unwrap();
        let axes = grid.data();
        assert_eq!(axes[1].value(), BinningValue::Z);
        assert_relative_eq!(axes[1].min(), -400.0);
        assert_relative_eq!(axes[1].max(), 400.0);
        assert_eq!(grid.total_bins(), 24 * 8);
    }

    #[test]
    fn test_zero_bins_rejected() {
        let err = material_grid(&endcap_proto(), &endcap_transform(), Region::Positive, (0, 5))
            .unwrap_err();
        assert_eq!(err, LayerBuildError::from(TrackingError::ZeroBins));
    }

    #[test]
    fn test_endcap_discs() {
        let support = SupportMaterial {
            bins: (10, 2),
            position: LayerMaterialPosition::Outer,
        };
        let d = build_approach(&endcap_proto(), &endcap_transform(), Region::Positive, &support)
            .unwrap();

        // thickness = 10 + 2 + 3
        let inner = d.surface(LayerMaterialPosition::Inner);
        let central = d.surface(LayerMaterialPosition::Central);
        let outer = d.surface(LayerMaterialPosition::Outer);
        assert_relative_eq!(inner.center().z, 997.5);
        assert_relative_eq!(central.center().z, 1005.0);
        assert_relative_eq!(outer.center().z, 1012.5);
        for s in d.surfaces() {
            assert_eq!(s.bounds(), &SurfaceBounds::Disc(RadialBounds::new(50.0, 300.0)));
        }

        let (position, _) = d.material_surface().unwrap();
        assert_eq!(position, LayerMaterialPosition::Outer);
        let with_material = d.surfaces().iter().filter(|s| s.material().is_some()).count();
        assert_eq!(with_material, 1);
    }

    #[test]
    fn test_flipped_endcap_keeps_inner_below_outer() {
        let flip = Matrix3::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, -1.0);
        let transform = transform_from_parts(flip, Vector3::new(0.0, 0.0, -1005.0));
        let support = SupportMaterial {
            bins: (10, 2),
            position: LayerMaterialPosition::Inner,
        };
        let d = build_approach(&endcap_proto(), &transform, Region::Negative, &support).unwrap();

        let inner = d.surface(LayerMaterialPosition::Inner).center().z;
        let outer = d.surface(LayerMaterialPosition::Outer).center().z;
        assert!(inner < outer);
        assert_eq!(
            d.positions(),
            &[
                LayerMaterialPosition::Inner,
                LayerMaterialPosition::Outer,
                LayerMaterialPosition::Central
            ]
        );
    }

    #[test]
    fn test_barrel_cylinders() {
        let pl = ProtoLayer::new(100.0, 120.0, -400.0, 400.0);
        let support = SupportMaterial {
            bins: (24, 8),
            position: LayerMaterialPosition::Central,
        };
        let d = build_approach(&pl, &Transform3::identity(), Region::Central, &support).unwrap();

        let radii: Vec<f64> = d
            .surfaces()
            .iter()
            .map(|s| match s.bounds() {
                SurfaceBounds::Cylinder(b) => {
                    assert_relative_eq!(b.half_z, 400.0);
                    b.r
                }
                other => panic!("unexpected bounds {other:?}"),
            })
            .collect();
        assert_eq!(radii, vec![100.0, 110.0, 120.0]);

        let material = d.surface(LayerMaterialPosition::Central).material().unwrap();
        assert!(material.is_proxy());
        assert!(d.surface(LayerMaterialPosition::Outer).center().z.abs() < 1e-12);
    }
}
