//! Property-based tests for layer building.
//!
//! Run with: cargo test -p tracking-layers -- proptest

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use proptest::prelude::*;
use tracking_layers::tracking_types::units::CM;
use tracking_layers::tracking_types::{LayerMaterialPosition, ProtoLayer, Transform3};
use tracking_layers::{
    DetectorElement, Extension, NativeTransform, Region, Shape, SupportMaterial, VolumeMaterial,
    build_approach, build_proto_layer, bulk_material, collect_sensitive, convert_transform,
};

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = LayerMaterialPosition> {
    prop_oneof![
        Just(LayerMaterialPosition::Inner),
        Just(LayerMaterialPosition::Central),
        Just(LayerMaterialPosition::Outer),
    ]
}

fn arb_region() -> impl Strategy<Value = Region> {
    prop_oneof![
        Just(Region::Negative),
        Just(Region::Central),
        Just(Region::Positive),
    ]
}

/// Spelling of "vacuum" with arbitrary letter case.
fn arb_vacuum_name() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), 6).prop_map(|upper| {
        "vacuum"
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

// =============================================================================
// Envelope
// =============================================================================

proptest! {
    /// A tube enclosing its modules is exactly the margin-inclusive extent.
    #[test]
    fn proptest_enclosing_tube_is_layer_extent(
        radius in 20.0..100.0f64,
        half_x in 0.5..2.0f64,
        half_y in 1.0..10.0f64,
        z in -20.0..20.0f64,
        inner_gap in 0.1..5.0f64,
        outer_gap in 0.1..5.0f64,
        z_gap in 0.1..5.0f64,
    ) {
        let module = DetectorElement::new("module", 1)
            .with_transform(NativeTransform::new(
                [0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                [radius, 0.0, z],
            ))
            .with_shape(Shape::Box { half_x, half_y, half_z: 0.015 })
            .sensitive(true);
        let r_min = radius - 0.015 - inner_gap;
        let r_max = (radius + 0.015).hypot(half_x) + outer_gap;
        let half_z = z.abs() + half_y + z_gap;
        let layer = DetectorElement::new("layer", 0)
            .with_shape(Shape::tube(r_min, r_max, half_z))
            .with_child(module);

        let surfaces = collect_sensitive(&layer, "XYZ", false).unwrap();
        let pl = build_proto_layer(
            &layer,
            &Extension::new(),
            Region::Central,
            &Transform3::identity(),
            &surfaces,
        )
        .unwrap();

        prop_assert!(pl.env_r.0 >= 0.0 && pl.env_r.1 >= 0.0);
        prop_assert!(pl.env_z.0 >= 0.0 && pl.env_z.1 >= 0.0);
        prop_assert!((pl.inner_r() - r_min * CM).abs() < 1e-6);
        prop_assert!((pl.outer_r() - r_max * CM).abs() < 1e-6);
        prop_assert!((pl.inner_z() + half_z * CM).abs() < 1e-6);
        prop_assert!((pl.outer_z() - half_z * CM).abs() < 1e-6);
    }

    /// Declared margins are used verbatim on both sides.
    #[test]
    fn proptest_declared_envelope(
        env_r in 0.0..10.0f64,
        env_z in 0.0..10.0f64,
        region in arb_region(),
    ) {
        let layer = DetectorElement::new("layer", 0).with_shape(Shape::tube(10.0, 12.0, 30.0));
        let ext = Extension::new().with_envelope(env_r, env_z);
        let pl = build_proto_layer(&layer, &ext, region, &Transform3::identity(), &[]).unwrap();
        prop_assert_eq!(pl.env_r, (env_r, env_r));
        prop_assert_eq!(pl.env_z, (env_z, env_z));
    }
}

// =============================================================================
// Support material
// =============================================================================

proptest! {
    /// Exactly one approach surface carries the proxy, and the surfaces come
    /// in the region's order.
    #[test]
    fn proptest_single_proxy(
        bins_phi in 1usize..64,
        bins_second in 1usize..32,
        position in arb_position(),
        region in arb_region(),
        min_r in 10.0..200.0f64,
        width_r in 1.0..100.0f64,
        z0 in -3000.0..3000.0f64,
        width_z in 1.0..50.0f64,
    ) {
        let pl = ProtoLayer::new(min_r, min_r + width_r, z0, z0 + width_z);
        let support = SupportMaterial { bins: (bins_phi, bins_second), position };
        let approach = build_approach(&pl, &Transform3::identity(), region, &support).unwrap();

        let carrying: Vec<_> = approach
            .iter()
            .filter(|(_, s)| s.material().is_some())
            .map(|(p, _)| p)
            .collect();
        prop_assert_eq!(carrying, vec![position]);
        prop_assert_eq!(approach.positions(), &region.approach_order());

        let proxy = approach.surface(position).material().unwrap();
        let SurfaceMaterialKind::Proxy(total) = classify(proxy) else {
            return Err(TestCaseError::fail("expected a proxy"));
        };
        prop_assert_eq!(total, bins_phi * bins_second);
    }
}

enum SurfaceMaterialKind {
    Proxy(usize),
    Homogeneous,
}

fn classify(material: &tracking_layers::tracking_types::SurfaceMaterial) -> SurfaceMaterialKind {
    use tracking_layers::tracking_types::SurfaceMaterial;
    match material {
        SurfaceMaterial::Proxy(proxy) => {
            SurfaceMaterialKind::Proxy(proxy.bin_utility().total_bins())
        }
        SurfaceMaterial::Homogeneous(_) => SurfaceMaterialKind::Homogeneous,
    }
}

// =============================================================================
// Conversion and material
// =============================================================================

proptest! {
    /// Rotations survive conversion entry by entry, translations are scaled.
    #[test]
    fn proptest_transform_conversion(
        angle in -3.1..3.1f64,
        translation in prop::array::uniform3(-500.0..500.0f64),
    ) {
        let (s, c) = angle.sin_cos();
        let native = NativeTransform::new([c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0], translation);
        let t = convert_transform(&native);

        let m = t.rotation.matrix();
        for row in 0..3 {
            for col in 0..3 {
                prop_assert_eq!(m[(row, col)], native.rotation[row * 3 + col]);
            }
        }
        for (i, v) in translation.iter().enumerate() {
            prop_assert_eq!(t.translation.vector[i], v * CM);
        }
    }

    /// Any spelling of vacuum yields no bulk material.
    #[test]
    fn proptest_vacuum_any_case(name in arb_vacuum_name()) {
        let material = VolumeMaterial::new(name, 1.0, 1.0, 1.0, 1.0, 1.0);
        let pl = ProtoLayer::new(100.0, 110.0, -10.0, 10.0);
        prop_assert!(bulk_material(&material, &pl).is_none());
    }

    /// Named materials yield a slab as thick as the radial extent.
    #[test]
    fn proptest_named_material(
        name in "[A-Za-z]{3,12}".prop_filter("not vacuum", |n| !n.eq_ignore_ascii_case("vacuum")),
        width in 0.1..50.0f64,
    ) {
        let material = VolumeMaterial::new(name, 9.37, 46.52, 28.09, 14.0, 2.33);
        let pl = ProtoLayer::new(100.0, 100.0 + width, -10.0, 10.0);
        let bulk = bulk_material(&material, &pl).unwrap();
        let SurfaceMaterialKind::Homogeneous = classify(&bulk) else {
            return Err(TestCaseError::fail("expected homogeneous material"));
        };
        let thickness = bulk.properties().unwrap().thickness();
        prop_assert!((thickness - width).abs() < 1e-9);
    }
}
