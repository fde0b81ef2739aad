//! Sensitive module collection and surface construction.

use nalgebra::{Matrix3, Vector3};
use tracing::trace;
use tracking_types::units::CM;
use tracking_types::{
    CylinderBounds, PlanarBounds, RadialBounds, RectangleBounds, Surface, SurfaceElement,
    TrapezoidBounds, transform_from_parts,
};

use crate::convert::{convert_transform, to_internal_length};
use crate::description::{DEFAULT_AXES, DetectorElement, Shape};
use crate::error::{LayerBuildError, Result};

/// One local axis of a module: which native axis it follows and in which
/// direction.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisMap {
    native: usize,
    sign: f64,
}

/// Read an axis convention such as `"XYZ"` or `"XzY"`.
///
/// Each letter names the native axis the local x, y and z follow; lowercase
/// flips the direction. Every native axis must appear exactly once.
fn parse_axes(axes: &str) -> Option<[AxisMap; 3]> {
    let mut maps = [AxisMap {
        native: 0,
        sign: 1.0,
    }; 3];
    let mut seen = [false; 3];
    let mut count = 0;
    for (slot, c) in axes.chars().enumerate() {
        if slot >= 3 {
            return None;
        }
        let native = match c.to_ascii_uppercase() {
            'X' => 0,
            'Y' => 1,
            'Z' => 2,
            _ => return None,
        };
        if seen[native] {
            return None;
        }
        seen[native] = true;
        let sign = if c.is_ascii_lowercase() { -1.0 } else { 1.0 };
        maps[slot] = AxisMap { native, sign };
        count += 1;
    }
    (count == 3).then_some(maps)
}

/// Collect the sensitive surfaces below `element`, depth first.
///
/// A sensitive child is turned into a surface before its own children are
/// visited. Children are never read as discs; their `axes` come from the
/// enclosing layer.
pub fn collect_sensitive(
    element: &DetectorElement,
    axes: &str,
    build_digitization_modules: bool,
) -> Result<Vec<Surface>> {
    let mut surfaces = Vec::new();
    collect_into(element, axes, build_digitization_modules, &mut surfaces)?;
    trace!(
        element = element.name(),
        count = surfaces.len(),
        "collected sensitive surfaces"
    );
    Ok(surfaces)
}

fn collect_into(
    element: &DetectorElement,
    axes: &str,
    build_digitization_modules: bool,
    surfaces: &mut Vec<Surface>,
) -> Result<()> {
    for child in element.children() {
        if child.is_sensitive() {
            surfaces.push(create_sensitive_surface(
                child,
                false,
                axes,
                build_digitization_modules,
            )?);
        }
        collect_into(child, axes, build_digitization_modules, surfaces)?;
    }
    Ok(())
}

/// Build the measuring surface of a sensitive element.
///
/// - a tube segment read as a disc becomes a disc surface
/// - any other tube segment becomes a cylinder at its mid radius
/// - boxes and trapezoids become planes oriented by `axes`
///
/// The surface keeps a link to `element`. Material and digitization module
/// come from the element's extension when it has one.
///
/// # Errors
///
/// [`LayerBuildError::StructuralGeometry`] for a missing or unsupported
/// shape, [`LayerBuildError::InvalidAxes`] for an unreadable axis convention
/// on a planar module.
pub fn create_sensitive_surface(
    element: &DetectorElement,
    is_disc: bool,
    axes: &str,
    build_digitization_modules: bool,
) -> Result<Surface> {
    let name = element.name();
    let shape = element
        .shape()
        .ok_or_else(|| LayerBuildError::structural(name, "sensitive element has no shape"))?;
    let transform = convert_transform(element.world_transform());

    let (surface, thickness) = match (is_disc, shape) {
        (
            true,
            Shape::TubeSegment {
                r_min,
                r_max,
                half_z,
                ..
            },
        ) => {
            let bounds = RadialBounds::new(to_internal_length(*r_min), to_internal_length(*r_max));
            (Surface::disc(transform, bounds), to_internal_length(2.0 * half_z))
        }
        (true, other) => {
            return Err(LayerBuildError::structural(
                name,
                format!("disc module needs a tube segment, found {}", other.kind()),
            ));
        }
        (
            false,
            Shape::TubeSegment {
                r_min,
                r_max,
                half_z,
                ..
            },
        ) => {
            let bounds = CylinderBounds::new(
                to_internal_length(0.5 * (r_min + r_max)),
                to_internal_length(*half_z),
            );
            (
                Surface::cylinder(transform, bounds),
                to_internal_length((r_max - r_min).abs()),
            )
        }
        (
            false,
            Shape::Box {
                half_x,
                half_y,
                half_z,
            },
        ) => {
            let maps = parse_axes(axes).ok_or_else(|| LayerBuildError::invalid_axes(name, axes))?;
            let halves = [*half_x, *half_y, *half_z];
            let bounds = RectangleBounds::new(
                to_internal_length(halves[maps[0].native]),
                to_internal_length(halves[maps[1].native]),
            );
            let placed = transform_from_parts(
                transform.rotation.matrix() * permutation(&maps),
                transform.translation.vector,
            );
            (
                Surface::plane(placed, PlanarBounds::Rectangle(bounds)),
                to_internal_length(2.0 * halves[maps[2].native]),
            )
        }
        (
            false,
            Shape::Trapezoid {
                half_x_min_y,
                half_x_max_y,
                half_y,
                half_z,
            },
        ) => {
            let maps = parse_axes(axes).ok_or_else(|| LayerBuildError::invalid_axes(name, axes))?;
            if maps[0].native != 0 || maps[1].native != 1 {
                return Err(LayerBuildError::structural(
                    name,
                    format!("trapezoid module cannot exchange its x and y axes ('{axes}')"),
                ));
            }
            // Flipping y exchanges the short and long edges
            let (short, long) = if maps[1].sign < 0.0 {
                (*half_x_max_y, *half_x_min_y)
            } else {
                (*half_x_min_y, *half_x_max_y)
            };
            let bounds = TrapezoidBounds::new(
                to_internal_length(short),
                to_internal_length(long),
                to_internal_length(*half_y),
            );
            let placed = transform_from_parts(
                transform.rotation.matrix() * permutation(&maps),
                transform.translation.vector,
            );
            (
                Surface::plane(placed, PlanarBounds::Trapezoid(bounds)),
                to_internal_length(2.0 * half_z),
            )
        }
        (false, Shape::Other { kind }) => {
            return Err(LayerBuildError::structural(
                name,
                format!("unsupported module shape '{kind}'"),
            ));
        }
    };

    let extension = element.extension();
    let material = extension.and_then(|ext| ext.material.clone());
    let digitization = if build_digitization_modules {
        extension.and_then(|ext| ext.digitization.clone())
    } else {
        None
    };

    Ok(surface.with_material(material).with_element(SurfaceElement {
        name: name.to_string(),
        id: element.id(),
        axes: if axes.is_empty() { DEFAULT_AXES } else { axes }.to_string(),
        scalor: CM,
        is_disc,
        thickness,
        digitization,
    }))
}

/// Matrix whose columns are the native directions of the local axes.
fn permutation(maps: &[AxisMap; 3]) -> Matrix3<f64> {
    let column = |m: AxisMap| {
        let mut v = Vector3::zeros();
        v[m.native] = m.sign;
        v
    };
    Matrix3::from_columns(&[column(maps[0]), column(maps[1]), column(maps[2])])
}
