//! Surface lookup structures.

use nalgebra::Point3;

use crate::binning::BinUtility;
use crate::surface::Surface;

/// Surfaces of a layer arranged on a grid.
///
/// Each surface is registered in the cell holding its centre.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    surfaces: Vec<Surface>,
    bins: BinUtility,
    cells: Vec<Vec<usize>>,
}

impl SurfaceGrid {
    /// Register `surfaces` on `bins`.
    #[must_use]
    pub fn new(surfaces: Vec<Surface>, bins: BinUtility) -> Self {
        let mut cells = vec![Vec::new(); bins.total_bins()];
        for (index, surface) in surfaces.iter().enumerate() {
            let cell = bins.serial_bin(&surface.center());
            if let Some(entries) = cells.get_mut(cell) {
                entries.push(index);
            }
        }
        Self {
            surfaces,
            bins,
            cells,
        }
    }

    /// The grid.
    #[must_use]
    pub fn bins(&self) -> &BinUtility {
        &self.bins
    }
}

/// Lookup from a position to the sensitive surfaces near it.
///
/// # Example
///
/// ```
/// use tracking_types::{RadialBounds, Surface, SurfaceArray, Transform3, Point3};
///
/// let module = Surface::disc(Transform3::identity(), RadialBounds::new(10.0, 20.0));
/// let array = SurfaceArray::single(module);
///
/// assert_eq!(array.len(), 1);
/// assert_eq!(array.surfaces_at(&Point3::new(0.0, 0.0, 100.0)).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceArray {
    /// One surface answers every query.
    Single(Surface),
    /// Surfaces binned on a grid.
    Binned(SurfaceGrid),
}

impl SurfaceArray {
    /// Lookup over a single surface.
    #[must_use]
    pub fn single(surface: Surface) -> Self {
        Self::Single(surface)
    }

    /// Lookup over a binned set of surfaces.
    #[must_use]
    pub fn binned(surfaces: Vec<Surface>, bins: BinUtility) -> Self {
        Self::Binned(SurfaceGrid::new(surfaces, bins))
    }

    /// All surfaces, in insertion order.
    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        match self {
            Self::Single(surface) => std::slice::from_ref(surface),
            Self::Binned(grid) => &grid.surfaces,
        }
    }

    /// Number of surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces().len()
    }

    /// Whether the array holds no surface.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces().is_empty()
    }

    /// Surfaces registered in the cell that holds `position`.
    #[must_use]
    pub fn surfaces_at(&self, position: &Point3<f64>) -> Vec<&Surface> {
        match self {
            Self::Single(surface) => vec![surface],
            Self::Binned(grid) => grid
                .cells
                .get(grid.bins.serial_bin(position))
                .map(|cell| cell.iter().map(|&i| &grid.surfaces[i]).collect())
                .unwrap_or_default(),
        }
    }
}
