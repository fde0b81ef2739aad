//! Binning utilities.
//!
//! A [`BinUtility`] is an ordered list of [`BinData`] axes plus an optional
//! transform. Positions are moved into the local frame of that transform
//! before the per-axis bin search, so a grid attached to a layer follows the
//! layer's placement.

// Bin counts are small; the float <-> index casts cannot overflow in practice
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

use std::f64::consts::PI;
use std::ops::AddAssign;

use nalgebra::Point3;

use crate::error::TrackingError;
use crate::transform::Transform3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quantity a binning axis is defined in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinningValue {
    /// Global x.
    X,
    /// Global y.
    Y,
    /// Global z.
    Z,
    /// Transverse radius.
    R,
    /// Azimuth.
    Phi,
}

impl BinningValue {
    /// Evaluate this quantity at a position.
    #[must_use]
    pub fn value_of(self, position: &Point3<f64>) -> f64 {
        match self {
            Self::X => position.x,
            Self::Y => position.y,
            Self::Z => position.z,
            Self::R => position.x.hypot(position.y),
            Self::Phi => position.y.atan2(position.x),
        }
    }
}

impl std::fmt::Display for BinningValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
            Self::R => write!(f, "r"),
            Self::Phi => write!(f, "phi"),
        }
    }
}

/// Behaviour at the edges of a binning axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinningOption {
    /// Values outside the range fall into the first or last bin.
    #[default]
    Open,
    /// The axis is periodic; values wrap around.
    Closed,
}

/// How bin boundaries are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinningType {
    /// Bins of equal width.
    #[default]
    Equidistant,
    /// Bins with explicitly given boundaries.
    Arbitrary,
}

/// One binning axis.
///
/// # Example
///
/// ```
/// use tracking_types::{BinData, BinningOption, BinningValue};
///
/// let axis = BinData::equidistant(4, 0.0, 8.0, BinningOption::Open, BinningValue::Z).unwrap();
/// assert_eq!(axis.bins(), 4);
/// assert_eq!(axis.search(3.0), 1);
/// // Open axes clamp
/// assert_eq!(axis.search(100.0), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BinData {
    value: BinningValue,
    option: BinningOption,
    kind: BinningType,
    boundaries: Vec<f64>,
}

impl BinData {
    /// Create an axis of `bins` equal-width bins over `[min, max)`.
    pub fn equidistant(
        bins: usize,
        min: f64,
        max: f64,
        option: BinningOption,
        value: BinningValue,
    ) -> crate::Result<Self> {
        if bins == 0 {
            return Err(TrackingError::ZeroBins);
        }
        if min >= max || !min.is_finite() || !max.is_finite() {
            return Err(TrackingError::invalid_bin_range(min, max));
        }
        let step = (max - min) / bins as f64;
        let mut boundaries: Vec<f64> = (0..bins).map(|i| min + step * i as f64).collect();
        boundaries.push(max);
        Ok(Self {
            value,
            option,
            kind: BinningType::Equidistant,
            boundaries,
        })
    }

    /// Create an axis from explicit, strictly increasing boundaries.
    pub fn arbitrary(
        boundaries: Vec<f64>,
        option: BinningOption,
        value: BinningValue,
    ) -> crate::Result<Self> {
        if boundaries.len() < 2 {
            return Err(TrackingError::ZeroBins);
        }
        if boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TrackingError::UnsortedBoundaries);
        }
        Ok(Self {
            value,
            option,
            kind: BinningType::Arbitrary,
            boundaries,
        })
    }

    /// Periodic azimuthal axis over `[-π, π)`.
    pub fn phi(bins: usize) -> crate::Result<Self> {
        Self::equidistant(bins, -PI, PI, BinningOption::Closed, BinningValue::Phi)
    }

    /// Binned quantity.
    #[must_use]
    pub fn value(&self) -> BinningValue {
        self.value
    }

    /// Edge behaviour.
    #[must_use]
    pub fn option(&self) -> BinningOption {
        self.option
    }

    /// Boundary placement.
    #[must_use]
    pub fn kind(&self) -> BinningType {
        self.kind
    }

    /// Number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Lower edge of the axis.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.boundaries[0]
    }

    /// Upper edge of the axis.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// All bin boundaries, `bins() + 1` values.
    #[must_use]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Find the bin holding `x`.
    ///
    /// Open axes clamp to the first/last bin, closed axes wrap.
    #[must_use]
    pub fn search(&self, x: f64) -> usize {
        let bins = self.bins();
        let (min, max) = (self.min(), self.max());
        let x = match self.option {
            BinningOption::Closed => min + (x - min).rem_euclid(max - min),
            BinningOption::Open => x,
        };
        let index = match self.kind {
            BinningType::Equidistant => ((x - min) / (max - min) * bins as f64).floor() as i64,
            BinningType::Arbitrary => self.boundaries.partition_point(|b| *b <= x) as i64 - 1,
        };
        index.clamp(0, bins as i64 - 1) as usize
    }

    /// Centre of bin `index`.
    #[must_use]
    pub fn center(&self, index: usize) -> f64 {
        let i = index.min(self.bins() - 1);
        0.5 * (self.boundaries[i] + self.boundaries[i + 1])
    }
}

/// Multi-dimensional binning with an optional placement.
///
/// # Example
///
/// ```
/// use tracking_types::{BinData, BinUtility, BinningOption, BinningValue, Point3};
///
/// let mut grid = BinUtility::new(BinData::phi(4).unwrap());
/// grid += BinUtility::new(
///     BinData::equidistant(2, 0.0, 10.0, BinningOption::Open, BinningValue::Z).unwrap(),
/// );
///
/// assert_eq!(grid.dimensions(), 2);
/// assert_eq!(grid.total_bins(), 8);
/// assert_eq!(grid.bins_at(&Point3::new(1.0, 0.1, 7.0)), vec![2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BinUtility {
    data: Vec<BinData>,
    transform: Option<Transform3>,
}

impl BinUtility {
    /// Single-axis binning in global coordinates.
    #[must_use]
    pub fn new(data: BinData) -> Self {
        Self {
            data: vec![data],
            transform: None,
        }
    }

    /// Attach a placement; positions are taken into its local frame.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform3) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Axes in order.
    #[must_use]
    pub fn data(&self) -> &[BinData] {
        &self.data
    }

    /// Placement of the grid, if any.
    #[must_use]
    pub fn transform(&self) -> Option<&Transform3> {
        self.transform.as_ref()
    }

    /// Number of axes.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    /// Bin count of every axis.
    #[must_use]
    pub fn bins_per_axis(&self) -> Vec<usize> {
        self.data.iter().map(BinData::bins).collect()
    }

    /// Product of all bin counts.
    #[must_use]
    pub fn total_bins(&self) -> usize {
        self.data.iter().map(BinData::bins).product()
    }

    /// Per-axis bin indices of a global position.
    #[must_use]
    pub fn bins_at(&self, position: &Point3<f64>) -> Vec<usize> {
        let local = self.to_local(position);
        self.data
            .iter()
            .map(|axis| axis.search(axis.value().value_of(&local)))
            .collect()
    }

    /// Flattened bin index of a global position, first axis fastest.
    #[must_use]
    pub fn serial_bin(&self, position: &Point3<f64>) -> usize {
        let mut stride = 1;
        let mut serial = 0;
        for (axis, bin) in self.data.iter().zip(self.bins_at(position)) {
            serial += bin * stride;
            stride *= axis.bins();
        }
        serial
    }

    fn to_local(&self, position: &Point3<f64>) -> Point3<f64> {
        match &self.transform {
            Some(t) => t.inverse_transform_point(position),
            None => *position,
        }
    }
}

impl AddAssign for BinUtility {
    fn add_assign(&mut self, rhs: Self) {
        self.data.extend(rhs.data);
        self.transform = match (self.transform.take(), rhs.transform) {
            (Some(a), Some(b)) => Some(a * b),
            (a, b) => a.or(b),
        };
    }
}
