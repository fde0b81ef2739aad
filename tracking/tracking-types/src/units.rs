//! Unit constants.
//!
//! The internal length unit is the millimeter. Multiply a value given in an
//! external unit by the matching constant to obtain internal units, divide to
//! go back.
//!
//! ```
//! use tracking_types::units;
//!
//! let radius_cm = 12.5;
//! assert_eq!(radius_cm * units::CM, 125.0);
//! ```

/// One millimeter, the internal length unit.
pub const MM: f64 = 1.0;

/// One centimeter.
pub const CM: f64 = 10.0 * MM;

/// One meter.
pub const M: f64 = 1000.0 * MM;

/// Cubic centimeter, used to rescale densities given per cm³.
pub const CM3: f64 = CM * CM * CM;
