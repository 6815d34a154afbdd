//! Color science utilities
//!
//! Stateless conversions from sRGB through XYZ into CIE Lab, plus the
//! Euclidean color distance and vector magnitude the seam weighting relies on.

/// RGB/XYZ/Lab conversion functions and the `Lab` value type
pub mod convert;

pub use convert::{Lab, delta_e, magnitude, rgb_to_lab, rgb_to_xyz, xyz_to_lab};
