//! Fundamental math types.
//!
//! - [`Vec2`]: 2D vector with the operations the spline and wheel
//!   geometry needs (projection, reflection, lerp)
//! - [`math`]: angle canonicalization, mirroring and interpolation,
//!   the signed curvature formula
//! - [`Matrix`]: small dense Gauss-Jordan solver for quintic coefficients

pub mod math;
pub mod matrix;
pub mod vec2;

pub use matrix::Matrix;
pub use vec2::Vec2;
