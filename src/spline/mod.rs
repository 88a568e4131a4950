//! Piecewise spline segments.
//!
//! Three segment families share one evaluation interface: position,
//! first and second derivative over a local parameter `u` in `[0, 1]`.
//! Dispatch is a plain enum match so a path stays one dense allocation
//! with no per-segment indirection.

pub mod bezier;
pub mod cubic;
pub mod quintic;

pub use bezier::BezierSegment;
pub use cubic::CubicHermiteSegment;
pub use quintic::QuinticHermiteSegment;

use crate::core::Vec2;

/// One segment of a piecewise path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SplineSegment {
    Bezier(BezierSegment),
    CubicHermite(CubicHermiteSegment),
    QuinticHermite(QuinticHermiteSegment),
}

impl SplineSegment {
    /// Position at local parameter `u`.
    #[inline]
    pub fn at(&self, u: f64) -> Vec2 {
        match self {
            SplineSegment::Bezier(seg) => seg.at(u),
            SplineSegment::CubicHermite(seg) => seg.at(u),
            SplineSegment::QuinticHermite(seg) => seg.at(u),
        }
    }

    /// First derivative with respect to `u`.
    #[inline]
    pub fn deriv_at(&self, u: f64) -> Vec2 {
        match self {
            SplineSegment::Bezier(seg) => seg.deriv_at(u),
            SplineSegment::CubicHermite(seg) => seg.deriv_at(u),
            SplineSegment::QuinticHermite(seg) => seg.deriv_at(u),
        }
    }

    /// Second derivative with respect to `u`.
    #[inline]
    pub fn second_deriv_at(&self, u: f64) -> Vec2 {
        match self {
            SplineSegment::Bezier(seg) => seg.second_deriv_at(u),
            SplineSegment::CubicHermite(seg) => seg.second_deriv_at(u),
            SplineSegment::QuinticHermite(seg) => seg.second_deriv_at(u),
        }
    }
}
