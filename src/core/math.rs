//! Angle arithmetic and scalar helpers.
//!
//! All angles are in radians, counter-clockwise positive. Headings are
//! measured from the +X axis.

use super::vec2::Vec2;
use std::f64::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f64 = 2.0 * PI;

/// Reduce an angle to the half-open interval `(-pi, pi]`.
///
/// Uses the modular form rather than repeated addition/subtraction, so it
/// is exact for inputs arbitrarily many turns away from the range. The
/// modular form alone lands on `-pi` at odd multiples of pi, so that
/// boundary is forced back to `+pi` to keep the interval half-open.
#[inline]
pub fn canonicalize_angle(theta: f64) -> f64 {
    let reduced = theta - TWO_PI * ((theta + PI) / TWO_PI).floor();
    if reduced <= -PI {
        reduced + TWO_PI
    } else {
        reduced
    }
}

/// Mirror an angle about a reference angle.
///
/// `mirror_angle(h, r)` is the heading of the reflection of direction `h`
/// across the axis with heading `r`.
#[inline]
pub fn mirror_angle(theta: f64, reference: f64) -> f64 {
    canonicalize_angle(theta - 2.0 * (theta - reference))
}

/// Rotation interpolation between two angles along the short arc.
///
/// <https://stackoverflow.com/questions/2708476/rotation-interpolation>
#[inline]
pub fn lerp_angle(a: f64, b: f64, f: f64) -> f64 {
    let theta = ((a - b) % TWO_PI + 3.0 * PI) % TWO_PI - PI;
    canonicalize_angle(a + f * theta)
}

/// Interpolate between two direction vectors and return the heading of
/// the result.
///
/// The inputs are expected to be unit-length; only the direction of the
/// lerped vector is used.
#[inline]
pub fn lerp_heading_vec(a: Vec2, b: Vec2, f: f64) -> f64 {
    let dir = Vec2::lerp(a, b, f);
    dir.y.atan2(dir.x)
}

/// Signed curvature of a planar parametric curve from its first and
/// second derivatives. The sign carries the turn direction.
#[inline]
pub fn curvature(dx: f64, ddx: f64, dy: f64, ddy: f64) -> f64 {
    (dx * ddy - dy * ddx) / (dx * dx + dy * dy).powf(1.5)
}

/// Restrict the absolute value of `x` to at most `m`, keeping the sign.
#[inline]
pub fn clamp_abs(x: f64, m: f64) -> f64 {
    if x.abs() <= m {
        x
    } else {
        m.copysign(x)
    }
}

/// Linear interpolation, `f` fraction of the way from `a` to `b`.
#[inline]
pub fn lerp(a: f64, b: f64, f: f64) -> f64 {
    a * (1.0 - f) + b * f
}
