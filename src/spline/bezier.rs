//! Cubic Bezier segment.

use crate::core::Vec2;

/// Cubic Bezier curve over `u` in `[0, 1]`, stored as its four control
/// points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BezierSegment {
    ctrl: [Vec2; 4],
}

impl BezierSegment {
    /// Create a segment directly from control points.
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self {
            ctrl: [p0, p1, p2, p3],
        }
    }

    /// Create a segment from Hermite endpoint data: positions `p0`/`p1`
    /// and tangents `m0`/`m1`. The interior control points are
    /// `p0 + m0/3` and `p1 - m1/3`.
    pub fn from_hermite(p0: Vec2, p1: Vec2, m0: Vec2, m1: Vec2) -> Self {
        Self::new(p0, p0 + m0 * (1.0 / 3.0), p1 - m1 * (1.0 / 3.0), p1)
    }

    pub fn at(&self, u: f64) -> Vec2 {
        let v = 1.0 - u;
        let vv = v * v;
        let vvv = vv * v;
        let uu = u * u;
        let uuu = uu * u;
        self.ctrl[0] * vvv
            + self.ctrl[1] * (3.0 * vv * u)
            + self.ctrl[2] * (3.0 * v * uu)
            + self.ctrl[3] * uuu
    }

    pub fn deriv_at(&self, u: f64) -> Vec2 {
        let v = 1.0 - u;
        let vv = v * v;
        let uu = u * u;
        (self.ctrl[1] - self.ctrl[0]) * (3.0 * vv)
            + (self.ctrl[2] - self.ctrl[1]) * (6.0 * v * u)
            + (self.ctrl[3] - self.ctrl[2]) * (3.0 * uu)
    }

    pub fn second_deriv_at(&self, u: f64) -> Vec2 {
        let v = 1.0 - u;
        (self.ctrl[2] - self.ctrl[1] * 2.0 + self.ctrl[0]) * (6.0 * v)
            + (self.ctrl[3] - self.ctrl[2] * 2.0 + self.ctrl[1]) * (6.0 * u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_endpoints() {
        let seg = BezierSegment::from_hermite(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 0.0),
        );
        assert_relative_eq!(seg.at(0.0).x, 0.0);
        assert_relative_eq!(seg.at(1.0).x, 10.0);
    }

    #[test]
    fn test_hermite_tangents() {
        let m0 = Vec2::new(3.0, 1.5);
        let m1 = Vec2::new(-1.0, 2.0);
        let seg = BezierSegment::from_hermite(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0), m0, m1);
        // The Bezier derivative at the endpoints equals the Hermite tangents
        let d0 = seg.deriv_at(0.0);
        let d1 = seg.deriv_at(1.0);
        assert_relative_eq!(d0.x, m0.x, epsilon = 1e-12);
        assert_relative_eq!(d0.y, m0.y, epsilon = 1e-12);
        assert_relative_eq!(d1.x, m1.x, epsilon = 1e-12);
        assert_relative_eq!(d1.y, m1.y, epsilon = 1e-12);
    }

    #[test]
    fn test_straight_line_has_zero_second_deriv_mid() {
        let seg = BezierSegment::from_hermite(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        // Control points are collinear and evenly spaced, so the curve is
        // the straight line itself
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            assert_relative_eq!(seg.at(u).y, 0.0);
            assert_relative_eq!(seg.second_deriv_at(u).y, 0.0);
        }
    }
}
