//! Quintic Hermite segment.

use crate::core::{Matrix, Vec2};
use crate::error::Result;

/// Quintic Hermite curve over `u` in `[0, 1]`, stored as six polynomial
/// coefficients per axis (constant term first).
///
/// The coefficients are solved from endpoint position, velocity and
/// acceleration. The start constraints are applied at parameter
/// `start_t` (normally 0), which lets a segment be re-solved mid-flight
/// from the state the robot actually has at that parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuinticHermiteSegment {
    x_coeffs: [f64; 6],
    y_coeffs: [f64; 6],
}

impl QuinticHermiteSegment {
    /// Solve for the segment satisfying
    /// `p(start_t) = p0, p'(start_t) = v0, p''(start_t) = a0,
    ///  p(1) = p1, p'(1) = v1, p''(1) = a1`.
    pub fn solve(
        p0: Vec2,
        p1: Vec2,
        v0: Vec2,
        v1: Vec2,
        a0: Vec2,
        a1: Vec2,
        start_t: f64,
    ) -> Result<Self> {
        let x_coeffs = solve_axis(p0.x, p1.x, v0.x, v1.x, a0.x, a1.x, start_t)?;
        let y_coeffs = solve_axis(p0.y, p1.y, v0.y, v1.y, a0.y, a1.y, start_t)?;
        Ok(Self { x_coeffs, y_coeffs })
    }

    pub fn at(&self, u: f64) -> Vec2 {
        Vec2::new(horner(&self.x_coeffs, u), horner(&self.y_coeffs, u))
    }

    pub fn deriv_at(&self, u: f64) -> Vec2 {
        Vec2::new(
            horner(&deriv_coeffs(&self.x_coeffs), u),
            horner(&deriv_coeffs(&self.y_coeffs), u),
        )
    }

    pub fn second_deriv_at(&self, u: f64) -> Vec2 {
        Vec2::new(
            horner(&second_deriv_coeffs(&self.x_coeffs), u),
            horner(&second_deriv_coeffs(&self.y_coeffs), u),
        )
    }
}

/// Evaluate a polynomial in Horner form; `coeffs[0]` is the constant
/// term.
fn horner(coeffs: &[f64], u: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * u + c)
}

fn deriv_coeffs(c: &[f64; 6]) -> [f64; 5] {
    [c[1], 2.0 * c[2], 3.0 * c[3], 4.0 * c[4], 5.0 * c[5]]
}

fn second_deriv_coeffs(c: &[f64; 6]) -> [f64; 4] {
    [2.0 * c[2], 6.0 * c[3], 12.0 * c[4], 20.0 * c[5]]
}

/// Solve the six-equation coefficient system for one axis by
/// Gauss-Jordan on the augmented 6x7 matrix.
fn solve_axis(
    p0: f64,
    p1: f64,
    v0: f64,
    v1: f64,
    a0: f64,
    a1: f64,
    start_t: f64,
) -> Result<[f64; 6]> {
    let x = start_t;
    let x2 = x * x;
    let x3 = x2 * x;
    let x4 = x3 * x;
    let x5 = x4 * x;

    let mut mat = Matrix::from_rows(&[
        vec![1.0, x, x2, x3, x4, x5, p0],
        vec![0.0, 1.0, 2.0 * x, 3.0 * x2, 4.0 * x3, 5.0 * x4, v0],
        vec![0.0, 0.0, 2.0, 6.0 * x, 12.0 * x2, 20.0 * x3, a0],
        vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, p1],
        vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, v1],
        vec![0.0, 0.0, 2.0, 6.0, 12.0, 20.0, a1],
    ])?;
    mat.eliminate()?;

    let mut coeffs = [0.0; 6];
    for (i, c) in coeffs.iter_mut().enumerate() {
        *c = mat[i][6];
    }
    Ok(coeffs)
}
