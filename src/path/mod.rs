//! Piecewise-parametric planar path through waypoints.
//!
//! A path owns one spline segment per waypoint gap and an arc-length
//! lookup table built by uniform sampling. The global parameter `t` in
//! `[0, 1]` spans the whole path; the fractional arc length `s` in
//! `[0, 1]` is related to `t` through the table ([`Path::s2t`] /
//! [`Path::t2s`]), because parametric polynomials are nowhere close to
//! constant-speed.

use crate::core::math::{canonicalize_angle, lerp, mirror_angle};
use crate::core::Vec2;
use crate::error::{Error, Result};
use crate::spline::{BezierSegment, CubicHermiteSegment, QuinticHermiteSegment, SplineSegment};
use crate::types::{PathType, Waypoint};
use std::f64::consts::PI;

/// A smooth planar curve through a sequence of waypoints.
#[derive(Clone, Debug)]
pub struct Path {
    segments: Vec<SplineSegment>,
    waypoints: Vec<Waypoint>,
    alpha: f64,
    kind: PathType,
    backwards: bool,
    base_radius: f64,
    total_len: f64,
    /// Sorted `(cumulative arc length, t)` pairs; empty until
    /// [`Path::compute_len`] runs.
    s2t_table: Vec<(f64, f64)>,
}

impl Path {
    /// Build a path through `waypoints` with tangent magnitude `alpha`,
    /// one segment of the given family per waypoint gap.
    pub fn new(waypoints: Vec<Waypoint>, alpha: f64, kind: PathType) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "a path needs at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }

        let mut segments = Vec::with_capacity(waypoints.len() - 1);
        for pair in waypoints.windows(2) {
            let (start, end) = (&pair[0], &pair[1]);
            let m0 = Vec2::new(start.heading.cos() * alpha, start.heading.sin() * alpha);
            let m1 = Vec2::new(end.heading.cos() * alpha, end.heading.sin() * alpha);
            let seg = match kind {
                PathType::Bezier => SplineSegment::Bezier(BezierSegment::from_hermite(
                    start.position(),
                    end.position(),
                    m0,
                    m1,
                )),
                PathType::CubicHermite => SplineSegment::CubicHermite(CubicHermiteSegment::new(
                    start.position(),
                    end.position(),
                    m0,
                    m1,
                )),
                PathType::QuinticHermite => {
                    SplineSegment::QuinticHermite(QuinticHermiteSegment::solve(
                        start.position(),
                        end.position(),
                        m0,
                        m1,
                        Vec2::ZERO,
                        Vec2::ZERO,
                        0.0,
                    )?)
                }
            };
            segments.push(seg);
        }

        log::debug!(
            "Path: built {} {:?} segment(s) through {} waypoints",
            segments.len(),
            kind,
            waypoints.len()
        );

        Ok(Self {
            segments,
            waypoints,
            alpha,
            kind,
            backwards: false,
            base_radius: 0.0,
            total_len: 0.0,
            s2t_table: Vec::new(),
        })
    }

    /// Map the global parameter to a segment and its local parameter.
    fn locate(&self, t: f64) -> (&SplineSegment, f64) {
        let n = self.segments.len();
        if t >= 1.0 {
            return (&self.segments[n - 1], 1.0);
        }
        let scaled = t * n as f64;
        let idx = (scaled.floor() as usize).min(n - 1);
        (&self.segments[idx], scaled - idx as f64)
    }

    /// Position at global parameter `t` in `[0, 1]`.
    pub fn at(&self, t: f64) -> Vec2 {
        let (seg, u) = self.locate(t);
        seg.at(u)
    }

    /// First derivative at global parameter `t`.
    pub fn deriv_at(&self, t: f64) -> Vec2 {
        let (seg, u) = self.locate(t);
        seg.deriv_at(u)
    }

    /// Second derivative at global parameter `t`.
    pub fn second_deriv_at(&self, t: f64) -> Vec2 {
        let (seg, u) = self.locate(t);
        seg.second_deriv_at(u)
    }

    /// Positions of the left and right wheels at global parameter `t`,
    /// offset by the base radius perpendicular to the local heading.
    /// Driving backwards flips the offsets.
    pub fn wheels_at(&self, t: f64) -> (Vec2, Vec2) {
        let pos = self.at(t);
        let deriv = self.deriv_at(t);
        let heading = deriv.y.atan2(deriv.x);
        let r = if self.backwards {
            -self.base_radius
        } else {
            self.base_radius
        };
        let offset = Vec2::new(-heading.sin() * r, heading.cos() * r);
        (pos + offset, pos - offset)
    }

    /// Build the arc-length table by sampling `points` values of `t`
    /// uniformly and accumulating chord lengths. Returns the total
    /// length. Must be called before [`Path::s2t`] or [`Path::t2s`].
    pub fn compute_len(&mut self, points: usize) -> f64 {
        let dt = 1.0 / (points - 1) as f64;

        let mut last = self.at(0.0);
        self.total_len = 0.0;
        self.s2t_table.clear();
        self.s2t_table.reserve(points);
        self.s2t_table.push((0.0, 0.0));

        for i in 1..points {
            let current = self.at(i as f64 * dt);
            self.total_len += last.dist(&current);
            self.s2t_table.push((self.total_len, i as f64 * dt));
            last = current;
        }
        self.total_len
    }

    /// Total arc length computed by the last [`Path::compute_len`] call.
    pub fn get_len(&self) -> f64 {
        self.total_len
    }

    /// Convert a fractional arc length `s` in `[0, 1]` to the global
    /// parameter `t` by table lookup and linear interpolation.
    pub fn s2t(&self, s: f64) -> Result<f64> {
        if self.s2t_table.is_empty() {
            return Err(Error::LookupNotReady);
        }
        if s >= 1.0 {
            return Ok(1.0);
        }
        let dist = s * self.total_len;
        if dist <= 0.0 {
            return Ok(0.0);
        }

        let idx = self.s2t_table.partition_point(|&(d, _)| d <= dist);
        if idx >= self.s2t_table.len() {
            return Ok(1.0);
        }
        let (d0, t0) = self.s2t_table[idx - 1];
        let (d1, t1) = self.s2t_table[idx];
        if d1 == d0 {
            return Ok(t0);
        }
        let f = (dist - d0) / (d1 - d0);
        Ok(lerp(t0, t1, f))
    }

    /// Convert a global parameter `t` to a fractional arc length,
    /// inverse of [`Path::s2t`].
    pub fn t2s(&self, t: f64) -> Result<f64> {
        if self.s2t_table.is_empty() {
            return Err(Error::LookupNotReady);
        }
        if t >= 1.0 {
            return Ok(1.0);
        }
        if t <= 0.0 {
            return Ok(0.0);
        }

        let idx = self.s2t_table.partition_point(|&(_, tt)| tt <= t);
        if idx >= self.s2t_table.len() {
            return Ok(1.0);
        }
        let (d0, t0) = self.s2t_table[idx - 1];
        let (d1, t1) = self.s2t_table[idx];
        if t1 == t0 {
            return Ok(d0 / self.total_len);
        }
        let f = (t - t0) / (t1 - t0);
        Ok(lerp(d0, d1, f) / self.total_len)
    }

    /// Set the wheel offset radius (half the base width).
    pub fn set_base(&mut self, base_radius: f64) {
        self.base_radius = base_radius;
    }

    /// Wheel offset radius.
    pub fn get_base(&self) -> f64 {
        self.base_radius
    }

    /// Mark the path as driven backwards, flipping wheel offsets.
    pub fn set_backwards(&mut self, backwards: bool) {
        self.backwards = backwards;
    }

    /// Whether the path is driven backwards.
    pub fn get_backwards(&self) -> bool {
        self.backwards
    }

    /// The waypoints the path was built from.
    pub fn get_waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Tangent magnitude at the waypoints.
    pub fn get_alpha(&self) -> f64 {
        self.alpha
    }

    /// Spline family of the segments.
    pub fn get_type(&self) -> PathType {
        self.kind
    }

    /// Mirror the path about the line through the first waypoint along
    /// its heading. Left turns become right turns.
    pub fn mirror_lr(&self) -> Result<Path> {
        let ref_heading = self.waypoints[0].heading;
        let axis = Vec2::new(ref_heading.cos(), ref_heading.sin());
        let origin = self.waypoints[0].position();

        let waypoints = self
            .waypoints
            .iter()
            .map(|wp| {
                let pos = origin + (wp.position() - origin).reflect(&axis);
                Waypoint {
                    x: pos.x,
                    y: pos.y,
                    heading: mirror_angle(wp.heading, ref_heading),
                    velocity: wp.velocity,
                }
            })
            .collect();

        let mut path = Path::new(waypoints, self.alpha, self.kind)?;
        path.set_base(self.base_radius);
        path.set_backwards(self.backwards);
        Ok(path)
    }

    /// Mirror the path about the line through the first waypoint
    /// perpendicular to its heading. Forward motion becomes backward
    /// motion.
    pub fn mirror_fb(&self) -> Result<Path> {
        let ref_heading = self.waypoints[0].heading;
        let axis = Vec2::new(-ref_heading.sin(), ref_heading.cos());
        let origin = self.waypoints[0].position();

        let waypoints = self
            .waypoints
            .iter()
            .map(|wp| {
                let pos = origin + (wp.position() - origin).reflect(&axis);
                Waypoint {
                    x: pos.x,
                    y: pos.y,
                    heading: mirror_angle(wp.heading, ref_heading + PI / 2.0),
                    velocity: wp.velocity,
                }
            })
            .collect();

        let mut path = Path::new(waypoints, self.alpha, self.kind)?;
        path.set_base(self.base_radius);
        path.set_backwards(!self.backwards);
        Ok(path)
    }

    /// Reverse the path: same curve, traversed from the last waypoint to
    /// the first while driving backwards.
    pub fn retrace(&self) -> Result<Path> {
        let waypoints = self
            .waypoints
            .iter()
            .rev()
            .map(|wp| Waypoint {
                x: wp.x,
                y: wp.y,
                heading: canonicalize_angle(wp.heading + PI),
                velocity: wp.velocity,
            })
            .collect();

        let mut path = Path::new(waypoints, self.alpha, self.kind)?;
        path.set_base(self.base_radius);
        path.set_backwards(!self.backwards);
        Ok(path)
    }

    /// Re-solve a single-segment quintic path from the state
    /// `(pos, vel, accel)` the robot actually has at parameter `t`,
    /// keeping the endpoint constraints unchanged.
    ///
    /// The arc-length table is invalidated; call [`Path::compute_len`]
    /// again before the next lookup.
    pub fn update(&mut self, t: f64, pos: Vec2, vel: Vec2, accel: Vec2) -> Result<()> {
        if self.kind != PathType::QuinticHermite {
            return Err(Error::InvalidInput(
                "update is only supported for quintic hermite paths".into(),
            ));
        }
        if self.segments.len() != 1 {
            return Err(Error::InvalidInput(
                "update is only supported for single-segment paths".into(),
            ));
        }
        if !(0.0..=1.0).contains(&t) {
            return Err(Error::InvalidInput(format!(
                "update parameter must be in [0, 1], got {}",
                t
            )));
        }

        let end = self.waypoints[self.waypoints.len() - 1];
        let m1 = Vec2::new(end.heading.cos() * self.alpha, end.heading.sin() * self.alpha);
        self.segments[0] = SplineSegment::QuinticHermite(QuinticHermiteSegment::solve(
            pos,
            end.position(),
            vel,
            m1,
            accel,
            Vec2::ZERO,
            t,
        )?);

        self.total_len = 0.0;
        self.s2t_table.clear();
        Ok(())
    }
}
