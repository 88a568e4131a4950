//! Input types for path and trajectory generation.

use crate::core::Vec2;
use serde::{Deserialize, Serialize};

/// A point the generated path must pass through, with the heading the
/// robot should have there and an optional velocity constraint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Heading in radians, CCW from +X
    pub heading: f64,
    /// Velocity the robot must have when passing through, if constrained
    #[serde(default)]
    pub velocity: Option<f64>,
}

impl Waypoint {
    /// Create an unconstrained waypoint.
    #[inline]
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading,
            velocity: None,
        }
    }

    /// Create a waypoint with a velocity constraint.
    #[inline]
    pub fn with_velocity(x: f64, y: f64, heading: f64, velocity: f64) -> Self {
        Self {
            x,
            y,
            heading,
            velocity: Some(velocity),
        }
    }

    /// Position as a vector, dropping heading and velocity.
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Waypoint> for Vec2 {
    #[inline]
    fn from(wp: Waypoint) -> Vec2 {
        wp.position()
    }
}

/// Kinematic limits of the robot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotSpecs {
    /// Maximum linear velocity
    pub max_v: f64,
    /// Maximum linear acceleration
    pub max_a: f64,
    /// Distance between the left and right wheels; required for tank
    /// trajectories, unused otherwise
    #[serde(default)]
    pub base_width: Option<f64>,
}

impl RobotSpecs {
    /// Specs for a robot without a wheelbase (basic trajectories only).
    #[inline]
    pub fn new(max_v: f64, max_a: f64) -> Self {
        Self {
            max_v,
            max_a,
            base_width: None,
        }
    }

    /// Specs for a tank drive robot.
    #[inline]
    pub fn with_base_width(max_v: f64, max_a: f64, base_width: f64) -> Self {
        Self {
            max_v,
            max_a,
            base_width: Some(base_width),
        }
    }
}

/// The spline family used for every segment of a path.
///
/// Discriminant values are stable for embedders that need an integer
/// mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathType {
    /// Cubic Bezier segments built from Hermite endpoint data
    Bezier = 1,
    /// Cubic Hermite segments
    CubicHermite = 2,
    /// Quintic Hermite segments with zero endpoint acceleration
    QuinticHermite = 3,
}

/// Everything that shapes a generated trajectory besides the robot
/// limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryParams {
    /// Waypoints the path passes through, in order; at least two
    pub waypoints: Vec<Waypoint>,
    /// Tangent magnitude at each waypoint; larger values give smoother
    /// joins with tighter curvature near the waypoint itself
    pub alpha: f64,
    /// Number of uniformly arc-length-spaced samples (at least 2)
    pub sample_count: usize,
    /// Whether to compute the turn-curvature speed caps a tank drive
    /// needs (and allow projecting to per-wheel kinematics)
    pub is_tank: bool,
    /// Spline family for the path segments
    pub path_type: PathType,
}

impl Default for TrajectoryParams {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            alpha: f64::NAN,
            sample_count: 1000,
            is_tank: false,
            path_type: PathType::QuinticHermite,
        }
    }
}
