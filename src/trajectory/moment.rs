//! Discrete trajectory states.

use crate::core::math::canonicalize_angle;
use serde::{Deserialize, Serialize};

/// One discrete state of a center-line trajectory.
///
/// `pos` is the signed arc length along the path; it goes negative for
/// trajectories derived by front-back mirroring or retracing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicMoment {
    /// Signed arc-length position
    pub pos: f64,
    /// Linear velocity
    pub vel: f64,
    /// Linear acceleration
    pub accel: f64,
    /// Heading in radians
    pub heading: f64,
    /// Time since the start of the trajectory, seconds
    pub time: f64,
    /// Heading of the first moment of the original, untransformed
    /// trajectory
    pub init_facing: f64,
    /// Whether the robot drives backwards through this moment
    pub backwards: bool,
}

impl BasicMoment {
    /// Moment at time zero with unset facing.
    pub fn new(pos: f64, vel: f64, accel: f64, heading: f64) -> Self {
        Self {
            pos,
            vel,
            accel,
            heading,
            time: 0.0,
            init_facing: 0.0,
            backwards: false,
        }
    }

    /// The direction the robot body faces: the heading, flipped when
    /// driving backwards.
    #[inline]
    pub fn effective_facing(&self) -> f64 {
        if self.backwards {
            -self.heading
        } else {
            self.heading
        }
    }

    /// Facing relative to the start of the original trajectory,
    /// canonicalized.
    #[inline]
    pub fn relative_facing(&self) -> f64 {
        canonicalize_angle(self.effective_facing() - self.init_facing)
    }
}

/// One discrete state of a tank drive trajectory, with per-wheel
/// kinematics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TankDriveMoment {
    /// Left wheel signed arc-length position
    pub l_pos: f64,
    /// Right wheel signed arc-length position
    pub r_pos: f64,
    /// Left wheel velocity
    pub l_vel: f64,
    /// Right wheel velocity
    pub r_vel: f64,
    /// Left wheel acceleration
    pub l_accel: f64,
    /// Right wheel acceleration
    pub r_accel: f64,
    /// Heading in radians
    pub heading: f64,
    /// Time since the start of the trajectory, seconds
    pub time: f64,
    /// Heading of the first moment of the original, untransformed
    /// trajectory
    pub init_facing: f64,
    /// Whether the robot drives backwards through this moment
    pub backwards: bool,
}

impl TankDriveMoment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        l_pos: f64,
        r_pos: f64,
        l_vel: f64,
        r_vel: f64,
        l_accel: f64,
        r_accel: f64,
        heading: f64,
        time: f64,
    ) -> Self {
        Self {
            l_pos,
            r_pos,
            l_vel,
            r_vel,
            l_accel,
            r_accel,
            heading,
            time,
            init_facing: 0.0,
            backwards: false,
        }
    }

    /// The direction the robot body faces: the heading, flipped when
    /// driving backwards.
    #[inline]
    pub fn effective_facing(&self) -> f64 {
        if self.backwards {
            -self.heading
        } else {
            self.heading
        }
    }

    /// Facing relative to the start of the original trajectory,
    /// canonicalized.
    #[inline]
    pub fn relative_facing(&self) -> f64 {
        canonicalize_angle(self.effective_facing() - self.init_facing)
    }
}
