//! Trajectory generation and querying.
//!
//! [`BasicTrajectory`] solves the center-line velocity profile;
//! [`TankDriveTrajectory`] projects it onto the left and right wheels.
//! [`generator`] holds shortcuts for straight-line and in-place
//! rotation maneuvers.

pub mod basic;
pub mod generator;
pub mod moment;
pub mod tank;

pub use basic::BasicTrajectory;
pub use generator::{generate_rotation_tank, generate_straight_basic, generate_straight_tank};
pub use moment::{BasicMoment, TankDriveMoment};
pub use tank::TankDriveTrajectory;
