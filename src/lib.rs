//! # marga-traj: waypoint trajectory generation for tank drive robots
//!
//! Generates time-parameterized motion trajectories for a differential
//! drive robot along a smooth planar curve through user-supplied
//! waypoints, respecting kinematic limits (max velocity, max
//! acceleration, wheelbase). Consumers query the result by time to get
//! interpolated setpoints for closed-loop control.
//!
//! ## Quick start
//!
//! ```rust
//! use marga_traj::{
//!     BasicTrajectory, PathType, RobotSpecs, TankDriveTrajectory, TrajectoryParams, Waypoint,
//! };
//!
//! let specs = RobotSpecs::with_base_width(2.0, 1.0, 0.6);
//! let params = TrajectoryParams {
//!     waypoints: vec![
//!         Waypoint::new(0.0, 0.0, 0.0),
//!         Waypoint::new(5.0, -5.0, -std::f64::consts::FRAC_PI_2),
//!     ],
//!     alpha: 5.0,
//!     sample_count: 201,
//!     is_tank: true,
//!     path_type: PathType::QuinticHermite,
//! };
//!
//! let basic = BasicTrajectory::new(specs, params).unwrap();
//! let tank = TankDriveTrajectory::from_basic(&basic).unwrap();
//!
//! let setpoint = tank.get(tank.total_time() / 2.0);
//! assert!(setpoint.l_vel > setpoint.r_vel); // right-hand turn: outer (left) wheel is faster
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: vector and angle math, the small Gauss-Jordan solver
//! - [`spline`]: Bezier / cubic Hermite / quintic Hermite segments
//! - [`path`]: piecewise path with the arc-length reparameterization
//!   table and the mirror/retrace transforms
//! - [`trajectory`]: the two-pass velocity profile solver, the tank
//!   wheel projection, and maneuver generators
//!
//! ## Units
//!
//! Angles are radians, distances are whatever linear unit the waypoints
//! use, time is seconds implied by the velocity and acceleration units.
//!
//! ## Transforms
//!
//! Paths and trajectories can be mirrored left-right, mirrored
//! front-back, or retraced. Each transform produces an independent new
//! instance and is consistent with regenerating from the transformed
//! waypoints; the velocity profile is reused rather than re-solved.

pub mod core;
pub mod error;
pub mod path;
pub mod spline;
pub mod trajectory;
pub mod types;

pub use crate::core::Vec2;
pub use error::{Error, Result};
pub use path::Path;
pub use trajectory::{
    generate_rotation_tank, generate_straight_basic, generate_straight_tank, BasicMoment,
    BasicTrajectory, TankDriveMoment, TankDriveTrajectory,
};
pub use types::{PathType, RobotSpecs, TrajectoryParams, Waypoint};
