//! Convenience generators for common maneuvers.

use crate::core::math::canonicalize_angle;
use crate::error::Result;
use crate::trajectory::basic::BasicTrajectory;
use crate::trajectory::tank::TankDriveTrajectory;
use crate::types::{PathType, RobotSpecs, TrajectoryParams, Waypoint};
use std::f64::consts::PI;

const STRAIGHT_SAMPLE_COUNT: usize = 100;

fn straight_params(distance: f64, is_tank: bool) -> TrajectoryParams {
    // A single straight segment needs neither curvature continuity nor
    // much sampling precision, so a Bezier with coarse samples does.
    TrajectoryParams {
        waypoints: vec![
            Waypoint::new(0.0, 0.0, PI / 2.0),
            Waypoint::new(0.0, distance.abs(), PI / 2.0),
        ],
        alpha: distance.abs() / 2.0,
        sample_count: STRAIGHT_SAMPLE_COUNT,
        is_tank,
        path_type: PathType::Bezier,
    }
}

/// Generate a trajectory that drives straight for `distance` units.
/// Negative distances drive backwards.
pub fn generate_straight_basic(specs: RobotSpecs, distance: f64) -> Result<BasicTrajectory> {
    let traj = BasicTrajectory::new(specs, straight_params(distance, false))?;
    if distance >= 0.0 {
        Ok(traj)
    } else {
        traj.mirror_fb()
    }
}

/// Generate a tank trajectory that drives straight for `distance`
/// units. Negative distances drive backwards.
pub fn generate_straight_tank(specs: RobotSpecs, distance: f64) -> Result<TankDriveTrajectory> {
    let basic = BasicTrajectory::new(specs, straight_params(distance, true))?;
    let traj = TankDriveTrajectory::from_basic(&basic)?;
    if distance >= 0.0 {
        Ok(traj)
    } else {
        traj.mirror_fb()
    }
}

/// Generate a tank trajectory that rotates the robot in place by
/// `angle` radians (positive is counter-clockwise) without translating
/// the chassis.
///
/// Built from a straight helper trajectory whose length is the arc each
/// wheel must cover; one side is then negated so the wheels counter-
/// rotate, and the heading is re-derived from the outer wheel's arc
/// length.
pub fn generate_rotation_tank(
    max_v: f64,
    max_a: f64,
    base_width: f64,
    angle: f64,
) -> Result<TankDriveTrajectory> {
    let base_radius = base_width / 2.0;
    let distance = angle * base_radius;

    let specs = RobotSpecs::with_base_width(max_v, max_a, base_width);
    let basic = BasicTrajectory::new(specs, straight_params(distance, true))?;
    let mut traj = TankDriveTrajectory::from_basic(&basic)?;

    if angle > 0.0 {
        for m in &mut traj.moments {
            m.l_pos = -m.l_pos;
            m.l_vel = -m.l_vel;
            m.l_accel = -m.l_accel;
            m.heading = canonicalize_angle(m.r_pos / base_radius + m.init_facing);
        }
    } else {
        for m in &mut traj.moments {
            m.r_pos = -m.r_pos;
            m.r_vel = -m.r_vel;
            m.r_accel = -m.r_accel;
            m.heading = canonicalize_angle(-m.l_pos / base_radius + m.init_facing);
        }
    }

    log::debug!(
        "generate_rotation_tank: {:.3} rad rotation over {:.3}s",
        angle,
        traj.total_time()
    );
    Ok(traj)
}
