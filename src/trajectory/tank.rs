//! Tank drive trajectory: per-wheel kinematics projected from a
//! center-line trajectory.

use crate::core::math::{canonicalize_angle, lerp, lerp_angle, mirror_angle};
use crate::error::{Error, Result};
use crate::path::Path;
use crate::trajectory::basic::BasicTrajectory;
use crate::trajectory::moment::TankDriveMoment;
use crate::types::{RobotSpecs, TrajectoryParams, Waypoint};
use std::sync::Arc;

/// A trajectory with left and right wheel positions, velocities and
/// accelerations, sharing its path and time axis with the center-line
/// trajectory it was derived from.
#[derive(Clone, Debug)]
pub struct TankDriveTrajectory {
    pub(crate) path: Arc<Path>,
    pub(crate) moments: Vec<TankDriveMoment>,
    pub(crate) specs: RobotSpecs,
    pub(crate) params: TrajectoryParams,
    pub(crate) init_facing: f64,
    pub(crate) backwards: bool,
    pub(crate) path_t: Arc<Vec<f64>>,
}

impl TankDriveTrajectory {
    /// Project a center-line trajectory onto the two wheels.
    ///
    /// Wheel positions are integrated as arc lengths along the offset
    /// curves; wheel velocities come from the instantaneous-center
    /// relation `v_wheel = v * (1 +- b / 2r)` with `r` the signed turn
    /// radius. A wheel on a tight inside turn can run backwards, in
    /// which case its arc-length increment is negated.
    pub fn from_basic(basic: &BasicTrajectory) -> Result<Self> {
        if !basic.is_tank() {
            return Err(Error::InvalidInput(
                "source trajectory was not generated with is_tank".into(),
            ));
        }
        let base_width = basic.specs.base_width.ok_or_else(|| {
            Error::InvalidInput("tank trajectory requires base_width in the robot specs".into())
        })?;
        let path_r = basic.path_r.as_ref().ok_or_else(|| {
            Error::InvalidInput("source trajectory carries no curvature data".into())
        })?;
        let base_radius = base_width / 2.0;

        let bm = basic.get_moments();
        let mut moments: Vec<TankDriveMoment> = Vec::with_capacity(bm.len());

        if basic.params.waypoints[0].velocity.is_some() {
            let v = bm[0].vel;
            let d = v / path_r[0] * base_radius;
            moments.push(TankDriveMoment::new(
                0.0,
                0.0,
                v - d,
                v + d,
                0.0,
                0.0,
                bm[0].heading,
                0.0,
            ));
        } else {
            moments.push(TankDriveMoment::new(
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                bm[0].heading,
                0.0,
            ));
        }

        let mut prev_wheels = basic.path.wheels_at(basic.path_t[0]);
        for i in 1..bm.len() {
            let cur_wheels = basic.path.wheels_at(basic.path_t[i]);
            let mut dl = prev_wheels.0.dist(&cur_wheels.0);
            let mut dr = prev_wheels.1.dist(&cur_wheels.1);
            let dt = bm[i].time - bm[i - 1].time;

            let v = bm[i].vel;
            let d = v / path_r[i] * base_radius;
            let l_vel = v - d;
            let r_vel = v + d;
            if l_vel < 0.0 {
                dl = -dl;
            }
            if r_vel < 0.0 {
                dr = -dr;
            }

            let prev = moments[i - 1];
            moments.push(TankDriveMoment::new(
                prev.l_pos + dl,
                prev.r_pos + dr,
                l_vel,
                r_vel,
                0.0,
                0.0,
                bm[i].heading,
                bm[i].time,
            ));
            moments[i - 1].l_accel = (l_vel - prev.l_vel) / dt;
            moments[i - 1].r_accel = (r_vel - prev.r_vel) / dt;

            prev_wheels = cur_wheels;
        }

        let init_facing = basic.get_init_facing();
        for m in &mut moments {
            m.init_facing = init_facing;
            m.backwards = basic.backwards;
        }

        log::debug!(
            "TankDriveTrajectory: projected {} moments with base radius {:.3}",
            moments.len(),
            base_radius
        );

        Ok(Self {
            path: Arc::clone(&basic.path),
            moments,
            specs: basic.specs,
            params: basic.params.clone(),
            init_facing,
            backwards: basic.backwards,
            path_t: Arc::clone(&basic.path_t),
        })
    }

    /// The underlying path, shared with the source trajectory.
    pub fn get_path(&self) -> Arc<Path> {
        Arc::clone(&self.path)
    }

    /// All generated moments in time order.
    pub fn get_moments(&self) -> &[TankDriveMoment] {
        &self.moments
    }

    /// The robot limits the trajectory was generated for.
    pub fn get_specs(&self) -> &RobotSpecs {
        &self.specs
    }

    /// The generation parameters.
    pub fn get_params(&self) -> &TrajectoryParams {
        &self.params
    }

    /// Heading of the first moment of the original, untransformed
    /// trajectory.
    pub fn get_init_facing(&self) -> f64 {
        self.init_facing
    }

    /// Total time needed to drive the trajectory.
    pub fn total_time(&self) -> f64 {
        self.moments[self.moments.len() - 1].time
    }

    fn search_moments(&self, t: f64) -> (usize, usize) {
        let last = self.moments.len() - 1;
        if t >= self.moments[last].time {
            return (last, last);
        }
        if t <= self.moments[0].time {
            return (0, 0);
        }
        let idx = self.moments.partition_point(|m| m.time <= t);
        if self.moments[idx - 1].time == t {
            (idx - 1, idx - 1)
        } else {
            (idx - 1, idx)
        }
    }

    /// Interpolated moment at time `t`. Out-of-range times clamp to the
    /// first or last moment.
    pub fn get(&self, t: f64) -> TankDriveMoment {
        let (lo, hi) = self.search_moments(t);
        if lo == hi {
            let mut m = self.moments[lo];
            m.init_facing = self.init_facing;
            m.backwards = self.backwards;
            return m;
        }

        let a = &self.moments[lo];
        let b = &self.moments[hi];
        let f = (t - a.time) / (b.time - a.time);
        TankDriveMoment {
            l_pos: lerp(a.l_pos, b.l_pos, f),
            r_pos: lerp(a.r_pos, b.r_pos, f),
            l_vel: lerp(a.l_vel, b.l_vel, f),
            r_vel: lerp(a.r_vel, b.r_vel, f),
            l_accel: lerp(a.l_accel, b.l_accel, f),
            r_accel: lerp(a.r_accel, b.r_accel, f),
            heading: lerp_angle(a.heading, b.heading, f),
            time: t,
            init_facing: self.init_facing,
            backwards: self.backwards,
        }
    }

    /// Position and heading of the chassis center on the path at time
    /// `t`.
    pub fn get_pos(&self, t: f64) -> Waypoint {
        let (lo, hi) = self.search_moments(t);
        let pt = if lo == hi {
            self.path_t[lo]
        } else {
            let f = (t - self.moments[lo].time) / (self.moments[hi].time - self.moments[lo].time);
            lerp(self.path_t[lo], self.path_t[hi], f)
        };

        let pos = self.path.at(pt);
        let deriv = self.path.deriv_at(pt);
        Waypoint::new(pos.x, pos.y, deriv.y.atan2(deriv.x))
    }

    /// Left-right mirror image: the wheels swap sides, everything else
    /// is untouched.
    pub fn mirror_lr(&self) -> Result<TankDriveTrajectory> {
        let path = self.path.mirror_lr()?;
        let reference = self.params.waypoints[0].heading;

        let moments = self
            .moments
            .iter()
            .map(|m| TankDriveMoment {
                l_pos: m.r_pos,
                r_pos: m.l_pos,
                l_vel: m.r_vel,
                r_vel: m.l_vel,
                l_accel: m.r_accel,
                r_accel: m.l_accel,
                heading: mirror_angle(m.heading, reference),
                time: m.time,
                init_facing: m.init_facing,
                backwards: m.backwards,
            })
            .collect();

        Ok(Self {
            path: Arc::new(path),
            moments,
            specs: self.specs,
            params: self.params.clone(),
            init_facing: self.init_facing,
            backwards: self.backwards,
            path_t: Arc::clone(&self.path_t),
        })
    }

    /// Front-back mirror image: both wheels drive backwards through the
    /// mirrored curve.
    pub fn mirror_fb(&self) -> Result<TankDriveTrajectory> {
        let path = self.path.mirror_fb()?;
        let wp0_heading = self.params.waypoints[0].heading;
        let reference = canonicalize_angle(wp0_heading + std::f64::consts::PI / 2.0);
        let backwards = !self.backwards;

        let moments = self
            .moments
            .iter()
            .map(|m| TankDriveMoment {
                l_pos: -m.l_pos,
                r_pos: -m.r_pos,
                l_vel: -m.l_vel,
                r_vel: -m.r_vel,
                l_accel: -m.l_accel,
                r_accel: -m.r_accel,
                heading: mirror_angle(m.heading, reference),
                time: m.time,
                init_facing: wp0_heading,
                backwards,
            })
            .collect();

        Ok(Self {
            path: Arc::new(path),
            moments,
            specs: self.specs,
            params: self.params.clone(),
            init_facing: wp0_heading,
            backwards,
            path_t: Arc::clone(&self.path_t),
        })
    }

    /// The trajectory that retraces this one, driving backwards from the
    /// end to the start.
    pub fn retrace(&self) -> Result<TankDriveTrajectory> {
        let path = self.path.retrace()?;
        let last = self.moments[self.moments.len() - 1];
        let init_facing = self.params.waypoints[self.params.waypoints.len() - 1].heading;
        let backwards = !self.backwards;

        let moments = self
            .moments
            .iter()
            .rev()
            .map(|m| TankDriveMoment {
                l_pos: -(last.l_pos - m.l_pos),
                r_pos: -(last.r_pos - m.r_pos),
                l_vel: -m.l_vel,
                r_vel: -m.r_vel,
                // Negated once for driving backwards and once for
                // reversed time
                l_accel: m.l_accel,
                r_accel: m.r_accel,
                heading: -m.heading,
                time: last.time - m.time,
                init_facing,
                backwards,
            })
            .collect();

        let path_t = self.path_t.iter().rev().map(|t| 1.0 - t).collect();

        Ok(Self {
            path: Arc::new(path),
            moments,
            specs: self.specs,
            params: self.params.clone(),
            init_facing,
            backwards,
            path_t: Arc::new(path_t),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PathType;
    use approx::assert_relative_eq;

    fn tank_traj() -> TankDriveTrajectory {
        let specs = RobotSpecs::with_base_width(2.0, 1.0, 1.0);
        let params = TrajectoryParams {
            waypoints: vec![
                Waypoint::new(0.0, 0.0, 0.0),
                Waypoint::new(10.0, 0.0, 0.0),
            ],
            alpha: 5.0,
            sample_count: 101,
            is_tank: true,
            path_type: PathType::Bezier,
        };
        let basic = BasicTrajectory::new(specs, params).unwrap();
        TankDriveTrajectory::from_basic(&basic).unwrap()
    }

    #[test]
    fn test_rejects_non_tank_source() {
        let specs = RobotSpecs::new(2.0, 1.0);
        let params = TrajectoryParams {
            waypoints: vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(5.0, 0.0, 0.0)],
            alpha: 2.5,
            sample_count: 51,
            is_tank: false,
            path_type: PathType::Bezier,
        };
        let basic = BasicTrajectory::new(specs, params).unwrap();
        assert!(matches!(
            TankDriveTrajectory::from_basic(&basic),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_straight_line_wheels_match_center() {
        let traj = tank_traj();
        for m in traj.get_moments() {
            assert_relative_eq!(m.l_vel, m.r_vel, epsilon = 1e-9);
            assert_relative_eq!(m.l_pos, m.r_pos, epsilon = 1e-9);
        }
        let last = traj.get_moments().last().unwrap();
        assert_relative_eq!(last.l_pos, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mirror_lr_swaps_wheels() {
        let traj = tank_traj();
        let mirrored = traj.mirror_lr().unwrap();
        for (a, b) in traj.get_moments().iter().zip(mirrored.get_moments()) {
            assert_relative_eq!(a.l_vel, b.r_vel);
            assert_relative_eq!(a.r_vel, b.l_vel);
            assert_relative_eq!(a.l_pos, b.r_pos);
        }
    }

    #[test]
    fn test_get_interpolates() {
        let traj = tank_traj();
        let moments = traj.get_moments();
        let mid = (moments[40].time + moments[41].time) / 2.0;
        let m = traj.get(mid);
        assert!(m.l_pos > moments[40].l_pos && m.l_pos < moments[41].l_pos);

        // Clamping at both ends
        assert_relative_eq!(traj.get(-5.0).l_pos, 0.0);
        assert_relative_eq!(
            traj.get(traj.total_time() * 2.0).l_pos,
            moments[moments.len() - 1].l_pos
        );
    }
}
