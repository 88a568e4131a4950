//! Center-line trajectory generation.
//!
//! The solver samples the path at uniform arc-length spacing, caps the
//! speed at every sample (tank drives slow down in turns), then runs a
//! forward accelerate pass and a backward decelerate pass before
//! integrating the time axis. The approach follows the classic
//! two-pass profile generator described by FRC Team 254.

use crate::core::math::{curvature, lerp, lerp_angle, mirror_angle};
use crate::error::{Error, Result};
use crate::path::Path;
use crate::trajectory::moment::BasicMoment;
use crate::types::{RobotSpecs, TrajectoryParams, Waypoint};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// A time-parameterized velocity profile over a path.
#[derive(Clone, Debug)]
pub struct BasicTrajectory {
    pub(crate) path: Arc<Path>,
    pub(crate) moments: Vec<BasicMoment>,
    pub(crate) specs: RobotSpecs,
    pub(crate) params: TrajectoryParams,
    pub(crate) init_facing: f64,
    pub(crate) backwards: bool,
    /// Curve parameter of each sample; shared with the tank projection
    /// and with mirrored trajectories.
    pub(crate) path_t: Arc<Vec<f64>>,
    /// Signed radius of curvature of each sample; only present for tank
    /// trajectories.
    pub(crate) path_r: Option<Arc<Vec<f64>>>,
}

impl BasicTrajectory {
    /// Generate a trajectory from robot limits and generation
    /// parameters.
    pub fn new(specs: RobotSpecs, params: TrajectoryParams) -> Result<Self> {
        if params.sample_count < 2 {
            return Err(Error::InvalidInput(format!(
                "sample_count must be at least 2, got {}",
                params.sample_count
            )));
        }
        let tank_base = if params.is_tank {
            match specs.base_width {
                Some(bw) => Some(bw),
                None => {
                    return Err(Error::InvalidInput(
                        "tank trajectory requires base_width in the robot specs".into(),
                    ))
                }
            }
        } else {
            None
        };

        let mut path = Path::new(params.waypoints.clone(), params.alpha, params.path_type)?;
        if let Some(bw) = tank_base {
            path.set_base(bw / 2.0);
        }

        let n = params.sample_count;
        let waypoints = &params.waypoints;

        // Parametric polynomials are far from constant-speed, so iterate
        // over the fraction of total arc length instead of the raw
        // parameter and translate through the lookup table.
        let ds = 1.0 / (n - 1) as f64;
        let total = path.compute_len(n);
        // Distance travelled per iteration
        let dpi = total / (n - 1) as f64;

        // Translate per-waypoint velocity constraints into
        // (path distance, velocity) pairs, ordered by distance.
        let mut constraint_queue: VecDeque<(f64, f64)> = VecDeque::new();
        let wpdt = 1.0 / (waypoints.len() - 1) as f64;
        for (i, wp) in waypoints.iter().enumerate() {
            if let Some(v) = wp.velocity {
                if v.abs() > specs.max_v {
                    return Err(Error::InvalidInput(format!(
                        "waypoint {} velocity constraint {} exceeds the max velocity {}",
                        i, v, specs.max_v
                    )));
                }
                if i > 0 && i < waypoints.len() - 1 {
                    constraint_queue.push_back((path.t2s(i as f64 * wpdt)? * total, v));
                }
            }
        }

        // Per-sample curve parameter, heading, speed cap, and (for tank)
        // signed radius of curvature.
        let mut path_t = Vec::with_capacity(n);
        let mut headings = Vec::with_capacity(n);
        let mut mv = Vec::with_capacity(n);
        let mut path_r: Option<Vec<f64>> = tank_base.map(|_| Vec::with_capacity(n));
        for i in 0..n {
            let t = path.s2t(ds * i as f64)?;
            path_t.push(t);
            let d = path.deriv_at(t);
            headings.push(d.y.atan2(d.x));

            if let (Some(bw), Some(pr)) = (tank_base, path_r.as_mut()) {
                let dd = path.second_deriv_at(t);
                // A straight sample divides by zero curvature; the
                // resulting infinite radius collapses the cap to max_v.
                let r = 1.0 / curvature(d.x, dd.x, d.y, dd.y);
                pr.push(r);
                // The faster wheel runs at max_v while both wheels share
                // the angular velocity v / r, which bounds the chassis
                // speed to max_v / (1 + b / 2|r|).
                mv.push(specs.max_v / (1.0 + bw / (2.0 * r.abs())));
            } else {
                mv.push(specs.max_v);
            }
        }

        // Time differences between neighboring moments, recorded where
        // the passes already know the acceleration; NaN means "derive
        // from constant velocity later".
        let mut time_diff = vec![f64::NAN; n - 1];
        // Moments whose velocity is pinned by a waypoint constraint
        let mut constrained: HashSet<usize> = HashSet::new();
        let mut moments: Vec<BasicMoment> = Vec::with_capacity(n);

        if waypoints[0].velocity.is_some() {
            constrained.insert(0);
        }
        moments.push(BasicMoment::new(
            0.0,
            waypoints[0].velocity.unwrap_or(0.0),
            0.0,
            headings[0],
        ));

        // Forward pass: accelerate as hard as the limits allow.
        for i in 1..n {
            let dist = i as f64 * dpi;

            // Constraints are ordered by distance, so only the front of
            // the queue can become due.
            if let Some(&(c_dist, c_vel)) = constraint_queue.front() {
                if c_dist <= dist {
                    constraint_queue.pop_front();
                    let prev_vel = moments[i - 1].vel;
                    if c_vel > prev_vel {
                        let accel = (c_vel * c_vel - prev_vel * prev_vel) / (2.0 * dpi);
                        if accel > specs.max_a {
                            return Err(Error::ConstraintInfeasible(format!(
                                "waypoint velocity constraint {} cannot be met within max_a {}",
                                c_vel, specs.max_a
                            )));
                        }
                        moments[i - 1].accel = accel;
                        time_diff[i - 1] = (c_vel - prev_vel) / accel;
                    }
                    // A slowdown is handled by the backward pass

                    moments.push(BasicMoment::new(dist, c_vel, 0.0, headings[i]));
                    constrained.insert(i);
                    continue;
                }
            }

            let prev_vel = moments[i - 1].vel;
            if prev_vel < mv[i] {
                let reachable = (prev_vel * prev_vel + 2.0 * specs.max_a * dpi).sqrt();
                let vel = if reachable > mv[i] {
                    // Partial acceleration up to the local cap
                    moments[i - 1].accel =
                        (mv[i] * mv[i] - prev_vel * prev_vel) / (2.0 * dpi);
                    mv[i]
                } else {
                    moments[i - 1].accel = specs.max_a;
                    reachable
                };
                moments.push(BasicMoment::new(dist, vel, 0.0, headings[i]));
                time_diff[i - 1] = (vel - prev_vel) / moments[i - 1].accel;
            } else {
                // Already at the cap; the backward pass owns deceleration
                moments.push(BasicMoment::new(dist, mv[i], 0.0, headings[i]));
            }
        }

        // Pin the final moment before sweeping backwards.
        let last = n - 1;
        moments[last].vel = waypoints[waypoints.len() - 1].velocity.unwrap_or(0.0);
        moments[last].accel = 0.0;

        // Backward pass: wherever the profile has to slow down, walk the
        // deceleration limit back from the target velocity.
        for i in (0..last).rev() {
            if moments[i].vel > moments[i + 1].vel {
                let next_vel = moments[i + 1].vel;
                let reachable = (next_vel * next_vel + 2.0 * specs.max_a * dpi).sqrt();

                let vel = if reachable > moments[i].vel {
                    let accel =
                        (moments[i].vel * moments[i].vel - next_vel * next_vel) / (2.0 * dpi);
                    moments[i].accel = -accel;
                    moments[i].vel
                } else {
                    if constrained.contains(&i) {
                        return Err(Error::ConstraintInfeasible(
                            "waypoint velocity constraint cannot be met while decelerating"
                                .into(),
                        ));
                    }
                    moments[i].accel = -specs.max_a;
                    reachable
                };

                moments[i].vel = vel;
                time_diff[i] = (next_vel - vel) / moments[i].accel;
            }
        }

        let init_facing = moments[0].effective_facing();
        for m in &mut moments {
            m.init_facing = init_facing;
        }

        // Integrate the time axis from the recorded time differences,
        // falling back to constant velocity where no pass set one.
        for i in 1..n {
            let dt = if time_diff[i - 1].is_nan() {
                (moments[i].pos - moments[i - 1].pos) / moments[i - 1].vel
            } else {
                time_diff[i - 1]
            };
            moments[i].time = moments[i - 1].time + dt;
        }

        log::debug!(
            "BasicTrajectory: {} samples over {:.3} units, total time {:.3}s (tank: {})",
            n,
            total,
            moments[last].time,
            params.is_tank
        );

        Ok(Self {
            path: Arc::new(path),
            moments,
            specs,
            params,
            init_facing,
            backwards: false,
            path_t: Arc::new(path_t),
            path_r: path_r.map(Arc::new),
        })
    }

    /// The underlying path, shared with any derived trajectories.
    pub fn get_path(&self) -> Arc<Path> {
        Arc::clone(&self.path)
    }

    /// All generated moments in time order.
    pub fn get_moments(&self) -> &[BasicMoment] {
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

    /// Whether the trajectory carries tank curvature data.
    pub fn is_tank(&self) -> bool {
        self.params.is_tank
    }

    /// Indices of the two moments bracketing time `t`; both equal on an
    /// exact hit or out-of-range clamp.
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
    pub fn get(&self, t: f64) -> BasicMoment {
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
        BasicMoment {
            pos: lerp(a.pos, b.pos, f),
            vel: lerp(a.vel, b.vel, f),
            accel: lerp(a.accel, b.accel, f),
            heading: lerp_angle(a.heading, b.heading, f),
            time: t,
            init_facing: self.init_facing,
            backwards: self.backwards,
        }
    }

    /// Position and heading on the path at time `t`, resolved through
    /// the per-sample curve parameters.
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

    /// Left-right mirror image: every left turn becomes a right turn.
    /// The velocity profile is untouched.
    pub fn mirror_lr(&self) -> Result<BasicTrajectory> {
        let path = self.path.mirror_lr()?;
        let reference = self.params.waypoints[0].heading;

        let moments = self
            .moments
            .iter()
            .map(|m| {
                let mut nm = *m;
                nm.heading = mirror_angle(m.heading, reference);
                nm.init_facing = reference;
                nm
            })
            .collect();

        Ok(Self {
            path: Arc::new(path),
            init_facing: reference,
            moments,
            specs: self.specs,
            params: self.params.clone(),
            backwards: self.backwards,
            path_t: Arc::clone(&self.path_t),
            // Mirroring flips every turn direction
            path_r: self
                .path_r
                .as_ref()
                .map(|pr| Arc::new(pr.iter().map(|r| -r).collect())),
        })
    }

    /// Front-back mirror image: every forward movement becomes a
    /// backward movement.
    pub fn mirror_fb(&self) -> Result<BasicTrajectory> {
        let path = self.path.mirror_fb()?;
        let wp0_heading = self.params.waypoints[0].heading;
        let reference = wp0_heading + std::f64::consts::PI / 2.0;
        let backwards = !self.backwards;

        let moments = self
            .moments
            .iter()
            .map(|m| BasicMoment {
                pos: -m.pos,
                vel: -m.vel,
                accel: m.accel,
                heading: mirror_angle(m.heading, reference),
                time: m.time,
                init_facing: wp0_heading,
                backwards,
            })
            .collect();

        Ok(Self {
            path: Arc::new(path),
            init_facing: wp0_heading,
            moments,
            specs: self.specs,
            params: self.params.clone(),
            backwards,
            path_t: Arc::clone(&self.path_t),
            path_r: self
                .path_r
                .as_ref()
                .map(|pr| Arc::new(pr.iter().map(|r| -r).collect())),
        })
    }

    /// The trajectory that drives backwards along the same curve from
    /// the end to the start, returning the robot to where it began.
    pub fn retrace(&self) -> Result<BasicTrajectory> {
        let path = self.path.retrace()?;
        let last = self.moments[self.moments.len() - 1];
        let init_facing = self.params.waypoints[self.params.waypoints.len() - 1].heading;
        let backwards = !self.backwards;

        let moments: Vec<BasicMoment> = self
            .moments
            .iter()
            .rev()
            .map(|m| BasicMoment {
                pos: -(last.pos - m.pos),
                vel: -m.vel,
                accel: m.accel,
                heading: -m.heading,
                time: last.time - m.time,
                init_facing,
                backwards,
            })
            .collect();

        // The reversed curve runs its parameter the opposite way, and
        // reversing the travel direction flips every curvature sign.
        let path_t = self.path_t.iter().rev().map(|t| 1.0 - t).collect();
        let path_r = self
            .path_r
            .as_ref()
            .map(|pr| Arc::new(pr.iter().rev().map(|r| -r).collect()));

        Ok(Self {
            path: Arc::new(path),
            init_facing,
            moments,
            specs: self.specs,
            params: self.params.clone(),
            backwards,
            path_t: Arc::new(path_t),
            path_r,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PathType;
    use approx::assert_relative_eq;

    fn straight_params(len: f64, samples: usize) -> TrajectoryParams {
        TrajectoryParams {
            waypoints: vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(len, 0.0, 0.0)],
            alpha: len / 2.0,
            sample_count: samples,
            is_tank: false,
            path_type: PathType::Bezier,
        }
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let specs = RobotSpecs::new(2.0, 1.0);
        let mut params = straight_params(10.0, 101);
        params.sample_count = 1;
        assert!(matches!(
            BasicTrajectory::new(specs, params),
            Err(Error::InvalidInput(_))
        ));

        let mut params = straight_params(10.0, 101);
        params.is_tank = true;
        assert!(matches!(
            BasicTrajectory::new(specs, params.clone()),
            Err(Error::InvalidInput(_))
        ));

        params.is_tank = false;
        params.waypoints[1].velocity = Some(5.0);
        assert!(matches!(
            BasicTrajectory::new(specs, params),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_moment_times_strictly_increase() {
        let traj =
            BasicTrajectory::new(RobotSpecs::new(2.0, 1.0), straight_params(10.0, 101)).unwrap();
        for pair in traj.get_moments().windows(2) {
            assert!(pair[1].time > pair[0].time);
        }
    }

    #[test]
    fn test_velocity_and_accel_caps() {
        let specs = RobotSpecs::new(2.0, 1.0);
        let traj = BasicTrajectory::new(specs, straight_params(10.0, 101)).unwrap();
        for m in traj.get_moments() {
            assert!(m.vel.abs() <= specs.max_v + 1e-9);
            assert!(m.accel.abs() <= specs.max_a + 1e-9);
        }
    }

    #[test]
    fn test_get_clamps_out_of_range() {
        let traj =
            BasicTrajectory::new(RobotSpecs::new(2.0, 1.0), straight_params(10.0, 101)).unwrap();
        let before = traj.get(-1.0);
        assert_relative_eq!(before.pos, 0.0);
        let after = traj.get(traj.total_time() + 1.0);
        assert_relative_eq!(after.pos, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_get_interpolates_between_moments() {
        let traj =
            BasicTrajectory::new(RobotSpecs::new(2.0, 1.0), straight_params(10.0, 101)).unwrap();
        let moments = traj.get_moments();
        let mid = (moments[10].time + moments[11].time) / 2.0;
        let m = traj.get(mid);
        assert!(m.pos > moments[10].pos && m.pos < moments[11].pos);
        assert_relative_eq!(m.time, mid);
    }

    #[test]
    fn test_get_pos_tracks_path() {
        let traj =
            BasicTrajectory::new(RobotSpecs::new(2.0, 1.0), straight_params(10.0, 101)).unwrap();
        let start = traj.get_pos(0.0);
        assert_relative_eq!(start.x, 0.0, epsilon = 1e-9);
        let end = traj.get_pos(traj.total_time());
        assert_relative_eq!(end.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(end.heading, 0.0, epsilon = 1e-9);
    }
}
