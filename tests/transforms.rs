//! Transform-law tests: mirrors and retrace must compose back to the
//! original trajectory.

use approx::assert_relative_eq;
use marga_traj::{
    BasicTrajectory, PathType, RobotSpecs, TankDriveTrajectory, TrajectoryParams, Waypoint,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::{FRAC_PI_2, PI};

fn curved_basic(is_tank: bool) -> BasicTrajectory {
    let specs = RobotSpecs::with_base_width(2.0, 1.0, 0.8);
    let params = TrajectoryParams {
        waypoints: vec![
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(6.0, 4.0, FRAC_PI_2),
        ],
        alpha: 5.0,
        sample_count: 201,
        is_tank,
        path_type: PathType::QuinticHermite,
    };
    BasicTrajectory::new(specs, params).unwrap()
}

fn curved_tank() -> TankDriveTrajectory {
    TankDriveTrajectory::from_basic(&curved_basic(true)).unwrap()
}

#[test]
fn basic_mirror_lr_twice_is_identity() {
    let traj = curved_basic(false);
    let back = traj.mirror_lr().unwrap().mirror_lr().unwrap();

    for (a, b) in traj.get_moments().iter().zip(back.get_moments()) {
        assert_relative_eq!(a.pos, b.pos, epsilon = 1e-9);
        assert_relative_eq!(a.vel, b.vel, epsilon = 1e-9);
        assert_relative_eq!(a.accel, b.accel, epsilon = 1e-9);
        assert_relative_eq!(a.heading, b.heading, epsilon = 1e-9);
        assert_relative_eq!(a.time, b.time, epsilon = 1e-9);
    }
}

#[test]
fn basic_mirror_lr_preserves_profile() {
    let traj = curved_basic(false);
    let mirrored = traj.mirror_lr().unwrap();

    for (a, b) in traj.get_moments().iter().zip(mirrored.get_moments()) {
        assert_relative_eq!(a.pos, b.pos);
        assert_relative_eq!(a.vel, b.vel);
        assert_relative_eq!(a.time, b.time);
    }
    // Headings mirror about the initial heading (zero here)
    let a = traj.get(traj.total_time() / 3.0);
    let b = mirrored.get(traj.total_time() / 3.0);
    assert_relative_eq!(a.heading, -b.heading, epsilon = 1e-9);
}

#[test]
fn basic_mirror_fb_twice_restores_everything() {
    let traj = curved_basic(false);
    let once = traj.mirror_fb().unwrap();
    let back = once.mirror_fb().unwrap();

    // One application reverses the driving direction
    assert!(once.get_moments()[0].backwards);
    assert!(once.get_path().get_backwards());
    for (a, b) in traj.get_moments().iter().zip(once.get_moments()) {
        assert_relative_eq!(a.pos, -b.pos, epsilon = 1e-9);
        assert_relative_eq!(a.vel, -b.vel, epsilon = 1e-9);
        assert_relative_eq!(a.accel, b.accel, epsilon = 1e-9);
    }

    // Two applications restore the original
    assert!(!back.get_moments()[0].backwards);
    for (a, b) in traj.get_moments().iter().zip(back.get_moments()) {
        assert_relative_eq!(a.pos, b.pos, epsilon = 1e-9);
        assert_relative_eq!(a.vel, b.vel, epsilon = 1e-9);
        assert_relative_eq!(a.heading, b.heading, epsilon = 1e-9);
        assert_relative_eq!(a.time, b.time, epsilon = 1e-9);
    }
}

#[test]
fn basic_retrace_symmetry() {
    let traj = curved_basic(false);
    let traced = traj.retrace().unwrap();

    assert_relative_eq!(traced.total_time(), traj.total_time(), epsilon = 1e-9);

    let total = traj.total_time();
    let end_pos = traj.get_moments().last().unwrap().pos;
    for i in 0..=20 {
        let tau = total * i as f64 / 20.0;
        let fwd = traj.get(tau);
        let rev = traced.get(total - tau);
        assert_relative_eq!(rev.pos, -(end_pos - fwd.pos), epsilon = 1e-6);
        assert_relative_eq!(rev.vel, -fwd.vel, epsilon = 1e-6);
    }
}

#[test]
fn basic_retrace_twice_restores_profile() {
    let traj = curved_basic(false);
    let back = traj.retrace().unwrap().retrace().unwrap();

    assert_relative_eq!(back.total_time(), traj.total_time(), epsilon = 1e-9);
    for (a, b) in traj.get_moments().iter().zip(back.get_moments()) {
        assert_relative_eq!(a.pos, b.pos, epsilon = 1e-9);
        assert_relative_eq!(a.vel, b.vel, epsilon = 1e-9);
        assert_relative_eq!(a.accel, b.accel, epsilon = 1e-9);
        assert_relative_eq!(a.heading, b.heading, epsilon = 1e-9);
        assert_relative_eq!(a.time, b.time, epsilon = 1e-9);
    }
    assert!(!back.get_moments()[0].backwards);
}

#[test]
fn tank_mirror_lr_twice_is_identity() {
    let tank = curved_tank();
    let back = tank.mirror_lr().unwrap().mirror_lr().unwrap();

    for (a, b) in tank.get_moments().iter().zip(back.get_moments()) {
        assert_relative_eq!(a.l_pos, b.l_pos, epsilon = 1e-9);
        assert_relative_eq!(a.r_pos, b.r_pos, epsilon = 1e-9);
        assert_relative_eq!(a.l_vel, b.l_vel, epsilon = 1e-9);
        assert_relative_eq!(a.r_vel, b.r_vel, epsilon = 1e-9);
        assert_relative_eq!(a.heading, b.heading, epsilon = 1e-9);
    }
}

#[test]
fn tank_mirror_fb_twice_is_identity() {
    let tank = curved_tank();
    let once = tank.mirror_fb().unwrap();
    let back = once.mirror_fb().unwrap();

    for (a, b) in tank.get_moments().iter().zip(once.get_moments()) {
        assert_relative_eq!(a.l_vel, -b.l_vel, epsilon = 1e-9);
        assert_relative_eq!(a.r_vel, -b.r_vel, epsilon = 1e-9);
    }
    for (a, b) in tank.get_moments().iter().zip(back.get_moments()) {
        assert_relative_eq!(a.l_pos, b.l_pos, epsilon = 1e-9);
        assert_relative_eq!(a.r_pos, b.r_pos, epsilon = 1e-9);
        assert_relative_eq!(a.l_vel, b.l_vel, epsilon = 1e-9);
        assert_relative_eq!(a.r_vel, b.r_vel, epsilon = 1e-9);
        assert_relative_eq!(a.l_accel, b.l_accel, epsilon = 1e-9);
        assert_relative_eq!(a.heading, b.heading, epsilon = 1e-9);
    }
}

#[test]
fn tank_retrace_reverses_wheel_motion() {
    let tank = curved_tank();
    let traced = tank.retrace().unwrap();

    assert_relative_eq!(traced.total_time(), tank.total_time(), epsilon = 1e-9);

    let orig = tank.get_moments();
    let rev = traced.get_moments();
    let last = orig.last().unwrap();
    let n = orig.len();
    for i in 0..n {
        let a = &orig[n - 1 - i];
        let b = &rev[i];
        assert_relative_eq!(b.l_pos, -(last.l_pos - a.l_pos), epsilon = 1e-9);
        assert_relative_eq!(b.r_pos, -(last.r_pos - a.r_pos), epsilon = 1e-9);
        assert_relative_eq!(b.l_vel, -a.l_vel, epsilon = 1e-9);
        assert_relative_eq!(b.r_vel, -a.r_vel, epsilon = 1e-9);
        assert_relative_eq!(b.time, last.time - a.time, epsilon = 1e-9);
    }

    let back = traced.retrace().unwrap();
    for (a, b) in tank.get_moments().iter().zip(back.get_moments()) {
        assert_relative_eq!(a.l_pos, b.l_pos, epsilon = 1e-9);
        assert_relative_eq!(a.l_vel, b.l_vel, epsilon = 1e-9);
        assert_relative_eq!(a.r_accel, b.r_accel, epsilon = 1e-9);
        assert_relative_eq!(a.heading, b.heading, epsilon = 1e-9);
    }
}

#[test]
fn tank_wheel_average_matches_center_line() {
    let basic = curved_basic(true);
    let tank = TankDriveTrajectory::from_basic(&basic).unwrap();

    for (bm, tm) in basic.get_moments().iter().zip(tank.get_moments()).skip(1) {
        assert_relative_eq!((tm.l_vel + tm.r_vel) / 2.0, bm.vel, epsilon = 1e-9);
    }
}

#[test]
fn random_trajectories_satisfy_invariants() {
    let mut rng = StdRng::seed_from_u64(0x6d61726761);

    for case in 0..10 {
        let max_v = rng.gen_range(1.0..4.0);
        let max_a = rng.gen_range(0.5..2.0);
        let specs = RobotSpecs::new(max_v, max_a);

        let mut waypoints = vec![Waypoint::new(0.0, 0.0, rng.gen_range(-PI..PI))];
        let count = rng.gen_range(2..4);
        let mut x = 0.0;
        let mut y = 0.0;
        for _ in 1..=count {
            x += rng.gen_range(3.0..8.0);
            y += rng.gen_range(-4.0..4.0);
            waypoints.push(Waypoint::new(x, y, rng.gen_range(-1.0..1.0)));
        }

        let params = TrajectoryParams {
            waypoints,
            alpha: rng.gen_range(3.0..8.0),
            sample_count: 201,
            is_tank: false,
            path_type: PathType::QuinticHermite,
        };
        let traj = match BasicTrajectory::new(specs, params) {
            Ok(t) => t,
            Err(e) => panic!("case {} failed to generate: {}", case, e),
        };

        for pair in traj.get_moments().windows(2) {
            assert!(pair[1].time > pair[0].time, "case {}: time not increasing", case);
        }
        for m in traj.get_moments() {
            assert!(m.vel.abs() <= max_v + 1e-9, "case {}: velocity cap", case);
            assert!(m.accel.abs() <= max_a + 1e-9, "case {}: accel cap", case);
        }

        // The transform laws hold for arbitrary inputs
        let back = traj.mirror_lr().unwrap().mirror_lr().unwrap();
        for (a, b) in traj.get_moments().iter().zip(back.get_moments()) {
            assert_relative_eq!(a.heading, b.heading, epsilon = 1e-9);
        }
        let traced = traj.retrace().unwrap();
        assert_relative_eq!(traced.total_time(), traj.total_time(), epsilon = 1e-9);
    }
}
