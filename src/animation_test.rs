#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::Size;
use crate::viewport::Stages;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn staged(id: u32) -> Viewport {
    let mut v = Viewport::new(ViewportId(id), Size::new(800.0, 600.0), false);
    v.stages = Stages {
        start: Snapshot::new(2.0, 10.0, 20.0),
        middle_out: Snapshot::new(0.5, 100.0, 200.0),
        middle_in: Snapshot::new(0.5, -100.0, 50.0),
        finish: Snapshot::new(1.6, 50.0, 48.75),
    };
    v
}

// =============================================================
// lifecycle
// =============================================================

#[test]
fn idle_animator_reports_idle() {
    let mut a = Animator::new();
    assert!(!a.is_running());
    assert_eq!(a.timer(), None);
    assert_eq!(a.tick(10.0, &mut []), Tick::Idle);
}

#[test]
fn start_claims_viewports_and_issues_timer() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1), staged(2)];
    let h = a.start(AnimationKind::DirectFit, 0, 1, 1500.0, 0.0, &mut vs);
    assert_eq!(a.timer(), Some(h));
    assert_eq!(a.kind(), Some(AnimationKind::DirectFit));
    assert!(vs.iter().all(|v| v.writer() == Writer::Animation));
}

#[test]
fn restart_cancels_previous_timer() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    let first = a.start(AnimationKind::TwoHopFly, 0, 1, 3000.0, 0.0, &mut vs);
    let second = a.start(AnimationKind::DirectFit, 1, 0, 1500.0, 100.0, &mut vs);
    assert_ne!(first, second);
    assert_eq!(a.timer(), Some(second));
    assert_eq!(a.kind(), Some(AnimationKind::DirectFit));
}

#[test]
fn cancel_leaves_no_timer_and_releases_viewports() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::TwoHopFly, 0, 1, 3000.0, 0.0, &mut vs);
    a.tick(700.0, &mut vs);
    let mid = vs[0].snapshot();
    a.cancel(&mut vs);
    assert_eq!(a.timer(), None);
    assert!(!a.is_running());
    assert_eq!(vs[0].writer(), Writer::Input);
    assert_eq!(vs[0].snapshot(), mid);
    assert_eq!(a.tick(800.0, &mut vs), Tick::Idle);
}

#[test]
fn finish_clears_timer() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::DirectFit, 0, 1, 1500.0, 0.0, &mut vs);
    assert_eq!(a.tick(1500.0, &mut vs), Tick::Finished { level: 1 });
    assert_eq!(a.timer(), None);
    assert_eq!(vs[0].writer(), Writer::Input);
}

// =============================================================
// DirectFit
// =============================================================

#[test]
fn direct_fit_percent_zero_is_middle() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::DirectFit, 0, 1, 1500.0, 0.0, &mut vs);
    assert_eq!(vs[0].snapshot(), vs[0].stages.middle_in);
    assert_eq!(a.tick(0.0, &mut vs), Tick::Running { active_level: 1 });
    assert_eq!(vs[0].snapshot(), vs[0].stages.middle_in);
}

#[test]
fn direct_fit_scale_linear_shift_cube_root() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::DirectFit, 0, 1, 1000.0, 0.0, &mut vs);
    a.tick(125.0, &mut vs);
    let v = &vs[0];
    // percent 0.125: cube root is 0.5.
    assert!(approx_eq(v.scale, 0.5 + (1.6 - 0.5) * 0.125));
    assert!(approx_eq(v.shift_x, -100.0 + 150.0 * 0.5));
    assert!(approx_eq(v.shift_y, 50.0 + (48.75 - 50.0) * 0.5));
}

#[test]
fn direct_fit_accumulates_elapsed_time() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::DirectFit, 0, 1, 1500.0, 1000.0, &mut vs);
    for t in [1016.0, 1033.0, 1050.0] {
        assert!(matches!(a.tick(t, &mut vs), Tick::Running { .. }));
    }
    assert!(approx_eq(vs[0].scale, 0.5 + 1.1 * (50.0 / 1500.0)));
}

#[test]
fn direct_fit_end_is_exact_finish() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::DirectFit, 0, 1, 1500.0, 0.0, &mut vs);
    let mut t = 0.0;
    loop {
        t += 1000.0 / 60.0;
        if let Tick::Finished { .. } = a.tick(t, &mut vs) {
            break;
        }
    }
    assert_eq!(vs[0].snapshot(), vs[0].stages.finish);
}

// =============================================================
// TwoHopFly
// =============================================================

#[test]
fn two_hop_starts_at_start_on_origin_level() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::TwoHopFly, 2, 0, 3000.0, 0.0, &mut vs);
    assert_eq!(vs[0].snapshot(), vs[0].stages.start);
    assert_eq!(a.tick(0.0, &mut vs), Tick::Running { active_level: 2 });
}

#[test]
fn two_hop_first_half_heads_to_overview() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::TwoHopFly, 2, 0, 3000.0, 0.0, &mut vs);
    assert_eq!(a.tick(750.0, &mut vs), Tick::Running { active_level: 2 });
    let expected = vs[0].stages.start.lerp(&vs[0].stages.middle_out, 0.5);
    assert_eq!(vs[0].snapshot(), expected);
}

#[test]
fn two_hop_switches_level_at_midpoint() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::TwoHopFly, 2, 0, 3000.0, 0.0, &mut vs);
    assert_eq!(a.tick(1499.0, &mut vs), Tick::Running { active_level: 2 });
    assert_eq!(a.tick(1500.0, &mut vs), Tick::Running { active_level: 0 });
    assert_eq!(vs[0].snapshot(), vs[0].stages.middle_in);
}

#[test]
fn two_hop_second_half_heads_to_finish() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::TwoHopFly, 2, 0, 3000.0, 0.0, &mut vs);
    a.tick(2250.0, &mut vs);
    let expected = vs[0].stages.middle_in.lerp(&vs[0].stages.finish, 0.5);
    assert_eq!(vs[0].snapshot(), expected);
}

#[test]
fn two_hop_overshoot_snaps_to_finish() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::TwoHopFly, 2, 0, 3000.0, 0.0, &mut vs);
    assert_eq!(a.tick(5000.0, &mut vs), Tick::Finished { level: 0 });
    assert_eq!(vs[0].snapshot(), vs[0].stages.finish);
}

// =============================================================
// viewport scoping
// =============================================================

#[test]
fn only_claimed_viewports_are_driven() {
    let mut a = Animator::new();
    let mut claimed = vec![staged(1)];
    a.start(AnimationKind::DirectFit, 0, 1, 1000.0, 0.0, &mut claimed);

    let mut all = vec![claimed.remove(0), staged(9)];
    let untouched = all[1].snapshot();
    a.tick(500.0, &mut all);
    assert_eq!(all[1].snapshot(), untouched);
    assert_ne!(all[0].snapshot(), all[0].stages.middle_in);
}

#[test]
fn clock_going_backwards_does_not_rewind() {
    let mut a = Animator::new();
    let mut vs = vec![staged(1)];
    a.start(AnimationKind::DirectFit, 0, 1, 1000.0, 500.0, &mut vs);
    a.tick(700.0, &mut vs);
    let at = vs[0].scale;
    a.tick(600.0, &mut vs);
    assert_eq!(vs[0].scale, at);
}
