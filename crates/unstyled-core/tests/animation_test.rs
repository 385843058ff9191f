//! Integration tests for the animation module.

use std::time::Duration;

use unstyled_core::animation::*;

const MS_16: Duration = Duration::from_millis(16);

fn drive(motion: &mut dyn Motion, frames: usize) -> Vec<f64> {
    (0..frames)
        .map(|_| {
            motion.tick(MS_16);
            motion.position()
        })
        .collect()
}

#[test]
fn tween_is_monotonic_without_overshooting_easing() {
    for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
        let mut motion =
            AnimationSpec::tween(Duration::from_millis(250), easing).start(0.0, 100.0, 0.0);
        let mut prev = motion.position();
        for pos in drive(motion.as_mut(), 20) {
            assert!(pos >= prev - 1e-9, "{easing:?} went backwards: {prev} -> {pos}");
            prev = pos;
        }
        assert_eq!(prev, 100.0);
    }
}

#[test]
fn interrupting_a_tween_with_a_spring_is_continuous() {
    let mut first = AnimationSpec::default().start(0.0, 200.0, 0.0);
    drive(first.as_mut(), 6);
    let (pos, vel) = (first.position(), first.velocity());

    let second = AnimationSpec::spring(400.0, 40.0).start(pos, 0.0, vel);
    assert_eq!(second.position(), pos, "restart must begin at the interrupted position");
    assert_eq!(second.velocity(), vel, "spring must inherit the interrupted velocity");
}

#[test]
fn decay_projection_is_reached_by_integration() {
    let decay = DecaySpec::default();
    let projected = decay.project(-1500.0, 400.0);
    let mut t = 0.0;
    let mut pos = 400.0;
    while t < 5.0 {
        t += 0.016;
        pos = decay.position_at(-1500.0, 400.0, t);
    }
    assert!((pos - projected).abs() < 1.0, "{pos} vs {projected}");
}

#[test]
fn unbounded_frame_delta_completes_every_motion() {
    for spec in [
        AnimationSpec::default(),
        AnimationSpec::spring(0.1, 0.0),
        AnimationSpec::critically_damped(400.0),
    ] {
        let mut motion = spec.start(0.0, 100.0, 0.0);
        motion.tick(MS_16);
        motion.tick(Duration::MAX);
        assert!(motion.is_complete(), "{spec:?} still running");
        assert_eq!(motion.position(), 100.0);
    }
}
