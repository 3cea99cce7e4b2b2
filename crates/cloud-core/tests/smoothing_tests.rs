// Host-side tests for the per-tick smoothing engine.

use cloud_core::{
    lerp_step, ticks_to_within, GestureState, Smoothed, SmoothingConfig, SmoothingEngine,
};
use std::f32::consts::TAU;

fn engine(count: usize) -> SmoothingEngine {
    SmoothingEngine::new(SmoothingConfig::default(), count)
}

#[test]
fn hundred_ticks_close_most_of_the_gap() {
    let mut ch = Smoothed {
        current: 0.0,
        target: 5.0,
    };
    for _ in 0..100 {
        ch.step(0.1);
    }
    assert!(ch.current > 4.9, "current {}", ch.current);
    assert!(ch.current <= 5.0);
}

#[test]
fn deviation_decays_geometrically() {
    let alpha = 0.08;
    let mut ch = Smoothed {
        current: -3.0,
        target: 2.0,
    };
    let mut prev = ch.deviation();
    for _ in 0..50 {
        ch.step(alpha);
        let dev = ch.deviation();
        assert!((dev - prev * (1.0 - alpha)).abs() < 1e-4);
        prev = dev;
    }
}

#[test]
fn tick_estimate_brings_unit_deviation_below_epsilon() {
    for (alpha, eps) in [(0.05f32, 0.01f32), (0.1, 0.001), (0.2, 0.3), (0.06, 1e-2)] {
        let k = ticks_to_within(alpha, eps);
        let mut ch = Smoothed {
            current: 0.0,
            target: 1.0,
        };
        for _ in 0..k {
            ch.step(alpha);
        }
        assert!(ch.deviation() < eps, "alpha={} eps={} k={}", alpha, eps, k);
        if k > 1 {
            // one tick fewer is not enough
            let mut short = Smoothed {
                current: 0.0,
                target: 1.0,
            };
            for _ in 0..k - 1 {
                short.step(alpha);
            }
            assert!(short.deviation() >= eps * 0.999);
        }
    }
    assert_eq!(ticks_to_within(0.5, 1.0), 0);
    assert_eq!(ticks_to_within(1.0, 0.01), 1);
}

#[test]
fn lerp_step_is_exact_at_alpha_one() {
    assert_eq!(lerp_step(3.0, 7.0, 1.0), 7.0);
    assert_eq!(lerp_step(3.0, 7.0, 0.5), 5.0);
}

#[test]
fn positions_chase_scaled_targets() {
    let mut e = engine(2);
    e.retarget(&[1.0, 2.0, 3.0, -1.0, -2.0, -3.0]);
    let mut state = GestureState::new(1.0, 0.1);
    state.scale_current = 2.0;
    state.scale_target = 2.0;
    for _ in 0..400 {
        e.advance(&mut state);
    }
    let expected: [f32; 6] = [2.0, 4.0, 6.0, -2.0, -4.0, -6.0];
    for (got, want) in e.positions().iter().zip(expected) {
        assert!((got - want).abs() < 1e-3, "{} vs {}", got, want);
    }
}

#[test]
fn scale_is_smoothed_before_positions() {
    let mut e = engine(1);
    e.retarget(&[1.0, 0.0, 0.0]);
    e.current_mut().copy_from_slice(&[1.0, 0.0, 0.0]);
    let mut state = GestureState::new(1.0, 0.1);
    state.scale_target = 3.0;
    e.advance(&mut state);
    let alpha_s = SmoothingConfig::default().scale_alpha;
    let alpha_p = SmoothingConfig::default().position_alpha;
    let scale = 1.0 + alpha_s * 2.0;
    assert!((state.scale_current - scale).abs() < 1e-6);
    let x = 1.0 + alpha_p * (scale - 1.0);
    assert!((e.positions()[0] - x).abs() < 1e-6);
}

#[test]
fn retarget_ignores_length_mismatch() {
    let mut e = engine(2);
    e.retarget(&[1.0; 9]);
    assert_eq!(e.targets().len(), 6);
    assert!(e.targets().iter().all(|v| *v == 1.0));
    e.retarget(&[2.0; 3]);
    assert_eq!(e.targets(), &[2.0, 2.0, 2.0, 1.0, 1.0, 1.0]);
}

#[test]
fn auto_rotation_advances_only_without_hand() {
    let mut e = engine(1);
    let mut state = GestureState::new(1.0, 0.1);
    let step = e.config().auto_rotation_step;
    e.advance(&mut state);
    assert!((state.auto_rotation_angle - step).abs() < 1e-7);

    state.hand_detected = true;
    let frozen = state.auto_rotation_angle;
    for _ in 0..10 {
        e.advance(&mut state);
    }
    assert_eq!(state.auto_rotation_angle, frozen);
}

#[test]
fn auto_rotation_wraps_into_full_turn() {
    let mut e = engine(1);
    let mut state = GestureState::new(1.0, 0.1);
    state.auto_rotation_angle = TAU - 1e-4;
    e.advance(&mut state);
    assert!(state.auto_rotation_angle >= 0.0 && state.auto_rotation_angle < TAU);
    assert!(state.auto_rotation_angle < 0.01);
}

#[test]
fn idle_tilt_is_smoothed_not_snapped() {
    let mut e = engine(1);
    let mut state = GestureState::new(1.0, 0.1);
    e.set_idle_tilt([0.5, 0.2]);
    e.advance(&mut state);
    let tilt = e.tilt();
    let alpha = e.config().tilt_alpha;
    assert!((tilt[0] - 0.5 * alpha).abs() < 1e-6);
    assert!((tilt[1] - 0.2 * alpha).abs() < 1e-6);
    let rot = e.rotation(&state);
    assert!((rot[0] - tilt[0]).abs() < 1e-6);
    assert!((rot[2] - tilt[1]).abs() < 1e-6);
}

#[test]
fn idle_tilt_rests_while_a_hand_is_detected() {
    let mut e = engine(1);
    let mut state = GestureState::new(1.0, 0.1);
    e.set_idle_tilt([0.5, 0.2]);
    for _ in 0..400 {
        e.advance(&mut state);
    }
    state.hand_detected = true;
    e.advance(&mut state);
    let alpha = e.config().tilt_alpha;
    assert!((e.tilt()[0] - 0.5 * (1.0 - alpha)).abs() < 1e-4);
    for _ in 0..400 {
        e.advance(&mut state);
    }
    assert!(e.tilt()[0].abs() < 1e-4 && e.tilt()[1].abs() < 1e-4);
    assert_eq!(e.idle_tilt(), [0.5, 0.2]);

    state.hand_detected = false;
    e.advance(&mut state);
    assert!((e.tilt()[0] - 0.5 * alpha).abs() < 1e-4);
}

#[test]
fn rotation_combines_gesture_and_idle_spin() {
    let e = engine(1);
    let mut state = GestureState::new(1.0, 0.1);
    state.rotation_x_current = 0.3;
    state.rotation_y_current = -0.2;
    state.auto_rotation_angle = 1.0;
    let rot = e.rotation(&state);
    assert!((rot[0] - 0.3).abs() < 1e-6);
    assert!((rot[1] - 0.8).abs() < 1e-6);
}
