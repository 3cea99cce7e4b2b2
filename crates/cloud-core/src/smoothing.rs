//! Per-tick exponential smoothing of every visual channel.
//!
//! Each channel moves a fixed fraction `α` of its remaining distance per tick:
//! `current += α·(target − current)`. The particle channel chases
//! `pattern_target × scale_current`, and the scale itself is smoothed first,
//! so position lags an already-lagging scaled target.

use crate::config::SmoothingConfig;
use crate::state::GestureState;
use std::f32::consts::TAU;

/// One first-order low-pass step.
#[inline]
pub fn lerp_step(current: f32, target: f32, alpha: f32) -> f32 {
    current + alpha * (target - current)
}

/// Ticks needed for a unit deviation to fall below `epsilon` at factor `alpha`.
///
/// Returns 0 when no ticks are needed and 1 when `alpha` is 1.
pub fn ticks_to_within(alpha: f32, epsilon: f32) -> u32 {
    if epsilon >= 1.0 {
        return 0;
    }
    if alpha >= 1.0 {
        return 1;
    }
    let k = (f64::from(epsilon).ln() / f64::from(1.0 - alpha).ln()).ceil();
    k.max(1.0) as u32
}

/// A scalar channel with its own target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Smoothed {
    pub current: f32,
    pub target: f32,
}

impl Smoothed {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    pub fn step(&mut self, alpha: f32) -> f32 {
        self.current = lerp_step(self.current, self.target, alpha);
        self.current
    }

    pub fn deviation(&self) -> f32 {
        (self.target - self.current).abs()
    }
}

pub struct SmoothingEngine {
    config: SmoothingConfig,
    current: Vec<f32>,
    target: Vec<f32>,
    idle_tilt: [f32; 2],
    tilt_x: Smoothed,
    tilt_z: Smoothed,
}

impl SmoothingEngine {
    pub fn new(config: SmoothingConfig, particle_count: usize) -> Self {
        Self {
            config,
            current: vec![0.0; particle_count * 3],
            target: vec![0.0; particle_count * 3],
            idle_tilt: [0.0, 0.0],
            tilt_x: Smoothed::default(),
            tilt_z: Smoothed::default(),
        }
    }

    pub fn particle_count(&self) -> usize {
        self.target.len() / 3
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Replace the unscaled pattern targets. Extra or missing entries are
    /// ignored so the buffer length never changes mid-session.
    pub fn retarget(&mut self, pattern_positions: &[f32]) {
        if pattern_positions.len() != self.target.len() {
            log::warn!(
                "[smoothing] target buffer has {} floats, expected {}",
                pattern_positions.len(),
                self.target.len()
            );
        }
        let n = pattern_positions.len().min(self.target.len());
        self.target[..n].copy_from_slice(&pattern_positions[..n]);
    }

    /// Mutable access to the current positions, used to seed entry animations.
    pub fn current_mut(&mut self) -> &mut [f32] {
        &mut self.current
    }

    pub fn positions(&self) -> &[f32] {
        &self.current
    }

    pub fn targets(&self) -> &[f32] {
        &self.target
    }

    /// Resting tilt of the current pattern. Only applied while no hand is
    /// driving the rotation.
    pub fn set_idle_tilt(&mut self, tilt: [f32; 2]) {
        self.idle_tilt = tilt;
    }

    pub fn idle_tilt(&self) -> [f32; 2] {
        self.idle_tilt
    }

    pub fn tilt(&self) -> [f32; 2] {
        [self.tilt_x.current, self.tilt_z.current]
    }

    /// Advance every channel by one tick.
    pub fn advance(&mut self, state: &mut GestureState) {
        state.scale_current =
            lerp_step(state.scale_current, state.scale_target, self.config.scale_alpha);
        state.rotation_x_current = lerp_step(
            state.rotation_x_current,
            state.rotation_x_target,
            state.rotation_alpha,
        );
        state.rotation_y_current = lerp_step(
            state.rotation_y_current,
            state.rotation_y_target,
            state.rotation_alpha,
        );
        let rest = if state.hand_detected {
            [0.0, 0.0]
        } else {
            self.idle_tilt
        };
        self.tilt_x.target = rest[0];
        self.tilt_z.target = rest[1];
        self.tilt_x.step(self.config.tilt_alpha);
        self.tilt_z.step(self.config.tilt_alpha);

        if !state.hand_detected {
            state.auto_rotation_angle =
                (state.auto_rotation_angle + self.config.auto_rotation_step).rem_euclid(TAU);
        }

        let scale = state.scale_current;
        let alpha = self.config.position_alpha;
        for (c, t) in self.current.iter_mut().zip(&self.target) {
            *c = lerp_step(*c, t * scale, alpha);
        }
    }

    /// Euler angles (x, y, z) handed to the renderer.
    pub fn rotation(&self, state: &GestureState) -> [f32; 3] {
        [
            state.rotation_x_current + self.tilt_x.current,
            state.rotation_y_current + state.auto_rotation_angle,
            self.tilt_z.current,
        ]
    }
}
