//! Hand landmarks to scale/rotation targets.
//!
//! A pinch (thumb tip to index tip) sets the scale target, normalized by the
//! wrist-to-palm-base distance so hand size and camera distance cancel out.
//! The palm base position in the image sets the rotation targets.

use crate::config::{GestureConfig, RotationLimits, RotationProfile};
use crate::constants::{INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, THUMB_TIP, WRIST};
use crate::state::GestureState;
use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("expected {expected} landmark floats, got {got}")]
    Length { expected: usize, got: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// One tracked point: `x`, `y` in normalized image space, `z` relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// The 21 landmarks of a single detected hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Decode a flat `x, y, z` buffer. An empty buffer means no hand.
    pub fn from_flat(data: &[f32]) -> Result<Option<Self>, FrameError> {
        if data.is_empty() {
            return Ok(None);
        }
        let expected = LANDMARK_COUNT * 3;
        if data.len() != expected {
            return Err(FrameError::Length {
                expected,
                got: data.len(),
            });
        }
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (index, (slot, xyz)) in landmarks.iter_mut().zip(data.chunks_exact(3)).enumerate() {
            if xyz.iter().any(|v| !v.is_finite()) {
                return Err(FrameError::NonFinite { index });
            }
            *slot = Landmark::new(xyz[0], xyz[1], xyz[2]);
        }
        Ok(Some(Self { landmarks }))
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn landmark(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied()
    }

    pub fn palm(&self) -> Landmark {
        self.landmarks[MIDDLE_MCP]
    }

    pub fn pinch_distance(&self) -> f32 {
        self.landmarks[THUMB_TIP]
            .to_vec3()
            .distance(self.landmarks[INDEX_TIP].to_vec3())
    }

    pub fn palm_base_distance(&self) -> f32 {
        self.landmarks[WRIST]
            .to_vec3()
            .distance(self.landmarks[MIDDLE_MCP].to_vec3())
    }

    /// Pinch distance over palm base distance, or `None` when the base is
    /// degenerate.
    pub fn pinch_ratio(&self) -> Option<f32> {
        let base = self.palm_base_distance();
        if base <= 0.0 || !base.is_finite() {
            return None;
        }
        let ratio = self.pinch_distance() / base;
        ratio.is_finite().then_some(ratio)
    }
}

/// Whether a hand is currently being tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandPhase {
    #[default]
    NoHand,
    HandDetected,
}

/// Linear map of a pinch ratio onto `[min_scale, max_scale]`, clamped at both ends.
pub fn scale_for_ratio(ratio: f32, config: &GestureConfig) -> f32 {
    if ratio.is_nan() {
        return config.min_scale;
    }
    let t = ((ratio - config.min_norm) / (config.max_norm - config.min_norm)).clamp(0.0, 1.0);
    (config.min_scale + (config.max_scale - config.min_scale) * t)
        .clamp(config.min_scale, config.max_scale)
}

/// Map a palm position in image space to (pitch, yaw) targets.
///
/// Image y grows downward, so pitch is negated: raising the hand tilts the
/// cloud up.
pub fn rotation_for_palm(palm: Landmark, limits: &RotationLimits) -> (f32, f32) {
    let nx = (palm.x.clamp(0.0, 1.0) - 0.5) * 2.0;
    let ny = (palm.y.clamp(0.0, 1.0) - 0.5) * 2.0;
    (-ny * limits.max_rot_x, nx * limits.max_rot_y)
}

pub struct GestureExtractor {
    config: GestureConfig,
    limits: RotationLimits,
    phase: HandPhase,
}

impl GestureExtractor {
    pub fn new(config: GestureConfig) -> Self {
        let limits = config.rotation.limits();
        Self {
            config,
            limits,
            phase: HandPhase::NoHand,
        }
    }

    pub fn phase(&self) -> HandPhase {
        self.phase
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn limits(&self) -> RotationLimits {
        self.limits
    }

    pub fn set_rotation_profile(&mut self, profile: RotationProfile) {
        self.config.rotation = profile;
        self.limits = profile.limits();
        log::info!("[gesture] rotation profile {:?}", profile);
    }

    /// Consume one camera frame and update the targets in `state`.
    pub fn process(&mut self, frame: Option<&HandFrame>, state: &mut GestureState) {
        match frame {
            Some(hand) => self.process_hand(hand, state),
            None => self.release(state),
        }
    }

    fn process_hand(&mut self, hand: &HandFrame, state: &mut GestureState) {
        match hand.pinch_ratio() {
            Some(ratio) => state.scale_target = scale_for_ratio(ratio, &self.config),
            None => log::debug!("[gesture] degenerate palm base, keeping scale target"),
        }

        if self.phase == HandPhase::NoHand {
            // Start from where the cloud already is so acquisition never snaps.
            state.rotation_x_target = state.rotation_x_current;
            state.rotation_y_target = state.rotation_y_current;
            state.rotation_alpha = self.limits.acquire_alpha;
            log::info!("[gesture] hand acquired");
        } else {
            let (rx, ry) = rotation_for_palm(hand.palm(), &self.limits);
            state.rotation_x_target = rx;
            state.rotation_y_target = ry;
            state.rotation_alpha = self.limits.steady_alpha;
        }
        state.hand_detected = true;
        self.phase = HandPhase::HandDetected;
    }

    /// Hand lost or tracker stopped: aim every target at rest.
    pub fn release(&mut self, state: &mut GestureState) {
        if self.phase == HandPhase::HandDetected {
            log::info!("[gesture] hand lost");
        }
        state.reset_targets(self.config.rest_scale);
        state.rotation_alpha = self.limits.steady_alpha;
        self.phase = HandPhase::NoHand;
    }
}
