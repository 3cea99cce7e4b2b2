//! Session parameters with validation.
//!
//! Every field defaults to the value in `constants.rs`; frontends override
//! individual fields and call [`SessionConfig::validate`] once at startup.

use crate::color::Rgb;
use crate::constants::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("particle count must be at least 1")]
    NoParticles,
    #[error("smoothing factor `{name}` must be in (0, 1], got {value}")]
    Alpha { name: &'static str, value: f32 },
    #[error("range `{name}` must satisfy min < max, got [{min}, {max}]")]
    Range {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("rest scale {rest} lies outside [{min}, {max}]")]
    RestScale { rest: f32, min: f32, max: f32 },
}

/// Which of the two hand-to-rotation mappings to use.
///
/// `Symmetric` caps both axes at ±π/2 with gentle smoothing. `Asymmetric`
/// caps yaw at ±π/4 and pitch at ±π/6 and follows the hand more tightly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationProfile {
    #[default]
    Symmetric,
    Asymmetric,
}

/// Angle caps and smoothing factors resolved from a [`RotationProfile`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationLimits {
    pub max_rot_x: f32,
    pub max_rot_y: f32,
    /// Factor used while a hand is tracked and after it is lost.
    pub steady_alpha: f32,
    /// Slower factor in force right after a hand is acquired.
    pub acquire_alpha: f32,
}

impl RotationProfile {
    pub fn limits(self) -> RotationLimits {
        match self {
            RotationProfile::Symmetric => RotationLimits {
                max_rot_x: SYMMETRIC_MAX_ROT_X,
                max_rot_y: SYMMETRIC_MAX_ROT_Y,
                steady_alpha: SYMMETRIC_ROTATION_ALPHA,
                acquire_alpha: SYMMETRIC_ACQUIRE_ALPHA,
            },
            RotationProfile::Asymmetric => RotationLimits {
                max_rot_x: ASYMMETRIC_MAX_ROT_X,
                max_rot_y: ASYMMETRIC_MAX_ROT_Y,
                steady_alpha: ASYMMETRIC_ROTATION_ALPHA,
                acquire_alpha: ASYMMETRIC_ACQUIRE_ALPHA,
            },
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            RotationProfile::Symmetric => RotationProfile::Asymmetric,
            RotationProfile::Asymmetric => RotationProfile::Symmetric,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Pinch ratio at or below which the scale target bottoms out.
    pub min_norm: f32,
    /// Pinch ratio at or above which the scale target tops out.
    pub max_norm: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Scale target restored when no hand is visible.
    pub rest_scale: f32,
    pub rotation: RotationProfile,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_norm: MIN_NORM,
            max_norm: MAX_NORM,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            rest_scale: REST_SCALE,
            rotation: RotationProfile::default(),
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("norm", self.min_norm, self.max_norm)?;
        check_range("scale", self.min_scale, self.max_scale)?;
        if self.min_scale <= 0.0 {
            return Err(ConfigError::Range {
                name: "scale",
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if !(self.min_scale..=self.max_scale).contains(&self.rest_scale) {
            return Err(ConfigError::RestScale {
                rest: self.rest_scale,
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        let limits = self.rotation.limits();
        check_alpha("rotation", limits.steady_alpha)?;
        check_alpha("rotation_acquire", limits.acquire_alpha)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SmoothingConfig {
    pub position_alpha: f32,
    pub scale_alpha: f32,
    pub tilt_alpha: f32,
    /// Radians added to the idle spin each tick while no hand is visible.
    pub auto_rotation_step: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            position_alpha: POSITION_ALPHA,
            scale_alpha: SCALE_ALPHA,
            tilt_alpha: TILT_ALPHA,
            auto_rotation_step: AUTO_ROTATION_STEP,
        }
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_alpha("position", self.position_alpha)?;
        check_alpha("scale", self.scale_alpha)?;
        check_alpha("tilt", self.tilt_alpha)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub particle_count: usize,
    pub smoothing: SmoothingConfig,
    pub gesture: GestureConfig,
    pub tint: Rgb,
    /// Seed for pattern randomness; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            smoothing: SmoothingConfig::default(),
            gesture: GestureConfig::default(),
            tint: Rgb::from(DEFAULT_TINT),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::NoParticles);
        }
        self.smoothing.validate()?;
        self.gesture.validate()
    }
}

fn check_alpha(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Alpha { name, value })
    }
}

fn check_range(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(ConfigError::Range { name, min, max })
    }
}
