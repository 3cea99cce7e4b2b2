// Host-side tests for constants, their relationships and config validation.

use cloud_core::constants::*;
use cloud_core::{ConfigError, GestureConfig, RotationProfile, SessionConfig, SmoothingConfig};

#[test]
#[allow(clippy::assertions_on_constants)]
fn smoothing_factors_are_valid_alphas() {
    for alpha in [
        POSITION_ALPHA,
        SCALE_ALPHA,
        TILT_ALPHA,
        SYMMETRIC_ROTATION_ALPHA,
        SYMMETRIC_ACQUIRE_ALPHA,
        ASYMMETRIC_ROTATION_ALPHA,
        ASYMMETRIC_ACQUIRE_ALPHA,
    ] {
        assert!(alpha > 0.0 && alpha <= 1.0, "alpha {}", alpha);
    }
    // acquisition is always gentler than steady tracking
    assert!(SYMMETRIC_ACQUIRE_ALPHA < SYMMETRIC_ROTATION_ALPHA);
    assert!(ASYMMETRIC_ACQUIRE_ALPHA < ASYMMETRIC_ROTATION_ALPHA);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn gesture_ranges_are_ordered() {
    assert!(MIN_NORM < MAX_NORM);
    assert!(0.0 < MIN_SCALE && MIN_SCALE <= REST_SCALE && REST_SCALE <= MAX_SCALE);
    assert!(ASYMMETRIC_MAX_ROT_X < ASYMMETRIC_MAX_ROT_Y);
    assert!(ASYMMETRIC_MAX_ROT_Y < SYMMETRIC_MAX_ROT_Y);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn shape_proportions_are_fractions() {
    for f in [EDGE_BIAS, SHELL_INNER, GLOW_CHANCE, CUBE_FILL, HEART_SHELL_CHANCE] {
        assert!((0.0..=1.0).contains(&f));
    }
    assert!(GLOW_MIN < GLOW_MAX);
    assert!(SIZE_MIN < SIZE_MAX);
    assert!(TORUS_MINOR < TORUS_MAJOR);
    assert_eq!(LANDMARK_COUNT, 21);
}

#[test]
fn defaults_validate() {
    assert_eq!(SessionConfig::default().validate(), Ok(()));
    let mut c = SessionConfig::default();
    c.gesture.rotation = RotationProfile::Asymmetric;
    assert_eq!(c.validate(), Ok(()));
}

#[test]
fn zero_particles_rejected() {
    let c = SessionConfig {
        particle_count: 0,
        ..SessionConfig::default()
    };
    assert_eq!(c.validate(), Err(ConfigError::NoParticles));
}

#[test]
fn bad_alpha_rejected() {
    for value in [0.0, -0.1, 1.5, f32::NAN] {
        let c = SmoothingConfig {
            scale_alpha: value,
            ..SmoothingConfig::default()
        };
        assert!(
            matches!(c.validate(), Err(ConfigError::Alpha { name: "scale", .. })),
            "{} accepted",
            value
        );
    }
    let ok = SmoothingConfig {
        position_alpha: 1.0,
        ..SmoothingConfig::default()
    };
    assert_eq!(ok.validate(), Ok(()));
}

#[test]
fn inverted_ranges_rejected() {
    let c = GestureConfig {
        min_norm: 1.0,
        max_norm: 0.5,
        ..GestureConfig::default()
    };
    assert!(matches!(c.validate(), Err(ConfigError::Range { name: "norm", .. })));

    let c = GestureConfig {
        min_scale: 0.0,
        ..GestureConfig::default()
    };
    assert!(matches!(c.validate(), Err(ConfigError::Range { name: "scale", .. })));
}

#[test]
fn rest_scale_must_lie_in_range() {
    let c = GestureConfig {
        rest_scale: 4.0,
        ..GestureConfig::default()
    };
    assert_eq!(
        c.validate(),
        Err(ConfigError::RestScale {
            rest: 4.0,
            min: MIN_SCALE,
            max: MAX_SCALE
        })
    );
}

#[test]
fn rotation_profile_toggles_and_resolves() {
    let p = RotationProfile::default();
    assert_eq!(p, RotationProfile::Symmetric);
    assert_eq!(p.toggled(), RotationProfile::Asymmetric);
    assert_eq!(p.toggled().toggled(), p);

    let asym = RotationProfile::Asymmetric.limits();
    assert_eq!(asym.max_rot_x, ASYMMETRIC_MAX_ROT_X);
    assert_eq!(asym.max_rot_y, ASYMMETRIC_MAX_ROT_Y);
    assert_eq!(asym.steady_alpha, ASYMMETRIC_ROTATION_ALPHA);
    assert_eq!(asym.acquire_alpha, ASYMMETRIC_ACQUIRE_ALPHA);
}
