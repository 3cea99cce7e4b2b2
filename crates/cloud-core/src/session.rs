//! Platform-free orchestration of one point-cloud session.
//!
//! `Session` owns the smoothing engine, the gesture extractor and the shared
//! [`GestureState`], and applies user selections. Frontends call
//! [`Session::tick`] once per render frame and [`Session::on_hand_frame`]
//! once per camera frame, both from the same thread.

use crate::color::{ParseColorError, Rgb};
use crate::config::{ConfigError, RotationProfile, SessionConfig};
use crate::gesture::{GestureExtractor, HandFrame};
use crate::pattern::{entry_scatter, generate_with_rng, ForegroundSample, Pattern};
use crate::smoothing::SmoothingEngine;
use crate::state::GestureState;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Borrowed view of everything the renderer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub sizes: &'a [f32],
    pub tint: Rgb,
    pub rotation: [f32; 3],
    pub scale: f32,
}

pub struct Session {
    config: SessionConfig,
    engine: SmoothingEngine,
    extractor: GestureExtractor,
    state: GestureState,
    sizes: Vec<f32>,
    colors: Vec<f32>,
    pattern: Pattern,
    tint: Rgb,
    gesture_enabled: bool,
    rng: StdRng,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let extractor = GestureExtractor::new(config.gesture.clone());
        let state = GestureState::new(
            config.gesture.rest_scale,
            extractor.limits().steady_alpha,
        );
        let mut session = Self {
            engine: SmoothingEngine::new(config.smoothing.clone(), config.particle_count),
            extractor,
            state,
            sizes: Vec::new(),
            colors: Vec::new(),
            pattern: Pattern::Sphere,
            tint: config.tint,
            gesture_enabled: false,
            rng,
            config,
        };
        session.apply_pattern(Pattern::Sphere, None);
        log::info!(
            "[session] particles={} pattern={}",
            session.particle_count(),
            session.pattern.name()
        );
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn particle_count(&self) -> usize {
        self.engine.particle_count()
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn tint(&self) -> Rgb {
        self.tint
    }

    pub fn gesture_enabled(&self) -> bool {
        self.gesture_enabled
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn engine(&self) -> &SmoothingEngine {
        &self.engine
    }

    pub fn extractor(&self) -> &GestureExtractor {
        &self.extractor
    }

    /// Switch to a built-in shape. `Custom` without a drawing shows the
    /// fallback cluster.
    pub fn select_pattern(&mut self, pattern: Pattern) {
        self.apply_pattern(pattern, None);
    }

    /// Switch to the custom shape sampled from a user drawing.
    pub fn select_custom(&mut self, drawing: &ForegroundSample) {
        self.apply_pattern(Pattern::Custom, Some(drawing));
    }

    fn apply_pattern(&mut self, pattern: Pattern, drawing: Option<&ForegroundSample>) {
        let count = self.particle_count();
        let cloud = generate_with_rng(pattern, count, drawing, &mut self.rng);
        self.engine.retarget(&cloud.positions);
        entry_scatter(self.engine.current_mut(), &mut self.rng);
        self.engine.set_idle_tilt(pattern.idle_tilt());
        self.sizes = cloud.sizes;
        self.colors = cloud.colors;
        self.pattern = pattern;
        log::info!("[session] pattern -> {}", pattern.name());
    }

    pub fn set_tint(&mut self, tint: Rgb) {
        self.tint = tint;
    }

    pub fn set_tint_hex(&mut self, hex: &str) -> Result<(), ParseColorError> {
        self.tint = Rgb::from_hex(hex)?;
        Ok(())
    }

    /// Turning gesture control off sends every target back to rest; the
    /// current values settle through normal smoothing.
    pub fn set_gesture_enabled(&mut self, enabled: bool) {
        if self.gesture_enabled == enabled {
            return;
        }
        self.gesture_enabled = enabled;
        if !enabled {
            self.extractor.release(&mut self.state);
        }
        log::info!("[session] gesture control {}", if enabled { "on" } else { "off" });
    }

    pub fn set_rotation_profile(&mut self, profile: RotationProfile) {
        self.extractor.set_rotation_profile(profile);
        self.config.gesture.rotation = profile;
    }

    /// Feed one camera frame. Ignored while gesture control is off.
    pub fn on_hand_frame(&mut self, frame: Option<&HandFrame>) {
        if !self.gesture_enabled {
            return;
        }
        self.extractor.process(frame, &mut self.state);
    }

    /// Advance all smoothed channels by one render tick.
    pub fn tick(&mut self) {
        self.engine.advance(&mut self.state);
    }

    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            positions: self.engine.positions(),
            colors: &self.colors,
            sizes: &self.sizes,
            tint: self.tint,
            rotation: self.engine.rotation(&self.state),
            scale: self.state.scale_current,
        }
    }
}
