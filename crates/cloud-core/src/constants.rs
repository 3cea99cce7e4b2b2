// Shared shape, smoothing and gesture tuning constants used by both web and native frontends.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

// Session
pub const DEFAULT_PARTICLE_COUNT: usize = 12_000;
pub const DEFAULT_TINT: [f32; 3] = [1.0, 1.0, 1.0];

// Characteristic pattern sizes (scene units)
pub const SPHERE_SCALE: f32 = 5.0;
pub const CUBE_SCALE: f32 = 3.5;
pub const TORUS_SCALE: f32 = 5.0;
pub const HELIX_SCALE: f32 = 5.0;
pub const HEART_SCALE: f32 = 0.25; // raw heart curve spans roughly 32 units
pub const WAVE_SCALE: f32 = 6.0;
pub const GALAXY_SCALE: f32 = 6.0;
pub const CUSTOM_SCALE: f32 = 5.0;

// Shell placement
pub const EDGE_BIAS: f32 = 0.7; // probability a sphere/cube particle sits on the surface
pub const SHELL_INNER: f32 = 0.9; // inner edge of the shell band, fraction of scale
pub const GLOW_CHANCE: f32 = 0.25;
pub const GLOW_MIN: f32 = 0.02;
pub const GLOW_MAX: f32 = 0.07;
pub const CUBE_FILL: f32 = 0.7;

// Torus
pub const TORUS_MAJOR: f32 = 0.7;
pub const TORUS_MINOR: f32 = 0.3;

// Heart
pub const HEART_SHELL_CHANCE: f32 = 0.3;
pub const HEART_TOP_SHELL_FACTOR: f32 = 0.6;
pub const HEART_BOTTOM_SHELL_FACTOR: f32 = 0.7;
pub const HEART_REGION_HALF_WIDTH: f32 = 0.35; // radians of curve parameter around each region centre
pub const HEART_FILL_BIAS: f32 = 0.5;
pub const HEART_TOP_FILL_BIAS: f32 = 0.8;
pub const HEART_BOTTOM_FILL_BIAS: f32 = 0.65;
pub const HEART_THICKNESS: f32 = 4.0; // z extent in raw curve units at r = 1

// Wave
pub const WAVE_FREQUENCY: f32 = 1.5;
pub const WAVE_AMPLITUDE: f32 = 0.4;
pub const WAVE_JITTER: f32 = 0.1;

// Galaxy
pub const GALAXY_ARMS: usize = 3;
pub const GALAXY_WINDING: f32 = 4.0 * std::f32::consts::PI;
pub const GALAXY_JITTER: f32 = 0.05;

// Helix
pub const HELIX_TURNS_ANGLE: f32 = 12.0 * std::f32::consts::PI;
pub const HELIX_RADIUS: f32 = 0.5;

// Custom drawings
pub const CUSTOM_Z_JITTER: f32 = 0.05;
pub const CUSTOM_FALLBACK_RADIUS: f32 = 0.1;

// Per-particle attributes
pub const SIZE_MIN: f32 = 0.1;
pub const SIZE_MAX: f32 = 0.6;
pub const ENTRY_SCATTER: f32 = 0.1; // half-extent of the start cluster for the entry animation

// Smoothing factors (fraction of remaining distance covered per tick)
pub const POSITION_ALPHA: f32 = 0.06;
pub const SCALE_ALPHA: f32 = 0.1;
pub const TILT_ALPHA: f32 = 0.05;
pub const AUTO_ROTATION_STEP: f32 = 0.003; // radians per tick while idle

// Idle tilt for patterns that read better at an angle
pub const TORUS_IDLE_TILT: [f32; 2] = [FRAC_PI_6, 0.2];
pub const GALAXY_IDLE_TILT: [f32; 2] = [0.5, 0.15];

// Gesture scale mapping
pub const MIN_NORM: f32 = 0.05;
pub const MAX_NORM: f32 = 1.2;
pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 3.0;
pub const REST_SCALE: f32 = 1.0;

// Rotation mapping, symmetric profile
pub const SYMMETRIC_MAX_ROT_X: f32 = FRAC_PI_2;
pub const SYMMETRIC_MAX_ROT_Y: f32 = FRAC_PI_2;
pub const SYMMETRIC_ROTATION_ALPHA: f32 = 0.1;
pub const SYMMETRIC_ACQUIRE_ALPHA: f32 = 0.05;

// Rotation mapping, asymmetric profile
pub const ASYMMETRIC_MAX_ROT_X: f32 = FRAC_PI_6;
pub const ASYMMETRIC_MAX_ROT_Y: f32 = FRAC_PI_4;
pub const ASYMMETRIC_ROTATION_ALPHA: f32 = 0.2;
pub const ASYMMETRIC_ACQUIRE_ALPHA: f32 = 0.08;

// Hand landmark indices
pub const LANDMARK_COUNT: usize = 21;
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
