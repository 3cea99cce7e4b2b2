//! Procedural target shapes for the particle cloud.
//!
//! Each [`Pattern`] maps to one point rule `(index, context, rng) -> Vec3`.
//! Rules return pattern-space positions; the uniform gesture scale is applied
//! later by the smoothing engine. Output is random but every rule keeps its
//! statistical shape (shell/interior split, radial bounds) for any count.

use crate::color::hsl_to_rgb;
use crate::constants::*;
use glam::{Vec2, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
    Sphere,
    Cube,
    Torus,
    Helix,
    Heart,
    Wave,
    Galaxy,
    Custom,
}

type PointRule = fn(usize, &ShapeContext, &mut dyn RngCore) -> Vec3;

/// Per-call data shared by all point rules.
struct ShapeContext<'a> {
    count: usize,
    grid_side: usize,
    drawing: &'a [Vec2],
}

impl Pattern {
    pub const ALL: [Pattern; 8] = [
        Pattern::Sphere,
        Pattern::Cube,
        Pattern::Torus,
        Pattern::Helix,
        Pattern::Heart,
        Pattern::Wave,
        Pattern::Galaxy,
        Pattern::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::Sphere => "sphere",
            Pattern::Cube => "cube",
            Pattern::Torus => "torus",
            Pattern::Helix => "helix",
            Pattern::Heart => "heart",
            Pattern::Wave => "wave",
            Pattern::Galaxy => "galaxy",
            Pattern::Custom => "custom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Characteristic size of the shape in scene units.
    pub fn scale(self) -> f32 {
        match self {
            Pattern::Sphere => SPHERE_SCALE,
            Pattern::Cube => CUBE_SCALE,
            Pattern::Torus => TORUS_SCALE,
            Pattern::Helix => HELIX_SCALE,
            Pattern::Heart => HEART_SCALE,
            Pattern::Wave => WAVE_SCALE,
            Pattern::Galaxy => GALAXY_SCALE,
            Pattern::Custom => CUSTOM_SCALE,
        }
    }

    /// Resting (x, z) tilt in radians applied while the pattern is shown.
    pub fn idle_tilt(self) -> [f32; 2] {
        match self {
            Pattern::Torus => TORUS_IDLE_TILT,
            Pattern::Galaxy => GALAXY_IDLE_TILT,
            _ => [0.0, 0.0],
        }
    }

    /// Base hue and half-width of the hue band used for particle colors.
    fn hue_band(self) -> (f32, f32) {
        match self {
            Pattern::Sphere => (0.55, 0.08),
            Pattern::Cube => (0.08, 0.06),
            Pattern::Torus => (0.8, 0.1),
            Pattern::Helix => (0.35, 0.1),
            Pattern::Heart => (0.95, 0.05),
            Pattern::Wave => (0.5, 0.12),
            Pattern::Galaxy => (0.7, 0.2),
            Pattern::Custom => (0.15, 0.5),
        }
    }

    fn rule(self) -> PointRule {
        match self {
            Pattern::Sphere => sphere_point,
            Pattern::Cube => cube_point,
            Pattern::Torus => torus_point,
            Pattern::Helix => helix_point,
            Pattern::Heart => heart_point,
            Pattern::Wave => wave_point,
            Pattern::Galaxy => galaxy_point,
            Pattern::Custom => custom_point,
        }
    }
}

/// Foreground pixels of a user drawing, in image coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForegroundSample {
    pub width: u32,
    pub height: u32,
    pub points: Vec<[u32; 2]>,
}

impl ForegroundSample {
    /// Keep only points inside `[0, width) x [0, height)`.
    pub fn new(width: u32, height: u32, points: Vec<[u32; 2]>) -> Self {
        let before = points.len();
        let points: Vec<[u32; 2]> = points
            .into_iter()
            .filter(|p| p[0] < width && p[1] < height)
            .collect();
        if points.len() != before {
            log::warn!(
                "[pattern] dropped {} drawing points outside {}x{}",
                before - points.len(),
                width,
                height
            );
        }
        Self {
            width,
            height,
            points,
        }
    }

    /// Sample every `step`-th pixel of an RGBA bitmap whose alpha exceeds half.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8], step: usize) -> Self {
        let step = step.max(1);
        let mut points = Vec::new();
        for y in (0..height).step_by(step) {
            for x in (0..width).step_by(step) {
                let idx = (y as usize * width as usize + x as usize) * 4 + 3;
                if rgba.get(idx).is_some_and(|&a| a > 128) {
                    points.push([x, y]);
                }
            }
        }
        Self {
            width,
            height,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Map pixel centres into `[-1, 1]²`, y up, preserving aspect ratio.
    pub fn normalized(&self) -> Vec<Vec2> {
        let half = self.width.max(self.height).max(1) as f32 * 0.5;
        let centre = Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5);
        self.points
            .iter()
            .map(|p| {
                let px = Vec2::new(p[0] as f32 + 0.5, p[1] as f32 + 0.5);
                let v = (px - centre) / half;
                Vec2::new(v.x, -v.y)
            })
            .collect()
    }
}

/// Flat buffers for one generated shape.
#[derive(Clone, Debug, Default)]
pub struct PatternCloud {
    /// `3·count` pattern-space coordinates.
    pub positions: Vec<f32>,
    /// `count` point sizes.
    pub sizes: Vec<f32>,
    /// `3·count` RGB base colors.
    pub colors: Vec<f32>,
}

impl PatternCloud {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Position of particle `i`, or `None` past the end of the cloud.
    pub fn position(&self, i: usize) -> Option<Vec3> {
        let start = i.checked_mul(3)?;
        let end = start.checked_add(3)?;
        self.positions.get(start..end).map(Vec3::from_slice)
    }
}

/// Generate `count` particles for `pattern` using the thread-local RNG.
pub fn generate(pattern: Pattern, count: usize, drawing: Option<&ForegroundSample>) -> PatternCloud {
    generate_with_rng(pattern, count, drawing, &mut rand::thread_rng())
}

pub fn generate_with_rng<R: Rng + ?Sized>(
    pattern: Pattern,
    count: usize,
    drawing: Option<&ForegroundSample>,
    rng: &mut R,
) -> PatternCloud {
    let normalized = match (pattern, drawing) {
        (Pattern::Custom, Some(sample)) => sample.normalized(),
        _ => Vec::new(),
    };
    if pattern == Pattern::Custom && normalized.is_empty() {
        log::info!("[pattern] empty drawing, using fallback cluster");
    }
    let ctx = ShapeContext {
        count,
        grid_side: (count as f64).sqrt().ceil() as usize,
        drawing: &normalized,
    };
    let rule = pattern.rule();
    let (hue, spread) = pattern.hue_band();

    let mut cloud = PatternCloud {
        positions: Vec::with_capacity(count * 3),
        sizes: Vec::with_capacity(count),
        colors: Vec::with_capacity(count * 3),
    };
    let mut rng = RngAdapter(rng);
    for i in 0..count {
        let p = rule(i, &ctx, &mut rng);
        cloud.positions.extend_from_slice(&p.to_array());
        cloud.sizes.push(rng.gen_range(SIZE_MIN..=SIZE_MAX));
        let c = hsl_to_rgb(
            hue + rng.gen_range(-spread..=spread),
            rng.gen_range(0.6..=1.0),
            rng.gen_range(0.45..=0.8),
        );
        cloud.colors.extend_from_slice(&c.to_array());
    }
    cloud
}

/// Overwrite `positions` with a tight random cluster around the origin so a
/// freshly selected shape converges outward instead of appearing at once.
pub fn entry_scatter<R: Rng + ?Sized>(positions: &mut [f32], rng: &mut R) {
    for v in positions.iter_mut() {
        *v = rng.gen_range(-ENTRY_SCATTER..=ENTRY_SCATTER);
    }
}

// Lets a possibly unsized caller RNG be passed on as `&mut dyn RngCore`.
struct RngAdapter<'a, R: ?Sized>(&'a mut R);

impl<R: RngCore + ?Sized> RngCore for RngAdapter<'_, R> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

// ---------------- shared sampling helpers ----------------

fn random_direction(rng: &mut dyn RngCore) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let phi: f32 = rng.gen_range(0.0..TAU);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(ring * phi.cos(), ring * phi.sin(), z)
}

/// Occasionally push a surface point slightly outward.
fn glow(p: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    if rng.gen::<f32>() < GLOW_CHANCE {
        p * (1.0 + rng.gen_range(GLOW_MIN..=GLOW_MAX))
    } else {
        p
    }
}

fn symmetric_jitter(rng: &mut dyn RngCore, half: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-half..=half),
        rng.gen_range(-half..=half),
        rng.gen_range(-half..=half),
    )
}

// ---------------- point rules ----------------

fn sphere_point(_i: usize, _ctx: &ShapeContext, rng: &mut dyn RngCore) -> Vec3 {
    let s = SPHERE_SCALE;
    if rng.gen::<f32>() < EDGE_BIAS {
        let r = s * rng.gen_range(SHELL_INNER..=1.0);
        glow(random_direction(rng) * r, rng)
    } else {
        let t: f32 = rng.gen();
        random_direction(rng) * (s * SHELL_INNER * (1.0 - t * t))
    }
}

fn cube_point(_i: usize, _ctx: &ShapeContext, rng: &mut dyn RngCore) -> Vec3 {
    let s = CUBE_SCALE;
    let p = Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    );
    if rng.gen::<f32>() < EDGE_BIAS {
        let m = p.abs().max_element();
        let on_face = if m > 0.0 { p / m } else { Vec3::X };
        glow(on_face * s, rng)
    } else {
        p * (CUBE_FILL * s)
    }
}

fn torus_point(_i: usize, _ctx: &ShapeContext, rng: &mut dyn RngCore) -> Vec3 {
    let s = TORUS_SCALE;
    let u: f32 = rng.gen_range(0.0..TAU);
    let v: f32 = rng.gen_range(0.0..TAU);
    // sqrt keeps areal density uniform across the tube cross-section
    let tube = rng.gen::<f32>().sqrt() * TORUS_MINOR * s;
    let ring = TORUS_MAJOR * s + tube * v.cos();
    Vec3::new(ring * u.cos(), tube * v.sin(), ring * u.sin())
}

fn helix_point(i: usize, ctx: &ShapeContext, _rng: &mut dyn RngCore) -> Vec3 {
    let s = HELIX_SCALE;
    let frac = i as f32 / ctx.count.max(1) as f32;
    let t = frac * HELIX_TURNS_ANGLE;
    let r = HELIX_RADIUS * s;
    Vec3::new(r * t.cos(), (frac * 2.0 - 1.0) * s, r * t.sin())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeartRegion {
    TopIndent,
    BottomTip,
    Body,
}

impl HeartRegion {
    fn of(t: f32) -> Self {
        let from_top = t.min(TAU - t);
        if from_top < HEART_REGION_HALF_WIDTH {
            HeartRegion::TopIndent
        } else if (t - PI).abs() < HEART_REGION_HALF_WIDTH {
            HeartRegion::BottomTip
        } else {
            HeartRegion::Body
        }
    }

    fn shell_chance(self) -> f32 {
        match self {
            HeartRegion::TopIndent => HEART_SHELL_CHANCE * HEART_TOP_SHELL_FACTOR,
            HeartRegion::BottomTip => HEART_SHELL_CHANCE * HEART_BOTTOM_SHELL_FACTOR,
            HeartRegion::Body => HEART_SHELL_CHANCE,
        }
    }

    fn fill_bias(self) -> f32 {
        match self {
            HeartRegion::TopIndent => HEART_TOP_FILL_BIAS,
            HeartRegion::BottomTip => HEART_BOTTOM_FILL_BIAS,
            HeartRegion::Body => HEART_FILL_BIAS,
        }
    }

    /// Outline fraction: `SHELL_INNER..=1` on the shell, below it inside.
    fn radius(self, rng: &mut dyn RngCore) -> f32 {
        if rng.gen::<f32>() < self.shell_chance() {
            rng.gen_range(SHELL_INNER..=1.0)
        } else {
            rng.gen::<f32>().powf(self.fill_bias()) * SHELL_INNER
        }
    }
}

fn heart_curve(t: f32) -> Vec2 {
    Vec2::new(
        16.0 * t.sin().powi(3),
        13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos(),
    )
}

fn heart_point(_i: usize, _ctx: &ShapeContext, rng: &mut dyn RngCore) -> Vec3 {
    let t: f32 = rng.gen_range(0.0..TAU);
    let outline = heart_curve(t);
    let r = HeartRegion::of(t).radius(rng);
    let z = rng.gen_range(-0.5f32..=0.5) * HEART_THICKNESS * r;
    Vec3::new(outline.x * r, outline.y * r, z) * HEART_SCALE
}

fn wave_point(i: usize, ctx: &ShapeContext, rng: &mut dyn RngCore) -> Vec3 {
    let s = WAVE_SCALE;
    let side = ctx.grid_side.max(1);
    let cell = |k: usize| {
        if side > 1 {
            (k as f32 / (side - 1) as f32 * 2.0 - 1.0) * s
        } else {
            0.0
        }
    };
    let x = cell(i % side);
    let z = cell(i / side);
    let height = (WAVE_FREQUENCY * x).sin() * (WAVE_FREQUENCY * z).cos() * WAVE_AMPLITUDE * s;
    let y = height + rng.gen_range(-WAVE_JITTER..=WAVE_JITTER) * s;
    Vec3::new(x, y, z)
}

fn galaxy_point(i: usize, _ctx: &ShapeContext, rng: &mut dyn RngCore) -> Vec3 {
    let s = GALAXY_SCALE;
    let arm = i % GALAXY_ARMS;
    let arm_offset = arm as f32 * TAU / GALAXY_ARMS as f32;
    let radius = s * rng.gen::<f32>().sqrt();
    let angle = arm_offset + (radius / s) * GALAXY_WINDING;
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
        + symmetric_jitter(rng, GALAXY_JITTER * s)
}

fn custom_point(i: usize, ctx: &ShapeContext, rng: &mut dyn RngCore) -> Vec3 {
    let s = CUSTOM_SCALE;
    if ctx.drawing.is_empty() {
        return symmetric_jitter(rng, CUSTOM_FALLBACK_RADIUS * s);
    }
    let p = ctx.drawing[i % ctx.drawing.len()];
    let z = rng.gen_range(-CUSTOM_Z_JITTER..=CUSTOM_Z_JITTER) * s;
    Vec3::new(p.x * s, p.y * s, z)
}
