//! Decoding of the flat typed arrays JS hands across the wasm boundary.
//!
//! Kept free of wasm-only types so the checks run under the host test runner.

use anyhow::{bail, Context};
use cloud_core::{ForegroundSample, HandFrame, Pattern};

/// Landmarks arrive as 63 floats (`x, y, z` per point); an empty array
/// means the tracker saw no hand this frame.
pub fn decode_landmarks(data: &[f32]) -> anyhow::Result<Option<HandFrame>> {
    HandFrame::from_flat(data).context("malformed landmark buffer")
}

/// Foreground pixels arrive as interleaved `x, y` pairs.
pub fn decode_points(width: u32, height: u32, data: &[u32]) -> anyhow::Result<ForegroundSample> {
    if width == 0 || height == 0 {
        bail!("drawing has no area: {}x{}", width, height);
    }
    if data.len() % 2 != 0 {
        bail!("point buffer has odd length {}", data.len());
    }
    let points = data.chunks_exact(2).map(|xy| [xy[0], xy[1]]).collect();
    Ok(ForegroundSample::new(width, height, points))
}

/// Rasterized drawing as RGBA bytes, sampled every `step` pixels.
pub fn decode_image(
    width: u32,
    height: u32,
    rgba: &[u8],
    step: u32,
) -> anyhow::Result<ForegroundSample> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .with_context(|| format!("drawing too large: {}x{}", width, height))?;
    if rgba.len() != expected {
        bail!("expected {} RGBA bytes, got {}", expected, rgba.len());
    }
    Ok(ForegroundSample::from_rgba(width, height, rgba, step.max(1) as usize))
}

pub fn parse_pattern(name: &str) -> anyhow::Result<Pattern> {
    Pattern::from_name(name).with_context(|| format!("unknown pattern {:?}", name))
}
