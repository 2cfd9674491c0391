//! Drop-shadow softening.
//!
//! A shadow layer carries a single paint, so only its coverage is blurred; the colour is put
//! back afterwards with [`tint_coverage`].

use crate::foundation::{
    color::CaptionColor,
    error::{CaptionError, CaptionResult},
};

/// Gaussian sigma matching a canvas `shadowBlur` of `blur` pixels.
pub fn shadow_sigma(blur: u32) -> f32 {
    blur as f32 / 2.0
}

/// Number of pixels the blur reaches past the painted area.
pub fn shadow_reach(sigma: f32) -> u32 {
    (sigma * 3.0).ceil().max(0.0) as u32
}

/// Gaussian blur of an 8-bit coverage mask.
///
/// Samples beyond the mask are empty, so coverage fades out at the borders instead of
/// smearing edge pixels inward. `sigma == 0` returns the mask unchanged.
pub fn blur_coverage(mask: &[u8], width: u32, height: u32, sigma: f32) -> CaptionResult<Vec<u8>> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(CaptionError::validation("shadow sigma must be finite and >= 0"));
    }
    let (w, h) = (width as usize, height as usize);
    if w.checked_mul(h) != Some(mask.len()) {
        return Err(CaptionError::render_surface(format!(
            "coverage mask is {} bytes, expected {width}x{height}",
            mask.len()
        )));
    }
    if sigma == 0.0 || mask.is_empty() {
        return Ok(mask.to_vec());
    }

    let weights = gaussian_weights(sigma);
    let reach = weights.len() / 2;

    let mut rows = vec![0f32; mask.len()];
    for y in 0..h {
        let src = &mask[y * w..(y + 1) * w];
        let dst = &mut rows[y * w..(y + 1) * w];
        for (x, out) in dst.iter_mut().enumerate() {
            let lo = x.saturating_sub(reach);
            let hi = (x + reach).min(w - 1);
            *out = (lo..=hi)
                .map(|sx| weights[sx + reach - x] * f32::from(src[sx]))
                .sum();
        }
    }

    let mut out = vec![0u8; mask.len()];
    for y in 0..h {
        let lo = y.saturating_sub(reach);
        let hi = (y + reach).min(h - 1);
        for x in 0..w {
            let v: f32 = (lo..=hi)
                .map(|sy| weights[sy + reach - y] * rows[sy * w + x])
                .sum();
            out[y * w + x] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

/// Premultiplied RGBA8 pixels of `color` at the given coverage.
pub fn tint_coverage(coverage: &[u8], color: CaptionColor) -> Vec<u8> {
    let paint = [color.r, color.g, color.b];
    let mut out = Vec::with_capacity(coverage.len() * 4);
    for &c in coverage {
        let a = scale(c, color.a);
        out.extend(paint.iter().map(|&p| scale(p, a)));
        out.push(a);
    }
    out
}

fn scale(v: u8, by: u8) -> u8 {
    ((u32::from(v) * u32::from(by) + 127) / 255) as u8
}

fn gaussian_weights(sigma: f32) -> Vec<f32> {
    let reach = shadow_reach(sigma) as i32;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let raw: Vec<f32> = (-reach..=reach)
        .map(|i| (-((i * i) as f32) / two_sigma_sq).exp())
        .collect();
    let total: f32 = raw.iter().sum();
    raw.into_iter().map(|v| v / total).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
