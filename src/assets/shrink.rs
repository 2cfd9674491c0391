use crate::{
    foundation::error::{CaptionError, CaptionResult},
    render::{
        decode::{SourceImage, decode_oriented},
        encode::encode_jpeg,
    },
};

/// Limits for the pre-upload shrink pass.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShrinkOpts {
    /// Longest edge of the output, in pixels.
    pub max_edge: u32,
    /// Byte budget for the encoded output.
    pub max_bytes: usize,
    /// JPEG qualities tried in order until one fits `max_bytes`.
    pub quality_steps: Vec<u8>,
}

impl Default for ShrinkOpts {
    fn default() -> Self {
        Self {
            max_edge: 1280,
            max_bytes: 200 * 1024,
            quality_steps: vec![90, 80, 70, 60, 50, 40, 30],
        }
    }
}

impl ShrinkOpts {
    /// Reject a zero edge, an empty budget or an unusable quality ladder.
    pub fn validate(&self) -> CaptionResult<()> {
        if self.max_edge == 0 {
            return Err(CaptionError::validation("shrink max_edge must be > 0"));
        }
        if self.max_bytes == 0 {
            return Err(CaptionError::validation("shrink max_bytes must be > 0"));
        }
        if self.quality_steps.is_empty() {
            return Err(CaptionError::validation(
                "shrink quality_steps must not be empty",
            ));
        }
        if let Some(q) = self.quality_steps.iter().find(|q| !(1..=100).contains(*q)) {
            return Err(CaptionError::validation(format!(
                "shrink quality {q} is outside 1..=100"
            )));
        }
        Ok(())
    }
}

/// Output of [`shrink_for_upload`].
#[derive(Clone, Debug)]
pub struct Shrunk {
    /// JPEG bytes.
    pub bytes: Vec<u8>,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Quality the bytes were encoded at.
    pub quality: u8,
    /// Whether `bytes` fits the budget; `false` means even the lowest step was too large.
    pub within_budget: bool,
}

/// Target size preserving aspect ratio, never upscaling.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }
    let scale = f64::from(max_edge) / f64::from(longest);
    let w = ((f64::from(width) * scale).round() as u32).clamp(1, max_edge);
    let h = ((f64::from(height) * scale).round() as u32).clamp(1, max_edge);
    (w, h)
}

/// Downscale and recompress a photo before it is captioned and uploaded.
///
/// The longest edge is limited to `opts.max_edge`; the encoder then walks
/// `opts.quality_steps` until the output fits `opts.max_bytes`. When nothing fits, the
/// smallest attempt is returned with `within_budget == false`.
#[tracing::instrument(skip(bytes, opts), fields(in_bytes = bytes.len(), max_edge = opts.max_edge))]
pub fn shrink_for_upload(bytes: &[u8], opts: &ShrinkOpts) -> CaptionResult<Shrunk> {
    opts.validate()?;
    let img = decode_oriented(bytes)?;
    let (width, height) = fit_within(img.width(), img.height(), opts.max_edge);
    let img = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        tracing::debug!(from_w = img.width(), from_h = img.height(), width, height, "downscaling");
        img.resize_exact(width, height, image::imageops::FilterType::Triangle)
    };
    let source = SourceImage::from_dynamic(img)?;

    let mut best: Option<Shrunk> = None;
    for &quality in &opts.quality_steps {
        let encoded = encode_jpeg(&source.rgba8_premul, width, height, quality)?;
        tracing::trace!(quality, len = encoded.len(), "shrink attempt");
        let fits = encoded.len() <= opts.max_bytes;
        let smaller = best.as_ref().is_none_or(|b| encoded.len() < b.bytes.len());
        if fits || smaller {
            best = Some(Shrunk {
                bytes: encoded,
                width,
                height,
                quality,
                within_budget: fits,
            });
        }
        if fits {
            break;
        }
    }

    best.ok_or_else(|| CaptionError::validation("shrink quality_steps must not be empty"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/shrink.rs"]
mod tests;
