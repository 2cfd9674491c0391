use serde::{Deserialize, Serialize};

use crate::foundation::{
    color::CaptionColor,
    error::{CaptionError, CaptionResult},
};

/// Policy constants for caption layout and paint.
///
/// Padding and font size scale with the smaller image dimension and never drop below their
/// floors, so captions stay legible on thumbnails and proportionate on large photos.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionStyle {
    /// Padding as a fraction of `min(width, height)`.
    pub padding_ratio: f64,
    /// Lower bound for the padding, in pixels.
    pub padding_min: u32,
    /// Font size as a fraction of `min(width, height)`.
    pub font_ratio: f64,
    /// Lower bound for the font size, in pixels.
    pub font_min: u32,
    /// Vertical gap between consecutive wrapped lines, in pixels.
    pub line_gap: u32,
    /// Opacity of the dark backing rectangle drawn behind an in-photo caption.
    pub inside_band_alpha: f32,
    /// How far the in-photo backing rectangle extends above and below the text block.
    pub inside_band_margin: u32,
    /// Opacity of the dark strip appended below the photo on overflow.
    pub strip_band_alpha: f32,
    /// Drop shadow paint.
    pub shadow_color: CaptionColor,
    /// Drop shadow blur radius in pixels; `0` disables the shadow.
    pub shadow_blur: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            padding_ratio: 0.02,
            padding_min: 16,
            font_ratio: 0.035,
            font_min: 18,
            line_gap: 8,
            inside_band_alpha: 0.25,
            inside_band_margin: 10,
            strip_band_alpha: 0.35,
            shadow_color: CaptionColor::rgb(128, 128, 128),
            shadow_blur: 4,
        }
    }
}

impl CaptionStyle {
    /// Derive pixel metrics for an image of `width` x `height`.
    pub fn metrics_for(&self, width: u32, height: u32) -> CaptionMetrics {
        let short = f64::from(width.min(height));
        let scaled = |ratio: f64| (short * ratio).round().clamp(0.0, f64::from(u32::MAX)) as u32;
        CaptionMetrics {
            padding: scaled(self.padding_ratio).max(self.padding_min),
            font_size: scaled(self.font_ratio).max(self.font_min),
            line_gap: self.line_gap,
        }
    }

    /// Reject values that would produce an unreadable or undefined layout.
    pub fn validate(&self) -> CaptionResult<()> {
        for (name, ratio) in [
            ("padding_ratio", self.padding_ratio),
            ("font_ratio", self.font_ratio),
        ] {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(CaptionError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if self.font_min == 0 {
            return Err(CaptionError::validation("font_min must be > 0"));
        }
        for (name, alpha) in [
            ("inside_band_alpha", self.inside_band_alpha),
            ("strip_band_alpha", self.strip_band_alpha),
        ] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(CaptionError::validation(format!(
                    "{name} must be within 0..=1"
                )));
            }
        }
        if self.inside_band_margin > self.padding_min {
            return Err(CaptionError::validation(
                "inside_band_margin must not exceed padding_min",
            ));
        }
        Ok(())
    }
}

/// Pixel metrics resolved for one source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionMetrics {
    /// Distance kept from the image edges, in pixels.
    pub padding: u32,
    /// Font size, in pixels.
    pub font_size: u32,
    /// Gap between wrapped lines, in pixels.
    pub line_gap: u32,
}

impl CaptionMetrics {
    /// Vertical advance from one wrapped line to the next.
    pub fn line_height(&self) -> u32 {
        self.font_size + self.line_gap
    }

    /// Horizontal room available to a wrapped line on an image of `width` pixels.
    pub fn max_text_width(&self, width: u32) -> f32 {
        (i64::from(width) - 2 * i64::from(self.padding)).max(0) as f32
    }

    /// Height of a block of `lines` wrapped lines (no gap after the last one).
    pub fn block_height(&self, lines: usize) -> i64 {
        lines as i64 * i64::from(self.line_height()) - i64::from(self.line_gap)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/style.rs"]
mod tests;
