use crate::layout::{
    style::{CaptionMetrics, CaptionStyle},
    wrap::{TextMeasure, wrap_lines},
};

/// Where the caption block ends up relative to the photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The block fits above the bottom padding line, drawn over the photo.
    Inside,
    /// The block is too tall; a strip is appended below the photo to hold it.
    Extended,
}

/// Resolved geometry for one composite call.
///
/// Pure data: computing a plan touches no pixels, so the fit decision can be inspected and
/// tested independently of rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionPlan {
    /// Pixel metrics derived from the source size.
    pub metrics: CaptionMetrics,
    /// Source (and output) width.
    pub width: u32,
    /// Source height.
    pub source_height: u32,
    /// Output height; equals `source_height` unless [`Placement::Extended`].
    pub canvas_height: u32,
    /// Width budget each wrapped line was fitted to.
    pub max_text_width: f32,
    /// Wrapped lines, top to bottom.
    pub lines: Vec<String>,
    /// `lines.len() * line_height - line_gap`.
    pub block_height: u32,
    /// Where the block would start if drawn inside the photo; may be negative.
    pub y_inside: i64,
    /// Top of the first wrapped line on the output canvas.
    pub block_top: u32,
    /// Dark backing band behind the text, in output canvas coordinates.
    pub band: kurbo::Rect,
    /// Opacity of the band.
    pub band_alpha: f32,
    /// Fit decision.
    pub placement: Placement,
}

impl CaptionPlan {
    /// Wrap `captions` for a `width` x `height` photo and decide where the block goes.
    ///
    /// Returns `None` when there are no caption entries at all, in which case nothing is
    /// drawn.
    pub fn new<S, M>(
        width: u32,
        height: u32,
        captions: &[S],
        style: &CaptionStyle,
        measure: &mut M,
    ) -> Option<Self>
    where
        S: AsRef<str>,
        M: TextMeasure + ?Sized,
    {
        if captions.is_empty() {
            return None;
        }

        let metrics = style.metrics_for(width, height);
        let max_text_width = metrics.max_text_width(width);
        let lines = wrap_lines(captions, max_text_width, measure);

        let padding = i64::from(metrics.padding);
        let block_height = metrics.block_height(lines.len());
        let y_inside = i64::from(height) - padding - block_height;
        let w = f64::from(width);

        let (placement, block_top, canvas_height, band, band_alpha) = if y_inside >= padding {
            let margin = i64::from(style.inside_band_margin);
            let band = kurbo::Rect::new(
                0.0,
                (y_inside - margin) as f64,
                w,
                (y_inside + block_height + margin) as f64,
            );
            (
                Placement::Inside,
                y_inside,
                i64::from(height),
                band,
                style.inside_band_alpha,
            )
        } else {
            let extra = padding + block_height + padding;
            let canvas_height = i64::from(height) + extra;
            let band = kurbo::Rect::new(0.0, f64::from(height), w, canvas_height as f64);
            (
                Placement::Extended,
                i64::from(height) + padding,
                canvas_height,
                band,
                style.strip_band_alpha,
            )
        };

        Some(Self {
            metrics,
            width,
            source_height: height,
            canvas_height: clamp_u32(canvas_height),
            max_text_width,
            lines,
            block_height: clamp_u32(block_height),
            y_inside,
            block_top: clamp_u32(block_top),
            band,
            band_alpha,
            placement,
        })
    }

    /// Top edge of wrapped line `index` on the output canvas.
    pub fn line_top(&self, index: usize) -> u32 {
        let offset = index as u64 * u64::from(self.metrics.line_height());
        clamp_u32((u64::from(self.block_top) + offset) as i64)
    }

    /// `true` when the output canvas is taller than the photo.
    pub fn is_extended(&self) -> bool {
        self.placement == Placement::Extended
    }
}

fn clamp_u32(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/layout/plan.rs"]
mod tests;
