use std::{borrow::Cow, path::Path};

use anyhow::Context;

use crate::{
    foundation::{
        color::CaptionColor,
        error::{CaptionError, CaptionResult},
    },
    layout::wrap::TextMeasure,
};

const EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// A single font face, shared between shaping (parley) and glyph outlines (vello_cpu).
///
/// Cloning is cheap; the font bytes are reference counted.
#[derive(Clone)]
pub struct FontFace {
    family: String,
    shaping: parley::fontique::Blob<u8>,
    outlines: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl FontFace {
    /// The built-in caption face (DejaVu Sans, regular).
    pub fn embedded() -> CaptionResult<Self> {
        Self::from_bytes(EMBEDDED_FONT.to_vec())
    }

    /// Load a face from raw TrueType/OpenType bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> CaptionResult<Self> {
        let shaping = parley::fontique::Blob::from(bytes.clone());
        let family = {
            let mut font_ctx = parley::FontContext::default();
            register_family(&mut font_ctx, shaping.clone())?
        };
        let outlines =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(Self {
            family,
            shaping,
            outlines,
        })
    }

    /// Load a face from a font file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CaptionResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Family name reported by the font.
    pub fn family(&self) -> &str {
        &self.family
    }

    pub(crate) fn outlines(&self) -> &vello_cpu::peniko::FontData {
        &self.outlines
    }
}

fn register_family(
    font_ctx: &mut parley::FontContext,
    blob: parley::fontique::Blob<u8>,
) -> CaptionResult<String> {
    let families = font_ctx.collection.register_fonts(blob, None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| CaptionError::validation("no font families registered from font bytes"))?;
    let name = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| CaptionError::validation("registered font family has no name"))?;
    Ok(name.to_string())
}

/// Shapes and measures single-line caption text at one font size.
///
/// Owns its own parley contexts, so each composite call builds a fresh engine and no
/// layout state is shared between calls.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<CaptionColor>,
    family: String,
    font_size: f32,
}

impl TextEngine {
    /// Build an engine for `face` at `font_size` pixels.
    pub fn new(face: &FontFace, font_size: f32) -> CaptionResult<Self> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(CaptionError::validation(
                "font size must be finite and > 0",
            ));
        }
        let mut font_ctx = parley::FontContext::default();
        let family = register_family(&mut font_ctx, face.shaping.clone())?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font_size,
        })
    }

    /// Font size in pixels.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Shape `text` as one unbroken line.
    pub fn shape(&mut self, text: &str) -> parley::Layout<CaptionColor> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.font_size));
        builder.push_default(parley::style::StyleProperty::Brush(CaptionColor::default()));

        let mut layout: parley::Layout<CaptionColor> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMeasure for TextEngine {
    fn measure(&mut self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.shape(text).full_width()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
