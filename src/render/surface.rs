use crate::{
    foundation::{
        color::CaptionColor,
        error::{CaptionError, CaptionResult},
    },
    render::{blend, blur, decode::SourceImage},
    text::engine::FontFace,
};

fn surface_dim(v: u32, what: &str) -> CaptionResult<u16> {
    if v == 0 {
        return Err(CaptionError::render_surface(format!("{what} must be > 0")));
    }
    u16::try_from(v).map_err(|_| {
        CaptionError::render_surface(format!("{what} {v} exceeds {}", u16::MAX))
    })
}

/// Output canvas in premultiplied RGBA8.
///
/// Built fresh for every composite call and dropped once encoded.
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Canvas of `photo.width` x `height` with the photo drawn unscaled at the top.
    ///
    /// Rows below the photo start fully transparent.
    pub fn with_photo(photo: &SourceImage, height: u32) -> CaptionResult<Self> {
        surface_dim(photo.width, "canvas width")?;
        surface_dim(height, "canvas height")?;
        if height < photo.height {
            return Err(CaptionError::render_surface(
                "canvas must be at least as tall as the photo",
            ));
        }

        let len = (photo.width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CaptionError::render_surface("canvas size overflow"))?;
        if photo.rgba8_premul.len() > len {
            return Err(CaptionError::render_surface("photo byte length mismatch"));
        }

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            CaptionError::render_surface(format!(
                "allocate {}x{height} canvas: {e}",
                photo.width
            ))
        })?;
        data.extend_from_slice(&photo.rgba8_premul);
        data.resize(len, 0);

        Ok(Self {
            width: photo.width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// A transparent full-width drawing layer covering canvas rows `top..bottom`.
    ///
    /// `bottom` is clamped to the canvas height.
    pub fn layer(&self, top: u32, bottom: u32) -> CaptionResult<Layer> {
        let bottom = bottom.min(self.height);
        if top >= bottom {
            return Err(CaptionError::render_surface(format!(
                "empty layer rows {top}..{bottom}"
            )));
        }
        let width = surface_dim(self.width, "layer width")?;
        let height = surface_dim(bottom - top, "layer height")?;
        Ok(Layer {
            top,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    /// Blend finished layer pixels over the canvas at the layer's rows.
    pub fn composite(&mut self, layer: &LayerPixels) -> CaptionResult<()> {
        if layer.width != self.width {
            return Err(CaptionError::render_surface("layer width mismatch"));
        }
        let start = layer.top as usize * self.width as usize * 4;
        let end = start + layer.data.len();
        let dst = self
            .data
            .get_mut(start..end)
            .ok_or_else(|| CaptionError::render_surface("layer extends past the canvas"))?;
        blend::over_in_place(dst, &layer.data)
    }
}

/// Vector drawing surface for a horizontal slice of a [`Canvas`].
///
/// Coordinates passed to the drawing methods are canvas coordinates.
pub struct Layer {
    top: u32,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Layer {
    /// Fill `rect` with a solid color.
    pub fn fill_rect(&mut self, rect: kurbo::Rect, color: CaptionColor) {
        let top = f64::from(self.top);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color.to_peniko());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0,
            rect.y0 - top,
            rect.x1,
            rect.y1 - top,
        ));
    }

    /// Draw a shaped layout with its top-left corner at (`x`, `y`).
    pub fn fill_text(
        &mut self,
        layout: &parley::Layout<CaptionColor>,
        face: &FontFace,
        x: f64,
        y: f64,
        color: CaptionColor,
    ) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((
                x,
                y - f64::from(self.top),
            )));
        self.ctx.set_paint(color.to_peniko());

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(face.outlines())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> LayerPixels {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        LayerPixels {
            top: self.top,
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

/// Rasterized layer content, premultiplied RGBA8.
pub struct LayerPixels {
    /// First canvas row covered by the layer.
    pub top: u32,
    /// Width in pixels (always the canvas width).
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Pixel bytes.
    pub data: Vec<u8>,
}

impl LayerPixels {
    /// Turn drawn glyph coverage into a soft `color` shadow with a canvas-style
    /// `shadowBlur` of `blur` pixels. Only the alpha of the drawn pixels is used.
    pub fn into_shadow(self, blur: u32, color: CaptionColor) -> CaptionResult<Self> {
        let coverage: Vec<u8> = self.data.chunks_exact(4).map(|px| px[3]).collect();
        let sigma = blur::shadow_sigma(blur);
        let soft = blur::blur_coverage(&coverage, self.width, self.height, sigma)?;
        Ok(Self {
            data: blur::tint_coverage(&soft, color),
            ..self
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
