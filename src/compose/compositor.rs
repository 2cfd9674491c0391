use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use crate::{
    compose::preview::PreviewHandle,
    foundation::{
        color::CaptionColor,
        error::{CaptionError, CaptionResult},
    },
    layout::{
        plan::{CaptionPlan, Placement},
        style::CaptionStyle,
    },
    render::{
        decode::{SourceImage, decode_source},
        encode::encode_jpeg,
        surface::Canvas,
    },
    text::engine::{FontFace, TextEngine},
};

const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Environment variable overriding [`CompositorOpts::jpeg_quality`].
pub const JPEG_QUALITY_ENV: &str = "PHOTO_CAPTION_JPEG_QUALITY";

/// Compositor configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorOpts {
    /// Caption layout and paint policy.
    pub style: CaptionStyle,
    /// JPEG quality of the output, `1..=100`.
    pub jpeg_quality: u8,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            style: CaptionStyle::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl CompositorOpts {
    /// Parse options from JSON; absent fields keep their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> CaptionResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| CaptionError::validation(format!("parse compositor options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> CaptionResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CaptionResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CaptionError::validation(format!(
                "open compositor options '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `PHOTO_CAPTION_JPEG_QUALITY` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`. Unparsable or out-of-range values are
    /// ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(q) = lookup(JPEG_QUALITY_ENV)
            .and_then(|v| v.trim().parse::<u8>().ok())
            .filter(|q| (1..=100).contains(q))
        {
            self.jpeg_quality = q;
        }
        self
    }

    /// Reject out-of-range quality or style values.
    pub fn validate(&self) -> CaptionResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CaptionError::validation(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        self.style.validate()
    }
}

/// Result of one [`Compositor::composite`] call.
#[derive(Debug)]
pub struct Composited {
    /// Encoded JPEG bytes, ready for upload.
    pub bytes: Arc<[u8]>,
    /// Output width; always the source width.
    pub width: u32,
    /// Output height; larger than the source only when the caption strip was added.
    pub height: u32,
    /// Caption geometry, or `None` when nothing was drawn.
    pub plan: Option<CaptionPlan>,
    /// Display handle sharing `bytes`.
    pub preview: PreviewHandle,
}

impl Composited {
    /// Where the caption went, if one was drawn.
    pub fn placement(&self) -> Option<Placement> {
        self.plan.as_ref().map(|p| p.placement)
    }

    /// Wrapped caption lines as drawn (empty when nothing was drawn).
    pub fn lines(&self) -> &[String] {
        self.plan.as_ref().map_or(&[], |p| p.lines.as_slice())
    }
}

impl From<Composited> for PreviewHandle {
    fn from(c: Composited) -> Self {
        c.preview
    }
}

/// Burns caption lines onto photos.
///
/// Holds only immutable configuration and the font face; every call builds its own text
/// engine and surfaces, so one compositor can serve concurrent calls from many threads.
#[derive(Clone, Debug)]
pub struct Compositor {
    opts: CompositorOpts,
    face: FontFace,
}

impl Compositor {
    /// Compositor using the embedded caption font.
    pub fn new(opts: CompositorOpts) -> CaptionResult<Self> {
        Self::with_face(opts, FontFace::embedded()?)
    }

    /// Compositor using a font loaded from raw bytes.
    pub fn with_font_bytes(opts: CompositorOpts, font: Vec<u8>) -> CaptionResult<Self> {
        Self::with_face(opts, FontFace::from_bytes(font)?)
    }

    /// Compositor using an already loaded face.
    pub fn with_face(opts: CompositorOpts, face: FontFace) -> CaptionResult<Self> {
        opts.validate()?;
        Ok(Self { opts, face })
    }

    /// Active options.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Caption font face.
    pub fn face(&self) -> &FontFace {
        &self.face
    }

    /// A text engine sized for a `width` x `height` photo.
    pub fn text_engine(&self, width: u32, height: u32) -> CaptionResult<TextEngine> {
        let metrics = self.opts.style.metrics_for(width, height);
        TextEngine::new(&self.face, metrics.font_size as f32)
    }

    /// Wrap and place `captions` for a `width` x `height` photo without rendering.
    pub fn plan<S: AsRef<str>>(
        &self,
        width: u32,
        height: u32,
        captions: &[S],
    ) -> CaptionResult<Option<CaptionPlan>> {
        let mut engine = self.text_engine(width, height)?;
        Ok(CaptionPlan::new(
            width,
            height,
            captions,
            &self.opts.style,
            &mut engine,
        ))
    }

    /// Decode `image`, burn `captions` onto it in `color` and encode the result as JPEG.
    ///
    /// With `enabled == false`, or with no caption entries, the photo is re-encoded at its
    /// original size. Fails with [`CaptionError::ImageDecode`] when `image` cannot be
    /// decoded and with [`CaptionError::RenderSurface`] when a drawing surface cannot be
    /// provided; a failed call leaves nothing behind.
    #[tracing::instrument(
        skip(self, image, captions),
        fields(image_bytes = image.len(), entries = captions.len(), color = %color)
    )]
    pub fn composite<S: AsRef<str>>(
        &self,
        image: &[u8],
        captions: &[S],
        color: CaptionColor,
        enabled: bool,
    ) -> CaptionResult<Composited> {
        let source = decode_source(image)?;
        if !enabled {
            tracing::debug!("caption disabled; re-encoding source");
            return self.finish_plain(&source);
        }

        let mut engine = self
            .text_engine(source.width, source.height)
            .map_err(|e| CaptionError::render_surface(format!("text engine: {e}")))?;
        let Some(plan) = CaptionPlan::new(
            source.width,
            source.height,
            captions,
            &self.opts.style,
            &mut engine,
        ) else {
            tracing::debug!("no caption entries; re-encoding source");
            return self.finish_plain(&source);
        };
        tracing::debug!(
            placement = ?plan.placement,
            font_size = engine.font_size(),
            wrapped_lines = plan.lines.len(),
            block_height = plan.block_height,
            y_inside = plan.y_inside,
            canvas_height = plan.canvas_height,
            "caption planned"
        );

        let canvas = self.draw(&source, &plan, &mut engine, color)?;
        let bytes = encode_jpeg(
            canvas.data(),
            canvas.width(),
            canvas.height(),
            self.opts.jpeg_quality,
        )?;
        Ok(self.finish(bytes, canvas.width(), canvas.height(), Some(plan)))
    }

    fn draw(
        &self,
        source: &SourceImage,
        plan: &CaptionPlan,
        engine: &mut TextEngine,
        color: CaptionColor,
    ) -> CaptionResult<Canvas> {
        let style = &self.opts.style;
        let mut canvas = Canvas::with_photo(source, plan.canvas_height)?;

        let band_top = plan.band.y0.floor().max(0.0) as u32;
        let band_bottom = plan.band.y1.ceil() as u32;
        let mut band = canvas.layer(band_top, band_bottom)?;
        band.fill_rect(plan.band, CaptionColor::BLACK.with_alpha(plan.band_alpha));
        canvas.composite(&band.finish())?;

        let shaped: Vec<(u32, parley::Layout<CaptionColor>)> = plan
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(i, line)| (plan.line_top(i), engine.shape(line)))
            .collect();
        if shaped.is_empty() {
            return Ok(canvas);
        }

        let x = f64::from(plan.metrics.padding);
        let text_top = band_top;
        let text_bottom = plan.canvas_height;

        if style.shadow_blur > 0 && style.shadow_color.a > 0 {
            // Coverage only; into_shadow applies the shadow colour.
            let mut shadow = canvas.layer(text_top, text_bottom)?;
            for (top, layout) in &shaped {
                shadow.fill_text(layout, &self.face, x, f64::from(*top), CaptionColor::WHITE);
            }
            canvas.composite(
                &shadow
                    .finish()
                    .into_shadow(style.shadow_blur, style.shadow_color)?,
            )?;
        }

        let mut text = canvas.layer(text_top, text_bottom)?;
        for (top, layout) in &shaped {
            text.fill_text(layout, &self.face, x, f64::from(*top), color);
        }
        canvas.composite(&text.finish())?;

        Ok(canvas)
    }

    fn finish_plain(&self, source: &SourceImage) -> CaptionResult<Composited> {
        let bytes = encode_jpeg(
            &source.rgba8_premul,
            source.width,
            source.height,
            self.opts.jpeg_quality,
        )?;
        Ok(self.finish(bytes, source.width, source.height, None))
    }

    fn finish(
        &self,
        bytes: Vec<u8>,
        width: u32,
        height: u32,
        plan: Option<CaptionPlan>,
    ) -> Composited {
        let bytes: Arc<[u8]> = Arc::from(bytes);
        let preview = PreviewHandle::new(bytes.clone(), width, height);
        Composited {
            bytes,
            width,
            height,
            plan,
            preview,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
