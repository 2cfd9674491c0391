use image::ImageEncoder as _;

use crate::{
    foundation::error::{CaptionError, CaptionResult},
    render::blend::flatten_premul_to_rgb8,
};

/// MIME type of everything the compositor emits.
pub const OUTPUT_MIME: &str = "image/jpeg";

/// Encode premultiplied RGBA8 pixels as a baseline JPEG.
///
/// Transparent areas are flattened over black, matching how a 2D canvas exports JPEG.
pub fn encode_jpeg(premul: &[u8], width: u32, height: u32, quality: u8) -> CaptionResult<Vec<u8>> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| CaptionError::render_surface("encode buffer size overflow"))?;
    if premul.len() != expected {
        return Err(CaptionError::render_surface(format!(
            "encode expects {expected} bytes for {width}x{height}, got {}",
            premul.len()
        )));
    }

    let rgb = flatten_premul_to_rgb8(premul, [0, 0, 0])?;
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| CaptionError::render_surface(format!("encode jpeg: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
