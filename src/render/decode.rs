use std::io::Cursor;

use image::ImageDecoder as _;

use crate::foundation::error::{CaptionError, CaptionResult};

/// Decoded photo in premultiplied RGBA8, oriented the way it should be displayed.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

/// Decode photo bytes in any format the `image` crate recognises.
///
/// The EXIF orientation tag, when present, is applied so the result matches what a browser
/// would display. Fails with [`CaptionError::ImageDecode`] for unreadable input or an empty
/// raster.
pub fn decode_source(bytes: &[u8]) -> CaptionResult<SourceImage> {
    SourceImage::from_dynamic(decode_oriented(bytes)?)
}

pub(crate) fn decode_oriented(bytes: &[u8]) -> CaptionResult<image::DynamicImage> {
    let mut decoder = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CaptionError::image_decode(format!("sniff image format: {e}")))?
        .into_decoder()
        .map_err(|e| CaptionError::image_decode(e.to_string()))?;
    let orientation = decoder
        .orientation()
        .unwrap_or(image::metadata::Orientation::NoTransforms);

    let mut dyn_img = image::DynamicImage::from_decoder(decoder)
        .map_err(|e| CaptionError::image_decode(e.to_string()))?;
    dyn_img.apply_orientation(orientation);
    Ok(dyn_img)
}

impl SourceImage {
    pub(crate) fn from_dynamic(img: image::DynamicImage) -> CaptionResult<Self> {
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptionError::image_decode(format!(
                "image has empty dimensions {width}x{height}"
            )));
        }

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);

        Ok(Self {
            width,
            height,
            rgba8_premul,
        })
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/decode.rs"]
mod tests;
