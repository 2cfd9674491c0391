use crate::foundation::error::{CaptionError, CaptionResult};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for one premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Blend `src` over `dst`, both premultiplied RGBA8 buffers of equal length.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> CaptionResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CaptionError::render_surface(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Flatten premultiplied RGBA8 over an opaque background into packed RGB8.
///
/// JPEG carries no alpha; anything left transparent ends up as `bg_rgb`.
pub fn flatten_premul_to_rgb8(src_premul: &[u8], bg_rgb: [u8; 3]) -> CaptionResult<Vec<u8>> {
    if !src_premul.len().is_multiple_of(4) {
        return Err(CaptionError::render_surface(
            "flatten_premul_to_rgb8 expects an rgba8 buffer",
        ));
    }

    let mut out = Vec::with_capacity(src_premul.len() / 4 * 3);
    for s in src_premul.chunks_exact(4) {
        let inv = 255u16 - u16::from(s[3]);
        for c in 0..3 {
            out.push(s[c].saturating_add(mul_div255(u16::from(bg_rgb[c]), inv)));
        }
    }
    Ok(out)
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
