use super::*;

#[test]
fn canvas_blur_maps_to_half_sigma() {
    assert_eq!(shadow_sigma(4), 2.0);
    assert_eq!(shadow_reach(2.0), 6);
    assert_eq!(shadow_reach(0.0), 0);
}

#[test]
fn weights_are_normalized_and_peak_in_the_middle() {
    let w = gaussian_weights(2.0);
    assert_eq!(w.len(), 13);
    assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    assert!(w[6] > w[5] && w[5] > w[0]);
}

#[test]
fn zero_sigma_leaves_mask_alone() {
    let mask = vec![0, 50, 255, 7];
    assert_eq!(blur_coverage(&mask, 2, 2, 0.0).unwrap(), mask);
}

#[test]
fn glyph_sized_blob_spreads_but_keeps_its_coverage() {
    let (w, h) = (21u32, 21u32);
    let mut mask = vec![0u8; (w * h) as usize];
    for y in 9..12 {
        for x in 9..12 {
            mask[(y * w + x) as usize] = 255;
        }
    }

    let out = blur_coverage(&mask, w, h, 2.0).unwrap();
    let at = |x: u32, y: u32| out[(y * w + x) as usize];
    assert!(at(10, 10) < 255 && at(10, 10) > 0);
    assert!(at(13, 10) > 0, "coverage should reach past the blob");
    assert!(at(10, 0) == 0 && at(0, 0) == 0);
    assert!(at(8, 10).abs_diff(at(12, 10)) <= 1);

    let before: u32 = mask.iter().map(|&v| u32::from(v)).sum();
    let after: u32 = out.iter().map(|&v| u32::from(v)).sum();
    assert!(before.abs_diff(after) * 20 <= before, "{before} vs {after}");
}

#[test]
fn coverage_fades_at_the_layer_border() {
    let mask = vec![255u8; 8 * 8];
    let out = blur_coverage(&mask, 8, 8, 2.0).unwrap();
    assert!(out[0] < out[3 * 8 + 3]);
    assert!(out[0] < 128);
}

#[test]
fn tint_premultiplies_the_shadow_colour() {
    let grey = CaptionColor::rgb(128, 128, 128);
    assert_eq!(tint_coverage(&[0, 255], grey), vec![0, 0, 0, 0, 128, 128, 128, 255]);
    let half = tint_coverage(&[255], grey.with_alpha(0.5));
    assert_eq!(half[3], 128);
    assert_eq!(half[0], 64);
}

#[test]
fn rejects_bad_sigma_and_mismatched_masks() {
    assert!(matches!(
        blur_coverage(&[0; 4], 2, 2, f32::NAN),
        Err(CaptionError::Validation(_))
    ));
    assert!(matches!(
        blur_coverage(&[0; 3], 2, 2, 1.0),
        Err(CaptionError::RenderSurface(_))
    ));
}
