use super::*;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 180, 40, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn dims(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}

fn compositor() -> Compositor {
    Compositor::new(CompositorOpts::default()).unwrap()
}

#[test]
fn default_opts_are_valid() {
    let opts = CompositorOpts::default();
    assert_eq!(opts.jpeg_quality, 90);
    opts.validate().unwrap();
}

#[test]
fn opts_json_fills_missing_fields() {
    let opts = CompositorOpts::from_json_str(r#"{"jpeg_quality": 75}"#).unwrap();
    assert_eq!(opts.jpeg_quality, 75);
    assert_eq!(opts.style, CaptionStyle::default());

    let opts = CompositorOpts::from_json_str(r#"{"style": {"line_gap": 4}}"#).unwrap();
    assert_eq!(opts.style.line_gap, 4);
    assert_eq!(opts.style.font_min, 18);
}

#[test]
fn opts_json_rejects_bad_values() {
    assert!(matches!(
        CompositorOpts::from_json_str(r#"{"jpeg_quality": 0}"#),
        Err(CaptionError::Validation(_))
    ));
    assert!(matches!(
        CompositorOpts::from_json_str(r#"{"jpeg_qualty": 80}"#),
        Err(CaptionError::Validation(_))
    ));
    assert!(matches!(
        CompositorOpts::from_json_str("not json"),
        Err(CaptionError::Validation(_))
    ));
}

#[test]
fn missing_opts_file_is_a_validation_error() {
    let err = CompositorOpts::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open compositor options"));
}

#[test]
fn quality_override_ignores_garbage() {
    let set = |v: &'static str| move |k: &str| (k == JPEG_QUALITY_ENV).then(|| v.to_string());
    assert_eq!(CompositorOpts::default().with_overrides_from(set("60")).jpeg_quality, 60);
    assert_eq!(CompositorOpts::default().with_overrides_from(set("0")).jpeg_quality, 90);
    assert_eq!(CompositorOpts::default().with_overrides_from(set("101")).jpeg_quality, 90);
    assert_eq!(CompositorOpts::default().with_overrides_from(set("high")).jpeg_quality, 90);
    assert_eq!(CompositorOpts::default().with_overrides_from(|_| None).jpeg_quality, 90);
}

#[test]
fn disabled_keeps_dimensions_and_draws_nothing() {
    let out = compositor()
        .composite(&png(64, 48), &["01/01/2024", "Senam"], CaptionColor::WHITE, false)
        .unwrap();
    assert_eq!((out.width, out.height), (64, 48));
    assert_eq!(dims(&out.bytes), (64, 48));
    assert!(out.plan.is_none());
    assert!(out.lines().is_empty());
}

#[test]
fn no_entries_behaves_like_disabled() {
    let empty: [&str; 0] = [];
    let out = compositor()
        .composite(&png(64, 48), &empty, CaptionColor::WHITE, true)
        .unwrap();
    assert_eq!(dims(&out.bytes), (64, 48));
    assert_eq!(out.placement(), None);
}

#[test]
fn preview_shares_the_output_bytes() {
    let out = compositor()
        .composite(&png(320, 480), &["a"], CaptionColor::WHITE, true)
        .unwrap();
    assert_eq!(out.preview.bytes(), &out.bytes[..]);
    assert_eq!(out.preview.dimensions(), (out.width, out.height));
}

#[test]
fn plan_matches_composite_geometry() {
    let c = compositor();
    let captions = ["12/01/2024", "Posyandu", "Balai Desa", "08:30"];
    let plan = c.plan(320, 480, &captions).unwrap().unwrap();
    let out = c
        .composite(&png(320, 480), &captions, CaptionColor::WHITE, true)
        .unwrap();
    assert_eq!(out.plan.as_ref(), Some(&plan));
    assert_eq!(out.height, plan.canvas_height);
}

#[test]
fn undecodable_input_fails_with_image_decode() {
    let err = compositor()
        .composite(b"definitely not an image", &["x"], CaptionColor::WHITE, true)
        .unwrap_err();
    assert!(matches!(err, CaptionError::ImageDecode(_)));
}

#[test]
fn caption_pixels_differ_from_source() {
    let src = png(320, 480);
    let c = compositor();
    let plain = c.composite(&src, &["HELLO"], CaptionColor::WHITE, false).unwrap();
    let drawn = c.composite(&src, &["HELLO"], CaptionColor::WHITE, true).unwrap();
    assert_ne!(plain.bytes, drawn.bytes);

    let a = image::load_from_memory(&plain.bytes).unwrap().to_rgb8();
    let b = image::load_from_memory(&drawn.bytes).unwrap().to_rgb8();
    // Band rows get darker; the top of the photo is untouched.
    let band_y = drawn.plan.as_ref().unwrap().block_top + 2;
    assert!(b.get_pixel(300, band_y)[0] < a.get_pixel(300, band_y)[0]);
    let ta = a.get_pixel(10, 10);
    let tb = b.get_pixel(10, 10);
    assert!((i16::from(ta[0]) - i16::from(tb[0])).abs() <= 3);
}

fn png_from(img: image::RgbImage) -> Vec<u8> {
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

#[test]
fn requested_colour_reaches_the_text_pixels() {
    let opts = CompositorOpts {
        style: CaptionStyle {
            font_min: 60,
            ..CaptionStyle::default()
        },
        ..CompositorOpts::default()
    };
    let c = Compositor::new(opts).unwrap();
    let src = png_from(image::RgbImage::from_pixel(320, 240, image::Rgb([128, 128, 128])));
    let red = CaptionColor::parse("#ff0000").unwrap();

    let out = c.composite(&src, &["HHH"], red, true).unwrap();
    let plan = out.plan.as_ref().unwrap();
    assert_eq!(plan.placement, Placement::Inside);

    let img = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    let top = plan.line_top(0);
    let strongly_red = (top..top + plan.metrics.font_size)
        .flat_map(|y| (0..img.width()).map(move |x| (x, y)))
        .map(|(x, y)| img.get_pixel(x, y).0)
        .filter(|[r, g, b]| *r > 200 && *g < 80 && *b < 80)
        .count();
    assert!(strongly_red > 20, "{strongly_red}");

    // The photo above the band keeps no trace of red.
    let [r, g, b] = img.get_pixel(160, 20).0;
    assert!(r.abs_diff(g) <= 4 && g.abs_diff(b) <= 4, "{r} {g} {b}");
}

#[test]
fn disabled_output_matches_source_pixels() {
    let (w, h) = (96u32, 64u32);
    let source = image::RgbImage::from_fn(w, h, |x, y| {
        image::Rgb([(x * 255 / w) as u8, (y * 255 / h) as u8, 100])
    });
    let out = compositor()
        .composite(&png_from(source.clone()), &["01/01/2024", "Senam"], CaptionColor::WHITE, false)
        .unwrap();

    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (w, h));
    let mut total = 0u64;
    for (a, b) in source.pixels().zip(decoded.pixels()) {
        for c in 0..3 {
            let d = a[c].abs_diff(b[c]);
            assert!(d <= 16, "{a:?} vs {b:?}");
            total += u64::from(d);
        }
    }
    assert!(total / u64::from(w * h * 3) <= 3, "mean error {}", total / u64::from(w * h * 3));
}
