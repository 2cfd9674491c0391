use super::*;

fn mono(text: &str) -> f32 {
    text.chars().count() as f32 * 10.0
}

fn plan(width: u32, height: u32, captions: &[&str]) -> CaptionPlan {
    CaptionPlan::new(width, height, captions, &CaptionStyle::default(), &mut mono).unwrap()
}

#[test]
fn short_captions_fit_inside_a_tall_photo() {
    let p = plan(1200, 1600, &["01/01/2024", "Senam Pagi", "Lapangan", "07:00"]);
    assert_eq!(p.placement, Placement::Inside);
    assert_eq!(p.canvas_height, 1600);
    assert_eq!(p.lines.len(), 4);
    assert_eq!(p.block_height, 4 * (42 + 8) - 8);
    assert_eq!(p.y_inside, 1600 - 24 - 192);
    assert_eq!(p.block_top, 1384);
    assert_eq!(p.line_top(3), 1384 + 150);
}

#[test]
fn inside_band_wraps_the_block_with_margin() {
    let p = plan(1200, 1600, &["a", "b"]);
    assert_eq!(p.band.x0, 0.0);
    assert_eq!(p.band.x1, 1200.0);
    assert_eq!(p.band.y0, (p.block_top - 10) as f64);
    assert_eq!(p.band.y1, (p.block_top + p.block_height + 10) as f64);
    assert!(p.band.y1 <= 1600.0);
    assert_eq!(p.band_alpha, 0.25);
}

#[test]
fn tall_block_extends_the_canvas() {
    // 400x150: padding 16, font 18, line height 26, 368px of text room.
    let long = "kata ".repeat(60);
    let p = plan(400, 150, &["12/01/2024", "Posyandu", long.trim(), "08:30"]);
    assert_eq!(p.placement, Placement::Extended);
    assert!(p.is_extended());
    assert!(p.y_inside < 16);
    assert_eq!(p.canvas_height, 150 + 16 + p.block_height + 16);
    assert_eq!(p.block_top, 150 + 16);
    assert_eq!(p.band.y0, 150.0);
    assert_eq!(p.band.y1, p.canvas_height as f64);
    assert_eq!(p.band_alpha, 0.35);
}

#[test]
fn boundary_exactly_at_top_padding_fits() {
    // 300 tall, padding 16: y_inside == padding when block_height == 268.
    let style = CaptionStyle {
        line_gap: 0,
        font_min: 67,
        font_ratio: 0.0,
        ..CaptionStyle::default()
    };
    let p = CaptionPlan::new(400, 300, &["a", "b", "c", "d"], &style, &mut mono).unwrap();
    assert_eq!(p.block_height, 268);
    assert_eq!(p.y_inside, 16);
    assert_eq!(p.placement, Placement::Inside);

    let p = CaptionPlan::new(400, 299, &["a", "b", "c", "d"], &style, &mut mono).unwrap();
    assert_eq!(p.placement, Placement::Extended);
    assert_eq!(p.canvas_height, 299 + 16 + 268 + 16);
}

#[test]
fn no_caption_entries_means_no_plan() {
    let empty: [&str; 0] = [];
    assert!(CaptionPlan::new(100, 100, &empty, &CaptionStyle::default(), &mut mono).is_none());
}

#[test]
fn blank_entries_keep_their_rows() {
    let p = plan(1200, 1600, &["", "", "", ""]);
    assert_eq!(p.lines, vec![""; 4]);
    assert_eq!(p.block_height, 192);
}

#[test]
fn wrapped_lines_never_exceed_text_width() {
    let word = "W".repeat(300);
    let p = plan(400, 300, &[word.as_str()]);
    assert!(p.lines.iter().all(|l| mono(l) <= p.max_text_width));
    assert_eq!(p.lines.concat(), word);
}

#[test]
fn caption_with_newlines_counts_every_drawn_row() {
    // 200x40: padding 16, font 18, 168px of text room.
    let p = plan(200, 40, &["Tanggal", "Rapat", "Balai", "08:30\nSELESAI\nPULANG"]);
    assert!(p.lines.iter().all(|l| !l.contains(['\n', '\r'])));
    assert_eq!(p.lines[3..], ["08:30 SELESAI", "PULANG"]);
    assert_eq!(p.block_height, p.metrics.block_height(p.lines.len()) as u32);
    let last_bottom = p.line_top(p.lines.len() - 1) + p.metrics.font_size;
    assert!(last_bottom + p.metrics.padding <= p.canvas_height);
}
