use super::*;

fn mono(text: &str) -> f32 {
    text.chars().count() as f32 * 10.0
}

#[test]
fn short_line_is_untouched() {
    assert_eq!(wrap_line("Senam Pagi", 200.0, &mut mono), vec!["Senam Pagi"]);
}

#[test]
fn empty_line_yields_one_empty_line() {
    assert_eq!(wrap_line("", 100.0, &mut mono), vec![String::new()]);
}

#[test]
fn space_only_line_still_yields_one_line() {
    assert_eq!(wrap_line(" ", 100.0, &mut mono), vec![String::new()]);
}

#[test]
fn words_accumulate_greedily() {
    // 10 chars per line at 10px each.
    let out = wrap_line("aaa bbb ccc ddd eeee", 100.0, &mut mono);
    assert_eq!(out, vec!["aaa bbb", "ccc ddd", "eeee"]);
}

#[test]
fn exact_fit_stays_on_one_line() {
    let out = wrap_line("aaaa bbbbb", 100.0, &mut mono);
    assert_eq!(out, vec!["aaaa bbbbb"]);
}

#[test]
fn overlong_word_is_split_by_characters() {
    let out = wrap_line("ab cdefghijklmnopqrstuvwxy z", 100.0, &mut mono);
    assert_eq!(out, vec!["ab", "cdefghijkl", "mnopqrstuv", "wxy z"]);
}

#[test]
fn pathological_word_respects_width_bound() {
    let word = "x".repeat(1000);
    let out = wrap_line(&word, 73.0, &mut mono);
    assert!(out.iter().all(|l| mono(l) <= 73.0));
    assert_eq!(out.concat(), word);
    assert_eq!(out.len(), 1000usize.div_ceil(7));
}

#[test]
fn character_wider_than_limit_gets_its_own_line() {
    let out = wrap_line("abc", 5.0, &mut mono);
    assert_eq!(out, vec!["a", "b", "c"]);
}

#[test]
fn multibyte_characters_are_not_split() {
    let out = wrap_line("ééééé", 30.0, &mut mono);
    assert_eq!(out, vec!["ééé", "éé"]);
}

#[test]
fn wrap_lines_preserves_order_and_blank_rows() {
    let lines = ["12/01/2024", "", "Jl. Merdeka No. 1 panjang", "08:30"];
    let out = wrap_lines(&lines, 100.0, &mut mono);
    assert_eq!(
        out,
        vec!["12/01/2024", "", "Jl.", "Merdeka", "No. 1", "panjang", "08:30"]
    );
}

#[test]
fn wrapping_is_deterministic() {
    let text = "Jl. Merdeka No. 1, sangat panjang sekali nama lokasinya";
    assert_eq!(
        wrap_line(text, 120.0, &mut mono),
        wrap_line(text, 120.0, &mut mono)
    );
}

#[test]
fn measure_can_be_a_stateful_closure() {
    let mut calls = 0usize;
    let mut counting = |t: &str| {
        calls += 1;
        mono(t)
    };
    wrap_line("a b c", 100.0, &mut counting);
    assert!(calls >= 3);
}

#[test]
fn line_breaks_and_tabs_become_spaces() {
    assert_eq!(wrap_line("a\nb\tc", 100.0, &mut mono), vec!["a b c"]);
    assert_eq!(
        wrap_line("08:30\nSELESAI\nPULANG", 80.0, &mut mono),
        vec!["08:30", "SELESAI", "PULANG"]
    );
    assert!(wrap_line("\n", 100.0, &mut mono).iter().all(|l| !l.contains('\n')));
}
