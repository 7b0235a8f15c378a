#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    // Japanese characters are multi-byte UTF-8
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

#[test]
fn test_truncate_emoji() {
    assert_eq!(truncate("🎉🎊🎈🎁", 3), "🎉🎊…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("hello", 1), "…");
}

#[test]
fn test_truncate_mixed_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

#[test]
fn test_truncate_two_chars() {
    assert_eq!(truncate("hello", 2), "h…");
}

#[test]
fn test_truncate_single_char_string() {
    assert_eq!(truncate("a", 1), "a");
    assert_eq!(truncate("a", 5), "a");
}

#[test]
fn test_truncate_max_one_with_long_string() {
    // max=1 should always produce "…" for strings longer than 1
    assert_eq!(truncate("ab", 1), "…");
    assert_eq!(truncate("abc", 1), "…");
}

// ── format_amount ──────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
}

#[test]
fn test_format_amount_no_commas() {
    assert_eq!(format_amount(dec!(999.99)), "$999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-$42.50");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(10000000.00)), "$10,000,000.00");
}

#[test]
fn test_format_amount_rounds_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
}

#[test]
fn test_format_amount_negative_large() {
    assert_eq!(format_amount(dec!(-99999.01)), "-$99,999.01");
}

#[test]
fn test_format_amount_single_digit() {
    assert_eq!(format_amount(dec!(5)), "$5.00");
}

// ── format_months ──────────────────────────────────────────

#[test]
fn test_format_months_sentinel() {
    assert_eq!(format_months(dec!(0)), "-");
}

#[test]
fn test_format_months_plural() {
    assert_eq!(format_months(dec!(7.1)), "7.1 months");
    assert_eq!(format_months(dec!(1)), "1.0 month");
}

#[test]
fn test_format_months_saved() {
    use crate::insights::project_goal_timeline;

    let p = project_goal_timeline(dec!(1200), dec!(100), dec!(70));
    assert_eq!(format_months_saved(&p), "4.9 months");

    // nothing recoverable: both sides are real, nothing saved
    let p = project_goal_timeline(dec!(1200), dec!(100), dec!(0));
    assert_eq!(format_months_saved(&p), "0.0 months");

    // no base savings: the baseline is the sentinel, not a comparison point
    let p = project_goal_timeline(dec!(1000), dec!(0), dec!(250));
    assert_eq!(p.months_saved, dec!(-4.0));
    assert_eq!(format_months_saved(&p), "-");

    let p = project_goal_timeline(dec!(1000), dec!(0), dec!(0));
    assert_eq!(format_months_saved(&p), "-");
}

// ── bar_len / progress_bar ─────────────────────────────────

#[test]
fn test_bar_len_proportional() {
    assert_eq!(bar_len(dec!(50), dec!(100), 20), 10);
    assert_eq!(bar_len(dec!(100), dec!(100), 20), 20);
}

#[test]
fn test_bar_len_small_values_visible() {
    assert_eq!(bar_len(dec!(0.01), dec!(1000), 20), 1);
}

#[test]
fn test_bar_len_degenerate() {
    assert_eq!(bar_len(dec!(0), dec!(100), 20), 0);
    assert_eq!(bar_len(dec!(10), dec!(0), 20), 0);
    assert_eq!(bar_len(dec!(10), dec!(100), 0), 0);
}

#[test]
fn test_progress_bar_clamps() {
    assert_eq!(progress_bar(0.5, 4), "[██░░]");
    assert_eq!(progress_bar(2.0, 2), "[██]");
    assert_eq!(progress_bar(-1.0, 2), "[░░]");
}

// ── scroll helpers ─────────────────────────────────────────

#[test]
fn test_scroll_down_keeps_cursor_visible() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (1, 0);
    scroll_down(&mut index, &mut scroll, 2, 5);
    assert_eq!(index, 1);
}

#[test]
fn test_scroll_up_and_bounds() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}
