use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::insights::GoalProjection;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Render a month count from the goal projection. Zero means the goal is
/// either already met or unreachable at the given rate.
pub(crate) fn format_months(months: Decimal) -> String {
    if months.is_zero() {
        "-".to_string()
    } else if months == Decimal::ONE {
        "1.0 month".to_string()
    } else {
        format!("{months} months")
    }
}

/// Render the time redirecting flagged spending saves. Only meaningful when
/// both sides of the comparison are real month counts, not the zero sentinel.
pub(crate) fn format_months_saved(projection: &GoalProjection) -> String {
    if projection.months_baseline.is_zero() || projection.months_optimized.is_zero() {
        "-".to_string()
    } else if projection.months_saved.is_zero() {
        "0.0 months".to_string()
    } else {
        format_months(projection.months_saved)
    }
}

/// Number of cells a bar of `value` gets when `max` fills `width` cells.
/// Non-zero values always get at least one cell.
pub(crate) fn bar_len(value: Decimal, max: Decimal, width: usize) -> usize {
    if max <= Decimal::ZERO || value <= Decimal::ZERO || width == 0 {
        return 0;
    }
    let cells = (value / max * Decimal::from(width as u64))
        .round()
        .to_usize()
        .unwrap_or(0);
    cells.clamp(1, width)
}

pub(crate) fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0)) * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
