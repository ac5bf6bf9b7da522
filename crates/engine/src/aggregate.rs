//! Running totals derived from cache contents.
//!
//! Nothing here is stored: totals are recomputed from the records every time
//! they are observed.
use crate::record::{FieldValue, Record};

/// Numeric value of a field as the total sees it.
///
/// Text is read like a browser's `parseFloat`: leading whitespace is skipped
/// and the longest numeric prefix wins, so `"12abc"` counts as 12. Missing,
/// empty, non-numeric and non-finite values count as 0.
pub fn parse_numeric(value: Option<&FieldValue>) -> f64 {
    let parsed = match value {
        Some(FieldValue::Number(number)) => *number,
        Some(FieldValue::Text(text)) => numeric_prefix(text)
            .and_then(|prefix| prefix.parse::<f64>().ok())
            .unwrap_or(0.0),
        None => 0.0,
    };
    if parsed.is_finite() { parsed } else { 0.0 }
}

/// Sum of [`parse_numeric`] over `field` of every record.
pub fn total(records: &[Record], field: &str) -> f64 {
    records
        .iter()
        .map(|record| parse_numeric(record.get(field)))
        .sum()
}

/// Formats an amount as dollars with two decimals.
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Returns the longest prefix of `text` (after leading whitespace) shaped
/// like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if digits > 0 || frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&text[..end])
}
