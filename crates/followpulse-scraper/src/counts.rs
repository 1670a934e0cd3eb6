//! Parsing of follower counts as they appear in the wild: plain integers,
//! `"1,234"`, abbreviated `"12.5K"` / `"3.4M"` / `"1B"`, or JSON numbers
//! and strings behind one of several candidate field paths.

use serde_json::Value;

/// Parse a human-formatted count.
///
/// Thousands separators (`,`, spaces, and `.` in `1.234.567` form) are
/// dropped. A trailing `K`, `M`, or `B` multiplies; its fractional part is
/// applied exactly (`"12.5K"` is 12 500). Returns `None` for anything that
/// is not a non-negative count.
#[must_use]
pub fn parse_count(raw: &str) -> Option<u64> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if compact.is_empty() {
        return None;
    }

    let (number, multiplier) = match compact.chars().last() {
        Some('k' | 'K') => (&compact[..compact.len() - 1], 1_000u64),
        Some('m' | 'M') => (&compact[..compact.len() - 1], 1_000_000u64),
        Some('b' | 'B') => (&compact[..compact.len() - 1], 1_000_000_000u64),
        _ => (compact.as_str(), 1u64),
    };
    if number.is_empty() {
        return None;
    }

    if multiplier == 1 {
        if is_dotted_thousands(number) {
            return number.replace('.', "").parse().ok();
        }
        return number.parse().ok();
    }

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole_value: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut total = whole_value.checked_mul(multiplier)?;

    // Apply at most as many fractional digits as the multiplier can carry.
    let mut scale = multiplier;
    for digit in fraction.chars() {
        scale /= 10;
        if scale == 0 {
            break;
        }
        let d = u64::from(digit.to_digit(10)?);
        total = total.checked_add(d * scale)?;
    }

    Some(total)
}

/// `1.234` or `12.345.678`: groups of exactly three digits after each dot.
fn is_dotted_thousands(s: &str) -> bool {
    let mut groups = s.split('.');
    let Some(head) = groups.next() else {
        return false;
    };
    let mut saw_group = false;
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        saw_group = true;
    }
    saw_group && !head.is_empty() && head.len() <= 3 && head.chars().all(|c| c.is_ascii_digit())
}

/// Interpret a JSON value as a count. Accepts non-negative integers and
/// strings in any form [`parse_count`] understands.
#[must_use]
pub fn count_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => parse_count(s),
        _ => None,
    }
}

/// The first positive count found under any of `pointers` (JSON Pointer
/// syntax). A zero under an earlier pointer does not hide a later one.
#[must_use]
pub fn count_at(root: &Value, pointers: &[&str]) -> Option<u64> {
    pointers
        .iter()
        .filter_map(|p| root.pointer(p))
        .filter_map(count_from_value)
        .find(|n| *n > 0)
}

/// The first non-empty string found under any of `pointers`.
#[must_use]
pub fn string_at(root: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|p| root.pointer(p))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
