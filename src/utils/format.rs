//! Format - Formatting Utilities

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::constants::EMPTY_CELL;
use crate::data_table::accessor::{is_truthy, value_text};
use crate::data_table::column::ColumnType;

/// Default cell text for a resolved value of the given column type
pub fn format_cell(value: Option<&Value>, kind: ColumnType) -> String {
    let Some(value) = value else {
        return EMPTY_CELL.to_string();
    };
    match kind {
        ColumnType::Date => match parse_timestamp_millis(value) {
            Some(ms) => format_date_millis(ms),
            None => value_text(value),
        },
        ColumnType::Boolean => if is_truthy(value) { "Yes" } else { "No" }.to_string(),
        ColumnType::Number => match value {
            Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_decimal),
            other => value_text(other),
        },
        _ => value_text(value),
    }
}

/// Parse a date value to epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD[ T]HH:MM:SS[.fff]` (UTC), `YYYY-MM-DD`
/// (midnight UTC) and numbers (already epoch milliseconds).
pub fn parse_timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Format epoch milliseconds as a calendar date (UTC, so date-only inputs
/// keep their day)
pub fn format_date_millis(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => ms.to_string(),
    }
}

/// Format a number with thousand separators
pub fn format_number(n: i64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (len - i) % 3 == 0 && chars[i - 1] != '-' {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Thousand separators on the integer part, fraction kept as-is (`1250.5` → `1,250.5`)
pub fn format_decimal(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let text = value_text(&Value::from(n));
    match text.split_once('.') {
        Some((int, frac)) => match int.parse::<i64>() {
            Ok(i) if int != "-0" => format!("{}.{}", format_number(i), frac),
            _ => text,
        },
        None => text
            .parse::<i64>()
            .map(format_number)
            .unwrap_or(text),
    }
}

/// Truncate a string to max characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        format!("{}...", s.chars().take(max_len - 3).collect::<String>())
    }
}
