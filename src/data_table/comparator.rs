//! Comparator
//!
//! Orders rows by one column's declared type. Absent values always sort last,
//! whatever the direction.

use std::cmp::Ordering;

use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::accessor::{is_truthy, value_text, Row};
use super::column::{Column, ColumnType};
use super::query::SortDirection;
use crate::utils::format::parse_timestamp_millis;

/// Compare two rows on `column`.
pub fn compare(a: &Row, b: &Row, column: &Column, direction: SortDirection) -> Ordering {
    let a = sort_key(column.value(a), column.kind);
    let b = sort_key(column.value(b), column.kind);

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.cmp_with(&b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// A present value reduced to what its column type compares on
enum SortKey {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl SortKey {
    fn cmp_with(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Flag(a), SortKey::Flag(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => compare_text(a, b),
            // Only reachable for `auto` columns mixing numbers and text
            (a, b) => compare_text(&a.text(), &b.text()),
        }
    }

    fn text(&self) -> String {
        match self {
            SortKey::Number(n) => value_text(&Value::from(*n)),
            SortKey::Text(s) => s.clone(),
            SortKey::Flag(b) => b.to_string(),
        }
    }
}

/// `None` means the value sorts as absent (missing, null or unparseable).
fn sort_key(value: Option<&Value>, kind: ColumnType) -> Option<SortKey> {
    let value = value?;
    match kind {
        ColumnType::Number => numeric(value).map(SortKey::Number),
        ColumnType::Date => parse_timestamp_millis(value).map(|ms| SortKey::Number(ms as f64)),
        ColumnType::Boolean => Some(SortKey::Flag(is_truthy(value))),
        ColumnType::String | ColumnType::Object => Some(SortKey::Text(value_text(value))),
        ColumnType::Auto => match value {
            Value::Number(n) => n.as_f64().map(SortKey::Number),
            other => Some(SortKey::Text(value_text(other))),
        },
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    if n.is_nan() { None } else { Some(n) }
}

/// Collation order: base letters first (accents and case folded away), then
/// unaccented before accented, then lowercase before uppercase.
fn compare_text(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| accented(a).cmp(&accented(b)))
        .then_with(|| b.cmp(a))
}

/// Lowercased, compatibility-decomposed text without combining marks
fn base_letters(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercased text with accents kept as trailing combining marks
fn accented(s: &str) -> String {
    s.to_lowercase().nfd().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().expect("object")
    }

    fn sorted(values: Vec<Value>, column: &Column, direction: SortDirection) -> Vec<Value> {
        let mut rows: Vec<Row> = values.into_iter().map(|v| row(json!({ "v": v }))).collect();
        rows.sort_by(|a, b| compare(a, b, column, direction));
        rows.into_iter()
            .map(|r| r.get("v").cloned().unwrap_or(Value::Null))
            .collect()
    }

    #[test]
    fn nulls_last_in_both_directions() {
        let column = Column::new("v", "V", "v").kind(ColumnType::Number);
        let values = vec![json!(5), Value::Null, json!(2)];
        assert_eq!(
            sorted(values.clone(), &column, SortDirection::Asc),
            vec![json!(2), json!(5), Value::Null]
        );
        assert_eq!(
            sorted(values, &column, SortDirection::Desc),
            vec![json!(5), json!(2), Value::Null]
        );
    }

    #[test]
    fn numbers_compare_numerically() {
        let column = Column::new("v", "V", "v").kind(ColumnType::Number);
        assert_eq!(
            sorted(vec![json!(1250.5), json!(850.0), json!(2100.75)], &column, SortDirection::Desc),
            vec![json!(2100.75), json!(1250.5), json!(850.0)]
        );
        assert_eq!(
            sorted(vec![json!("10"), json!("9"), json!(true)], &column, SortDirection::Asc),
            vec![json!(true), json!("9"), json!("10")]
        );
    }

    #[test]
    fn unparseable_dates_sort_as_absent() {
        let column = Column::new("v", "V", "v").kind(ColumnType::Date);
        assert_eq!(
            sorted(
                vec![json!("not a date"), json!("2024-01-15"), json!("2024-01-09")],
                &column,
                SortDirection::Desc
            ),
            vec![json!("2024-01-15"), json!("2024-01-09"), json!("not a date")]
        );
    }

    #[test]
    fn booleans_false_first() {
        let column = Column::new("v", "V", "v").kind(ColumnType::Boolean);
        assert_eq!(
            sorted(vec![json!(true), json!(false), json!(0)], &column, SortDirection::Asc),
            vec![json!(false), json!(0), json!(true)]
        );
    }

    #[test]
    fn strings_ignore_case() {
        let column = Column::new("v", "V", "v");
        assert_eq!(
            sorted(vec![json!("bob"), json!("Alice"), json!("charlie")], &column, SortDirection::Asc),
            vec![json!("Alice"), json!("bob"), json!("charlie")]
        );
    }

    #[test]
    fn accented_letters_sort_with_their_base_letter() {
        let column = Column::new("v", "V", "v");
        assert_eq!(
            sorted(vec![json!("Zoe"), json!("Émile"), json!("Adam")], &column, SortDirection::Asc),
            vec![json!("Adam"), json!("Émile"), json!("Zoe")]
        );
        assert_eq!(
            sorted(
                vec![json!("Müller"), json!("Mueller"), json!("Muller"), json!("Nadia")],
                &column,
                SortDirection::Asc
            ),
            vec![json!("Mueller"), json!("Muller"), json!("Müller"), json!("Nadia")]
        );
        assert_eq!(
            sorted(vec![json!("élan"), json!("Elan"), json!("elan")], &column, SortDirection::Desc),
            vec![json!("élan"), json!("Elan"), json!("elan")]
        );
    }

    #[test]
    fn auto_uses_numbers_only_when_both_are_numbers() {
        let column = Column::new("v", "V", "v").kind(ColumnType::Auto);
        assert_eq!(
            sorted(vec![json!(10), json!(9)], &column, SortDirection::Asc),
            vec![json!(9), json!(10)]
        );
        let string_column = Column::new("v", "V", "v");
        assert_eq!(
            sorted(vec![json!(10), json!(9)], &string_column, SortDirection::Asc),
            vec![json!(10), json!(9)]
        );
    }
}
