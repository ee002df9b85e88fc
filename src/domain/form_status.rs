//! Form Status - Clinical form completion tags
//!
//! A worklist record carries a `formStatuses` object keyed by form name. Each
//! entry is either one status or a list of statuses, one per repeated form
//! instance:
//!
//! ```json
//! { "Demographics": "Complete", "CMR": ["Incomplete", "Complete"] }
//! ```
//!
//! Repeated instances are displayed with a 1-based suffix (`CMR1`, `CMR2`).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::EMPTY_CELL;
use crate::data_table::{CellFormatter, Row};

/// Data collection forms, in display order
pub const FORM_NAMES: [&str; 8] = [
    "Demographics",
    "Surgical History",
    "CMR",
    "CCT",
    "Echo",
    "Cath",
    "Stress Test",
    "Pt. Outcomes",
];

/// Forms that may be filled in more than once
pub const MULTI_INSTANCE_FORMS: [&str; 5] = ["CCT", "CMR", "Cath", "Echo", "Stress Test"];

/// Completion status of one form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormStatus {
    Incomplete,
    Unverified,
    Complete,
}

impl FormStatus {
    /// All statuses in legend order
    pub const ALL: [FormStatus; 3] = [
        FormStatus::Incomplete,
        FormStatus::Unverified,
        FormStatus::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Incomplete => "Incomplete",
            FormStatus::Unverified => "Unverified",
            FormStatus::Complete => "Complete",
        }
    }

    /// Single-letter marker used in compact cells
    pub fn abbreviation(&self) -> char {
        match self {
            FormStatus::Incomplete => 'I',
            FormStatus::Unverified => 'U',
            FormStatus::Complete => 'C',
        }
    }

    /// Exact, case-sensitive match on the status name
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == text)
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One displayable form instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTag {
    pub form: &'static str,
    pub display_name: String,
    pub status: FormStatus,
}

/// Expand a `formStatuses` value into tags, in form order.
///
/// Unknown forms and unrecognised or empty statuses are skipped. Anything
/// other than an object yields no tags.
pub fn status_tags(form_statuses: Option<&Value>) -> Vec<StatusTag> {
    let Some(Value::Object(map)) = form_statuses else {
        return Vec::new();
    };

    let mut tags = Vec::new();
    for form in FORM_NAMES {
        match map.get(form) {
            Some(Value::Array(instances)) => {
                for (index, value) in instances.iter().enumerate() {
                    if let Some(status) = value.as_str().and_then(FormStatus::parse) {
                        tags.push(StatusTag {
                            form,
                            display_name: format!("{form}{}", index + 1),
                            status,
                        });
                    }
                }
            }
            Some(Value::String(text)) => {
                if let Some(status) = FormStatus::parse(text) {
                    tags.push(StatusTag {
                        form,
                        display_name: form.to_string(),
                        status,
                    });
                }
            }
            _ => {}
        }
    }
    tags
}

/// Number of form instances per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub incomplete: usize,
    pub unverified: usize,
    pub complete: usize,
}

impl StatusCounts {
    pub fn get(&self, status: FormStatus) -> usize {
        match status {
            FormStatus::Incomplete => self.incomplete,
            FormStatus::Unverified => self.unverified,
            FormStatus::Complete => self.complete,
        }
    }

    fn bump(&mut self, status: FormStatus) {
        match status {
            FormStatus::Incomplete => self.incomplete += 1,
            FormStatus::Unverified => self.unverified += 1,
            FormStatus::Complete => self.complete += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.incomplete + self.unverified + self.complete
    }
}

/// Count form instances by status
pub fn count_statuses(form_statuses: Option<&Value>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for tag in status_tags(form_statuses) {
        counts.bump(tag.status);
    }
    counts
}

/// Tag display names grouped by status; every status has an entry
pub fn tags_by_status(form_statuses: Option<&Value>) -> BTreeMap<FormStatus, Vec<String>> {
    let mut grouped: BTreeMap<FormStatus, Vec<String>> =
        FormStatus::ALL.into_iter().map(|s| (s, Vec::new())).collect();
    for tag in status_tags(form_statuses) {
        grouped.entry(tag.status).or_default().push(tag.display_name);
    }
    grouped
}

/// `Status: tag, tag; Status: tag` for every status that has tags
pub fn tag_groups_text(form_statuses: Option<&Value>) -> String {
    tags_by_status(form_statuses)
        .into_iter()
        .filter(|(_, names)| !names.is_empty())
        .map(|(status, names)| format!("{status}: {}", names.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Renders every tag as `name=Status`
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTagsFormatter;

impl CellFormatter for StatusTagsFormatter {
    fn format(&self, _row: &Row, value: Option<&Value>) -> String {
        let tags = status_tags(value);
        if tags.is_empty() {
            return EMPTY_CELL.to_string();
        }
        tags.iter()
            .map(|t| format!("{}={}", t.display_name, t.status))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Renders per-status counts as `I5 U1 C3`
#[derive(Debug, Clone, Copy, Default)]
pub struct TagCountFormatter;

impl CellFormatter for TagCountFormatter {
    fn format(&self, _row: &Row, value: Option<&Value>) -> String {
        let counts = count_statuses(value);
        FormStatus::ALL
            .iter()
            .map(|s| format!("{}{}", s.abbreviation(), counts.get(*s)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Legend line for the compact count cells
pub fn status_legend() -> String {
    let items: Vec<String> = FormStatus::ALL
        .iter()
        .map(|s| format!("{} = {}", s.abbreviation(), s))
        .collect();
    format!("Status Legend: {}", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Demographics": "Complete",
            "Surgical History": "Unverified",
            "CMR": ["Incomplete", "Complete"],
            "Echo": ["Incomplete", null, "Unverified"],
            "Cath": "Pending",
            "Unknown Form": "Complete"
        })
    }

    #[test]
    fn expands_multi_instance_forms() {
        let value = sample();
        let names: Vec<String> = status_tags(Some(&value))
            .into_iter()
            .map(|t| t.display_name)
            .collect();
        assert_eq!(
            names,
            ["Demographics", "Surgical History", "CMR1", "CMR2", "Echo1", "Echo3"]
        );
    }

    #[test]
    fn counts_and_groups() {
        let value = sample();
        let counts = count_statuses(Some(&value));
        assert_eq!(
            counts,
            StatusCounts {
                incomplete: 2,
                unverified: 2,
                complete: 2
            }
        );
        assert_eq!(counts.total(), 6);

        let grouped = tags_by_status(Some(&value));
        assert_eq!(grouped[&FormStatus::Incomplete], ["CMR1", "Echo1"]);
        assert_eq!(grouped[&FormStatus::Complete], ["Demographics", "CMR2"]);

        assert_eq!(
            tag_groups_text(Some(&value)),
            "Incomplete: CMR1, Echo1; Unverified: Surgical History, Echo3; Complete: Demographics, CMR2"
        );
    }

    #[test]
    fn non_object_values_are_empty() {
        assert_eq!(count_statuses(None), StatusCounts::default());
        assert_eq!(count_statuses(Some(&json!("Complete"))).total(), 0);
        let grouped = tags_by_status(None);
        assert_eq!(grouped.len(), 3);
        assert!(grouped.values().all(Vec::is_empty));
        assert_eq!(tag_groups_text(None), "");
    }

    #[test]
    fn formatters_render_text() {
        let row = Row::new();
        let value = json!({"Demographics": "Complete", "CMR": ["Incomplete", "Incomplete"]});
        assert_eq!(TagCountFormatter.format(&row, Some(&value)), "I2 U0 C1");
        assert_eq!(TagCountFormatter.format(&row, None), "I0 U0 C0");
        assert_eq!(
            StatusTagsFormatter.format(&row, Some(&value)),
            "Demographics=Complete, CMR1=Incomplete, CMR2=Incomplete"
        );
        assert_eq!(StatusTagsFormatter.format(&row, None), EMPTY_CELL);
    }

    #[test]
    fn legend_lists_every_status() {
        assert_eq!(
            status_legend(),
            "Status Legend: I = Incomplete, U = Unverified, C = Complete"
        );
    }
}
