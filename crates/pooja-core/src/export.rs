//! Checklist export shared by the front ends.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{completed_count, PoojaItem};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable checklist used by the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportList {
    pub title: String,
    pub completed: usize,
    pub total: usize,
    pub items: Vec<ExportItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[must_use]
pub fn to_export_list(title: &str, items: &[PoojaItem]) -> ExportList {
    ExportList {
        title: title.to_string(),
        completed: completed_count(items),
        total: items.len(),
        items: items
            .iter()
            .map(|item| ExportItem {
                text: item.text.clone(),
                completed: item.completed,
                created_at: item.created_at,
            })
            .collect(),
    }
}

/// Render a checklist as pretty-printed JSON.
pub fn render_json_export(title: &str, items: &[PoojaItem]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_export_list(title, items))
}

/// Render a checklist as a Markdown task list.
#[must_use]
pub fn render_markdown_export(title: &str, items: &[PoojaItem]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {title}");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{} of {} items ready",
        completed_count(items),
        items.len()
    );
    if !items.is_empty() {
        let _ = writeln!(output);
    }
    for item in items {
        let mark = if item.completed { 'x' } else { ' ' };
        let _ = writeln!(output, "- [{mark}] {}", item.text);
    }
    output
}

pub fn render_list_export(
    title: &str,
    items: &[PoojaItem],
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(title, items),
        ExportFormat::Markdown => Ok(render_markdown_export(title, items)),
    }
}

/// Default file name for an export written at `timestamp_ms`.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("pooja-list-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn items() -> Vec<PoojaItem> {
        let mut diya = PoojaItem::new("Diya").unwrap();
        diya.toggle();
        vec![diya, PoojaItem::new("Flowers").unwrap()]
    }

    #[test]
    fn markdown_export_is_a_task_list() {
        let rendered = render_markdown_export("Diwali", &items());
        assert_eq!(
            rendered,
            "# Diwali\n\n1 of 2 items ready\n\n- [x] Diya\n- [ ] Flowers\n"
        );
    }

    #[test]
    fn markdown_export_of_empty_list() {
        assert_eq!(
            render_markdown_export("Empty", &[]),
            "# Empty\n\n0 of 0 items ready\n"
        );
    }

    #[test]
    fn json_export_carries_counts() {
        let rendered = render_json_export("Diwali", &items()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["title"], "Diwali");
        assert_eq!(value["completed"], 1);
        assert_eq!(value["total"], 2);
        assert_eq!(value["items"][0]["text"], "Diya");
        assert_eq!(value["items"][0]["completed"], true);
        assert!(value["items"][1]["createdAt"].is_string());
    }

    #[test]
    fn suggested_file_name_uses_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 42),
            "pooja-list-42.md"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 42),
            "pooja-list-42.json"
        );
    }
}
