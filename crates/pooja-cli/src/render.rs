//! Text rendering of controller state.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use pooja_core::controller::{AppState, ViewMode};
use pooja_core::share::share_url;
use pooja_core::PoojaList;
use serde::Serialize;

use crate::commands::common::{format_relative_time, short_id};

#[derive(Debug, Serialize)]
pub struct ListSummary {
    pub id: String,
    pub title: String,
    pub completed: usize,
    pub total: usize,
    pub is_public: bool,
    pub share_code: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub relative_time: String,
}

pub fn list_summary(list: &PoojaList, now: DateTime<Utc>) -> ListSummary {
    ListSummary {
        id: list.id.to_string(),
        title: list.title.clone(),
        completed: list.completed_count(),
        total: list.items.len(),
        is_public: list.is_public,
        share_code: list.share_code.clone(),
        updated_at: list.updated_at,
        relative_time: format_relative_time(list.updated_at, now),
    }
}

/// One line per list; the current list is starred.
pub fn format_list_lines(
    lists: &[PoojaList],
    current: Option<&PoojaList>,
    now: DateTime<Utc>,
) -> Vec<String> {
    lists
        .iter()
        .map(|list| {
            let marker = if current.is_some_and(|current| current.id == list.id) {
                '*'
            } else {
                ' '
            };
            let progress = format!("{}/{}", list.completed_count(), list.items.len());
            let visibility = if list.is_public { "public" } else { "private" };
            format!(
                "{marker} {:<8}  {:<30}  {progress:>7}  {visibility:<7}  {}",
                short_id(list.id.as_str()),
                list.title,
                format_relative_time(list.updated_at, now)
            )
        })
        .collect()
}

/// Where the shown list lives, as a one-line label.
pub fn source_label(state: &AppState) -> String {
    match &state.current_list {
        Some(list) if state.is_shared_view() => {
            format!("shared by {} (read-only)", list.owner_name)
        }
        Some(list) => {
            let visibility = if list.is_public { "public" } else { "private" };
            format!("saved list {}, {visibility}", short_id(list.id.as_str()))
        }
        None if state.user().is_some() => "no saved list open".to_string(),
        None => "kept on this device".to_string(),
    }
}

/// Render the checklist the way the main screen shows it.
pub fn render_checklist(state: &AppState) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", state.title);
    let _ = writeln!(output, "({})", source_label(state));
    let _ = writeln!(
        output,
        "{} of {} items collected",
        state.completed_count(),
        state.total_count()
    );

    if state.items.is_empty() {
        let _ = writeln!(output);
        let hint = if state.is_shared_view() {
            "This list has no items yet."
        } else {
            "No items yet. Add one with `add <text>`."
        };
        let _ = writeln!(output, "{hint}");
    } else {
        let _ = writeln!(output);
        for (index, item) in state.items.iter().enumerate() {
            let mark = if item.completed { 'x' } else { ' ' };
            let _ = writeln!(output, "{:>3}. [{mark}] {}", index + 1, item.text);
        }
    }

    if state.saving {
        let _ = writeln!(output, "\nSaving...");
    }
    if state.confirm_clear {
        let _ = writeln!(output, "\nClear all items? Answer `yes` to confirm.");
    }
    if state.mode == ViewMode::ListBrowser {
        let _ = writeln!(output, "\nYour lists:");
        for line in format_list_lines(&state.lists, state.current_list.as_ref(), Utc::now()) {
            let _ = writeln!(output, "{line}");
        }
    }

    output
}

/// Share-dialog text for a list: its link when public.
pub fn render_share_status(list: &PoojaList, origin: Option<&str>) -> String {
    match list.share_code.as_deref().filter(|_| list.is_public) {
        Some(code) => format!(
            "'{}' is public. Anyone with this link can view it:\n{}",
            list.title,
            share_url(origin, code)
        ),
        None => format!("'{}' is private.", list.title),
    }
}
