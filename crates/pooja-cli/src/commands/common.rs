use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use pooja_core::controller::{Action, AppState, Controller};
use pooja_core::gateway::ListGateway;
use pooja_core::local::LocalStore;
use pooja_core::{ItemId, ListId, PoojaList};

use crate::error::CliError;

pub const DATA_DIR_ENV_VAR: &str = "POOJA_DATA_DIR";

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    cli_data_dir
        .or_else(|| env::var_os(DATA_DIR_ENV_VAR).map(PathBuf::from))
        .map_or_else(default_data_dir, Ok)
}

pub fn default_data_dir() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("pooja"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}

/// Join command-line words into one trimmed text; `None` when blank.
pub fn normalize_text(parts: &[String]) -> Option<String> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Resolve an item by 1-based number, full ID, or unique ID prefix.
pub fn resolve_item_id(state: &AppState, query: &str) -> Result<ItemId, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::ItemNotFound(query.to_string()));
    }

    if let Ok(number) = query.parse::<usize>() {
        if let Some(item) = number.checked_sub(1).and_then(|index| state.items.get(index)) {
            return Ok(item.id.clone());
        }
    }

    let matches = state
        .items
        .iter()
        .filter(|item| item.id.as_str().starts_with(query))
        .collect::<Vec<_>>();
    if let Some(exact) = matches.iter().find(|item| item.id.as_str() == query) {
        return Ok(exact.id.clone());
    }
    match matches.as_slice() {
        [] => Err(CliError::ItemNotFound(query.to_string())),
        [item] => Ok(item.id.clone()),
        _ => Err(CliError::AmbiguousId(format!(
            "Item ID prefix '{query}' is ambiguous; {} items match",
            matches.len()
        ))),
    }
}

/// Resolve a list by full ID or unique ID prefix among `lists`.
pub fn resolve_list_id(lists: &[PoojaList], query: &str) -> Result<ListId, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::ListNotFound(query.to_string()));
    }
    if let Some(list) = lists.iter().find(|list| list.id.as_str() == query) {
        return Ok(list.id.clone());
    }

    let matches = lists
        .iter()
        .filter(|list| list.id.as_str().starts_with(query))
        .collect::<Vec<_>>();
    match matches.as_slice() {
        [] => Err(CliError::ListNotFound(query.to_string())),
        [list] => Ok(list.id.clone()),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|list| short_id(list.id.as_str()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousId(format!(
                "List ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// A signed-in viewer must have a saved list open before editing items.
pub fn ensure_list_target(state: &AppState) -> Result<(), CliError> {
    if state.user().is_some() && state.current_list.is_none() {
        Err(CliError::NoList)
    } else {
        Ok(())
    }
}

/// Save an owned list; a one-shot command would otherwise lose its edits.
pub async fn persist_owned<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
) -> Result<(), CliError> {
    if controller.state().is_owned_list() {
        controller.dispatch(Action::Save).await?;
    }
    Ok(())
}

pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now
        .signed_duration_since(timestamp)
        .num_milliseconds()
        .max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
