//! Row shapes of the `pooja_lists` table.
//!
//! The table uses snake_case columns; items are stored as a JSON array of
//! camelCase item objects, exactly as the in-memory model serializes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GatewayError;
use crate::models::{ListUpdate, NewList, PoojaItem, PoojaList};
use crate::util::trimmed_non_empty;

/// Columns selected for every list read.
pub const LIST_COLUMNS: &str =
    "id,title,items,owner_id,owner_name,owner_email,created_at,updated_at,is_public,share_code";

/// A list row as returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Option<Vec<PoojaItem>>,
    pub owner_id: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub share_code: Option<String>,
}

impl TryFrom<ListRow> for PoojaList {
    type Error = GatewayError;

    fn try_from(row: ListRow) -> Result<Self, Self::Error> {
        let id = trimmed_non_empty(Some(row.id))
            .ok_or_else(|| GatewayError::InvalidRow("row is missing id".to_string()))?;
        let owner_id = trimmed_non_empty(Some(row.owner_id))
            .ok_or_else(|| GatewayError::InvalidRow(format!("row {id} is missing owner_id")))?;

        // A code on a private row is stale and must never be handed out.
        let share_code = if row.is_public {
            trimmed_non_empty(row.share_code)
        } else {
            None
        };

        Ok(Self {
            id: id.into(),
            title: row.title,
            items: row.items.unwrap_or_default(),
            owner_id,
            owner_name: row.owner_name.unwrap_or_default(),
            owner_email: row.owner_email.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_public: row.is_public,
            share_code,
        })
    }
}

/// Insert payload for a new list
#[derive(Debug, Clone, Serialize)]
pub struct InsertRow<'a> {
    pub title: &'a str,
    pub items: &'a [PoojaItem],
    pub owner_id: &'a str,
    pub owner_name: &'a str,
    pub owner_email: &'a str,
    pub is_public: bool,
    pub share_code: Option<&'a str>,
}

impl<'a> From<&'a NewList> for InsertRow<'a> {
    fn from(list: &'a NewList) -> Self {
        Self {
            title: &list.title,
            items: &list.items,
            owner_id: &list.owner_id,
            owner_name: &list.owner_name,
            owner_email: &list.owner_email,
            is_public: list.is_public,
            share_code: list.share_code.as_deref(),
        }
    }
}

/// Patch payload for an existing list.
///
/// Absent fields are omitted from the JSON body; a cleared share code is sent
/// as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRow<'a> {
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<&'a [PoojaItem]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_code: Option<Option<&'a str>>,
}

impl<'a> UpdateRow<'a> {
    pub fn new(update: &'a ListUpdate, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            title: update.title.as_deref(),
            items: update.items.as_deref(),
            is_public: update.is_public,
            share_code: update.share_code.as_ref().map(Option::as_deref),
        }
    }
}
