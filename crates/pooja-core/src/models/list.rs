//! Checklist model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::PoojaItem;
use crate::auth::AuthUser;

/// Title shown for the anonymous checklist when nothing has been saved yet.
pub const DEFAULT_LIST_TITLE: &str = "My Pooja Checklist";

/// Title given to lists created through the gateway.
pub const NEW_LIST_TITLE: &str = "New Pooja Checklist";

/// Identifier assigned to a list by the persistence gateway
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl ListId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ListId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A persisted, owned checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoojaList {
    pub id: ListId,
    pub title: String,
    pub items: Vec<PoojaItem>,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_code: Option<String>,
}

impl PoojaList {
    /// Build the in-memory list for a gateway-assigned id.
    #[must_use]
    pub fn from_new(id: ListId, new_list: NewList, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new_list.title,
            items: new_list.items,
            owner_id: new_list.owner_id,
            owner_name: new_list.owner_name,
            owner_email: new_list.owner_email,
            created_at: now,
            updated_at: now,
            is_public: new_list.is_public,
            share_code: new_list.share_code,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        completed_count(&self.items)
    }

    /// Apply a partial update, stamping `updated_at`.
    pub fn apply(&mut self, update: &ListUpdate, now: DateTime<Utc>) {
        if let Some(title) = &update.title {
            self.title.clone_from(title);
        }
        if let Some(items) = &update.items {
            self.items.clone_from(items);
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
        if let Some(share_code) = &update.share_code {
            self.share_code.clone_from(share_code);
        }
        self.updated_at = now;
    }
}

/// A list that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewList {
    pub title: String,
    pub items: Vec<PoojaItem>,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_email: String,
    pub is_public: bool,
    pub share_code: Option<String>,
}

impl NewList {
    /// An empty, private list owned by `owner`.
    #[must_use]
    pub fn empty_for(owner: &AuthUser) -> Self {
        Self {
            title: NEW_LIST_TITLE.to_string(),
            items: Vec::new(),
            owner_id: owner.id.clone(),
            owner_name: owner.name.clone(),
            owner_email: owner.email.clone(),
            is_public: false,
            share_code: None,
        }
    }
}

/// Partial update of a persisted list.
///
/// `None` leaves a field untouched. `share_code: Some(None)` clears the code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUpdate {
    pub title: Option<String>,
    pub items: Option<Vec<PoojaItem>>,
    pub is_public: Option<bool>,
    pub share_code: Option<Option<String>>,
}

impl ListUpdate {
    /// Update carrying the editable contents of a list.
    #[must_use]
    pub fn contents(title: &str, items: &[PoojaItem]) -> Self {
        Self {
            title: Some(title.to_string()),
            items: Some(items.to_vec()),
            ..Self::default()
        }
    }

    /// Update switching visibility; the share code travels with the flag.
    #[must_use]
    pub fn visibility(share_code: Option<String>) -> Self {
        Self {
            is_public: Some(share_code.is_some()),
            share_code: Some(share_code),
            ..Self::default()
        }
    }
}

/// Number of completed items in `items`.
#[must_use]
pub fn completed_count(items: &[PoojaItem]) -> usize {
    items.iter().filter(|item| item.completed).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owner() -> AuthUser {
        AuthUser {
            id: "owner-1".to_string(),
            email: "owner@example.com".to_string(),
            name: "Owner".to_string(),
            avatar: None,
        }
    }

    #[test]
    fn test_new_list_defaults() {
        let new_list = NewList::empty_for(&owner());
        assert_eq!(new_list.title, NEW_LIST_TITLE);
        assert!(new_list.items.is_empty());
        assert!(!new_list.is_public);
        assert_eq!(new_list.share_code, None);
    }

    #[test]
    fn test_visibility_update_keeps_code_with_flag() {
        let public = ListUpdate::visibility(Some("ABC123".to_string()));
        assert_eq!(public.is_public, Some(true));
        assert_eq!(public.share_code, Some(Some("ABC123".to_string())));

        let private = ListUpdate::visibility(None);
        assert_eq!(private.is_public, Some(false));
        assert_eq!(private.share_code, Some(None));
    }

    #[test]
    fn test_apply_updates_fields_and_timestamp() {
        let created = Utc::now();
        let mut list = PoojaList::from_new("list-1".into(), NewList::empty_for(&owner()), created);
        let item = PoojaItem::new("Diya").unwrap();

        let later = created + chrono::Duration::seconds(5);
        list.apply(&ListUpdate::contents("Diwali", &[item.clone()]), later);
        list.apply(&ListUpdate::visibility(Some("XYZ123".to_string())), later);

        assert_eq!(list.title, "Diwali");
        assert_eq!(list.items, vec![item]);
        assert!(list.is_public);
        assert_eq!(list.share_code.as_deref(), Some("XYZ123"));
        assert_eq!(list.updated_at, later);
        assert_eq!(list.created_at, created);
    }

    #[test]
    fn test_completed_count() {
        let mut first = PoojaItem::new("Diya").unwrap();
        first.toggle();
        let second = PoojaItem::new("Camphor").unwrap();
        assert_eq!(completed_count(&[first, second]), 1);
    }
}
