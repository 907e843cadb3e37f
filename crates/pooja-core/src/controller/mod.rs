//! View-state controller.
//!
//! One controller per session owns the [`AppState`]. Shells feed it
//! [`Action`]s; each action is applied in memory first and persistence is
//! routed afterwards: the local slot for anonymous viewers, the gateway on an
//! explicit save for owned lists.
//!
//! Gateway failures never roll back in-memory state. They are logged and
//! returned so the shell can warn, and the controller stays usable.

mod state;
#[cfg(test)]
mod tests;

use chrono::Utc;

pub use state::{Action, AppState, ViewMode};

use crate::auth::AuthState;
use crate::error::{Error, Result};
use crate::gateway::{GatewayError, ListGateway};
use crate::local::{load_snapshot, save_snapshot, LocalSnapshot, LocalStore};
use crate::models::{
    ItemId, ListId, ListUpdate, NewList, PoojaItem, PoojaList, DEFAULT_LIST_TITLE,
};

pub struct Controller<G, L> {
    state: AppState,
    gateway: Option<G>,
    local: L,
}

impl<G: ListGateway, L: LocalStore> Controller<G, L> {
    /// A controller waiting for [`Action::Boot`] and [`Action::AuthResolved`].
    ///
    /// `gateway` is `None` when online features are disabled.
    pub fn new(gateway: Option<G>, local: L) -> Self {
        Self {
            state: AppState::default(),
            gateway,
            local,
        }
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Swap the gateway, e.g. after a sign-in changed the access token.
    pub fn set_gateway(&mut self, gateway: Option<G>) {
        self.gateway = gateway;
    }

    pub async fn dispatch(&mut self, action: Action) -> Result<()> {
        tracing::trace!(?action, "dispatch");
        match action {
            Action::Boot { share_code } => {
                self.state.booted = true;
                self.state.entry_share_code = share_code;
                self.hydrate().await
            }
            Action::AuthResolved(viewer) => self.resolve_auth(viewer).await,
            Action::AddItem(text) => {
                self.ensure_writable()?;
                if let Some(item) = PoojaItem::new(&text) {
                    self.state.items.push(item);
                    self.mirror_local()?;
                }
                Ok(())
            }
            Action::ToggleItem(id) => {
                if self.state.is_shared_view() {
                    tracing::debug!("Ignoring toggle of {} in a shared list", id);
                    return Ok(());
                }
                self.item_mut(&id)?.toggle();
                self.mirror_local()
            }
            Action::EditItem { id, text } => {
                self.ensure_writable()?;
                if text.trim().is_empty() {
                    return Err(Error::InvalidInput("item text cannot be empty".to_string()));
                }
                self.item_mut(&id)?.text = text;
                self.mirror_local()
            }
            Action::DeleteItem(id) => {
                self.ensure_writable()?;
                let before = self.state.items.len();
                self.state.items.retain(|item| item.id != id);
                if self.state.items.len() == before {
                    return Err(Error::NotFound(format!("item {id}")));
                }
                self.mirror_local()
            }
            Action::RequestClear => {
                self.ensure_writable()?;
                self.state.confirm_clear = true;
                Ok(())
            }
            Action::ConfirmClear => {
                self.ensure_writable()?;
                if !self.state.confirm_clear {
                    return Err(Error::InvalidInput(
                        "clearing all items needs confirmation first".to_string(),
                    ));
                }
                self.state.confirm_clear = false;
                self.state.items.clear();
                self.mirror_local()
            }
            Action::CancelClear => {
                self.state.confirm_clear = false;
                Ok(())
            }
            Action::Rename(title) => {
                self.ensure_writable()?;
                self.state.title = title;
                self.mirror_local()
            }
            Action::TitleCommitted => {
                if self.state.is_owned_list() {
                    self.save().await
                } else {
                    Ok(())
                }
            }
            Action::Save => self.save().await,
            Action::CreateList => self.create_list().await,
            Action::SelectList(id) => self.select_list(&id),
            Action::LoadShared(code) => self.load_shared(&code).await.map(|_| ()),
            Action::OpenListBrowser => {
                self.require_user()?;
                self.state.mode = ViewMode::ListBrowser;
                self.refresh_lists().await
            }
            Action::CloseListBrowser | Action::CloseShareDialog => {
                self.state.mode = ViewMode::Normal;
                Ok(())
            }
            Action::RefreshLists => self.refresh_lists().await,
            Action::DeleteList(id) => self.delete_list(&id).await,
            Action::OpenShareDialog => {
                if !self.state.is_owned_list() {
                    return Err(self.ownership_error());
                }
                self.state.mode = ViewMode::ShareDialog;
                Ok(())
            }
            Action::SetPublic { id, public } => self.set_public(&id, public).await,
        }
    }

    async fn resolve_auth(&mut self, viewer: AuthState) -> Result<()> {
        let signing_out = self.state.user().is_some() && viewer.is_signed_out();
        self.state.viewer = viewer;

        if signing_out {
            tracing::info!("Viewer signed out; returning to the local list");
            self.state.reset_to_anonymous();
            return self.hydrate_local();
        }

        self.hydrate().await
    }

    /// Choose the initial list once the page has booted and auth resolved.
    async fn hydrate(&mut self) -> Result<()> {
        if self.state.hydrated || !self.state.booted || !self.state.viewer.is_resolved() {
            return Ok(());
        }
        self.state.hydrated = true;

        if let Some(code) = self.state.entry_share_code.take() {
            match self.load_shared(&code).await {
                Ok(true) => return Ok(()),
                Ok(false) => tracing::info!("No public list for share code {}", code),
                Err(error) => tracing::warn!("Could not open shared list {}: {}", code, error),
            }
        }

        if self.state.viewer.is_signed_out() {
            self.hydrate_local()
        } else {
            Ok(())
        }
    }

    fn hydrate_local(&mut self) -> Result<()> {
        let snapshot = match load_snapshot(&self.local) {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(Error::CorruptLocalSlot { key, reason }) => {
                tracing::warn!(
                    "Local slot '{}' is unreadable ({}); starting with an empty list",
                    key,
                    reason
                );
                self.local.quarantine_slot(&key)?;
                LocalSnapshot::default()
            }
            Err(error) => return Err(error),
        };

        self.state.items = snapshot.items;
        self.state.title = snapshot.title;
        self.state.local_loaded = true;
        tracing::debug!("Loaded {} items from the local slot", self.state.items.len());
        Ok(())
    }

    fn mirror_local(&self) -> Result<()> {
        if !self.state.mirrors_locally() {
            return Ok(());
        }
        save_snapshot(
            &self.local,
            &LocalSnapshot {
                items: self.state.items.clone(),
                title: self.state.title.clone(),
            },
        )
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.state.is_shared_view() {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn ownership_error(&self) -> Error {
        if self.state.user().is_none() {
            Error::SignInRequired
        } else if self.state.current_list.is_none() {
            Error::NotFound("no list selected".to_string())
        } else {
            Error::ReadOnly
        }
    }

    fn require_user(&self) -> Result<String> {
        self.state
            .user()
            .map(|user| user.id.clone())
            .ok_or(Error::SignInRequired)
    }

    fn item_mut(&mut self, id: &ItemId) -> Result<&mut PoojaItem> {
        self.state
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| Error::NotFound(format!("item {id}")))
    }

    fn known_list(&self, id: &ListId) -> Option<&PoojaList> {
        self.state
            .current_list
            .iter()
            .chain(self.state.lists.iter())
            .find(|list| &list.id == id)
    }

    async fn save(&mut self) -> Result<()> {
        if !self.state.is_owned_list() {
            return Err(self.ownership_error());
        }
        let Some(list_id) = self.state.current_list.as_ref().map(|list| list.id.clone()) else {
            return Err(self.ownership_error());
        };
        let gateway = self.gateway.as_ref().ok_or(Error::Offline)?;

        let update = ListUpdate::contents(&self.state.title, &self.state.items);
        self.state.saving = true;
        let result = gateway.update_list(&list_id, &update).await;
        self.state.saving = false;
        result.map_err(|error| gateway_failure("Error saving list", error))?;

        if let Some(list) = self.state.current_list.as_mut() {
            list.apply(&update, Utc::now());
            let saved = list.clone();
            self.state.refresh_browser_entry(&saved);
        }
        tracing::info!("Saved list {}", list_id);
        Ok(())
    }

    async fn create_list(&mut self) -> Result<()> {
        let user = self.state.user().cloned().ok_or(Error::SignInRequired)?;
        let gateway = self.gateway.as_ref().ok_or(Error::Offline)?;

        let new_list = NewList::empty_for(&user);
        let id = gateway
            .create_list(&new_list)
            .await
            .map_err(|error| gateway_failure("Error creating new list", error))?;

        let list = PoojaList::from_new(id, new_list, Utc::now());
        tracing::info!("Created list {}", list.id);
        self.state.lists.insert(0, list.clone());
        self.state.adopt(list);
        Ok(())
    }

    fn select_list(&mut self, id: &ListId) -> Result<()> {
        let list = self
            .state
            .lists
            .iter()
            .find(|list| &list.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("list {id}")))?;
        self.state.adopt(list);
        Ok(())
    }

    /// Adopt the public list behind `code`. `Ok(false)` when nothing matches.
    async fn load_shared(&mut self, code: &str) -> Result<bool> {
        let gateway = self.gateway.as_ref().ok_or(Error::Offline)?;
        let found = gateway
            .list_by_share_code(code)
            .await
            .map_err(|error| gateway_failure("Error loading shared list", error))?;

        match found {
            Some(list) => {
                tracing::info!("Opened shared list {} by {}", list.id, list.owner_name);
                self.state.adopt(list);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn refresh_lists(&mut self) -> Result<()> {
        let user_id = self.require_user()?;
        let gateway = self.gateway.as_ref().ok_or(Error::Offline)?;
        self.state.lists = gateway
            .lists_for_owner(&user_id)
            .await
            .map_err(|error| gateway_failure("Error loading lists", error))?;
        Ok(())
    }

    async fn delete_list(&mut self, id: &ListId) -> Result<()> {
        let user_id = self.require_user()?;
        let gateway = self.gateway.as_ref().ok_or(Error::Offline)?;
        let owned = match self.known_list(id) {
            Some(list) => list.is_owned_by(&user_id),
            None => gateway
                .get_list(id)
                .await
                .map_err(|error| gateway_failure("Error loading list", error))?
                .ok_or_else(|| Error::NotFound(format!("list {id}")))?
                .is_owned_by(&user_id),
        };
        if !owned {
            return Err(Error::ReadOnly);
        }
        gateway
            .delete_list(id, &user_id)
            .await
            .map_err(|error| gateway_failure("Error deleting list", error))?;

        self.state.lists.retain(|list| &list.id != id);
        if self
            .state
            .current_list
            .as_ref()
            .is_some_and(|list| &list.id == id)
        {
            self.state.current_list = None;
            self.state.items.clear();
            self.state.title = DEFAULT_LIST_TITLE.to_string();
            if self.state.mode == ViewMode::ShareDialog {
                self.state.mode = ViewMode::Normal;
            }
        }
        tracing::info!("Deleted list {}", id);
        Ok(())
    }

    /// Make a list public with a fresh share code, or private without one.
    async fn set_public(&mut self, id: &ListId, public: bool) -> Result<()> {
        let user_id = self.require_user()?;
        let list = self
            .known_list(id)
            .ok_or_else(|| Error::NotFound(format!("list {id}")))?;
        if !list.is_owned_by(&user_id) {
            return Err(Error::ReadOnly);
        }
        if list.is_public == public && (list.share_code.is_some() == public) {
            return Ok(());
        }

        let gateway = self.gateway.as_ref().ok_or(Error::Offline)?;
        let share_code = public.then(|| gateway.generate_share_code());
        let update = ListUpdate::visibility(share_code);
        gateway
            .update_list(id, &update)
            .await
            .map_err(|error| gateway_failure("Error updating list visibility", error))?;

        let now = Utc::now();
        for list in self
            .state
            .current_list
            .iter_mut()
            .chain(self.state.lists.iter_mut())
            .filter(|list| &list.id == id)
        {
            list.apply(&update, now);
        }
        tracing::info!(
            "List {} is now {}",
            id,
            if public { "public" } else { "private" }
        );
        Ok(())
    }
}

fn gateway_failure(context: &str, error: GatewayError) -> Error {
    tracing::error!("{}: {}", context, error);
    error.into()
}
