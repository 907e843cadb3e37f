//! View state and the actions that change it.

use crate::auth::{AuthState, AuthUser};
use crate::models::{completed_count, ItemId, ListId, PoojaItem, PoojaList, DEFAULT_LIST_TITLE};

/// Which screen the shell should render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Normal,
    ListBrowser,
    ShareDialog,
}

/// Everything the screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub viewer: AuthState,
    /// Remote list adopted as current, owned or shared.
    pub current_list: Option<PoojaList>,
    pub items: Vec<PoojaItem>,
    pub title: String,
    pub mode: ViewMode,
    /// Lists fetched for the list browser.
    pub lists: Vec<PoojaList>,
    /// A save request is awaiting the gateway.
    pub saving: bool,
    /// Clear-all is waiting for confirmation.
    pub confirm_clear: bool,
    /// The local slot has been read; only then may it be written.
    pub local_loaded: bool,
    pub(crate) booted: bool,
    pub(crate) hydrated: bool,
    pub(crate) entry_share_code: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            viewer: AuthState::Pending,
            current_list: None,
            items: Vec::new(),
            title: DEFAULT_LIST_TITLE.to_string(),
            mode: ViewMode::Normal,
            lists: Vec::new(),
            saving: false,
            confirm_clear: false,
            local_loaded: false,
            booted: false,
            hydrated: false,
            entry_share_code: None,
        }
    }
}

impl AppState {
    #[must_use]
    pub const fn user(&self) -> Option<&AuthUser> {
        self.viewer.user()
    }

    /// Startup finished: auth resolved and the initial list chosen.
    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// The adopted list belongs to someone else, or nobody is signed in.
    #[must_use]
    pub fn is_shared_view(&self) -> bool {
        self.current_list.as_ref().is_some_and(|list| {
            !self
                .user()
                .is_some_and(|user| list.is_owned_by(&user.id))
        })
    }

    /// The viewer owns the adopted list and may save or share it.
    #[must_use]
    pub fn is_owned_list(&self) -> bool {
        match (&self.current_list, self.user()) {
            (Some(list), Some(user)) => list.is_owned_by(&user.id),
            _ => false,
        }
    }

    /// Mutations go to the local slot: signed out, no remote list, slot read.
    #[must_use]
    pub const fn mirrors_locally(&self) -> bool {
        self.viewer.is_signed_out() && self.current_list.is_none() && self.local_loaded
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        completed_count(&self.items)
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn adopt(&mut self, list: PoojaList) {
        self.items.clone_from(&list.items);
        self.title.clone_from(&list.title);
        self.current_list = Some(list);
        self.confirm_clear = false;
        self.mode = ViewMode::Normal;
    }

    pub(crate) fn reset_to_anonymous(&mut self) {
        self.current_list = None;
        self.items.clear();
        self.title = DEFAULT_LIST_TITLE.to_string();
        self.lists.clear();
        self.mode = ViewMode::Normal;
        self.confirm_clear = false;
        self.local_loaded = false;
    }

    /// Replace the browser entry for `list`, if present.
    pub(crate) fn refresh_browser_entry(&mut self, list: &PoojaList) {
        if let Some(entry) = self.lists.iter_mut().find(|entry| entry.id == list.id) {
            *entry = list.clone();
        }
    }
}

/// Everything a shell can ask of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Page load; carries the entry share code, if any.
    Boot { share_code: Option<String> },
    /// The identity provider answered (or the viewer signed in/out later).
    AuthResolved(AuthState),
    AddItem(String),
    ToggleItem(ItemId),
    EditItem { id: ItemId, text: String },
    DeleteItem(ItemId),
    RequestClear,
    ConfirmClear,
    CancelClear,
    Rename(String),
    /// The title input lost focus.
    TitleCommitted,
    Save,
    CreateList,
    SelectList(ListId),
    LoadShared(String),
    OpenListBrowser,
    CloseListBrowser,
    RefreshLists,
    DeleteList(ListId),
    OpenShareDialog,
    CloseShareDialog,
    SetPublic { id: ListId, public: bool },
}
