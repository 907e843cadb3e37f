//! Persistence gateway for owned lists.
//!
//! The gateway is the only path to the remote store. `SupabaseListGateway`
//! talks to the hosted table; `InMemoryListGateway` keeps the same contract in
//! process.

mod memory;
mod row;
mod supabase;

use thiserror::Error;

use crate::models::{ListId, ListUpdate, NewList, PoojaList};
use crate::share;

pub use memory::InMemoryListGateway;
pub use row::{InsertRow, ListRow, UpdateRow};
pub use supabase::SupabaseListGateway;

/// Name of the remote table holding lists.
pub const LISTS_TABLE: &str = "pooja_lists";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Backend API error: {0}")]
    Api(String),
    #[error("Invalid row from backend: {0}")]
    InvalidRow(String),
    #[error("List not found: {0}")]
    NotFound(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// CRUD and share-code lookup over persisted lists.
#[allow(async_fn_in_trait)]
pub trait ListGateway {
    /// Store a new list and return the id the backend assigned.
    async fn create_list(&self, list: &NewList) -> GatewayResult<ListId>;

    /// Apply a partial update; `updated_at` is always refreshed.
    async fn update_list(&self, id: &ListId, update: &ListUpdate) -> GatewayResult<()>;

    /// Delete `id` only if `owner_id` created it; anything else is left alone.
    async fn delete_list(&self, id: &ListId, owner_id: &str) -> GatewayResult<()>;

    /// Lists created by `owner_id`, most recently updated first.
    async fn lists_for_owner(&self, owner_id: &str) -> GatewayResult<Vec<PoojaList>>;

    /// The list carrying `code`, only while it is public.
    async fn list_by_share_code(&self, code: &str) -> GatewayResult<Option<PoojaList>>;

    async fn get_list(&self, id: &ListId) -> GatewayResult<Option<PoojaList>>;

    fn generate_share_code(&self) -> String {
        share::generate_share_code()
    }
}
