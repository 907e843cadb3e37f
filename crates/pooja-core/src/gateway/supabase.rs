//! `PostgREST` gateway over the hosted `pooja_lists` table.

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use super::row::{InsertRow, ListRow, UpdateRow, LIST_COLUMNS};
use super::{GatewayError, GatewayResult, ListGateway, LISTS_TABLE};
use crate::auth::describe_api_error;
use crate::config::{http_client, SupabaseConfig, HTTP_TIMEOUT};
use crate::models::{ListId, ListUpdate, NewList, PoojaList};

#[derive(Clone)]
pub struct SupabaseListGateway {
    table_url: String,
    anon_key: String,
    access_token: Option<String>,
    client: Client,
}

impl SupabaseListGateway {
    pub fn new(config: &SupabaseConfig) -> GatewayResult<Self> {
        let base = config.url.trim().trim_end_matches('/');
        Ok(Self {
            table_url: format!("{base}/rest/v1/{LISTS_TABLE}"),
            anon_key: config.anon_key.clone(),
            access_token: None,
            client: http_client()?,
        })
    }

    /// Act on behalf of a signed-in user so row-level policies see them.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .timeout(HTTP_TIMEOUT)
    }

    /// Row-level policies should already stop this; the owner filter is kept anyway.
    fn delete_request(&self, id: &ListId, owner_id: &str) -> RequestBuilder {
        self.authorized(self.client.delete(&self.table_url).query(&[
            ("id", format!("eq.{id}")),
            ("owner_id", format!("eq.{owner_id}")),
        ]))
    }

    async fn fetch_rows(&self, filters: &[(&str, String)]) -> GatewayResult<Vec<PoojaList>> {
        let mut query = vec![("select", LIST_COLUMNS.to_string())];
        query.extend(filters.iter().map(|(key, value)| (*key, value.clone())));

        let request = self.authorized(self.client.get(&self.table_url).query(&query));
        let response = ensure_success(request.send().await?).await?;
        let rows = response.json::<Vec<ListRow>>().await?;
        rows.into_iter().map(PoojaList::try_from).collect()
    }
}

impl ListGateway for SupabaseListGateway {
    async fn create_list(&self, list: &NewList) -> GatewayResult<ListId> {
        let request = self.authorized(
            self.client
                .post(&self.table_url)
                .query(&[("select", "id")])
                .header("Prefer", "return=representation")
                .json(&InsertRow::from(list)),
        );
        let response = ensure_success(request.send().await?).await?;
        let created = response.json::<Vec<CreatedRow>>().await?;
        let id = created
            .into_iter()
            .next()
            .map(|row| row.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| GatewayError::InvalidRow("insert did not return an id".to_string()))?;

        tracing::debug!("Created list {}", id);
        Ok(id.into())
    }

    async fn update_list(&self, id: &ListId, update: &ListUpdate) -> GatewayResult<()> {
        let request = self.authorized(
            self.client
                .patch(&self.table_url)
                .query(&[("id", format!("eq.{id}"))])
                .json(&UpdateRow::new(update, Utc::now())),
        );
        ensure_success(request.send().await?).await?;
        tracing::debug!("Updated list {}", id);
        Ok(())
    }

    async fn delete_list(&self, id: &ListId, owner_id: &str) -> GatewayResult<()> {
        let request = self.delete_request(id, owner_id);
        ensure_success(request.send().await?).await?;
        tracing::debug!("Deleted list {}", id);
        Ok(())
    }

    async fn lists_for_owner(&self, owner_id: &str) -> GatewayResult<Vec<PoojaList>> {
        self.fetch_rows(&[
            ("owner_id", format!("eq.{owner_id}")),
            ("order", "updated_at.desc".to_string()),
        ])
        .await
    }

    async fn list_by_share_code(&self, code: &str) -> GatewayResult<Option<PoojaList>> {
        let rows = self
            .fetch_rows(&[
                ("share_code", format!("eq.{code}")),
                ("is_public", "eq.true".to_string()),
                ("limit", "1".to_string()),
            ])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_list(&self, id: &ListId) -> GatewayResult<Option<PoojaList>> {
        let rows = self
            .fetch_rows(&[("id", format!("eq.{id}")), ("limit", "1".to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[derive(Debug, Deserialize)]
struct CreatedRow {
    id: String,
}

async fn ensure_success(response: Response) -> GatewayResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Api(describe_api_error(status, &body)))
}
