//! In-process gateway with the same contract as the hosted table.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::{GatewayError, GatewayResult, ListGateway};
use crate::models::{ListId, ListUpdate, NewList, PoojaList};

#[derive(Debug, Default)]
struct MemoryTable {
    lists: Vec<PoojaList>,
    unavailable: bool,
}

/// Thread-safe in-memory list table.
///
/// Clones share the same table, so a test can keep a handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryListGateway {
    table: Arc<Mutex<MemoryTable>>,
}

impl InMemoryListGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with [`GatewayError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut table) = self.table.lock() {
            table.unavailable = unavailable;
        }
    }

    /// Copy of every stored list, in insertion order.
    #[must_use]
    pub fn stored_lists(&self) -> Vec<PoojaList> {
        self.table
            .lock()
            .map(|table| table.lists.clone())
            .unwrap_or_default()
    }

    fn table(&self) -> GatewayResult<MutexGuard<'_, MemoryTable>> {
        let table = self
            .table
            .lock()
            .map_err(|error| GatewayError::Unavailable(error.to_string()))?;
        if table.unavailable {
            return Err(GatewayError::Unavailable(
                "in-memory backend is offline".to_string(),
            ));
        }
        Ok(table)
    }
}

impl ListGateway for InMemoryListGateway {
    async fn create_list(&self, list: &NewList) -> GatewayResult<ListId> {
        let mut table = self.table()?;
        let id = ListId::from(Uuid::new_v4().to_string());
        table
            .lists
            .push(PoojaList::from_new(id.clone(), list.clone(), Utc::now()));
        Ok(id)
    }

    async fn update_list(&self, id: &ListId, update: &ListUpdate) -> GatewayResult<()> {
        let mut table = self.table()?;
        let list = table
            .lists
            .iter_mut()
            .find(|list| &list.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        list.apply(update, Utc::now());
        Ok(())
    }

    async fn delete_list(&self, id: &ListId, owner_id: &str) -> GatewayResult<()> {
        let mut table = self.table()?;
        table
            .lists
            .retain(|list| &list.id != id || !list.is_owned_by(owner_id));
        Ok(())
    }

    async fn lists_for_owner(&self, owner_id: &str) -> GatewayResult<Vec<PoojaList>> {
        let table = self.table()?;
        let mut lists = table
            .lists
            .iter()
            .filter(|list| list.owner_id == owner_id)
            .cloned()
            .collect::<Vec<_>>();
        lists.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        Ok(lists)
    }

    async fn list_by_share_code(&self, code: &str) -> GatewayResult<Option<PoojaList>> {
        let table = self.table()?;
        Ok(table
            .lists
            .iter()
            .find(|list| list.is_public && list.share_code.as_deref() == Some(code))
            .cloned())
    }

    async fn get_list(&self, id: &ListId) -> GatewayResult<Option<PoojaList>> {
        let table = self.table()?;
        Ok(table.lists.iter().find(|list| &list.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use crate::models::PoojaItem;
    use pretty_assertions::assert_eq;

    fn owner(id: &str) -> AuthUser {
        AuthUser {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: id.to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_create_update_and_get() {
        let gateway = InMemoryListGateway::new();
        let id = gateway
            .create_list(&NewList::empty_for(&owner("asha")))
            .await
            .unwrap();

        let item = PoojaItem::new("Diya").unwrap();
        gateway
            .update_list(&id, &ListUpdate::contents("Diwali", &[item.clone()]))
            .await
            .unwrap();

        let list = gateway.get_list(&id).await.unwrap().unwrap();
        assert_eq!(list.title, "Diwali");
        assert_eq!(list.items, vec![item]);
        assert!(list.updated_at >= list.created_at);
    }

    #[tokio::test]
    async fn test_lists_for_owner_newest_first() {
        let gateway = InMemoryListGateway::new();
        let first = gateway
            .create_list(&NewList::empty_for(&owner("asha")))
            .await
            .unwrap();
        let second = gateway
            .create_list(&NewList::empty_for(&owner("asha")))
            .await
            .unwrap();
        gateway
            .create_list(&NewList::empty_for(&owner("bala")))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        gateway
            .update_list(&first, &ListUpdate::contents("Touched", &[]))
            .await
            .unwrap();

        let lists = gateway.lists_for_owner("asha").await.unwrap();
        let ids = lists.iter().map(|list| list.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn test_share_code_lookup_requires_public() {
        let gateway = InMemoryListGateway::new();
        let id = gateway
            .create_list(&NewList::empty_for(&owner("asha")))
            .await
            .unwrap();
        gateway
            .update_list(&id, &ListUpdate::visibility(Some("XYZ123".to_string())))
            .await
            .unwrap();
        assert!(gateway
            .list_by_share_code("XYZ123")
            .await
            .unwrap()
            .is_some());

        // A private row keeping its code is still not reachable by code.
        gateway
            .update_list(
                &id,
                &ListUpdate {
                    is_public: Some(false),
                    ..ListUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(gateway
            .list_by_share_code("XYZ123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_calls() {
        let gateway = InMemoryListGateway::new();
        gateway.set_unavailable(true);
        let result = gateway.lists_for_owner("asha").await;
        assert!(matches!(result, Err(GatewayError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_delete_only_removes_own_list() {
        let gateway = InMemoryListGateway::new();
        let id = gateway
            .create_list(&NewList::empty_for(&owner("asha")))
            .await
            .unwrap();

        gateway.delete_list(&id, "bala").await.unwrap();
        assert!(gateway.get_list(&id).await.unwrap().is_some());

        gateway.delete_list(&id, "asha").await.unwrap();
        assert_eq!(gateway.get_list(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_missing_list_is_not_found() {
        let gateway = InMemoryListGateway::new();
        let result = gateway
            .update_list(&ListId::from("missing"), &ListUpdate::default())
            .await;
        assert!(matches!(result, Err(GatewayError::NotFound(_))));
    }
}
