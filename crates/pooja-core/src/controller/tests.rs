use pretty_assertions::assert_eq;

use super::*;
use crate::auth::AuthUser;
use crate::gateway::InMemoryListGateway;
use crate::local::{MemoryLocalStore, LOCAL_SLOT_KEY};

type TestController = Controller<InMemoryListGateway, MemoryLocalStore>;

fn user(id: &str) -> AuthUser {
    AuthUser {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        name: id.to_string(),
        avatar: None,
    }
}

async fn start(
    gateway: &InMemoryListGateway,
    store: &MemoryLocalStore,
    viewer: AuthState,
    share_code: Option<&str>,
) -> TestController {
    let mut controller = Controller::new(Some(gateway.clone()), store.clone());
    controller
        .dispatch(Action::Boot {
            share_code: share_code.map(str::to_string),
        })
        .await
        .unwrap();
    controller.dispatch(Action::AuthResolved(viewer)).await.unwrap();
    controller
}

async fn anonymous(store: &MemoryLocalStore) -> TestController {
    start(&InMemoryListGateway::new(), store, AuthState::SignedOut, None).await
}

fn item_id(controller: &TestController, index: usize) -> ItemId {
    controller.state().items[index].id.clone()
}

fn stored_snapshot(store: &MemoryLocalStore) -> LocalSnapshot {
    load_snapshot(store).unwrap().unwrap()
}

/// Signed-in owner with one saved list holding "Diya" and "Flowers".
async fn owner_with_list(gateway: &InMemoryListGateway) -> (TestController, ListId) {
    let mut owner = start(
        gateway,
        &MemoryLocalStore::new(),
        AuthState::SignedIn(user("owner")),
        None,
    )
    .await;
    owner.dispatch(Action::CreateList).await.unwrap();
    owner.dispatch(Action::AddItem("Diya".into())).await.unwrap();
    owner.dispatch(Action::AddItem("Flowers".into())).await.unwrap();
    owner.dispatch(Action::Save).await.unwrap();
    let id = owner.state().current_list.as_ref().unwrap().id.clone();
    (owner, id)
}

#[tokio::test]
async fn test_first_visit_shows_default_title() {
    let store = MemoryLocalStore::new();
    let controller = anonymous(&store).await;

    let state = controller.state();
    assert!(state.is_hydrated());
    assert!(state.local_loaded);
    assert_eq!(state.title, DEFAULT_LIST_TITLE);
    assert!(state.items.is_empty());
    assert_eq!(store.read_slot(LOCAL_SLOT_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_anonymous_add_is_mirrored_and_restored() {
    let store = MemoryLocalStore::new();
    let mut controller = anonymous(&store).await;
    controller
        .dispatch(Action::AddItem("Diya".into()))
        .await
        .unwrap();

    let snapshot = stored_snapshot(&store);
    assert_eq!(snapshot.title, DEFAULT_LIST_TITLE);
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].text, "Diya");
    assert!(!snapshot.items[0].completed);

    let reloaded = anonymous(&store).await;
    assert_eq!(reloaded.state().items, controller.state().items);
    assert_eq!(reloaded.state().title, DEFAULT_LIST_TITLE);
}

#[tokio::test]
async fn test_reload_keeps_order_and_completion() {
    let store = MemoryLocalStore::new();
    let mut controller = anonymous(&store).await;
    for text in ["Diya", "Incense", "Kumkum"] {
        controller.dispatch(Action::AddItem(text.into())).await.unwrap();
    }
    let incense = item_id(&controller, 1);
    controller.dispatch(Action::ToggleItem(incense)).await.unwrap();
    controller
        .dispatch(Action::Rename("Diwali".into()))
        .await
        .unwrap();

    let reloaded = anonymous(&store).await;
    let texts: Vec<_> = reloaded
        .state()
        .items
        .iter()
        .map(|item| (item.text.as_str(), item.completed))
        .collect();
    assert_eq!(
        texts,
        vec![("Diya", false), ("Incense", true), ("Kumkum", false)]
    );
    assert_eq!(reloaded.state().title, "Diwali");
}

#[tokio::test]
async fn test_blank_add_is_ignored() {
    let store = MemoryLocalStore::new();
    let mut controller = anonymous(&store).await;
    controller.dispatch(Action::AddItem("Diya".into())).await.unwrap();
    let before = controller.state().clone();

    controller.dispatch(Action::AddItem("   \t".into())).await.unwrap();
    controller.dispatch(Action::AddItem(String::new())).await.unwrap();

    assert_eq!(controller.state(), &before);
    assert_eq!(stored_snapshot(&store).items.len(), 1);
}

#[tokio::test]
async fn test_added_text_is_trimmed() {
    let mut controller = anonymous(&MemoryLocalStore::new()).await;
    controller
        .dispatch(Action::AddItem("  Coconut  ".into()))
        .await
        .unwrap();
    assert_eq!(controller.state().items[0].text, "Coconut");
}

#[tokio::test]
async fn test_toggle_twice_restores_item() {
    let mut controller = anonymous(&MemoryLocalStore::new()).await;
    controller.dispatch(Action::AddItem("Bell".into())).await.unwrap();
    let original = controller.state().items[0].clone();

    controller.dispatch(Action::ToggleItem(original.id.clone())).await.unwrap();
    assert!(controller.state().items[0].completed);
    controller.dispatch(Action::ToggleItem(original.id.clone())).await.unwrap();

    assert_eq!(controller.state().items[0], original);
}

#[tokio::test]
async fn test_edit_and_delete_items() {
    let store = MemoryLocalStore::new();
    let mut controller = anonymous(&store).await;
    controller.dispatch(Action::AddItem("Flower".into())).await.unwrap();
    controller.dispatch(Action::AddItem("Rice".into())).await.unwrap();
    let flower = item_id(&controller, 0);
    let rice = item_id(&controller, 1);

    controller
        .dispatch(Action::EditItem {
            id: flower.clone(),
            text: "Marigold flowers".into(),
        })
        .await
        .unwrap();
    controller.dispatch(Action::DeleteItem(rice.clone())).await.unwrap();

    assert_eq!(controller.state().items.len(), 1);
    assert_eq!(controller.state().items[0].text, "Marigold flowers");
    assert_eq!(stored_snapshot(&store).items, controller.state().items);

    assert!(matches!(
        controller.dispatch(Action::DeleteItem(rice)).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        controller
            .dispatch(Action::EditItem {
                id: flower,
                text: "  ".into(),
            })
            .await,
        Err(Error::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_clear_requires_confirmation() {
    let mut controller = anonymous(&MemoryLocalStore::new()).await;
    controller.dispatch(Action::AddItem("Ghee".into())).await.unwrap();

    assert!(matches!(
        controller.dispatch(Action::ConfirmClear).await,
        Err(Error::InvalidInput(_))
    ));
    assert_eq!(controller.state().items.len(), 1);

    controller.dispatch(Action::RequestClear).await.unwrap();
    controller.dispatch(Action::CancelClear).await.unwrap();
    assert!(!controller.state().confirm_clear);
    assert_eq!(controller.state().items.len(), 1);

    controller.dispatch(Action::RequestClear).await.unwrap();
    controller.dispatch(Action::ConfirmClear).await.unwrap();
    assert!(controller.state().items.is_empty());
    assert!(!controller.state().confirm_clear);
}

#[tokio::test]
async fn test_pending_auth_does_not_touch_local_slot() {
    let store = MemoryLocalStore::new();
    {
        let mut earlier = anonymous(&store).await;
        earlier.dispatch(Action::AddItem("Diya".into())).await.unwrap();
    }

    let mut controller = Controller::new(Some(InMemoryListGateway::new()), store.clone());
    controller
        .dispatch(Action::Boot { share_code: None })
        .await
        .unwrap();
    assert!(!controller.state().is_hydrated());

    // Edits made before auth resolves stay in memory only.
    controller.dispatch(Action::AddItem("Early".into())).await.unwrap();
    assert_eq!(stored_snapshot(&store).items[0].text, "Diya");

    controller
        .dispatch(Action::AuthResolved(AuthState::SignedOut))
        .await
        .unwrap();
    assert!(controller.state().is_hydrated());
    assert_eq!(controller.state().items.len(), 1);
    assert_eq!(controller.state().items[0].text, "Diya");
}

#[tokio::test]
async fn test_corrupt_slot_is_quarantined() {
    let store = MemoryLocalStore::new();
    store.write_slot(LOCAL_SLOT_KEY, "{broken").unwrap();

    let mut controller = anonymous(&store).await;
    assert!(controller.state().items.is_empty());
    assert_eq!(controller.state().title, DEFAULT_LIST_TITLE);
    assert_eq!(
        store.read_slot("poojaList.corrupt").unwrap().as_deref(),
        Some("{broken")
    );

    controller.dispatch(Action::AddItem("Diya".into())).await.unwrap();
    assert_eq!(stored_snapshot(&store).items[0].text, "Diya");
    assert_eq!(
        store.read_slot("poojaList.corrupt").unwrap().as_deref(),
        Some("{broken")
    );
}

#[tokio::test]
async fn test_signed_in_viewer_does_not_mirror_locally() {
    let store = MemoryLocalStore::new();
    let gateway = InMemoryListGateway::new();
    let mut controller = start(&gateway, &store, AuthState::SignedIn(user("u1")), None).await;

    assert!(!controller.state().local_loaded);
    controller.dispatch(Action::AddItem("Diya".into())).await.unwrap();
    assert_eq!(store.read_slot(LOCAL_SLOT_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_create_list_discards_local_state() {
    let store = MemoryLocalStore::new();
    let gateway = InMemoryListGateway::new();
    let mut controller = anonymous(&store).await;
    controller.dispatch(Action::AddItem("Local".into())).await.unwrap();

    assert!(matches!(
        controller.dispatch(Action::CreateList).await,
        Err(Error::SignInRequired)
    ));

    controller.set_gateway(Some(gateway.clone()));
    controller
        .dispatch(Action::AuthResolved(AuthState::SignedIn(user("u1"))))
        .await
        .unwrap();
    controller.dispatch(Action::CreateList).await.unwrap();

    let state = controller.state();
    assert!(state.items.is_empty());
    assert_eq!(state.title, crate::models::NEW_LIST_TITLE);
    assert!(state.is_owned_list());
    assert_eq!(state.lists.len(), 1);
    assert_eq!(gateway.stored_lists().len(), 1);
    assert!(!gateway.stored_lists()[0].is_public);
    // The anonymous slot is left as it was.
    assert_eq!(stored_snapshot(&store).items[0].text, "Local");
}

#[tokio::test]
async fn test_save_persists_contents() {
    let gateway = InMemoryListGateway::new();
    let (mut owner, id) = owner_with_list(&gateway).await;

    owner.dispatch(Action::Rename("Ganesh Chaturthi".into())).await.unwrap();
    owner.dispatch(Action::TitleCommitted).await.unwrap();

    let stored = gateway.get_list(&id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Ganesh Chaturthi");
    let texts: Vec<_> = stored.items.iter().map(|item| item.text.as_str()).collect();
    assert_eq!(texts, vec!["Diya", "Flowers"]);
    assert_eq!(owner.state().current_list.as_ref().unwrap().title, "Ganesh Chaturthi");
    assert!(!owner.state().saving);
}

#[tokio::test]
async fn test_failed_save_keeps_edits() {
    let gateway = InMemoryListGateway::new();
    let (mut owner, id) = owner_with_list(&gateway).await;
    owner.dispatch(Action::AddItem("Sweets".into())).await.unwrap();

    gateway.set_unavailable(true);
    let result = owner.dispatch(Action::Save).await;

    assert!(matches!(result, Err(Error::Gateway(_))));
    assert!(!owner.state().saving);
    assert_eq!(owner.state().items.len(), 3);
    assert_eq!(owner.state().items[2].text, "Sweets");

    gateway.set_unavailable(false);
    owner.dispatch(Action::Save).await.unwrap();
    assert!(!owner.state().saving);
    assert_eq!(gateway.get_list(&id).await.unwrap().unwrap().items.len(), 3);
}

#[tokio::test]
async fn test_save_without_list_is_rejected() {
    let store = MemoryLocalStore::new();
    let mut anonymous = anonymous(&store).await;
    assert!(matches!(
        anonymous.dispatch(Action::Save).await,
        Err(Error::SignInRequired)
    ));

    let mut signed_in = start(
        &InMemoryListGateway::new(),
        &store,
        AuthState::SignedIn(user("u1")),
        None,
    )
    .await;
    assert!(matches!(
        signed_in.dispatch(Action::Save).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_offline_controller_keeps_local_list() {
    let store = MemoryLocalStore::new();
    let mut controller: TestController = Controller::new(None, store.clone());
    controller
        .dispatch(Action::Boot { share_code: None })
        .await
        .unwrap();
    controller
        .dispatch(Action::AuthResolved(AuthState::SignedOut))
        .await
        .unwrap();

    controller.dispatch(Action::AddItem("Diya".into())).await.unwrap();
    assert_eq!(stored_snapshot(&store).items.len(), 1);
    assert!(matches!(
        controller.dispatch(Action::LoadShared("ABC123".into())).await,
        Err(Error::Offline)
    ));
}

#[tokio::test]
async fn test_public_toggle_issues_fresh_codes() {
    let gateway = InMemoryListGateway::new();
    let (mut owner, id) = owner_with_list(&gateway).await;

    owner.dispatch(Action::OpenShareDialog).await.unwrap();
    assert_eq!(owner.state().mode, ViewMode::ShareDialog);

    owner
        .dispatch(Action::SetPublic { id: id.clone(), public: true })
        .await
        .unwrap();
    let first = owner.state().current_list.as_ref().unwrap().clone();
    assert!(first.is_public);
    let first_code = first.share_code.clone().unwrap();
    assert!(!first_code.is_empty());

    // Already public: the link stays stable.
    owner
        .dispatch(Action::SetPublic { id: id.clone(), public: true })
        .await
        .unwrap();
    assert_eq!(
        owner.state().current_list.as_ref().unwrap().share_code,
        Some(first_code.clone())
    );

    owner
        .dispatch(Action::SetPublic { id: id.clone(), public: false })
        .await
        .unwrap();
    let private = gateway.get_list(&id).await.unwrap().unwrap();
    assert!(!private.is_public);
    assert_eq!(private.share_code, None);
    assert_eq!(gateway.list_by_share_code(&first_code).await.unwrap(), None);

    owner
        .dispatch(Action::SetPublic { id: id.clone(), public: true })
        .await
        .unwrap();
    let second_code = owner
        .state()
        .current_list
        .as_ref()
        .unwrap()
        .share_code
        .clone()
        .unwrap();
    assert_ne!(second_code, first_code);
    assert_eq!(
        gateway.get_list(&id).await.unwrap().unwrap().share_code,
        Some(second_code)
    );
}

#[tokio::test]
async fn test_shared_list_is_read_only_for_visitors() {
    let gateway = InMemoryListGateway::new();
    let (mut owner, id) = owner_with_list(&gateway).await;
    owner
        .dispatch(Action::SetPublic { id, public: true })
        .await
        .unwrap();
    let code = owner
        .state()
        .current_list
        .as_ref()
        .unwrap()
        .share_code
        .clone()
        .unwrap();

    let store = MemoryLocalStore::new();
    let mut visitor = start(&gateway, &store, AuthState::SignedOut, Some(&code)).await;
    assert!(visitor.state().is_shared_view());
    assert!(!visitor.state().mirrors_locally());
    assert_eq!(visitor.state().items.len(), 2);

    let before = visitor.state().clone();
    let diya = item_id(&visitor, 0);
    visitor.dispatch(Action::ToggleItem(diya.clone())).await.unwrap();
    assert_eq!(visitor.state(), &before);
    for action in [
        Action::EditItem {
            id: diya.clone(),
            text: "Lamp".into(),
        },
        Action::DeleteItem(diya),
        Action::AddItem("Extra".into()),
        Action::Rename("Mine now".into()),
        Action::RequestClear,
    ] {
        assert!(matches!(visitor.dispatch(action).await, Err(Error::ReadOnly)));
    }
    assert_eq!(visitor.state(), &before);
    assert_eq!(store.read_slot(LOCAL_SLOT_KEY).unwrap(), None);

    // Another signed-in viewer is a visitor too.
    let mut other = start(
        &gateway,
        &MemoryLocalStore::new(),
        AuthState::SignedIn(user("someone-else")),
        Some(&code),
    )
    .await;
    assert!(other.state().is_shared_view());
    assert!(matches!(other.dispatch(Action::Save).await, Err(Error::ReadOnly)));
    assert!(matches!(
        other.dispatch(Action::OpenShareDialog).await,
        Err(Error::ReadOnly)
    ));
}

#[tokio::test]
async fn test_unknown_share_code_falls_back_to_local_list() {
    let store = MemoryLocalStore::new();
    {
        let mut earlier = anonymous(&store).await;
        earlier.dispatch(Action::AddItem("Diya".into())).await.unwrap();
    }

    let controller = start(
        &InMemoryListGateway::new(),
        &store,
        AuthState::SignedOut,
        Some("NOPE42"),
    )
    .await;
    assert!(controller.state().current_list.is_none());
    assert!(controller.state().mirrors_locally());
    assert_eq!(controller.state().items[0].text, "Diya");
}

#[tokio::test]
async fn test_private_list_cannot_be_opened_by_code() {
    let gateway = InMemoryListGateway::new();
    let (mut owner, id) = owner_with_list(&gateway).await;
    owner
        .dispatch(Action::SetPublic { id: id.clone(), public: true })
        .await
        .unwrap();
    let code = owner
        .state()
        .current_list
        .as_ref()
        .unwrap()
        .share_code
        .clone()
        .unwrap();
    owner
        .dispatch(Action::SetPublic { id, public: false })
        .await
        .unwrap();

    let mut visitor = anonymous(&MemoryLocalStore::new()).await;
    visitor.set_gateway(Some(gateway));
    visitor.dispatch(Action::LoadShared(code)).await.unwrap();
    assert!(visitor.state().current_list.is_none());
}

#[tokio::test]
async fn test_list_browser_select_and_delete() {
    let gateway = InMemoryListGateway::new();
    let (mut owner, first) = owner_with_list(&gateway).await;
    owner.dispatch(Action::CreateList).await.unwrap();
    owner.dispatch(Action::AddItem("Camphor".into())).await.unwrap();
    owner.dispatch(Action::Save).await.unwrap();

    owner.dispatch(Action::OpenListBrowser).await.unwrap();
    assert_eq!(owner.state().mode, ViewMode::ListBrowser);
    assert_eq!(owner.state().lists.len(), 2);

    owner.dispatch(Action::SelectList(first.clone())).await.unwrap();
    assert_eq!(owner.state().mode, ViewMode::Normal);
    assert_eq!(owner.state().items.len(), 2);
    assert_eq!(owner.state().items[0].text, "Diya");

    owner.dispatch(Action::DeleteList(first.clone())).await.unwrap();
    assert!(owner.state().current_list.is_none());
    assert!(owner.state().items.is_empty());
    assert_eq!(owner.state().lists.len(), 1);
    assert_eq!(gateway.get_list(&first).await.unwrap(), None);

    assert!(matches!(
        owner.dispatch(Action::SelectList(first)).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_visitor_cannot_share_or_delete_owner_list() {
    let gateway = InMemoryListGateway::new();
    let (_, id) = owner_with_list(&gateway).await;

    let mut other = start(
        &gateway,
        &MemoryLocalStore::new(),
        AuthState::SignedIn(user("intruder")),
        None,
    )
    .await;
    let owners_list = gateway.get_list(&id).await.unwrap().unwrap();
    other.state.lists.push(owners_list);

    assert!(matches!(
        other
            .dispatch(Action::SetPublic { id: id.clone(), public: true })
            .await,
        Err(Error::ReadOnly)
    ));
    assert!(matches!(
        other.dispatch(Action::DeleteList(id.clone())).await,
        Err(Error::ReadOnly)
    ));
    assert!(gateway.get_list(&id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_unseen_list_is_checked_before_delete() {
    let gateway = InMemoryListGateway::new();
    let (_, id) = owner_with_list(&gateway).await;

    let mut other = start(
        &gateway,
        &MemoryLocalStore::new(),
        AuthState::SignedIn(user("intruder")),
        None,
    )
    .await;
    assert!(other.state().lists.is_empty());

    assert!(matches!(
        other.dispatch(Action::DeleteList(id.clone())).await,
        Err(Error::ReadOnly)
    ));
    assert!(gateway.get_list(&id).await.unwrap().is_some());

    assert!(matches!(
        other
            .dispatch(Action::DeleteList(ListId::from("missing")))
            .await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_sign_out_returns_to_local_list() {
    let store = MemoryLocalStore::new();
    {
        let mut earlier = anonymous(&store).await;
        earlier.dispatch(Action::AddItem("Diya".into())).await.unwrap();
    }
    let gateway = InMemoryListGateway::new();
    let mut controller = start(&gateway, &store, AuthState::SignedIn(user("u1")), None).await;
    controller.dispatch(Action::CreateList).await.unwrap();

    controller
        .dispatch(Action::AuthResolved(AuthState::SignedOut))
        .await
        .unwrap();

    let state = controller.state();
    assert!(state.current_list.is_none());
    assert!(state.lists.is_empty());
    assert!(state.mirrors_locally());
    assert_eq!(state.items[0].text, "Diya");
}
