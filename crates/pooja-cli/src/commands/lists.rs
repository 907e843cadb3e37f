use chrono::Utc;
use pooja_core::controller::{Action, Controller};
use pooja_core::gateway::ListGateway;
use pooja_core::local::LocalStore;

use crate::commands::common::{resolve_list_id, short_id};
use crate::error::CliError;
use crate::render::{format_list_lines, list_summary, render_checklist, ListSummary};

/// Fetch the viewer's lists into the list browser.
pub async fn browse_lists<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
) -> Result<(), CliError> {
    controller.dispatch(Action::OpenListBrowser).await?;
    Ok(())
}

pub async fn open_list<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    query: &str,
) -> Result<(), CliError> {
    if controller.state().lists.is_empty() {
        controller.dispatch(Action::RefreshLists).await?;
    }
    let id = resolve_list_id(&controller.state().lists, query)?;
    controller.dispatch(Action::SelectList(id)).await?;
    Ok(())
}

pub async fn remove_list<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    query: &str,
) -> Result<String, CliError> {
    if controller.state().lists.is_empty() {
        controller.dispatch(Action::RefreshLists).await?;
    }
    let id = resolve_list_id(&controller.state().lists, query)?;
    let title = controller
        .state()
        .lists
        .iter()
        .find(|list| list.id == id)
        .map(|list| list.title.clone())
        .unwrap_or_default();
    controller.dispatch(Action::DeleteList(id)).await?;
    Ok(title)
}

pub async fn run_lists<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    as_json: bool,
) -> Result<(), CliError> {
    browse_lists(controller).await?;
    let state = controller.state();
    let now = Utc::now();

    if as_json {
        let summaries = state
            .lists
            .iter()
            .map(|list| list_summary(list, now))
            .collect::<Vec<ListSummary>>();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else if state.lists.is_empty() {
        println!("No saved lists yet. Create one with `pooja new`.");
    } else {
        for line in format_list_lines(&state.lists, state.current_list.as_ref(), now) {
            println!("{line}");
        }
    }

    controller.dispatch(Action::CloseListBrowser).await?;
    Ok(())
}

pub async fn run_new<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
) -> Result<(), CliError> {
    controller.dispatch(Action::CreateList).await?;
    if let Some(list) = &controller.state().current_list {
        println!("Created list {}", short_id(list.id.as_str()));
    }
    print!("{}", render_checklist(controller.state()));
    Ok(())
}

pub async fn run_remove_list<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    query: &str,
) -> Result<(), CliError> {
    let title = remove_list(controller, query).await?;
    println!("Deleted list '{title}'");
    Ok(())
}
