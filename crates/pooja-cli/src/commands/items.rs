use std::io::{self, BufRead, IsTerminal, Write};

use pooja_core::controller::{Action, Controller};
use pooja_core::gateway::ListGateway;
use pooja_core::local::LocalStore;

use crate::commands::common::{
    ensure_list_target, normalize_text, persist_owned, resolve_item_id,
};
use crate::error::CliError;
use crate::render::render_checklist;

/// Append an item. Blank text adds nothing and returns `false`.
pub async fn add_item<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    text_parts: &[String],
) -> Result<bool, CliError> {
    let Some(text) = normalize_text(text_parts) else {
        return Ok(false);
    };
    ensure_list_target(controller.state())?;
    controller.dispatch(Action::AddItem(text)).await?;
    Ok(true)
}

pub async fn toggle_item<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    item: &str,
) -> Result<(), CliError> {
    let id = resolve_item_id(controller.state(), item)?;
    controller.dispatch(Action::ToggleItem(id)).await?;
    Ok(())
}

pub async fn edit_item<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    item: &str,
    text_parts: &[String],
) -> Result<(), CliError> {
    let id = resolve_item_id(controller.state(), item)?;
    let text = normalize_text(text_parts).ok_or(CliError::EmptyText)?;
    controller.dispatch(Action::EditItem { id, text }).await?;
    Ok(())
}

pub async fn delete_item<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    item: &str,
) -> Result<(), CliError> {
    let id = resolve_item_id(controller.state(), item)?;
    controller.dispatch(Action::DeleteItem(id)).await?;
    Ok(())
}

/// Ask, then clear. Returns whether the items were cleared.
pub async fn clear_items<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    confirm: impl FnOnce(usize) -> Result<bool, CliError>,
) -> Result<bool, CliError> {
    controller.dispatch(Action::RequestClear).await?;
    let confirmed = match confirm(controller.state().total_count()) {
        Ok(confirmed) => confirmed,
        Err(error) => {
            controller.dispatch(Action::CancelClear).await?;
            return Err(error);
        }
    };

    if confirmed {
        controller.dispatch(Action::ConfirmClear).await?;
    } else {
        controller.dispatch(Action::CancelClear).await?;
    }
    Ok(confirmed)
}

/// Rename, then commit the title the way leaving the title field does.
pub async fn rename_list<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    title_parts: &[String],
) -> Result<(), CliError> {
    let title = normalize_text(title_parts).ok_or(CliError::EmptyTitle)?;
    controller.dispatch(Action::Rename(title)).await?;
    controller.dispatch(Action::TitleCommitted).await?;
    Ok(())
}

/// Finish a one-shot command: save an owned list and show the result.
pub async fn finish<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
) -> Result<(), CliError> {
    persist_owned(controller).await?;
    print!("{}", render_checklist(controller.state()));
    Ok(())
}

pub fn run_show<G: ListGateway, L: LocalStore>(controller: &Controller<G, L>) {
    print!("{}", render_checklist(controller.state()));
}

pub async fn run_add<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    text_parts: &[String],
) -> Result<(), CliError> {
    if add_item(controller, text_parts).await? {
        finish(controller).await
    } else {
        run_show(controller);
        Ok(())
    }
}

pub async fn run_toggle<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    item: &str,
) -> Result<(), CliError> {
    toggle_item(controller, item).await?;
    finish(controller).await
}

pub async fn run_edit<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    item: &str,
    text_parts: &[String],
) -> Result<(), CliError> {
    edit_item(controller, item, text_parts).await?;
    finish(controller).await
}

pub async fn run_delete<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    item: &str,
) -> Result<(), CliError> {
    delete_item(controller, item).await?;
    finish(controller).await
}

pub async fn run_clear<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    yes: bool,
) -> Result<(), CliError> {
    let cleared = clear_items(controller, |count| {
        if yes {
            Ok(true)
        } else {
            prompt_clear(count)
        }
    })
    .await?;
    if !cleared {
        println!("Nothing cleared.");
        return Ok(());
    }
    finish(controller).await
}

pub async fn run_rename<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    title_parts: &[String],
) -> Result<(), CliError> {
    rename_list(controller, title_parts).await?;
    print!("{}", render_checklist(controller.state()));
    Ok(())
}

pub async fn run_save<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
) -> Result<(), CliError> {
    controller.dispatch(Action::Save).await?;
    println!("Saved '{}'", controller.state().title);
    Ok(())
}

fn prompt_clear(count: usize) -> Result<bool, CliError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(CliError::ClearNotConfirmed);
    }

    print!("Clear all {count} items? [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
