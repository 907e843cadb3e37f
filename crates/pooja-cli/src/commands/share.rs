use pooja_core::controller::{Action, Controller};
use pooja_core::gateway::ListGateway;
use pooja_core::local::LocalStore;
use pooja_core::share::share_url;

use crate::cli::ShareCommands;
use crate::error::CliError;
use crate::render::render_share_status;

/// Switch the current list between public and private through the share dialog.
pub async fn set_sharing<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    public: bool,
) -> Result<(), CliError> {
    controller.dispatch(Action::OpenShareDialog).await?;
    let Some(id) = controller
        .state()
        .current_list
        .as_ref()
        .map(|list| list.id.clone())
    else {
        controller.dispatch(Action::CloseShareDialog).await?;
        return Err(CliError::NoList);
    };

    let result = controller.dispatch(Action::SetPublic { id, public }).await;
    controller.dispatch(Action::CloseShareDialog).await?;
    result?;
    Ok(())
}

pub fn share_status<G: ListGateway, L: LocalStore>(
    controller: &Controller<G, L>,
    origin: Option<&str>,
) -> Result<String, CliError> {
    let list = controller
        .state()
        .current_list
        .as_ref()
        .ok_or(CliError::NoList)?;
    Ok(render_share_status(list, origin))
}

pub fn share_link<G: ListGateway, L: LocalStore>(
    controller: &Controller<G, L>,
    origin: Option<&str>,
) -> Result<String, CliError> {
    let list = controller
        .state()
        .current_list
        .as_ref()
        .ok_or(CliError::NoList)?;
    list.share_code
        .as_deref()
        .filter(|_| list.is_public)
        .map(|code| share_url(origin, code))
        .ok_or(CliError::NotShared)
}

pub async fn run_share<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    command: ShareCommands,
    origin: Option<&str>,
) -> Result<(), CliError> {
    match command {
        ShareCommands::On | ShareCommands::Off => {
            set_sharing(controller, command == ShareCommands::On).await?;
            println!("{}", share_status(controller, origin)?);
        }
        ShareCommands::Link => println!("{}", share_link(controller, origin)?),
    }
    Ok(())
}
