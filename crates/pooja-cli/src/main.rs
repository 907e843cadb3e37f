//! Pooja List CLI - a ritual-preparation checklist in the terminal
//!
//! Anonymous lists stay on this device; signed-in users keep lists in their
//! account and can share them read-only.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
mod render;
mod session;
mod shell;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::items::{
    run_add, run_clear, run_delete, run_edit, run_rename, run_save, run_show, run_toggle,
};
use crate::commands::lists::{run_lists, run_new, run_remove_list};
use crate::commands::share::run_share;
use crate::error::CliError;
use crate::session::{Session, SessionOptions};
use crate::shell::run_shell;

const DEFAULT_LOG_DIRECTIVE: &str = "pooja=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = SessionOptions {
        profile: cli.profile.clone(),
        data_dir: cli.data_dir,
        share: cli.share,
        list: cli.list,
    };
    let global_profile = cli.profile.as_deref();

    let command = match cli.command {
        Some(Commands::Config { command }) => return run_config(command, global_profile),
        Some(Commands::Auth { command }) => return run_auth(command, global_profile).await,
        Some(Commands::Completions { shell, output }) => {
            return run_completions(shell, output.as_deref());
        }
        other => other,
    };

    let mut session = Session::open(options).await?;
    if matches!(command, Some(Commands::Shell)) {
        return run_shell(&mut session).await;
    }
    let origin = session.share_origin.clone();
    let controller = &mut session.controller;

    match command {
        None | Some(Commands::Show) => run_show(controller),
        Some(Commands::Add { text }) => run_add(controller, &text).await?,
        Some(Commands::Toggle { item }) => run_toggle(controller, &item).await?,
        Some(Commands::Edit { item, text }) => run_edit(controller, &item, &text).await?,
        Some(Commands::Delete { item }) => run_delete(controller, &item).await?,
        Some(Commands::Clear { yes }) => run_clear(controller, yes).await?,
        Some(Commands::Rename { title }) => run_rename(controller, &title).await?,
        Some(Commands::Save) => run_save(controller).await?,
        Some(Commands::Lists { json }) => run_lists(controller, json).await?,
        Some(Commands::New) => run_new(controller).await?,
        Some(Commands::RemoveList { id }) => run_remove_list(controller, &id).await?,
        Some(Commands::Share { command }) => {
            run_share(controller, command, origin.as_deref()).await?;
        }
        Some(Commands::Export { format, output }) => {
            run_export(controller.state(), format, output.as_deref())?;
        }
        Some(
            Commands::Shell
            | Commands::Config { .. }
            | Commands::Auth { .. }
            | Commands::Completions { .. },
        ) => {}
    }

    Ok(())
}
