use std::io;

use pooja_core::auth::AuthError;
use pooja_core::config::ConfigError;
use thiserror::Error;

use crate::config_profiles::ProfileFileError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pooja_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("{0}. Run `pooja config init` or set POOJA_SUPABASE_DISABLED=true to stay local-only.")]
    Backend(#[from] ConfigError),
    #[error("No item text provided")]
    EmptyText,
    #[error("List title cannot be empty")]
    EmptyTitle,
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("List not found for id/prefix: {0}")]
    ListNotFound(String),
    #[error("{0}")]
    AmbiguousId(String),
    #[error("No saved list selected. Run `pooja new` or pass --list <ID>.")]
    NoList,
    #[error("Clearing needs confirmation; pass --yes")]
    ClearNotConfirmed,
    #[error("List is private. Run `pooja share on` first.")]
    NotShared,
    #[error("Unknown shell command: {0}. Type `help` for the list of commands.")]
    UnknownCommand(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Profiles(#[from] ProfileFileError),
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),
}
