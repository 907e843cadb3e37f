//! Error types for pooja-core

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::gateway::GatewayError;

/// Result type alias using pooja-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pooja-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote list store error
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Identity provider error
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Backend configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The local fallback slot holds content that is not a valid snapshot
    #[error("Local slot '{key}' is corrupt: {reason}")]
    CorruptLocalSlot { key: String, reason: String },

    /// List or item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Mutation attempted on a list the viewer does not own
    #[error("List is read-only for this viewer")]
    ReadOnly,

    /// Operation needs an authenticated viewer
    #[error("Sign in to use online lists")]
    SignInRequired,

    /// Operation needs the hosted backend, which is disabled
    #[error("Online features are disabled; lists are kept locally")]
    Offline,
}
