//! Viewer identity and the Supabase auth client.

mod client;

use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::{auth_base_url, AuthClient};

use crate::util::{error_snippet, now_unix_seconds};

/// Sessions this close to expiry are refreshed before use.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Profile of the signed-in viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Identity resolution as seen by the view-state controller.
///
/// `Pending` is distinct from `SignedOut`: nothing may be hydrated until the
/// provider has answered, otherwise a returning user would briefly see the
/// anonymous list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Pending,
    SignedOut,
    SignedIn(AuthUser),
}

impl AuthState {
    #[must_use]
    pub const fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Pending | Self::SignedOut => None,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_signed_out(&self) -> bool {
        matches!(self, Self::SignedOut)
    }
}

impl From<Option<AuthUser>> for AuthState {
    fn from(value: Option<AuthUser>) -> Self {
        value.map_or(Self::SignedOut, Self::SignedIn)
    }
}

/// Tokens for a signed-in viewer; `expires_at` is in Unix seconds.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.expires_at - EXPIRY_SKEW_SECONDS <= now_unix_seconds()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("user", &self.user.id)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Sign-in is unavailable: this profile has no Supabase backend")]
    NotConfigured,
    #[error("Sign-in settings are invalid: {0}")]
    InvalidConfiguration(&'static str),
    #[error("Could not reach the sign-in service: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected sign-in payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Sign-in rejected: {0}")]
    Api(String),
    #[error("OS keychain unavailable: {0}")]
    SecureStorage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Where a client keeps its session between runs.
pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// Error body shapes returned by GoTrue and PostgREST.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    hint: Option<String>,
}

/// Human-readable message for a failed Supabase response, with its status.
pub(crate) fn describe_api_error(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|body| {
            body.message
                .or(body.msg)
                .or(body.error_description)
                .or(body.error)
                .map(|message| match body.hint {
                    Some(hint) => format!("{} ({hint})", message.trim()),
                    None => message.trim().to_string(),
                })
        })
        .unwrap_or_else(|| error_snippet(body));

    if message.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{message} [{}]", status.as_u16())
    }
}
