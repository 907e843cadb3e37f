//! Backend connection configuration.
//!
//! The hosted backend (Supabase) is a startup precondition: missing
//! credentials are fatal unless the backend has been explicitly disabled, in
//! which case the app runs local-only.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::util::{is_truthy, is_web_url, trimmed_non_empty};

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const SUPABASE_DISABLED_VAR: &str = "POOJA_SUPABASE_DISABLED";
pub const SHARE_ORIGIN_VAR: &str = "POOJA_SHARE_ORIGIN";

/// Upper bound on any single request to the hosted backend.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the gateway and the auth client.
pub(crate) fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Credentials for the hosted backend
#[derive(Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

/// Resolved runtime configuration for a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// `None` when online features are disabled and the app runs local-only.
    pub supabase: Option<SupabaseConfig>,
    /// Origin used to build share links.
    pub share_origin: Option<String>,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let share_origin = optional_http_url(&lookup, SHARE_ORIGIN_VAR)?;

        let disabled = lookup(SUPABASE_DISABLED_VAR).is_some_and(|value| is_truthy(&value));
        if disabled {
            return Ok(Self {
                supabase: None,
                share_origin,
            });
        }

        let url = required_trimmed(&lookup, SUPABASE_URL_VAR)?;
        if !is_web_url(&url) {
            return Err(ConfigError::Invalid(format!(
                "{SUPABASE_URL_VAR} must start with http:// or https://"
            )));
        }
        let anon_key = required_trimmed(&lookup, SUPABASE_ANON_KEY_VAR)?;

        Ok(Self {
            supabase: Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            share_origin,
        })
    }

    /// Local-only configuration with no backend.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            supabase: None,
            share_origin: None,
        }
    }

    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.supabase.is_some()
    }
}

fn required_trimmed(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    trimmed_non_empty(lookup(name)).ok_or(ConfigError::MissingVar(name))
}

fn optional_http_url(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<String>, ConfigError> {
    let Some(value) = trimmed_non_empty(lookup(name)) else {
        return Ok(None);
    };
    if is_web_url(&value) {
        Ok(Some(value.trim_end_matches('/').to_string()))
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must start with http:// or https://"
        )))
    }
}
