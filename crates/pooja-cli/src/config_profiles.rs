//! Named backend profiles stored in `<config dir>/pooja/profiles.json`.

use std::collections::BTreeMap;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

use pooja_core::config::{
    BackendConfig, ConfigError, SHARE_ORIGIN_VAR, SUPABASE_ANON_KEY_VAR, SUPABASE_DISABLED_VAR,
    SUPABASE_URL_VAR,
};
pub use pooja_core::util::{is_web_url, trimmed_non_empty};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const PROFILE_ENV_VAR: &str = "POOJA_PROFILE";
pub const DEFAULT_PROFILE: &str = "default";
const PROFILES_FILE: &str = "profiles.json";
const FILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProfileFileError {
    #[error("No config directory is available on this system")]
    NoConfigDir,
    #[error("Cannot read profiles from {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Profiles file {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Cannot write profiles to {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Cannot encode profiles: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Every profile known to this machine plus the one `config init` last activated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CliProfilesConfig {
    pub version: u32,
    #[serde(deserialize_with = "trimmed")]
    pub active_profile: Option<String>,
    pub profiles: BTreeMap<String, CliProfile>,
}

impl Default for CliProfilesConfig {
    fn default() -> Self {
        Self {
            version: FILE_VERSION,
            active_profile: None,
            profiles: BTreeMap::new(),
        }
    }
}

/// Backend settings for one profile. Blank values are dropped on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CliProfile {
    #[serde(deserialize_with = "trimmed", skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<String>,
    #[serde(deserialize_with = "trimmed", skip_serializing_if = "Option::is_none")]
    pub supabase_anon_key: Option<String>,
    #[serde(deserialize_with = "trimmed", skip_serializing_if = "Option::is_none")]
    pub share_origin: Option<String>,
    /// Never contact the hosted backend.
    pub offline: bool,
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(trimmed_non_empty)
}

pub fn config_path() -> Result<PathBuf, ProfileFileError> {
    dirs::config_dir()
        .map(|dir| dir.join("pooja").join(PROFILES_FILE))
        .ok_or(ProfileFileError::NoConfigDir)
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, ProfileFileError> {
        Self::load_from(&config_path()?)
    }

    /// A missing file is an empty configuration.
    pub fn load_from(path: &Path) -> Result<Self, ProfileFileError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ProfileFileError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| ProfileFileError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to the default location and return where it went.
    pub fn save(&self) -> Result<PathBuf, ProfileFileError> {
        let path = config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ProfileFileError> {
        let encoded = serde_json::to_string_pretty(self)?;
        let write_error = |source: io::Error| ProfileFileError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(write_error)?;
        }
        std::fs::write(path, encoded).map_err(write_error)
    }

    /// First non-blank of: `explicit`, `POOJA_PROFILE`, the active profile, `default`.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .into_iter()
            .chain(env::var(PROFILE_ENV_VAR).ok())
            .chain(self.active_profile.clone())
            .map(|name| name.trim().to_string())
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn set_profile(&mut self, name: &str, profile: CliProfile) {
        self.profiles.insert(name.to_string(), profile);
    }
}

impl CliProfile {
    /// The profile's value for one of the backend environment variables.
    pub fn lookup(&self, var: &str) -> Option<String> {
        let value = match var {
            SUPABASE_URL_VAR => self.supabase_url.as_deref(),
            SUPABASE_ANON_KEY_VAR => self.supabase_anon_key.as_deref(),
            SHARE_ORIGIN_VAR => self.share_origin.as_deref(),
            SUPABASE_DISABLED_VAR if self.offline => Some("true"),
            _ => None,
        };
        value.map(str::to_string)
    }
}

pub fn resolve_backend_config(profile: Option<&CliProfile>) -> Result<BackendConfig, ConfigError> {
    resolve_backend_config_with(profile, |var| env::var(var).ok())
}

/// Backend settings where a non-blank environment value beats the profile's.
pub fn resolve_backend_config_with(
    profile: Option<&CliProfile>,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<BackendConfig, ConfigError> {
    BackendConfig::from_lookup(|var| {
        trimmed_non_empty(env_lookup(var)).or_else(|| profile?.lookup(var))
    })
}
