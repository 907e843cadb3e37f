//! Per-profile sign-in sessions kept in the OS keychain.

use pooja_core::auth::{AuthClient, AuthResult, AuthState, SessionPersistence};
pub use pooja_core::auth::{AuthError, AuthSession};
use pooja_core::config::SupabaseConfig;

const KEYRING_SERVICE: &str = "pooja-cli";

/// Keychain entry `pooja-cli` / `session:<profile>` holding the session JSON.
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    account: String,
}

impl KeyringSessionStore {
    pub fn for_profile(profile_name: &str) -> Self {
        Self {
            account: format!("session:{profile_name}"),
        }
    }
}

impl SessionPersistence for KeyringSessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        secret::read(&self.account)?
            .map(|raw| serde_json::from_str(&raw).map_err(AuthError::from))
            .transpose()
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        secret::write(&self.account, &serde_json::to_string(session)?)
    }

    fn clear_session(&self) -> AuthResult<()> {
        secret::delete(&self.account)
    }
}

#[cfg(not(test))]
mod secret {
    use keyring::Entry;

    use super::{AuthError, AuthResult, KEYRING_SERVICE};

    fn entry(account: &str) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE, account).map_err(storage_error)
    }

    #[allow(clippy::needless_pass_by_value)]
    fn storage_error(error: keyring::Error) -> AuthError {
        AuthError::SecureStorage(error.to_string())
    }

    pub fn read(account: &str) -> AuthResult<Option<String>> {
        match entry(account)?.get_password() {
            Ok(raw) => Ok(Some(raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(storage_error(error)),
        }
    }

    pub fn write(account: &str, raw: &str) -> AuthResult<()> {
        entry(account)?.set_password(raw).map_err(storage_error)
    }

    pub fn delete(account: &str) -> AuthResult<()> {
        match entry(account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(storage_error(error)),
        }
    }
}


/// Auth client bound to one profile's keychain entry.
pub type ProfileAuth = AuthClient<KeyringSessionStore>;

pub fn profile_auth(profile_name: &str, config: &SupabaseConfig) -> AuthResult<ProfileAuth> {
    AuthClient::new(config, KeyringSessionStore::for_profile(profile_name))
}

/// Viewer identity for a restored session, or signed out.
pub fn viewer_for(session: Option<&AuthSession>) -> AuthState {
    session.map(|session| session.user.clone()).into()
}

pub fn load_stored_session(profile_name: &str) -> AuthResult<Option<AuthSession>> {
    KeyringSessionStore::for_profile(profile_name).load_session()
}

pub fn clear_stored_session(profile_name: &str) -> AuthResult<()> {
    KeyringSessionStore::for_profile(profile_name).clear_session()
}
