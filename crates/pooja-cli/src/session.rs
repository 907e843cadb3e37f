//! Startup: profile, backend, auth and the controller that runs on them.

use std::path::PathBuf;

use pooja_core::auth::AuthState;
use pooja_core::config::{BackendConfig, SupabaseConfig};
use pooja_core::controller::{Action, Controller};
use pooja_core::gateway::{ListGateway, SupabaseListGateway};
use pooja_core::local::{FileLocalStore, LocalStore};
use pooja_core::share::parse_share_param;
use pooja_core::ListId;

use crate::auth::{profile_auth, viewer_for, AuthSession, ProfileAuth};
use crate::commands::common::{resolve_data_dir, resolve_list_id};
use crate::config_profiles::{resolve_backend_config, CliProfilesConfig};
use crate::error::CliError;

pub type AppController = Controller<SupabaseListGateway, FileLocalStore>;

/// Global options shared by every checklist command.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub profile: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub share: Option<String>,
    pub list: Option<String>,
}

pub struct Session {
    pub controller: AppController,
    pub profile_name: String,
    pub share_origin: Option<String>,
    supabase: Option<SupabaseConfig>,
    auth: Option<ProfileAuth>,
    auth_session: Option<AuthSession>,
}

impl Session {
    pub async fn open(options: SessionOptions) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load()?;
        let profile_name = config.resolve_profile_name(options.profile.as_deref());
        let backend = resolve_backend_config(config.profile(&profile_name))?;
        let data_dir = resolve_data_dir(options.data_dir)?;
        tracing::debug!("Using profile '{}' with data dir {}", profile_name, data_dir.display());

        let BackendConfig {
            supabase,
            share_origin,
        } = backend;

        let (auth, auth_session) = match &supabase {
            Some(supabase) => {
                let service = profile_auth(&profile_name, supabase)?;
                let restored = match service.restore_session().await {
                    Ok(restored) => restored,
                    Err(error) => {
                        tracing::warn!("Could not restore session; continuing signed out: {}", error);
                        None
                    }
                };
                (Some(service), restored)
            }
            None => (None, None),
        };

        let gateway = gateway_for(supabase.as_ref(), auth_session.as_ref())?;
        let mut session = Self {
            controller: Controller::new(gateway, FileLocalStore::new(data_dir)),
            profile_name,
            share_origin,
            supabase,
            auth,
            auth_session,
        };

        let share_code = options.share.as_deref().and_then(|input| {
            let code = parse_share_param(input);
            if code.is_none() {
                tracing::warn!("Ignoring share parameter without a code: {}", input);
            }
            code
        });
        let viewer = viewer_for(session.auth_session.as_ref());
        start_controller(&mut session.controller, share_code, viewer, options.list.as_deref())
            .await?;
        Ok(session)
    }

    pub fn is_signed_in(&self) -> bool {
        self.auth_session.is_some()
    }

    /// Sign out, drop the account's lists and fall back to the local list.
    pub async fn sign_out(&mut self) -> Result<(), CliError> {
        let Some(auth_session) = self.auth_session.take() else {
            return Ok(());
        };
        if let Some(service) = &self.auth {
            service
                .sign_out(&auth_session.access_token)
                .await?;
        }
        self.controller
            .set_gateway(gateway_for(self.supabase.as_ref(), None)?);
        self.controller
            .dispatch(Action::AuthResolved(AuthState::SignedOut))
            .await?;
        Ok(())
    }
}

fn gateway_for(
    supabase: Option<&SupabaseConfig>,
    auth_session: Option<&AuthSession>,
) -> Result<Option<SupabaseListGateway>, CliError> {
    let Some(supabase) = supabase else {
        return Ok(None);
    };
    let gateway = SupabaseListGateway::new(supabase).map_err(pooja_core::Error::from)?;
    Ok(Some(match auth_session {
        Some(auth_session) => gateway.with_access_token(auth_session.access_token.clone()),
        None => gateway,
    }))
}

/// Boot the controller and open the list the command should work on.
///
/// An explicit `--list` wins; otherwise a signed-in viewer without a shared
/// list lands on their most recently updated list.
pub async fn start_controller<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    share_code: Option<String>,
    viewer: AuthState,
    list: Option<&str>,
) -> Result<(), CliError> {
    controller.dispatch(Action::Boot { share_code }).await?;
    controller.dispatch(Action::AuthResolved(viewer)).await?;

    if controller.state().user().is_none() {
        if list.is_some() {
            return Err(pooja_core::Error::SignInRequired.into());
        }
        return Ok(());
    }

    if list.is_none() && controller.state().current_list.is_some() {
        return Ok(());
    }

    controller.dispatch(Action::RefreshLists).await?;
    let target: Option<ListId> = match list {
        Some(query) => Some(resolve_list_id(&controller.state().lists, query)?),
        None => controller.state().lists.first().map(|list| list.id.clone()),
    };
    if let Some(id) = target {
        controller.dispatch(Action::SelectList(id)).await?;
    }
    Ok(())
}
