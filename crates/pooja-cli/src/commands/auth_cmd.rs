use chrono::DateTime;
use pooja_core::auth::AuthSession;
use pooja_core::config::SupabaseConfig;

use crate::auth::{clear_stored_session, load_stored_session, profile_auth, AuthError};
use crate::cli::AuthCommands;
use crate::config_profiles::{resolve_backend_config, CliProfilesConfig};
use crate::error::CliError;

impl AuthCommands {
    fn profile(&self) -> Option<&str> {
        match self {
            Self::Login { profile, .. } | Self::Status { profile } | Self::Logout { profile } => {
                profile.as_deref()
            }
        }
    }
}

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(command.profile().or(global_profile));

    match command {
        AuthCommands::Login {
            email, password, ..
        } => login(&config, &profile_name, &email, &password).await,
        AuthCommands::Status { .. } => status(&config, &profile_name).await,
        AuthCommands::Logout { .. } => logout(&config, &profile_name).await,
    }
}

/// Supabase credentials for `profile_name`; `None` for a local-only profile.
fn backend_for(
    config: &CliProfilesConfig,
    profile_name: &str,
) -> Result<Option<SupabaseConfig>, CliError> {
    Ok(resolve_backend_config(config.profile(profile_name))?.supabase)
}

async fn login(
    config: &CliProfilesConfig,
    profile_name: &str,
    email: &str,
    password: &str,
) -> Result<(), CliError> {
    let supabase = backend_for(config, profile_name)?.ok_or(AuthError::NotConfigured)?;
    let session = profile_auth(profile_name, &supabase)?
        .sign_in(email, password)
        .await?;
    println!(
        "Signed in profile '{profile_name}' as {} <{}>",
        session.user.name, session.user.email
    );
    Ok(())
}

async fn status(config: &CliProfilesConfig, profile_name: &str) -> Result<(), CliError> {
    let session = match backend_for(config, profile_name) {
        Ok(Some(supabase)) => profile_auth(profile_name, &supabase)?.restore_session().await?,
        Ok(None) => {
            println!("Profile '{profile_name}' is local-only; lists stay on this device.");
            return Ok(());
        }
        Err(error) => {
            tracing::debug!("No backend for profile '{}': {}", profile_name, error);
            load_stored_session(profile_name)?
        }
    };

    match session {
        Some(session) => println!(
            "Profile '{profile_name}' is signed in as {} ({})",
            session.user.email,
            expiry_label(&session)
        ),
        None => println!("Profile '{profile_name}' is not signed in."),
    }
    Ok(())
}

async fn logout(config: &CliProfilesConfig, profile_name: &str) -> Result<(), CliError> {
    let stored = load_stored_session(profile_name)?;
    let supabase = backend_for(config, profile_name).ok().flatten();

    match (supabase, stored) {
        (Some(supabase), Some(session)) => {
            profile_auth(profile_name, &supabase)?
                .sign_out(&session.access_token)
                .await?;
        }
        _ => clear_stored_session(profile_name)?,
    }

    println!("Signed out profile '{profile_name}'");
    Ok(())
}

fn expiry_label(session: &AuthSession) -> String {
    DateTime::from_timestamp(session.expires_at, 0).map_or_else(
        || format!("expires_at={}", session.expires_at),
        |expires| format!("session valid until {}", expires.format("%Y-%m-%d %H:%M UTC")),
    )
}
