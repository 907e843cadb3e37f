use std::env;

use pooja_core::config::{SHARE_ORIGIN_VAR, SUPABASE_ANON_KEY_VAR, SUPABASE_URL_VAR};

use crate::cli::ConfigCommands;
use crate::config_profiles::{is_web_url, trimmed_non_empty, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let ConfigCommands::Init {
        profile,
        supabase_url,
        supabase_anon_key,
        share_origin,
        offline,
        online,
        no_activate,
    } = command;

    let mut config = CliProfilesConfig::load()?;
    let name = config.resolve_profile_name(profile.as_deref().or(global_profile));
    let update = ProfileUpdate {
        supabase_url,
        supabase_anon_key,
        share_origin,
        // clap keeps the two flags exclusive
        offline: (offline || online).then_some(offline),
    };
    apply_profile_update(&mut config, &name, update, |var| env::var(var).ok())?;
    if !no_activate {
        config.active_profile = Some(name.clone());
    }

    let path = config.save()?;
    println!("Profile '{name}' initialized at {}", path.display());
    if let Some(profile) = config.profile(&name) {
        println!("{}", readiness(&name, profile));
    }
    Ok(())
}

fn readiness(name: &str, profile: &CliProfile) -> String {
    if profile.offline {
        return format!("Profile '{name}' keeps lists on this device only.");
    }
    match missing_fields(profile).as_slice() {
        [] => format!(
            "Profile '{name}' is ready. Run `pooja auth login --email <email> --password <password>` to use saved lists."
        ),
        missing => format!("Profile '{name}' is missing: {}", missing.join(", ")),
    }
}

/// Values given on the command line; `None` keeps what is already there.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub share_origin: Option<String>,
    pub offline: Option<bool>,
}

impl ProfileUpdate {
    /// Each field: the flag, else the environment, else the stored value.
    fn merge_onto(
        self,
        stored: CliProfile,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> CliProfile {
        let pick = |flag: Option<String>, var: &str, stored: Option<String>| {
            trimmed_non_empty(flag)
                .or_else(|| trimmed_non_empty(env_lookup(var)))
                .or(stored)
        };
        CliProfile {
            supabase_url: pick(self.supabase_url, SUPABASE_URL_VAR, stored.supabase_url),
            supabase_anon_key: pick(
                self.supabase_anon_key,
                SUPABASE_ANON_KEY_VAR,
                stored.supabase_anon_key,
            ),
            share_origin: pick(self.share_origin, SHARE_ORIGIN_VAR, stored.share_origin),
            offline: self.offline.unwrap_or(stored.offline),
        }
    }
}

/// Merge `update` into the named profile. Nothing changes if a URL is invalid.
pub fn apply_profile_update(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    update: ProfileUpdate,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), CliError> {
    let stored = config.profile(profile_name).cloned().unwrap_or_default();
    let merged = update.merge_onto(stored, env_lookup);

    for (field, value) in [
        ("supabase_url", &merged.supabase_url),
        ("share_origin", &merged.share_origin),
    ] {
        if value.as_deref().is_some_and(|url| !is_web_url(url)) {
            return Err(CliError::Config(format!(
                "{field} must be an http:// or https:// URL"
            )));
        }
    }

    config.set_profile(profile_name, merged);
    Ok(())
}

/// Credentials a hosted profile still lacks.
pub fn missing_fields(profile: &CliProfile) -> Vec<&'static str> {
    [
        ("supabase_url", profile.supabase_url.is_none()),
        ("supabase_anon_key", profile.supabase_anon_key.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, missing)| missing.then_some(field))
    .collect()
}
