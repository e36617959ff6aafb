use std::env;

use salus_core::config::CompanyField;
use salus_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::commands::common::BASE_URL_ENV_VAR;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

/// Values passed to `config init`. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub api_base_url: Option<String>,
    pub suggestion_limit: Option<usize>,
    pub debounce_ms: Option<u64>,
    pub visibility_threshold: Option<usize>,
    pub company_field: Option<CompanyField>,
}

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            suggestion_limit,
            debounce_ms,
            visibility_threshold,
            company_field,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            ProfileUpdate {
                api_base_url,
                suggestion_limit,
                debounce_ms,
                visibility_threshold,
                company_field,
            },
            no_activate,
        ),
        ConfigCommands::Show { profile } => run_config_show(profile.as_deref().or(global_profile)),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    update: ProfileUpdate,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged = merge_profile(existing, update)?;
    *config.profile_mut_or_default(&profile_name) = merged;
    if !no_activate || config.active_profile.is_none() {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Saved profile '{}' to {}", profile_name, path.display());
    if config.active_profile.as_deref() == Some(profile_name.as_str()) {
        println!("Active profile: {profile_name}");
    }
    Ok(())
}

/// Apply explicit values over a stored profile and check the result is usable.
pub fn merge_profile(existing: CliProfile, update: ProfileUpdate) -> Result<CliProfile, CliError> {
    let merged = CliProfile {
        api_base_url: normalize_text_option(update.api_base_url).or(existing.api_base_url),
        suggestion_limit: update.suggestion_limit.or(existing.suggestion_limit),
        debounce_ms: update.debounce_ms.or(existing.debounce_ms),
        visibility_threshold: update.visibility_threshold.or(existing.visibility_threshold),
        company_field: update.company_field.or(existing.company_field),
    };
    let validated = merged.client_config(None)?;
    Ok(CliProfile {
        api_base_url: merged.api_base_url.map(|_| validated.api_base_url),
        ..merged
    })
}

fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let effective = profile.client_config(env::var(BASE_URL_ENV_VAR).ok())?;

    println!("Profile: {profile_name}");
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}
