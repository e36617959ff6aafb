use crate::auth::{clear_stored_token, resolve_token, store_token, TokenSource, TOKEN_ENV_VAR};
use crate::cli::AuthCommands;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    match command {
        AuthCommands::SetToken { profile, token } => {
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            store_token(&profile_name, &token)?;
            println!("Stored API token for profile '{profile_name}'");
        }
        AuthCommands::Status { profile } => {
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            let source = resolve_token(&profile_name)?.map(|(_, source)| source);
            println!("{}", describe_token_status(&profile_name, source));
        }
        AuthCommands::Logout { profile } => {
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            clear_stored_token(&profile_name)?;
            println!("Removed stored token for profile '{profile_name}'");
        }
    }
    Ok(())
}

pub fn describe_token_status(profile_name: &str, source: Option<TokenSource>) -> String {
    match source {
        Some(TokenSource::Environment) => {
            format!("Profile '{profile_name}' uses the token from {TOKEN_ENV_VAR}")
        }
        Some(TokenSource::Keychain) => {
            format!("Profile '{profile_name}' has a token stored in the keychain")
        }
        None => format!(
            "Profile '{profile_name}' has no API token; requests are sent unauthenticated"
        ),
    }
}
