use std::env;

use salus_core::api::InventoryClient;
use salus_core::config::ClientConfig;
use salus_core::results::EMPTY_RESULTS_MESSAGE;
use salus_core::{Item, ResultsRoute};

use crate::auth::resolve_token;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

/// Environment variable that overrides the profile's API base URL.
pub const BASE_URL_ENV_VAR: &str = "SALUS_API_BASE_URL";

/// Client configuration and token resolved for one invocation.
pub struct CliContext {
    pub config: ClientConfig,
    token: Option<String>,
}

impl CliContext {
    pub fn load(global_profile: Option<&str>) -> Result<Self, CliError> {
        let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = profiles.resolve_profile_name(global_profile);
        let config = profiles
            .profile(&profile_name)
            .cloned()
            .unwrap_or_default()
            .client_config(env::var(BASE_URL_ENV_VAR).ok())?;
        let token = resolve_token(&profile_name)?.map(|(token, _)| token);

        tracing::debug!(
            "Using profile '{}' against {}",
            profile_name,
            config.api_base_url
        );
        Ok(Self { config, token })
    }

    /// Build a client. The token is captured here and never refreshed.
    pub fn client(&self) -> Result<InventoryClient, CliError> {
        Ok(InventoryClient::new(&self.config, self.token.clone())?)
    }
}

/// Join CLI words into a results route, rejecting blank queries.
pub fn normalize_search_query(parts: &[String]) -> Result<ResultsRoute, CliError> {
    ResultsRoute::for_query(&parts.join(" ")).ok_or(CliError::EmptySearchQuery)
}

pub fn format_item_lines(items: &[Item]) -> Vec<String> {
    if items.is_empty() {
        return vec![EMPTY_RESULTS_MESSAGE.to_string()];
    }
    items.iter().map(ToString::to_string).collect()
}

pub fn format_suggestion_lines(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| format!("{:>3}. {}", index + 1, item.suggestion_label()))
        .collect()
}
