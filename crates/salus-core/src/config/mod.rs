//! Client configuration shared by every Salus interface.
//!
//! `ClientConfig` carries the inventory API endpoint together with the tuning
//! knobs of the incremental search controller. Values are validated on
//! construction so downstream code can rely on a normalized base URL.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Inventory backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://salusback.geareab.com";

/// Quiet period after the last keystroke before a lookup is issued.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Suggestions appear only once the trimmed query is longer than this.
pub const DEFAULT_VISIBILITY_THRESHOLD: usize = 3;

/// Maximum number of items requested per lookup.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Which payload field carries an item's manufacturer.
///
/// Backend revisions disagree on the name, so the client reads whichever one
/// is configured. `Either` prefers `company` and falls back to `company_name`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyField {
    Company,
    CompanyName,
    #[default]
    Either,
}

impl CompanyField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::CompanyName => "company_name",
            Self::Either => "either",
        }
    }
}

impl fmt::Display for CompanyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyField {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "company_name" | "company-name" => Ok(Self::CompanyName),
            "either" => Ok(Self::Either),
            other => Err(Error::Config(format!(
                "unknown company field '{other}' (expected company, company_name or either)"
            ))),
        }
    }
}

/// Runtime configuration for the inventory client and search controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub api_base_url: String,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: usize,
    #[serde(default)]
    pub company_field: CompanyField,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            company_field: CompanyField::default(),
        }
    }
}

impl ClientConfig {
    /// Build a config for the given API base URL with default tuning.
    pub fn new(api_base_url: impl Into<String>) -> Result<Self> {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
        .validated()
    }

    /// Normalize the base URL and reject unusable tuning values.
    pub fn validated(mut self) -> Result<Self> {
        self.api_base_url = normalize_base_url(&self.api_base_url)?;
        if self.suggestion_limit == 0 {
            return Err(Error::Config(
                "suggestion_limit must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse a config from its JSON representation.
    pub fn from_json(payload: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(payload)?;
        config.validated()
    }
}

/// Trim a base URL, require an http(s) scheme, and strip trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let value = normalize_text_option(Some(raw.to_string()))
        .ok_or_else(|| Error::Config("API base URL must not be empty".to_string()))?;
    if !is_http_url(&value) {
        return Err(Error::Config(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

const fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

const fn default_visibility_threshold() -> usize {
    DEFAULT_VISIBILITY_THRESHOLD
}
