//! API token persistence in the OS keychain.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;
use salus_core::util::normalize_text_option;

use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "salus-cli";

/// Environment variable that overrides any stored token.
pub const TOKEN_ENV_VAR: &str = "SALUS_TOKEN";

type TokenResult<T> = Result<T, CliError>;

/// Where the token used for a profile comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keychain,
}

#[derive(Clone)]
struct TokenStore {
    username: String,
}

impl TokenStore {
    fn new(profile_name: &str) -> Self {
        Self {
            username: format!("api_token:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> TokenResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(not(test))]
    fn load(&self) -> TokenResult<Option<String>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(token) => Ok(normalize_text_option(Some(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> TokenResult<Option<String>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    fn save(&self, token: &str) -> TokenResult<()> {
        self.entry()?
            .set_password(token)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, token: &str) -> TokenResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.insert(self.username.clone(), token.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> TokenResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> TokenResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

pub fn load_stored_token(profile_name: &str) -> TokenResult<Option<String>> {
    TokenStore::new(profile_name).load()
}

pub fn store_token(profile_name: &str, token: &str) -> TokenResult<()> {
    let token = normalize_text_option(Some(token.to_string()))
        .ok_or_else(|| CliError::Auth("Token cannot be empty".to_string()))?;
    TokenStore::new(profile_name).save(&token)
}

pub fn clear_stored_token(profile_name: &str) -> TokenResult<()> {
    TokenStore::new(profile_name).clear()
}

/// `SALUS_TOKEN` if set, otherwise the keychain entry for the profile.
pub fn resolve_token(profile_name: &str) -> TokenResult<Option<(String, TokenSource)>> {
    if let Some(token) = normalize_text_option(std::env::var(TOKEN_ENV_VAR).ok()) {
        return Ok(Some((token, TokenSource::Environment)));
    }
    Ok(load_stored_token(profile_name)?.map(|token| (token, TokenSource::Keychain)))
}
