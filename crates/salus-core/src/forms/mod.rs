//! Form state for the add-medicine and registration screens.
//!
//! Both forms follow the same shape: edit local state, validate, call the
//! inventory API, and keep a single inline message for the user.

mod medicine;
mod registration;

use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiResult, InventoryClient, SignUpReply};
use crate::models::{Item, NewItem, Registration};

pub use medicine::{
    MedicineForm, ADD_FAILED_MESSAGE, ADD_SUCCESS_MESSAGE, NETWORK_ERROR_MESSAGE,
};
pub use registration::{
    Redirect, RegistrationForm, RegistrationOutcome, LOGIN_PATH, LOGIN_REDIRECT_DELAY,
    REGISTRATION_FAILED_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE, USER_CREATED_MESSAGE,
};

/// User input problems. These are the only errors shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    MissingField(&'static str),
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Danger,
}

/// Inline message rendered above a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FormMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Danger,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == MessageKind::Success
    }
}

/// Endpoints used by the add-medicine form.
pub trait CatalogBackend: Send + Sync {
    fn list_companies(&self) -> impl Future<Output = ApiResult<Vec<String>>> + Send;
    fn list_locations(&self) -> impl Future<Output = ApiResult<Vec<String>>> + Send;
    fn create_item(&self, item: &NewItem)
        -> impl Future<Output = ApiResult<Option<Item>>> + Send;
}

/// Endpoint used by the registration form.
pub trait AccountBackend: Send + Sync {
    fn sign_up(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = ApiResult<SignUpReply>> + Send;
}

impl CatalogBackend for InventoryClient {
    fn list_companies(&self) -> impl Future<Output = ApiResult<Vec<String>>> + Send {
        Self::list_companies(self, CancellationToken::new())
    }

    fn list_locations(&self) -> impl Future<Output = ApiResult<Vec<String>>> + Send {
        Self::list_locations(self, CancellationToken::new())
    }

    fn create_item(
        &self,
        item: &NewItem,
    ) -> impl Future<Output = ApiResult<Option<Item>>> + Send {
        Self::create_item(self, item, CancellationToken::new())
    }
}

impl AccountBackend for InventoryClient {
    fn sign_up(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = ApiResult<SignUpReply>> + Send {
        Self::sign_up(self, registration, CancellationToken::new())
    }
}

/// Require a trimmed, non-empty value.
fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("  Acme ", "Company").unwrap(), "Acme");
        assert_eq!(
            required(" \t", "Company").unwrap_err().to_string(),
            "Company is required."
        );
    }

    #[test]
    fn form_message_kinds() {
        assert!(FormMessage::success("ok").is_success());
        assert!(!FormMessage::danger("no").is_success());
    }
}
