//! Account registration form.

use std::time::Duration;

use super::{required, AccountBackend, FormMessage, ValidationError};
use crate::api::ApiError;
use crate::models::Registration;

/// Reply `message` the signup endpoint sends on success.
pub const USER_CREATED_MESSAGE: &str = "user created";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server.";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const LOGIN_PATH: &str = "/login";
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Deferred navigation after a successful signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub path: &'static str,
    pub after: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created {
        username: String,
        message: FormMessage,
        redirect: Redirect,
    },
    Rejected(FormMessage),
}

impl RegistrationOutcome {
    pub const fn message(&self) -> &FormMessage {
        match self {
            Self::Created { message, .. } | Self::Rejected(message) => message,
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Build the signup payload. Passwords are compared verbatim and sent untrimmed.
    pub fn validate(&self) -> Result<Registration, ValidationError> {
        if self.password != self.repeat_password {
            return Err(ValidationError::PasswordMismatch);
        }
        let username = required(&self.username, "Username")?;
        let email = required(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("Password"));
        }
        if !looks_like_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Registration {
            username,
            email,
            password: self.password.clone(),
        })
    }

    pub async fn submit<B: AccountBackend>(&self, backend: &B) -> RegistrationOutcome {
        let registration = match self.validate() {
            Ok(registration) => registration,
            Err(error) => {
                return RegistrationOutcome::Rejected(FormMessage::danger(error.to_string()))
            }
        };

        match backend.sign_up(&registration).await {
            Ok(reply) if reply.message.as_deref() == Some(USER_CREATED_MESSAGE) => {
                let username = reply.username.unwrap_or(registration.username);
                tracing::info!("Registered user {}", username);
                RegistrationOutcome::Created {
                    message: FormMessage::success(format!(
                        "User \"{username}\" created successfully! Redirecting to login..."
                    )),
                    username,
                    redirect: Redirect {
                        path: LOGIN_PATH,
                        after: LOGIN_REDIRECT_DELAY,
                    },
                }
            }
            Ok(reply) => {
                tracing::warn!("Unexpected signup reply: {:?}", reply.message);
                RegistrationOutcome::Rejected(FormMessage::danger(UNEXPECTED_RESPONSE_MESSAGE))
            }
            Err(error) => {
                tracing::error!("Registration failed: {}", error);
                let text = match error {
                    ApiError::Status {
                        message: Some(message),
                        ..
                    } => message,
                    _ => REGISTRATION_FAILED_MESSAGE.to_string(),
                };
                RegistrationOutcome::Rejected(FormMessage::danger(text))
            }
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
}
