//! Error types for salus-core

use thiserror::Error;

pub use crate::api::ApiError;
pub use crate::forms::ValidationError;

/// Result type alias using salus-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in salus-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Inventory API error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// User input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The search controller has been torn down
    #[error("Search controller is no longer running")]
    ControllerClosed,
}
