//! salus-core - Core library for Salus
//!
//! This crate contains the inventory models, the HTTP client for the remote
//! inventory API, the incremental search controller, and the form state used
//! by every Salus interface.

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod results;
pub mod search;
pub mod util;

pub use error::{Error, Result};
pub use models::{Item, NewItem, Registration, ResultsRoute};
