//! Data models for Salus

mod item;
mod registration;
mod route;

pub use item::{Item, NewItem};
pub use registration::Registration;
pub use route::{ResultsRoute, RESULTS_PATH};
