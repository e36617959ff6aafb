//! Incremental search for the inventory header.
//!
//! Keystrokes are debounced, each lookup carries its own cancellation token,
//! and only the most recently issued lookup may change what the dropdown
//! shows. The [`SearchController`] runs as a single task that owns all
//! query state; UI code talks to it through a [`SearchHandle`].

mod controller;

use std::time::Duration;

use crate::config::{
    ClientConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_SUGGESTION_LIMIT, DEFAULT_VISIBILITY_THRESHOLD,
};
use crate::models::{Item, ResultsRoute};

pub use controller::{SearchController, SearchHandle};

/// Timing and size knobs of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Quiet period before a lookup is issued
    pub debounce: Duration,
    /// Suggestions require strictly more trimmed characters than this
    pub visibility_threshold: usize,
    /// Maximum items requested per lookup
    pub suggestion_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl From<&ClientConfig> for SearchSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            debounce: config.debounce(),
            visibility_threshold: config.visibility_threshold,
            suggestion_limit: config.suggestion_limit,
        }
    }
}

impl SearchSettings {
    /// Whether `text` is long enough to show suggestions for.
    pub fn qualifies(&self, text: &str) -> bool {
        crate::util::trimmed_char_count(text) > self.visibility_threshold
    }
}

/// Lookup lifecycle of a controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupPhase {
    /// Nothing scheduled or running
    #[default]
    Idle,
    /// Debounce timer armed
    Pending,
    /// A lookup request is running
    InFlight,
    /// Torn down; no further state changes
    Cancelled,
}

/// Observable state of a controller, published after every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSnapshot {
    /// Displayed input text, stored verbatim
    pub text: String,
    /// Most recent successful lookup result
    pub suggestions: Vec<Item>,
    /// Whether the dropdown is shown
    pub visible: bool,
    /// Whether a lookup is in flight
    pub loading: bool,
    pub phase: LookupPhase,
}

/// Notifications for the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    LookupIssued { request_id: u64, query: String },
    SuggestionsUpdated { query: String, suggestions: Vec<Item> },
    /// Diagnostic channel for failed lookups; never shown to the user
    LookupFailed { query: String, error: String },
    Navigate(ResultsRoute),
    Dismissed,
}

/// Where a pointer-down landed, relative to the controller's regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    Dropdown,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// UI events that may dismiss the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissSignal {
    PointerDown(PointerTarget),
    KeyDown(Key),
}

impl DismissSignal {
    /// Pointer-down outside the input and dropdown, or the cancel key.
    pub const fn dismisses(self) -> bool {
        matches!(
            self,
            Self::PointerDown(PointerTarget::Outside) | Self::KeyDown(Key::Escape)
        )
    }
}
