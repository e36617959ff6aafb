//! Inventory item models

use std::fmt;

use serde::{Deserialize, Serialize};

/// A medicine record as returned by the inventory API.
///
/// Items are read-only display data. The client enforces no identity
/// invariant: two items may share a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Medicine name
    pub name: String,
    /// Storage location (shelf, cabinet, room)
    pub location: String,
    /// Manufacturer
    pub company: String,
}

impl Item {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            company: company.into(),
        }
    }

    /// One-line label shown in the suggestion dropdown.
    pub fn suggestion_label(&self) -> String {
        format!("{} — {}", self.name, self.location)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} located at {}",
            self.name, self.company, self.location
        )
    }
}

/// Payload for creating a new inventory item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub company: String,
    pub location: String,
}

impl NewItem {
    /// Returns a copy with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
        }
    }
}
