//! Veterinarian models.

use serde::{Deserialize, Serialize};

/// A veterinarian who can be assigned to visits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vet {
    /// Database ID - `None` until first save
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    /// Specialties (e.g., "radiology", "surgery"); empty for general practice
    pub specialties: Vec<String>,
}

impl Vet {
    /// Create a new vet with no specialties.
    pub fn new(first_name: String, last_name: String) -> Self {
        Self {
            id: None,
            first_name,
            last_name,
            specialties: Vec::new(),
        }
    }

    /// Display name for the vet selector.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
