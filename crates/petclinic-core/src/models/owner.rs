//! Owner models.

use serde::{Deserialize, Serialize};

/// A pet owner (clinic client).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    /// Database ID - `None` until first save
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
}

impl Owner {
    /// Create a new owner with required fields.
    pub fn new(first_name: String, last_name: String) -> Self {
        Self {
            id: None,
            first_name,
            last_name,
            address: String::new(),
            city: String::new(),
            telephone: String::new(),
        }
    }

    /// Path of the owner's detail page, where visit forms redirect to.
    pub fn details_path(owner_id: i64) -> String {
        format!("/owners/{}", owner_id)
    }
}
