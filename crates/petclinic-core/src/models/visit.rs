//! Visit models: the persisted visit record and the form used to edit it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar date pattern accepted by visit forms (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single clinic appointment for a pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// Server-assigned ID - `None` until first save, never taken from form input
    pub id: Option<i64>,
    /// Owning pet's ID - set when the visit is attached to a pet
    pub pet_id: Option<i64>,
    /// Visit date
    pub date: NaiveDate,
    /// What the visit is for
    pub description: String,
    /// Attending vet's ID
    pub vet_id: i64,
    /// Soft-cancel marker: `true` once the visit has been cancelled
    pub active: bool,
}

impl Visit {
    /// Create a new, unattached visit.
    pub fn new(date: NaiveDate, description: String, vet_id: i64) -> Self {
        Self {
            id: None,
            pet_id: None,
            date,
            description,
            vet_id,
            active: false,
        }
    }

    /// Check if this visit has been saved.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// User input for creating or editing a visit.
///
/// Field names follow the HTML form (`date`, `description`, `vetId`). There is
/// deliberately no `id` field: a submitted `id` is dropped during binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitForm {
    /// Raw date text as submitted, expected as `yyyy-MM-dd`
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    /// Raw vet selector value; parsed to an ID during validation
    #[serde(default)]
    pub vet_id: String,
}

impl VisitForm {
    /// Pre-fill a form from an existing visit.
    pub fn from_visit(visit: &Visit) -> Self {
        Self {
            date: visit.date.format(DATE_FORMAT).to_string(),
            description: visit.description.clone(),
            vet_id: visit.vet_id.to_string(),
        }
    }
}
