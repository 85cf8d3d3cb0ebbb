//! Pet models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::visit::Visit;

/// A pet belonging to an owner, with its visit history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    /// Database ID - `None` until first save
    pub id: Option<i64>,
    /// Pet name
    pub name: String,
    /// Date of birth
    pub birth_date: Option<NaiveDate>,
    /// Kind of animal (e.g., "cat", "dog", "hamster")
    pub pet_type: String,
    /// Owning owner's ID
    pub owner_id: i64,
    /// Visits ordered by date, then ID
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Pet {
    /// Create a new pet with required fields.
    pub fn new(name: String, pet_type: String, owner_id: i64) -> Self {
        Self {
            id: None,
            name,
            birth_date: None,
            pet_type,
            owner_id,
            visits: Vec::new(),
        }
    }

    /// Attach a visit to this pet and return it for saving.
    ///
    /// The visit's back-reference is set to this pet's ID.
    pub fn add_visit(&mut self, mut visit: Visit) -> &mut Visit {
        visit.pet_id = self.id;
        self.visits.push(visit);
        let last = self.visits.len() - 1;
        &mut self.visits[last]
    }

    /// Check whether this pet belongs to the given owner.
    pub fn is_owned_by(&self, owner_id: i64) -> bool {
        self.owner_id == owner_id
    }
}
