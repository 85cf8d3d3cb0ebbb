//! What a workflow step hands back to the presentation layer.

use serde::Serialize;

use crate::models::{Pet, Vet, VisitForm};
use crate::validation::ValidationErrors;

/// View for creating a visit (and redisplaying a rejected creation).
pub const VIEW_CREATE_OR_UPDATE_VISIT: &str = "pets/createOrUpdateVisitForm";
/// View for editing an existing visit.
pub const VIEW_EDIT_VISIT: &str = "pets/EditVisitForm";

/// A form to render, with everything the template needs.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    /// Template name
    pub view: &'static str,
    /// Values to pre-fill (submitted values when redisplaying)
    pub visit_form: VisitForm,
    /// Pet the visit belongs to
    pub pet: Pet,
    /// Choices for the vet selector
    pub vets: Vec<Vet>,
    /// Field errors, empty on first display
    pub errors: ValidationErrors,
}

impl FormView {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of processing a submitted form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Validation failed; show the form again.
    Render(FormView),
    /// Saved; send the client to this path.
    Redirect(String),
}
