//! Visit workflow: create, edit and cancel a pet's visits through a form.
//!
//! Flow: blank form → submit → validate → attach to pet → save → redirect to
//! the owner page. A rejected submission is redisplayed with its field errors
//! and nothing is saved.

mod view;

pub use view::*;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::{Database, DbError};
use crate::models::{Owner, Pet, Vet, Visit, VisitForm};
use crate::repository::{PetRepository, VetRepository, VisitRepository};
use crate::validation::{
    validate_visit_form, FieldError, ValidVisit, ValidationErrors, CODE_UNKNOWN_VET, FIELD_VET_ID,
};

/// Workflow errors. Validation failures are not errors; see [`FormOutcome::Render`].
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Pet {pet_id} not found for owner {owner_id}")]
    PetNotFound { owner_id: i64, pet_id: i64 },

    #[error("Visit {visit_id} not found for pet {pet_id}")]
    VisitNotFound { pet_id: i64, visit_id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Find the first visit with the given ID.
pub fn find_visit(visits: &[Visit], visit_id: i64) -> Option<&Visit> {
    visits.iter().find(|visit| visit.id == Some(visit_id))
}

/// Handles the visit form pages for one request.
pub struct VisitWorkflow<'a> {
    pets: &'a dyn PetRepository,
    vets: &'a dyn VetRepository,
    visits: &'a dyn VisitRepository,
}

impl<'a> VisitWorkflow<'a> {
    /// Create a workflow backed by a single database.
    pub fn new(db: &'a Database) -> Self {
        Self::with_repositories(db, db, db)
    }

    /// Create a workflow over separate repositories.
    pub fn with_repositories(
        pets: &'a dyn PetRepository,
        vets: &'a dyn VetRepository,
        visits: &'a dyn VisitRepository,
    ) -> Self {
        Self { pets, vets, visits }
    }

    /// All vets, for the vet selector.
    pub fn all_vets(&self) -> WorkflowResult<Vec<Vet>> {
        Ok(self.vets.find_all()?)
    }

    /// Show an empty form for a new visit.
    pub fn init_new_visit_form(&self, owner_id: i64, pet_id: i64) -> WorkflowResult<FormView> {
        let pet = self.load_pet(owner_id, pet_id)?;
        self.render(
            VIEW_CREATE_OR_UPDATE_VISIT,
            VisitForm::default(),
            pet,
            ValidationErrors::new(),
        )
    }

    /// Validate and save a new visit for the pet.
    pub fn process_new_visit_form(
        &self,
        owner_id: i64,
        pet_id: i64,
        form: VisitForm,
    ) -> WorkflowResult<FormOutcome> {
        let mut pet = self.load_pet(owner_id, pet_id)?;

        let valid = match self.validate(&form)? {
            Ok(valid) => valid,
            Err(errors) => {
                debug!(owner_id, pet_id, errors = %errors, "new visit form rejected");
                return self
                    .render(VIEW_CREATE_OR_UPDATE_VISIT, form, pet, errors)
                    .map(FormOutcome::Render);
            }
        };

        let visit = pet.add_visit(Visit::new(valid.date, valid.description, valid.vet_id));
        self.visits.save(visit)?;
        info!(owner_id, pet_id, visit_id = ?visit.id, vet_id = visit.vet_id, "visit created");

        Ok(FormOutcome::Redirect(Owner::details_path(owner_id)))
    }

    /// Show a form pre-filled from an existing visit.
    pub fn init_edit_visit_form(
        &self,
        owner_id: i64,
        pet_id: i64,
        visit_id: i64,
    ) -> WorkflowResult<FormView> {
        let pet = self.load_pet(owner_id, pet_id)?;
        let visit = self.locate_visit(pet_id, visit_id)?;
        self.render(
            VIEW_EDIT_VISIT,
            VisitForm::from_visit(&visit),
            pet,
            ValidationErrors::new(),
        )
    }

    /// Validate an edit and update the visit in place.
    ///
    /// The visit keeps its ID and active flag; date, description and vet are
    /// replaced.
    pub fn process_edit_visit_form(
        &self,
        owner_id: i64,
        pet_id: i64,
        visit_id: i64,
        form: VisitForm,
    ) -> WorkflowResult<FormOutcome> {
        let pet = self.load_pet(owner_id, pet_id)?;
        let mut visit = self.locate_visit(pet_id, visit_id)?;

        let valid = match self.validate(&form)? {
            Ok(valid) => valid,
            Err(errors) => {
                debug!(owner_id, pet_id, visit_id, errors = %errors, "edit visit form rejected");
                return self
                    .render(VIEW_EDIT_VISIT, form, pet, errors)
                    .map(FormOutcome::Render);
            }
        };

        visit.date = valid.date;
        visit.description = valid.description;
        visit.vet_id = valid.vet_id;
        visit.pet_id = pet.id;
        self.visits.save(&mut visit)?;
        info!(owner_id, pet_id, visit_id, vet_id = visit.vet_id, "visit updated");

        Ok(FormOutcome::Redirect(Owner::details_path(owner_id)))
    }

    /// Mark a visit as cancelled and save it. Returns the redirect path.
    pub fn cancel_visit(
        &self,
        owner_id: i64,
        pet_id: i64,
        visit_id: i64,
    ) -> WorkflowResult<String> {
        self.load_pet(owner_id, pet_id)?;
        let mut visit = self.locate_visit(pet_id, visit_id)?;

        visit.active = true;
        self.visits.save(&mut visit)?;
        info!(owner_id, pet_id, visit_id, "visit cancelled");

        Ok(Owner::details_path(owner_id))
    }

    fn load_pet(&self, owner_id: i64, pet_id: i64) -> WorkflowResult<Pet> {
        match self.pets.find_by_id(pet_id)? {
            Some(pet) if pet.is_owned_by(owner_id) => Ok(pet),
            _ => {
                warn!(owner_id, pet_id, "pet not found");
                Err(WorkflowError::PetNotFound { owner_id, pet_id })
            }
        }
    }

    fn locate_visit(&self, pet_id: i64, visit_id: i64) -> WorkflowResult<Visit> {
        let visits = self.visits.find_by_pet_id(pet_id)?;
        match find_visit(&visits, visit_id) {
            Some(visit) => Ok(visit.clone()),
            None => {
                warn!(pet_id, visit_id, "visit not found");
                Err(WorkflowError::VisitNotFound { pet_id, visit_id })
            }
        }
    }

    /// Field validation followed by the vet lookup. The outer result carries
    /// repository failures, the inner one field errors.
    fn validate(&self, form: &VisitForm) -> WorkflowResult<Result<ValidVisit, ValidationErrors>> {
        let valid = match validate_visit_form(form) {
            Ok(valid) => valid,
            Err(errors) => return Ok(Err(errors)),
        };

        if self.vets.find_by_id(valid.vet_id)?.is_none() {
            return Ok(Err(FieldError::new(
                FIELD_VET_ID,
                CODE_UNKNOWN_VET,
                format!("no vet with id {}", valid.vet_id),
            )
            .into()));
        }

        Ok(Ok(valid))
    }

    fn render(
        &self,
        view: &'static str,
        visit_form: VisitForm,
        pet: Pet,
        errors: ValidationErrors,
    ) -> WorkflowResult<FormView> {
        Ok(FormView {
            view,
            visit_form,
            pet,
            vets: self.all_vets()?,
            errors,
        })
    }
}
