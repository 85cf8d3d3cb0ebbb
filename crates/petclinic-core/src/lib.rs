//! Petclinic Core Library
//!
//! Visit scheduling for a veterinary clinic: the visit form workflow plus the
//! SQLite store it runs against.
//!
//! # Architecture
//!
//! ```text
//!   GET  .../visits/new ──────────► empty VisitForm
//!   POST .../visits/new ──┐
//!   POST .../{id}/edit ───┤
//!                         ▼
//!              validate_visit_form ──(field errors)──► redisplay form
//!                         │
//!                    vet lookup ──────(unknown vet)──► redisplay form
//!                         │
//!              Pet::add_visit / update in place
//!                         │
//!                 VisitRepository::save
//!                         │
//!                         ▼
//!               redirect /owners/{ownerId}
//!
//!   GET .../{id}/cancel ──► locate visit ──► active = true ──► save ──► redirect
//! ```
//!
//! Visits are never deleted; cancellation is a flag on the record.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Owner, Pet, Vet, Visit, VisitForm)
//! - [`repository`]: Repository traits the workflow depends on
//! - [`validation`]: Visit form validation with structured field errors
//! - [`workflow`]: The create/edit/cancel visit workflow
//! - [`seed`]: Demo clinic data

pub mod db;
pub mod models;
pub mod repository;
pub mod seed;
pub mod validation;
pub mod workflow;

// Re-export commonly used types
pub use db::Database;
pub use models::{Owner, Pet, Vet, Visit, VisitForm};
pub use validation::{validate_visit_form, FieldError, ValidationErrors};
pub use workflow::{FormOutcome, FormView, VisitWorkflow, WorkflowError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PetClinicError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<db::DbError> for PetClinicError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => PetClinicError::NotFound(what),
            other => PetClinicError::DatabaseError(other.to_string()),
        }
    }
}

impl From<WorkflowError> for PetClinicError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::Database(db_error) => db_error.into(),
            not_found => PetClinicError::NotFound(not_found.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for PetClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PetClinicError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<PetClinicCore>, PetClinicError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(PetClinicCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<PetClinicCore>, PetClinicError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(PetClinicCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PetClinicCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl PetClinicCore {
    // =========================================================================
    // Clinic Records
    // =========================================================================

    /// Create a new owner.
    pub fn create_owner(
        &self,
        first_name: String,
        last_name: String,
    ) -> Result<FfiOwner, PetClinicError> {
        let db = self.db.lock()?;
        let mut owner = Owner::new(first_name, last_name);
        db.insert_owner(&mut owner)?;
        owner.try_into()
    }

    /// Create a new pet for an owner.
    pub fn create_pet(
        &self,
        owner_id: i64,
        name: String,
        pet_type: String,
    ) -> Result<FfiPet, PetClinicError> {
        let db = self.db.lock()?;
        let mut pet = Pet::new(name, pet_type, owner_id);
        db.insert_pet(&mut pet)?;
        pet.try_into()
    }

    /// Create a new vet.
    pub fn create_vet(
        &self,
        first_name: String,
        last_name: String,
        specialties: Vec<String>,
    ) -> Result<FfiVet, PetClinicError> {
        let db = self.db.lock()?;
        let mut vet = Vet::new(first_name, last_name);
        vet.specialties = specialties;
        db.insert_vet(&mut vet)?;
        vet.try_into()
    }

    /// Get a pet with its visits.
    pub fn get_pet(&self, pet_id: i64) -> Result<Option<FfiPet>, PetClinicError> {
        let db = self.db.lock()?;
        db.get_pet(pet_id)?.map(FfiPet::try_from).transpose()
    }

    /// List all vets.
    pub fn list_vets(&self) -> Result<Vec<FfiVet>, PetClinicError> {
        let db = self.db.lock()?;
        db.list_vets()?.into_iter().map(FfiVet::try_from).collect()
    }

    /// Load the demo clinic into an empty database.
    pub fn seed_demo_data(&self) -> Result<bool, PetClinicError> {
        let db = self.db.lock()?;
        Ok(seed::seed_demo_data(&db)?)
    }

    // =========================================================================
    // Visit Workflow
    // =========================================================================

    /// Empty form for a new visit.
    pub fn init_new_visit_form(
        &self,
        owner_id: i64,
        pet_id: i64,
    ) -> Result<FfiFormView, PetClinicError> {
        let db = self.db.lock()?;
        let view = VisitWorkflow::new(&db).init_new_visit_form(owner_id, pet_id)?;
        view.try_into()
    }

    /// Submit a new visit.
    pub fn process_new_visit_form(
        &self,
        owner_id: i64,
        pet_id: i64,
        form: FfiVisitForm,
    ) -> Result<FfiFormOutcome, PetClinicError> {
        let db = self.db.lock()?;
        let outcome =
            VisitWorkflow::new(&db).process_new_visit_form(owner_id, pet_id, form.into())?;
        outcome.try_into()
    }

    /// Form pre-filled from an existing visit.
    pub fn init_edit_visit_form(
        &self,
        owner_id: i64,
        pet_id: i64,
        visit_id: i64,
    ) -> Result<FfiFormView, PetClinicError> {
        let db = self.db.lock()?;
        let view = VisitWorkflow::new(&db).init_edit_visit_form(owner_id, pet_id, visit_id)?;
        view.try_into()
    }

    /// Submit an edit to an existing visit.
    pub fn process_edit_visit_form(
        &self,
        owner_id: i64,
        pet_id: i64,
        visit_id: i64,
        form: FfiVisitForm,
    ) -> Result<FfiFormOutcome, PetClinicError> {
        let db = self.db.lock()?;
        let outcome = VisitWorkflow::new(&db).process_edit_visit_form(
            owner_id,
            pet_id,
            visit_id,
            form.into(),
        )?;
        outcome.try_into()
    }

    /// Cancel a visit. Returns the path to redirect to.
    pub fn cancel_visit(
        &self,
        owner_id: i64,
        pet_id: i64,
        visit_id: i64,
    ) -> Result<String, PetClinicError> {
        let db = self.db.lock()?;
        let workflow = VisitWorkflow::new(&db);
        Ok(workflow.cancel_visit(owner_id, pet_id, visit_id)?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn saved_id(id: Option<i64>, kind: &str) -> Result<i64, PetClinicError> {
    id.ok_or_else(|| PetClinicError::InvalidInput(format!("{} has not been saved", kind)))
}

/// FFI-safe owner.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOwner {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
}

impl TryFrom<Owner> for FfiOwner {
    type Error = PetClinicError;

    fn try_from(owner: Owner) -> Result<Self, Self::Error> {
        Ok(Self {
            id: saved_id(owner.id, "owner")?,
            first_name: owner.first_name,
            last_name: owner.last_name,
            address: owner.address,
            city: owner.city,
            telephone: owner.telephone,
        })
    }
}

/// FFI-safe vet.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVet {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub specialties: Vec<String>,
}

impl TryFrom<Vet> for FfiVet {
    type Error = PetClinicError;

    fn try_from(vet: Vet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: saved_id(vet.id, "vet")?,
            first_name: vet.first_name,
            last_name: vet.last_name,
            specialties: vet.specialties,
        })
    }
}

/// FFI-safe visit. Dates are `yyyy-MM-dd`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub id: i64,
    pub pet_id: i64,
    pub date: String,
    pub description: String,
    pub vet_id: i64,
    pub active: bool,
}

impl TryFrom<Visit> for FfiVisit {
    type Error = PetClinicError;

    fn try_from(visit: Visit) -> Result<Self, Self::Error> {
        Ok(Self {
            id: saved_id(visit.id, "visit")?,
            pet_id: saved_id(visit.pet_id, "visit pet")?,
            date: db::format_date(&visit.date),
            description: visit.description,
            vet_id: visit.vet_id,
            active: visit.active,
        })
    }
}

/// FFI-safe pet with its visits.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPet {
    pub id: i64,
    pub name: String,
    pub birth_date: Option<String>,
    pub pet_type: String,
    pub owner_id: i64,
    pub visits: Vec<FfiVisit>,
}

impl TryFrom<Pet> for FfiPet {
    type Error = PetClinicError;

    fn try_from(pet: Pet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: saved_id(pet.id, "pet")?,
            name: pet.name,
            birth_date: pet.birth_date.as_ref().map(db::format_date),
            pet_type: pet.pet_type,
            owner_id: pet.owner_id,
            visits: pet
                .visits
                .into_iter()
                .map(FfiVisit::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// FFI-safe visit form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitForm {
    pub date: String,
    pub description: String,
    pub vet_id: String,
}

impl From<FfiVisitForm> for VisitForm {
    fn from(form: FfiVisitForm) -> Self {
        VisitForm {
            date: form.date,
            description: form.description,
            vet_id: form.vet_id,
        }
    }
}

impl From<VisitForm> for FfiVisitForm {
    fn from(form: VisitForm) -> Self {
        Self {
            date: form.date,
            description: form.description,
            vet_id: form.vet_id,
        }
    }
}

/// FFI-safe field error.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl From<FieldError> for FfiFieldError {
    fn from(error: FieldError) -> Self {
        Self {
            field: error.field,
            code: error.code,
            message: error.message,
        }
    }
}

/// FFI-safe form view.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFormView {
    pub view: String,
    pub form: FfiVisitForm,
    pub pet: FfiPet,
    pub vets: Vec<FfiVet>,
    pub errors: Vec<FfiFieldError>,
}

impl TryFrom<FormView> for FfiFormView {
    type Error = PetClinicError;

    fn try_from(view: FormView) -> Result<Self, Self::Error> {
        Ok(Self {
            view: view.view.to_string(),
            form: view.visit_form.into(),
            pet: view.pet.try_into()?,
            vets: view
                .vets
                .into_iter()
                .map(FfiVet::try_from)
                .collect::<Result<_, _>>()?,
            errors: view.errors.into_vec().into_iter().map(Into::into).collect(),
        })
    }
}

/// FFI-safe form outcome.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiFormOutcome {
    Render { view: FfiFormView },
    Redirect { path: String },
}

impl TryFrom<FormOutcome> for FfiFormOutcome {
    type Error = PetClinicError;

    fn try_from(outcome: FormOutcome) -> Result<Self, Self::Error> {
        Ok(match outcome {
            FormOutcome::Render(view) => FfiFormOutcome::Render {
                view: view.try_into()?,
            },
            FormOutcome::Redirect(path) => FfiFormOutcome::Redirect { path },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<PetClinicCore>, i64, i64, i64) {
        let core = open_database_in_memory().unwrap();
        let owner = core
            .create_owner("Jean".into(), "Coleman".into())
            .unwrap();
        let pet = core
            .create_pet(owner.id, "Samantha".into(), "cat".into())
            .unwrap();
        let vet = core
            .create_vet("Helen".into(), "Leary".into(), vec!["radiology".into()])
            .unwrap();
        (core, owner.id, pet.id, vet.id)
    }

    #[test]
    fn test_ffi_visit_lifecycle() {
        let (core, owner_id, pet_id, vet_id) = setup();

        let view = core.init_new_visit_form(owner_id, pet_id).unwrap();
        assert_eq!(view.view, "pets/createOrUpdateVisitForm");
        assert_eq!(view.vets.len(), 1);

        let outcome = core
            .process_new_visit_form(
                owner_id,
                pet_id,
                FfiVisitForm {
                    date: "2024-01-10".into(),
                    description: "checkup".into(),
                    vet_id: vet_id.to_string(),
                },
            )
            .unwrap();
        assert!(matches!(
            outcome,
            FfiFormOutcome::Redirect { ref path } if path == &format!("/owners/{}", owner_id)
        ));

        let pet = core.get_pet(pet_id).unwrap().unwrap();
        assert_eq!(pet.visits.len(), 1);
        let visit_id = pet.visits[0].id;

        let edit = core.init_edit_visit_form(owner_id, pet_id, visit_id).unwrap();
        assert_eq!(edit.form.date, "2024-01-10");
        assert_eq!(edit.form.vet_id, vet_id.to_string());

        core.cancel_visit(owner_id, pet_id, visit_id).unwrap();
        let pet = core.get_pet(pet_id).unwrap().unwrap();
        assert!(pet.visits[0].active);
    }

    #[test]
    fn test_ffi_rejected_form() {
        let (core, owner_id, pet_id, vet_id) = setup();

        let outcome = core
            .process_new_visit_form(
                owner_id,
                pet_id,
                FfiVisitForm {
                    date: "not a date".into(),
                    description: "checkup".into(),
                    vet_id: vet_id.to_string(),
                },
            )
            .unwrap();

        match outcome {
            FfiFormOutcome::Render { view } => {
                assert_eq!(view.errors.len(), 1);
                assert_eq!(view.errors[0].field, "date");
                assert_eq!(view.form.date, "not a date");
            }
            FfiFormOutcome::Redirect { .. } => panic!("expected form to be redisplayed"),
        }
    }

    #[test]
    fn test_ffi_not_found() {
        let (core, owner_id, pet_id, _) = setup();

        let err = core.cancel_visit(owner_id, pet_id, 42).unwrap_err();
        assert!(matches!(err, PetClinicError::NotFound(_)));

        let err = core.init_new_visit_form(owner_id, pet_id + 1).unwrap_err();
        assert!(matches!(err, PetClinicError::NotFound(_)));
    }

    #[test]
    fn test_ffi_seed() {
        let core = open_database_in_memory().unwrap();
        assert!(core.seed_demo_data().unwrap());
        assert_eq!(core.list_vets().unwrap().len(), 3);
    }
}
