//! Repository seams consumed by the visit workflow.
//!
//! [`Database`] implements every trait; tests and embedders can substitute
//! their own stores.

use crate::db::{Database, DbError, DbResult};
use crate::models::{Owner, Pet, Vet, Visit};

pub trait OwnerRepository {
    fn find_by_id(&self, id: i64) -> DbResult<Option<Owner>>;

    /// Insert when `owner.id` is `None`, otherwise update.
    fn save(&self, owner: &mut Owner) -> DbResult<()>;
}

pub trait PetRepository {
    /// Load a pet with its visits.
    fn find_by_id(&self, id: i64) -> DbResult<Option<Pet>>;

    /// Insert when `pet.id` is `None`, otherwise update. Visits are not saved.
    fn save(&self, pet: &mut Pet) -> DbResult<()>;
}

pub trait VetRepository {
    fn find_all(&self) -> DbResult<Vec<Vet>>;

    fn find_by_id(&self, id: i64) -> DbResult<Option<Vet>>;

    /// Insert when `vet.id` is `None`, otherwise update.
    fn save(&self, vet: &mut Vet) -> DbResult<()>;
}

pub trait VisitRepository {
    /// All visits for a pet, ordered by date then ID.
    fn find_by_pet_id(&self, pet_id: i64) -> DbResult<Vec<Visit>>;

    /// Insert when `visit.id` is `None` (assigning the ID), otherwise update in place.
    fn save(&self, visit: &mut Visit) -> DbResult<()>;
}

impl OwnerRepository for Database {
    fn find_by_id(&self, id: i64) -> DbResult<Option<Owner>> {
        self.get_owner(id)
    }

    fn save(&self, owner: &mut Owner) -> DbResult<()> {
        match owner.id {
            None => self.insert_owner(owner).map(|_| ()),
            Some(id) => updated(self.update_owner(id, owner)?, "owner", id),
        }
    }
}

impl PetRepository for Database {
    fn find_by_id(&self, id: i64) -> DbResult<Option<Pet>> {
        self.get_pet(id)
    }

    fn save(&self, pet: &mut Pet) -> DbResult<()> {
        match pet.id {
            None => self.insert_pet(pet).map(|_| ()),
            Some(id) => updated(self.update_pet(id, pet)?, "pet", id),
        }
    }
}

impl VetRepository for Database {
    fn find_all(&self) -> DbResult<Vec<Vet>> {
        self.list_vets()
    }

    fn find_by_id(&self, id: i64) -> DbResult<Option<Vet>> {
        self.get_vet(id)
    }

    fn save(&self, vet: &mut Vet) -> DbResult<()> {
        match vet.id {
            None => self.insert_vet(vet).map(|_| ()),
            Some(id) => updated(self.update_vet(id, vet)?, "vet", id),
        }
    }
}

impl VisitRepository for Database {
    fn find_by_pet_id(&self, pet_id: i64) -> DbResult<Vec<Visit>> {
        self.list_visits_for_pet(pet_id)
    }

    fn save(&self, visit: &mut Visit) -> DbResult<()> {
        if visit.is_new() {
            self.insert_visit(visit).map(|_| ())
        } else {
            self.update_visit(visit)
        }
    }
}

fn updated(found: bool, kind: &str, id: i64) -> DbResult<()> {
    if found {
        Ok(())
    } else {
        Err(DbError::NotFound(format!("{} {}", kind, id)))
    }
}
