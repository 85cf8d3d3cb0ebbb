//! Pet database operations.

use rusqlite::{params, OptionalExtension};

use super::{format_date, parse_date, Database, DbError, DbResult};
use crate::models::Pet;

impl Database {
    /// Insert a new pet, assigning its ID. Visits are saved separately.
    pub fn insert_pet(&self, pet: &mut Pet) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO pets (name, birth_date, pet_type, owner_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                pet.name,
                pet.birth_date.as_ref().map(format_date),
                pet.pet_type,
                pet.owner_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        pet.id = Some(id);
        Ok(id)
    }

    /// Update an existing pet's own fields.
    pub fn update_pet(&self, id: i64, pet: &Pet) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE pets SET
                name = ?2,
                birth_date = ?3,
                pet_type = ?4,
                owner_id = ?5,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                pet.name,
                pet.birth_date.as_ref().map(format_date),
                pet.pet_type,
                pet.owner_id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a pet by ID, with its visits loaded.
    pub fn get_pet(&self, id: i64) -> DbResult<Option<Pet>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, name, birth_date, pet_type, owner_id
                FROM pets
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(PetRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        birth_date: row.get(2)?,
                        pet_type: row.get(3)?,
                        owner_id: row.get(4)?,
                    })
                },
            )
            .optional()?;

        match row {
            Some(row) => {
                let mut pet: Pet = row.try_into()?;
                pet.visits = self.list_visits_for_pet(id)?;
                Ok(Some(pet))
            }
            None => Ok(None),
        }
    }

    /// List an owner's pets by name, with their visits loaded.
    pub fn list_pets_for_owner(&self, owner_id: i64) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, birth_date, pet_type, owner_id
            FROM pets
            WHERE owner_id = ?
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([owner_id], |row| {
            Ok(PetRow {
                id: row.get(0)?,
                name: row.get(1)?,
                birth_date: row.get(2)?,
                pet_type: row.get(3)?,
                owner_id: row.get(4)?,
            })
        })?;

        let mut pets = Vec::new();
        for row in rows {
            let mut pet: Pet = row?.try_into()?;
            if let Some(pet_id) = pet.id {
                pet.visits = self.list_visits_for_pet(pet_id)?;
            }
            pets.push(pet);
        }
        Ok(pets)
    }
}

/// Intermediate row struct for database mapping.
struct PetRow {
    id: i64,
    name: String,
    birth_date: Option<String>,
    pet_type: String,
    owner_id: i64,
}

impl TryFrom<PetRow> for Pet {
    type Error = DbError;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        let birth_date = row
            .birth_date
            .as_deref()
            .map(|value| parse_date("birth_date", value))
            .transpose()?;

        Ok(Pet {
            id: Some(row.id),
            name: row.name,
            birth_date,
            pet_type: row.pet_type,
            owner_id: row.owner_id,
            visits: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Owner, Vet, Visit};
    use chrono::NaiveDate;

    fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let owner_id = db
            .insert_owner(&mut Owner::new("Eduardo".into(), "Rodriquez".into()))
            .unwrap();
        (db, owner_id)
    }

    #[test]
    fn test_insert_and_get() {
        let (db, owner_id) = setup_db();

        let mut pet = Pet::new("Rosy".into(), "dog".into(), owner_id);
        pet.birth_date = NaiveDate::from_ymd_opt(2011, 4, 17);
        let id = db.insert_pet(&mut pet).unwrap();

        let retrieved = db.get_pet(id).unwrap().unwrap();
        assert_eq!(retrieved, pet);
        assert!(retrieved.visits.is_empty());
    }

    #[test]
    fn test_insert_requires_owner() {
        let db = Database::open_in_memory().unwrap();
        let mut pet = Pet::new("Stray".into(), "dog".into(), 999);
        assert!(db.insert_pet(&mut pet).is_err());
    }

    #[test]
    fn test_get_pet_loads_visits() {
        let (db, owner_id) = setup_db();
        let pet_id = db
            .insert_pet(&mut Pet::new("Jewel".into(), "dog".into(), owner_id))
            .unwrap();
        let vet_id = db
            .insert_vet(&mut Vet::new("Helen".into(), "Leary".into()))
            .unwrap();

        let mut visit = Visit::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            "spayed".into(),
            vet_id,
        );
        visit.pet_id = Some(pet_id);
        db.insert_visit(&mut visit).unwrap();

        let pet = db.get_pet(pet_id).unwrap().unwrap();
        assert_eq!(pet.visits.len(), 1);
        assert_eq!(pet.visits[0].description, "spayed");
    }

    #[test]
    fn test_update_pet() {
        let (db, owner_id) = setup_db();
        let mut pet = Pet::new("Rosy".into(), "dog".into(), owner_id);
        let id = db.insert_pet(&mut pet).unwrap();

        pet.name = "Rosie".into();
        assert!(db.update_pet(id, &pet).unwrap());
        assert_eq!(db.get_pet(id).unwrap().unwrap().name, "Rosie");
    }

    #[test]
    fn test_list_pets_for_owner() {
        let (db, owner_id) = setup_db();
        db.insert_pet(&mut Pet::new("Rosy".into(), "dog".into(), owner_id))
            .unwrap();
        db.insert_pet(&mut Pet::new("Jewel".into(), "dog".into(), owner_id))
            .unwrap();

        let pets = db.list_pets_for_owner(owner_id).unwrap();
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].name, "Jewel");
        assert!(db.list_pets_for_owner(owner_id + 1).unwrap().is_empty());
    }
}
