//! Demo clinic data for local runs.

use chrono::NaiveDate;
use tracing::info;

use crate::db::{Database, DbError, DbResult};
use crate::models::{Owner, Pet, Vet, Visit};

/// Insert a small demo clinic into an empty database.
///
/// Returns `false` without touching anything if owners already exist. The
/// whole clinic is written in one transaction, so a failure leaves nothing
/// behind.
pub fn seed_demo_data(db: &Database) -> DbResult<bool> {
    let tx = db.transaction()?;
    if db.count_owners()? > 0 {
        return Ok(false);
    }

    let carter_id = db.insert_vet(&mut Vet::new("James".into(), "Carter".into()))?;
    let mut leary = Vet::new("Helen".into(), "Leary".into());
    leary.specialties = vec!["radiology".into()];
    db.insert_vet(&mut leary)?;
    let mut douglas = Vet::new("Linda".into(), "Douglas".into());
    douglas.specialties = vec!["dentistry".into(), "surgery".into()];
    let douglas_id = db.insert_vet(&mut douglas)?;

    let mut franklin = Owner::new("George".into(), "Franklin".into());
    franklin.address = "110 W. Liberty St.".into();
    franklin.city = "Madison".into();
    franklin.telephone = "6085551023".into();
    let franklin_id = db.insert_owner(&mut franklin)?;

    let mut coleman = Owner::new("Jean".into(), "Coleman".into());
    coleman.address = "105 N. Lake St.".into();
    coleman.city = "Monona".into();
    coleman.telephone = "6085552654".into();
    let coleman_id = db.insert_owner(&mut coleman)?;

    let mut leo = Pet::new("Leo".into(), "cat".into(), franklin_id);
    leo.birth_date = Some(date(2010, 9, 7)?);
    db.insert_pet(&mut leo)?;

    let mut samantha = Pet::new("Samantha".into(), "cat".into(), coleman_id);
    samantha.birth_date = Some(date(2012, 9, 4)?);
    db.insert_pet(&mut samantha)?;

    let mut max = Pet::new("Max".into(), "cat".into(), coleman_id);
    max.birth_date = Some(date(2012, 9, 4)?);
    db.insert_pet(&mut max)?;

    let rabies_shot = Visit::new(date(2013, 1, 1)?, "rabies shot".into(), carter_id);
    db.insert_visit(samantha.add_visit(rabies_shot))?;
    let neutered = Visit::new(date(2013, 1, 2)?, "neutered".into(), douglas_id);
    db.insert_visit(max.add_visit(neutered))?;
    tx.commit()?;

    info!(owners = 2, pets = 3, vets = 3, "seeded demo clinic");
    Ok(true)
}

fn date(year: i32, month: u32, day: u32) -> DbResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        DbError::Constraint(format!("Invalid date {}-{}-{}", year, month, day))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_empty_database() {
        let db = Database::open_in_memory().unwrap();
        assert!(seed_demo_data(&db).unwrap());

        assert_eq!(db.count_owners().unwrap(), 2);
        assert_eq!(db.list_vets().unwrap().len(), 3);

        let pets: Vec<Pet> = (1..=2)
            .flat_map(|owner_id| db.list_pets_for_owner(owner_id).unwrap())
            .collect();
        assert_eq!(pets.len(), 3);
        let visit_count: usize = pets.iter().map(|p| p.visits.len()).sum();
        assert_eq!(visit_count, 2);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        assert!(seed_demo_data(&db).unwrap());
        assert!(!seed_demo_data(&db).unwrap());
        assert_eq!(db.count_owners().unwrap(), 2);
    }

    #[test]
    fn test_failed_seed_leaves_database_empty() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute_batch(
                "CREATE TRIGGER reject_owners BEFORE INSERT ON owners
                 BEGIN SELECT RAISE(ABORT, 'owners are read-only'); END;",
            )
            .unwrap();

        assert!(seed_demo_data(&db).is_err());
        assert_eq!(db.list_vets().unwrap().len(), 0);
        assert_eq!(db.count_owners().unwrap(), 0);

        db.conn().execute_batch("DROP TRIGGER reject_owners").unwrap();
        assert!(seed_demo_data(&db).unwrap());
        assert_eq!(db.list_vets().unwrap().len(), 3);
    }
}
