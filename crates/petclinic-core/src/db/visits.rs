//! Visit database operations.

use rusqlite::{params, OptionalExtension};

use super::{format_date, parse_date, Database, DbError, DbResult};
use crate::models::Visit;

impl Database {
    /// Insert a new visit, assigning its ID.
    ///
    /// The visit must already be attached to a pet.
    pub fn insert_visit(&self, visit: &mut Visit) -> DbResult<i64> {
        let pet_id = visit
            .pet_id
            .ok_or_else(|| DbError::Constraint("Visit is not attached to a pet".into()))?;

        self.conn.execute(
            r#"
            INSERT INTO visits (pet_id, vet_id, visit_date, description, active)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                pet_id,
                visit.vet_id,
                format_date(&visit.date),
                visit.description,
                visit.active,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        visit.id = Some(id);
        Ok(id)
    }

    /// Update an existing visit in place.
    pub fn update_visit(&self, visit: &Visit) -> DbResult<()> {
        let id = visit
            .id
            .ok_or_else(|| DbError::Constraint("Cannot update an unsaved visit".into()))?;
        let pet_id = visit
            .pet_id
            .ok_or_else(|| DbError::Constraint("Visit is not attached to a pet".into()))?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE visits SET
                pet_id = ?2,
                vet_id = ?3,
                visit_date = ?4,
                description = ?5,
                active = ?6,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                pet_id,
                visit.vet_id,
                format_date(&visit.date),
                visit.description,
                visit.active,
            ],
        )?;

        if rows_affected == 0 {
            return Err(DbError::NotFound(format!("visit {}", id)));
        }
        Ok(())
    }

    /// Get a visit by ID.
    pub fn get_visit(&self, id: i64) -> DbResult<Option<Visit>> {
        self.conn
            .query_row(
                r#"
                SELECT id, pet_id, vet_id, visit_date, description, active
                FROM visits
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(VisitRow {
                        id: row.get(0)?,
                        pet_id: row.get(1)?,
                        vet_id: row.get(2)?,
                        visit_date: row.get(3)?,
                        description: row.get(4)?,
                        active: row.get(5)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all visits for a pet, ordered by date then ID.
    pub fn list_visits_for_pet(&self, pet_id: i64) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pet_id, vet_id, visit_date, description, active
            FROM visits
            WHERE pet_id = ?
            ORDER BY visit_date, id
            "#,
        )?;

        let rows = stmt.query_map([pet_id], |row| {
            Ok(VisitRow {
                id: row.get(0)?,
                pet_id: row.get(1)?,
                vet_id: row.get(2)?,
                visit_date: row.get(3)?,
                description: row.get(4)?,
                active: row.get(5)?,
            })
        })?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?.try_into()?);
        }
        Ok(visits)
    }
}

/// Intermediate row struct for database mapping.
struct VisitRow {
    id: i64,
    pet_id: i64,
    vet_id: i64,
    visit_date: String,
    description: String,
    active: bool,
}

impl TryFrom<VisitRow> for Visit {
    type Error = DbError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        Ok(Visit {
            id: Some(row.id),
            pet_id: Some(row.pet_id),
            date: parse_date("visit_date", &row.visit_date)?,
            description: row.description,
            vet_id: row.vet_id,
            active: row.active,
        })
    }
}
