//! Vet database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::Vet;

impl Database {
    /// Insert a new vet, assigning its ID.
    pub fn insert_vet(&self, vet: &mut Vet) -> DbResult<i64> {
        let specialties_json = serde_json::to_string(&vet.specialties)?;

        self.conn.execute(
            "INSERT INTO vets (first_name, last_name, specialties) VALUES (?1, ?2, ?3)",
            params![vet.first_name, vet.last_name, specialties_json],
        )?;
        let id = self.conn.last_insert_rowid();
        vet.id = Some(id);
        Ok(id)
    }

    /// Update an existing vet.
    pub fn update_vet(&self, id: i64, vet: &Vet) -> DbResult<bool> {
        let specialties_json = serde_json::to_string(&vet.specialties)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE vets SET
                first_name = ?2,
                last_name = ?3,
                specialties = ?4,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![id, vet.first_name, vet.last_name, specialties_json],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a vet by ID.
    pub fn get_vet(&self, id: i64) -> DbResult<Option<Vet>> {
        self.conn
            .query_row(
                "SELECT id, first_name, last_name, specialties FROM vets WHERE id = ?",
                [id],
                |row| {
                    Ok(VetRow {
                        id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        specialties: row.get(3)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all vets, ordered by name.
    pub fn list_vets(&self) -> DbResult<Vec<Vet>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, first_name, last_name, specialties
            FROM vets
            ORDER BY last_name, first_name
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(VetRow {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                specialties: row.get(3)?,
            })
        })?;

        let mut vets = Vec::new();
        for row in rows {
            vets.push(row?.try_into()?);
        }
        Ok(vets)
    }
}

/// Intermediate row struct for database mapping.
struct VetRow {
    id: i64,
    first_name: String,
    last_name: String,
    specialties: String,
}

impl TryFrom<VetRow> for Vet {
    type Error = DbError;

    fn try_from(row: VetRow) -> Result<Self, Self::Error> {
        let specialties: Vec<String> = serde_json::from_str(&row.specialties)?;

        Ok(Vet {
            id: Some(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            specialties,
        })
    }
}
