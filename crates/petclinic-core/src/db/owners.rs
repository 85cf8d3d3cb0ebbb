//! Owner database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Owner;

impl Database {
    /// Insert a new owner, assigning its ID.
    pub fn insert_owner(&self, owner: &mut Owner) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO owners (first_name, last_name, address, city, telephone)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                owner.first_name,
                owner.last_name,
                owner.address,
                owner.city,
                owner.telephone,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        owner.id = Some(id);
        Ok(id)
    }

    /// Update an existing owner.
    pub fn update_owner(&self, id: i64, owner: &Owner) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE owners SET
                first_name = ?2,
                last_name = ?3,
                address = ?4,
                city = ?5,
                telephone = ?6,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                owner.first_name,
                owner.last_name,
                owner.address,
                owner.city,
                owner.telephone,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an owner by ID.
    pub fn get_owner(&self, id: i64) -> DbResult<Option<Owner>> {
        self.conn
            .query_row(
                r#"
                SELECT id, first_name, last_name, address, city, telephone
                FROM owners
                WHERE id = ?
                "#,
                [id],
                owner_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all owners.
    pub fn count_owners(&self) -> DbResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM owners", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

fn owner_from_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        telephone: row.get(5)?,
    })
}
