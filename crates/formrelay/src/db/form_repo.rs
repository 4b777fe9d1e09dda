//! Form repository: CRUD operations for the `forms` table.

use std::path::PathBuf;

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_timestamp, Database, DatabaseError};
use crate::model::Form;

fn form_from_row(row: &Row<'_>) -> Result<Form, rusqlite::Error> {
    let form_file_path: String = row.get("form_file_path")?;
    let form_media_path: Option<String> = row.get("form_media_path")?;

    Ok(Form {
        id: row.get("id")?,
        form_id: row.get("form_id")?,
        version: row.get("version")?,
        display_name: row.get("display_name")?,
        form_file_path: PathBuf::from(form_file_path),
        form_media_path: form_media_path.map(PathBuf::from),
        auto_send: row.get("auto_send")?,
        auto_delete: row.get("auto_delete")?,
        date_added: parse_timestamp(7, row.get("date_added")?)?,
    })
}

/// Inserts a form and returns its new database id. The `id` field of the
/// argument is ignored.
pub fn insert(db: &Database, form: &Form) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO forms (form_id, version, display_name, form_file_path,
             form_media_path, auto_send, auto_delete, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                form.form_id,
                form.version,
                form.display_name,
                form.form_file_path.to_string_lossy(),
                form.form_media_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
                form.auto_send,
                form.auto_delete,
                form.date_added.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds the most recently added form with this id and exactly this version.
/// A `None` version only matches records without a version.
pub fn find_latest_by_form_id_and_version(
    db: &Database,
    form_id: &str,
    version: Option<&str>,
) -> Result<Option<Form>, DatabaseError> {
    db.with_conn(|conn| {
        let form = conn
            .query_row(
                "SELECT * FROM forms
                 WHERE form_id = ?1 AND ((?2 IS NULL AND version IS NULL) OR version = ?2)
                 ORDER BY date_added DESC, id DESC LIMIT 1",
                params![form_id, version],
                form_from_row,
            )
            .optional()?;
        Ok(form)
    })
}

/// Finds the most recently added form with this id, whatever its version.
pub fn find_latest_by_form_id(db: &Database, form_id: &str) -> Result<Option<Form>, DatabaseError> {
    db.with_conn(|conn| {
        let form = conn
            .query_row(
                "SELECT * FROM forms WHERE form_id = ?1
                 ORDER BY date_added DESC, id DESC LIMIT 1",
                params![form_id],
                form_from_row,
            )
            .optional()?;
        Ok(form)
    })
}

/// Lists all forms in insertion order.
pub fn find_all(db: &Database) -> Result<Vec<Form>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM forms ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], form_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Returns true if any form explicitly opts into auto-send.
pub fn any_auto_send(db: &Database) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM forms WHERE auto_send = 1",
            [],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    })
}

/// Deletes every version of a form. Returns the number of rows deleted.
pub fn delete_by_form_id(db: &Database, form_id: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count = conn.execute("DELETE FROM forms WHERE form_id = ?1", params![form_id])?;
        Ok(count as u64)
    })
}
