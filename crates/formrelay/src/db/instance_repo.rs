//! Instance repository: CRUD operations for the `instances` table.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_timestamp, Database, DatabaseError};
use crate::model::{Instance, InstanceStatus};

fn instance_from_row(row: &Row<'_>) -> Result<Instance, rusqlite::Error> {
    let status: String = row.get("status")?;
    let status = status.parse::<InstanceStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::<dyn std::error::Error + Send + Sync>::from(e),
        )
    })?;
    let instance_path: String = row.get("instance_path")?;

    Ok(Instance {
        id: row.get("id")?,
        display_name: row.get("display_name")?,
        form_id: row.get("form_id")?,
        form_version: row.get("form_version")?,
        status,
        instance_path: PathBuf::from(instance_path),
        submission_uri: row.get("submission_uri")?,
        last_status_change: parse_timestamp(7, row.get("last_status_change")?)?,
    })
}

/// Inserts an instance and returns its new database id. The `id` field of
/// the argument is ignored.
pub fn insert(db: &Database, instance: &Instance) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO instances (display_name, form_id, form_version, status,
             instance_path, submission_uri, last_status_change)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                instance.display_name,
                instance.form_id,
                instance.form_version,
                instance.status.as_str(),
                instance.instance_path.to_string_lossy(),
                instance.submission_uri,
                instance.last_status_change.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds an instance by its database id.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<Instance>, DatabaseError> {
    db.with_conn(|conn| {
        let instance = conn
            .query_row(
                "SELECT * FROM instances WHERE id = ?1",
                params![id],
                instance_from_row,
            )
            .optional()?;
        Ok(instance)
    })
}

/// Returns every instance whose status is one of `statuses`, in insertion order.
pub fn find_by_statuses(
    db: &Database,
    statuses: &[InstanceStatus],
) -> Result<Vec<Instance>, DatabaseError> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }

    db.with_conn(|conn| {
        let placeholders: Vec<String> = (0..statuses.len()).map(|i| format!("?{}", i + 1)).collect();
        let sql = format!(
            "SELECT * FROM instances WHERE status IN ({}) ORDER BY id ASC",
            placeholders.join(", ")
        );

        let values: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(values), instance_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Returns every instance of the given form, in insertion order.
pub fn find_by_form_id(db: &Database, form_id: &str) -> Result<Vec<Instance>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM instances WHERE form_id = ?1 ORDER BY id ASC")?;
        let rows = stmt
            .query_map(params![form_id], instance_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Deletes an instance row. Returns whether a row was removed.
pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let count = conn.execute("DELETE FROM instances WHERE id = ?1", params![id])?;
        Ok(count > 0)
    })
}

/// Updates the status of an instance, refusing backwards transitions.
pub fn update_status(
    db: &Database,
    id: i64,
    status: InstanceStatus,
    changed_at: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        let current: Option<String> = conn
            .query_row(
                "SELECT status FROM instances WHERE id = ?1",
                params![id],
                |r| r.get(0),
            )
            .optional()?;

        let current = current.ok_or(DatabaseError::NotFound {
            table: "instances",
            id,
        })?;
        let current = current.parse::<InstanceStatus>().map_err(|e| {
            DatabaseError::Sqlite(rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::<dyn std::error::Error + Send + Sync>::from(e),
            ))
        })?;

        if !current.can_transition_to(status) {
            return Err(DatabaseError::InvalidTransition {
                id,
                from: current,
                to: status,
            });
        }

        conn.execute(
            "UPDATE instances SET status = ?2, last_status_change = ?3 WHERE id = ?1",
            params![id, status.as_str(), changed_at.to_rfc3339()],
        )?;
        Ok(())
    })
}
