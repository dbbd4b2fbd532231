// src/db/snapshots.rs
use crate::db::connection::Database;
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

/// One historical capture of a target's raw scraped text.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: i64,
    pub target_id: i64,
    pub content: String,
    pub fetched_at: NaiveDateTime,
}

pub fn insert_snapshot(
    db: &Database,
    target_id: i64,
    content: &str,
    fetched_at: NaiveDateTime,
) -> Result<i64, ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO snapshots (target_id, content, fetched_at) VALUES (?1, ?2, ?3)",
            params![target_id, content, fetched_at],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

        Ok(conn.last_insert_rowid())
    })
}

/// Most recent capture for a target, if any. Older snapshots are retained
/// for audit but never consulted by the check cycle.
pub fn latest_snapshot(db: &Database, target_id: i64) -> Result<Option<Snapshot>, ServerError> {
    db.with_conn(|conn| {
        conn.query_row(
            r#"
            SELECT id, target_id, content, fetched_at
            FROM snapshots
            WHERE target_id = ?1
            ORDER BY fetched_at DESC, id DESC
            LIMIT 1
            "#,
            params![target_id],
            |row| {
                Ok(Snapshot {
                    id: row.get(0)?,
                    target_id: row.get(1)?,
                    content: row.get(2)?,
                    fetched_at: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(|e| ServerError::DbError(e.to_string()))
    })
}
