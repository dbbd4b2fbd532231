// src/db/targets.rs
use crate::db::connection::Database;
use crate::errors::ServerError;
use chrono::{NaiveDateTime, Utc};
use rusqlite::params;

/// A tracked competitor pricing page plus its recipient and check state.
#[derive(Debug, Clone)]
pub struct MonitorTarget {
    pub id: i64,
    pub label: String,
    pub url: String,
    pub recipient_email: String,
    pub is_active: bool,
    pub last_checked_at: Option<NaiveDateTime>,
    pub last_change_fingerprint: Option<String>,
    pub last_change_kind: Option<String>,
}

/// Registration itself is external; this insert exists for seeding and tests.
pub fn insert_target(
    db: &Database,
    label: &str,
    url: &str,
    recipient_email: &str,
) -> Result<i64, ServerError> {
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO targets (label, url, recipient_email, is_active, created_at)
            VALUES (?1, ?2, ?3, 1, ?4)
            "#,
            params![label, url, recipient_email, now],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

        Ok(conn.last_insert_rowid())
    })
}

pub fn get_active_targets(db: &Database) -> Result<Vec<MonitorTarget>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                r#"
                SELECT
                    id,                      -- 0
                    label,                   -- 1
                    url,                     -- 2
                    recipient_email,         -- 3
                    is_active,               -- 4
                    last_checked_at,         -- 5
                    last_change_fingerprint, -- 6
                    last_change_kind         -- 7
                FROM targets
                WHERE is_active = 1
                ORDER BY id
                "#,
            )
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(MonitorTarget {
                    id: row.get(0)?,
                    label: row.get(1)?,
                    url: row.get(2)?,
                    recipient_email: row.get(3)?,
                    is_active: row.get(4)?,
                    last_checked_at: row.get(5)?,
                    last_change_fingerprint: row.get(6)?,
                    last_change_kind: row.get(7)?,
                })
            })
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
        }
        Ok(out)
    })
}

pub fn touch_last_checked(
    db: &Database,
    target_id: i64,
    at: NaiveDateTime,
) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE targets SET last_checked_at = ?1 WHERE id = ?2",
            params![at, target_id],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
        Ok(())
    })
}

/// Advance the dedup state after a notification attempt, success or not.
pub fn record_notified_change(
    db: &Database,
    target_id: i64,
    fingerprint: &str,
    change_kind: &str,
) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            UPDATE targets
            SET last_change_fingerprint = ?1,
                last_change_kind = ?2
            WHERE id = ?3
            "#,
            params![fingerprint, change_kind, target_id],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
        Ok(())
    })
}
