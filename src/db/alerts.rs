// src/db/alerts.rs
use crate::classify::ChangeResult;
use crate::db::connection::Database;
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::params;

pub struct NewAlert<'a> {
    pub target_id: i64,
    pub old_snapshot_id: i64,
    pub new_snapshot_id: i64,
    pub change: &'a ChangeResult,
    pub fingerprint: &'a str,
}

/// Persist the alert before attempting delivery; notification_sent starts
/// at 0 and flips via mark_alert_sent only on successful send.
pub fn insert_alert(
    db: &Database,
    alert: &NewAlert,
    created_at: NaiveDateTime,
) -> Result<i64, ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO alerts (
                target_id, old_snapshot_id, new_snapshot_id,
                change_kind, summary, old_value, new_value, plan, confidence,
                fingerprint, notification_sent, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11)
            "#,
            params![
                alert.target_id,
                alert.old_snapshot_id,
                alert.new_snapshot_id,
                alert.change.kind.as_str(),
                alert.change.summary,
                alert.change.old_value,
                alert.change.new_value,
                alert.change.plan,
                alert.change.confidence_score,
                alert.fingerprint,
                created_at,
            ],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

        Ok(conn.last_insert_rowid())
    })
}

pub fn mark_alert_sent(db: &Database, alert_id: i64) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE alerts SET notification_sent = 1 WHERE id = ?1",
            params![alert_id],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
        Ok(())
    })
}
