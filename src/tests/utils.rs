use crate::db::connection::{init_db, Database};
use crate::errors::ServerError;

/// Fresh sqlite file using the production schema. Each test passes its own
/// file name so tests can run in parallel.
pub fn init_test_db(name: &str) -> Database {
    let _ = std::fs::remove_file(name);

    let db = Database::new(name);
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn count(db: &Database, sql: &str) -> i64 {
    db.with_conn(|conn| {
        conn.query_row(sql, [], |r| r.get::<_, i64>(0))
            .map_err(|e| ServerError::DbError(e.to_string()))
    })
    .expect("count query failed")
}
