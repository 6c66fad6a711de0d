//! Audit log persistence

use async_trait::async_trait;
use sqlx::PgConnection;

use super::{LogStore, Repository};
use crate::{
    error::AppResult,
    models::{LogEntry, NewLogEntry},
};

/// Append a log entry on an open connection, typically inside the
/// transaction of the write it describes
pub(crate) async fn insert_log(conn: &mut PgConnection, entry: &NewLogEntry) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO logs (action, details, user_id, username)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(entry.action.as_str())
    .bind(&entry.details)
    .bind(entry.user_id)
    .bind(&entry.username)
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl LogStore for Repository {
    async fn log_list(&self) -> AppResult<Vec<LogEntry>> {
        let rows = sqlx::query_as::<_, LogEntry>(
            "SELECT * FROM logs ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
