use async_trait::async_trait;
use sqlx::PgPool;

use leadline_application::{AuditEntry, AuditSink};
use leadline_core::{AppError, AppResult};

/// PostgreSQL-backed append-only audit sink.
#[derive(Clone)]
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    /// Creates a sink with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn write(&self, entry: AuditEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log_entries (
                recorded_at,
                principal_id,
                principal_username,
                role,
                method,
                path,
                status,
                origin
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.timestamp)
        .bind(entry.principal_id)
        .bind(entry.principal_username)
        .bind(entry.role.as_str())
        .bind(entry.method)
        .bind(entry.path)
        .bind(i32::from(entry.status))
        .bind(entry.origin)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit entry: {error}")))?;

        Ok(())
    }
}
