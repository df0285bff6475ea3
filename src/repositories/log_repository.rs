use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;

use super::{with_timeout, RepositoryError};
use crate::models::log_entry::{LogEntry, LogEntryRow};

/// Fallo al escribir un log. Nunca es fatal para la reserva.
#[derive(Debug, Error)]
pub enum LogWriteError {
    #[error("log write failed: {0}")]
    Write(String),

    #[error("log write timed out after {0:?}")]
    Timeout(Duration),
}

/// Log de auditoría append-only
#[async_trait]
pub trait AuditLogSink: Send + Sync {
    async fn append(&self, entry: &LogEntry) -> Result<(), LogWriteError>;

    async fn list_all(&self) -> Result<Vec<LogEntry>, RepositoryError>;
}

pub struct PgAuditLogSink {
    pool: PgPool,
    timeout: Duration,
}

impl PgAuditLogSink {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl AuditLogSink for PgAuditLogSink {
    async fn append(&self, entry: &LogEntry) -> Result<(), LogWriteError> {
        let insert = sqlx::query(
            r#"
            INSERT INTO booking_logs (log_id, user_id, vehicle_id, timestamp, log_type, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&entry.log_id)
        .bind(&entry.user_id)
        .bind(&entry.vehicle_id)
        .bind(&entry.timestamp)
        .bind(&entry.log_type)
        .bind(sqlx::types::Json(&entry.data))
        .execute(&self.pool);

        match tokio::time::timeout(self.timeout, insert).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(LogWriteError::Write(e.to_string())),
            Err(_) => Err(LogWriteError::Timeout(self.timeout)),
        }
    }

    async fn list_all(&self) -> Result<Vec<LogEntry>, RepositoryError> {
        with_timeout(self.timeout, async {
            let rows = sqlx::query_as::<_, LogEntryRow>(
                "SELECT log_id, user_id, vehicle_id, timestamp, log_type, data FROM booking_logs ORDER BY timestamp DESC",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Query(format!("Error listing logs: {}", e)))?;

            Ok(rows.into_iter().map(LogEntry::from).collect())
        })
        .await
    }
}
