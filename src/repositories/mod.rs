//! Repositorios
//!
//! Persistencia de reservas, logs de auditoría y centros de servicio.
//! Cada contrato tiene una implementación PostgreSQL y una en memoria.

pub mod booking_repository;
pub mod log_repository;
pub mod memory;
pub mod service_center_repository;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

pub use booking_repository::{BookingRepository, PgBookingRepository};
pub use log_repository::{AuditLogSink, LogWriteError, PgAuditLogSink};
pub use memory::{InMemoryAuditLog, InMemoryBookingRepository, InMemoryCenterStore};
pub use service_center_repository::{PgCenterDirectory, PgCenterMirror};

/// Errores de acceso al store de reservas
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// La escritura condicionada perdió contra otra petición
    #[error("record already exists or changed concurrently for vehicle '{0}'")]
    Duplicate(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Ejecutar una operación del store con su propio timeout
pub(crate) async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| RepositoryError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: Result<(), _> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(RepositoryError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_through() {
        let result = with_timeout(Duration::from_secs(1), async {
            Err::<(), _>(RepositoryError::Write("boom".into()))
        })
        .await;

        assert!(matches!(result, Err(RepositoryError::Write(msg)) if msg == "boom"));
    }
}
