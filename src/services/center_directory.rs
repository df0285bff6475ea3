//! Directorio de centros de servicio
//!
//! Contrato común para los backends que listan centros candidatos
//! (API remota o consulta local), más la derivación del scope.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ServiceCenter;
use crate::utils::errors::{bad_request_error, AppResult};

/// Fallo al consultar el directorio
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Transport(String),

    #[error("directory returned status {0}")]
    Status(u16),

    #[error("invalid directory payload: {0}")]
    Payload(String),

    #[error("directory lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("directory query failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait CenterDirectory: Send + Sync {
    /// Listar centros candidatos para un scope (prefijo de empresa)
    async fn list_candidates(&self, scope: &str) -> Result<Vec<ServiceCenter>, DirectoryError>;
}

/// Nombre de empresa derivado del vehicle id: el segmento antes del primer `_`.
///
/// `PQR_999` -> `PQR`. Un id sin `_` es su propio prefijo. Vacío o con el
/// primer segmento vacío es un `BadRequest`.
pub fn company_prefix(vehicle_id: &str) -> AppResult<&str> {
    let trimmed = vehicle_id.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error("Invalid Vehicle ID format: empty"));
    }

    match trimmed.split('_').next() {
        Some(prefix) if !prefix.is_empty() => Ok(prefix),
        _ => Err(bad_request_error("Invalid Vehicle ID format: missing company prefix")),
    }
}
