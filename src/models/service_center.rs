//! Modelo de ServiceCenter
//!
//! Entrada del directorio de centros. Solo lectura para el flujo de reservas:
//! de la lista de reservas del centro solo interesa cuántas hay.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCenter {
    pub id: String,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub is_active: bool,
    pub current_bookings: usize,
}

impl ServiceCenter {
    /// Un centro sin id no se puede asignar
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub fn free_capacity(&self) -> i64 {
        i64::from(self.capacity) - self.current_bookings as i64
    }
}

/// Fila de la tabla service_centers (con el conteo ya calculado)
#[derive(Debug, Clone, FromRow)]
pub struct ServiceCenterRow {
    pub center_id: String,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub is_active: bool,
    pub booking_count: i32,
}

impl From<ServiceCenterRow> for ServiceCenter {
    fn from(row: ServiceCenterRow) -> Self {
        Self {
            id: row.center_id,
            name: row.name,
            location: row.location,
            capacity: row.capacity,
            is_active: row.is_active,
            current_bookings: usize::try_from(row.booking_count).unwrap_or(0),
        }
    }
}
