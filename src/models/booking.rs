//! Modelo de Booking
//!
//! Una reserva de servicio para un vehículo. El `vehicle_id` es la clave
//! natural: existe como mucho una reserva por vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reserva tal como la ve el resto del sistema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub vehicle_id: String,
    pub confirmation_code: String,
    pub status: String,
    pub scheduled_service: ScheduledService,
    pub user_id: String,
}

/// Datos de la cita en el centro de servicio
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledService {
    pub is_scheduled: bool,
    pub service_center_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_center_name: String,
    pub date_time: String,
}

/// Estado de una reserva desde el punto de vista del flujo de booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    Absent,
    Unscheduled,
    Scheduled,
}

impl BookingState {
    pub fn of(existing: Option<&Booking>) -> Self {
        match existing {
            None => BookingState::Absent,
            Some(b) if b.is_scheduled() => BookingState::Scheduled,
            Some(_) => BookingState::Unscheduled,
        }
    }
}

impl Booking {
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_service.is_scheduled
    }

    pub fn center_id(&self) -> &str {
        &self.scheduled_service.service_center_id
    }
}

/// `USR_<vehicleId>` cuando el cliente no envía un usuario
pub fn derive_user_id(vehicle_id: &str) -> String {
    format!("USR_{}", vehicle_id)
}

/// Fila de la tabla bookings
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub vehicle_id: String,
    pub user_id: String,
    pub confirmation_code: String,
    pub status: String,
    pub is_scheduled: bool,
    pub service_center_id: String,
    pub service_center_name: String,
    pub scheduled_at: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            vehicle_id: row.vehicle_id,
            confirmation_code: row.confirmation_code,
            status: row.status,
            user_id: row.user_id,
            scheduled_service: ScheduledService {
                is_scheduled: row.is_scheduled,
                service_center_id: row.service_center_id,
                service_center_name: row.service_center_name,
                date_time: row.scheduled_at,
            },
        }
    }
}
