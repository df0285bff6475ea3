//! Modelo de LogEntry
//!
//! Registro de auditoría inmutable del ciclo de vida de una reserva.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::booking::Booking;

/// Tipo de log para el flujo de reservas
pub const LOG_TYPE_BOOKING: &str = "BOOKING";

/// Acción registrada en el log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingAction {
    Created,
    AutoAssignedCreated,
    UpdatedSchedule,
}

impl BookingAction {
    /// Auto-asignación gana sobre actualización; si no, depende de si ya había reserva
    pub fn for_outcome(was_present: bool, auto_assigned: bool) -> Self {
        if auto_assigned {
            BookingAction::AutoAssignedCreated
        } else if was_present {
            BookingAction::UpdatedSchedule
        } else {
            BookingAction::Created
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Created => "CREATED",
            BookingAction::AutoAssignedCreated => "AUTO_ASSIGNED_CREATED",
            BookingAction::UpdatedSchedule => "UPDATED_SCHEDULE",
        }
    }
}

/// Snapshot de la reserva guardado dentro del log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogData {
    pub confirmation_code: String,
    pub status: String,
    pub service_center_id: String,
    pub scheduled_at: String,
    pub is_scheduled: bool,
    pub action: BookingAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub log_id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub timestamp: String,
    pub log_type: String,
    pub data: LogData,
}

impl LogEntry {
    pub fn for_booking(log_id: String, booking: &Booking, action: BookingAction) -> Self {
        Self {
            log_id,
            user_id: booking.user_id.clone(),
            vehicle_id: booking.vehicle_id.clone(),
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            log_type: LOG_TYPE_BOOKING.to_string(),
            data: LogData {
                confirmation_code: booking.confirmation_code.clone(),
                status: booking.status.clone(),
                service_center_id: booking.scheduled_service.service_center_id.clone(),
                scheduled_at: booking.scheduled_service.date_time.clone(),
                is_scheduled: booking.scheduled_service.is_scheduled,
                action,
            },
        }
    }
}

/// Generar un log id `LOG_<YYYYMMDD>_<NNNN>` (no garantiza unicidad)
pub fn generate_log_id() -> String {
    generate_log_id_at(Utc::now(), &mut rand::thread_rng())
}

pub fn generate_log_id_at<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: u16 = rng.gen_range(0..10_000);
    format!("LOG_{}_{:04}", now.format("%Y%m%d"), suffix)
}

/// Fila de la tabla booking_logs
#[derive(Debug, Clone, FromRow)]
pub struct LogEntryRow {
    pub log_id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub timestamp: String,
    pub log_type: String,
    pub data: sqlx::types::Json<LogData>,
}

impl From<LogEntryRow> for LogEntry {
    fn from(row: LogEntryRow) -> Self {
        Self {
            log_id: row.log_id,
            user_id: row.user_id,
            vehicle_id: row.vehicle_id,
            timestamp: row.timestamp,
            log_type: row.log_type,
            data: row.data.0,
        }
    }
}
