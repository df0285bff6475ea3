//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos de reservas, logs de auditoría
//! y centros de servicio, junto con sus filas PostgreSQL.

pub mod booking;
pub mod log_entry;
pub mod service_center;

pub use booking::{derive_user_id, Booking, BookingState, ScheduledService};
pub use log_entry::{generate_log_id, BookingAction, LogData, LogEntry, LOG_TYPE_BOOKING};
pub use service_center::ServiceCenter;
