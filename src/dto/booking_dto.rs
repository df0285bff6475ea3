use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::booking::{derive_user_id, Booking, ScheduledService};

pub const STATUS_CONFIRMED: &str = "Confirmed";
pub const MESSAGE_SAVED: &str = "Successfully saved";
pub const MESSAGE_ALREADY_BOOKED: &str = "already booked";

// Request de POST /book-service
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookServiceRequest {
    #[validate(custom = "not_blank")]
    pub vehicle_id: String,
    #[serde(default)]
    pub confirmation_code: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub scheduled_service: ScheduledServiceRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledServiceRequest {
    #[serde(default)]
    pub is_scheduled: bool,
    #[serde(default)]
    pub service_center_id: Option<String>,
    #[serde(default)]
    pub service_center_name: Option<String>,
    #[serde(default)]
    pub date_time: String,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_blank"));
    }
    Ok(())
}

impl BookServiceRequest {
    /// Centro enviado por el cliente, tal cual llegó.
    /// Vacío, solo espacios o `"null"` cuenta como ausente.
    pub fn explicit_center_id(&self) -> Option<&str> {
        self.scheduled_service
            .service_center_id
            .as_deref()
            .filter(|id| !id.trim().is_empty() && *id != "null")
    }

    pub fn resolved_user_id(&self) -> String {
        match self.user_id.as_deref().map(str::trim) {
            Some(user) if !user.is_empty() => user.to_string(),
            _ => derive_user_id(&self.vehicle_id),
        }
    }

    /// Construir la reserva a guardar con el centro ya decidido
    pub fn into_booking(self, center_id: String, center_name: String) -> Booking {
        let user_id = self.resolved_user_id();
        Booking {
            vehicle_id: self.vehicle_id,
            confirmation_code: self.confirmation_code,
            status: self.status,
            user_id,
            scheduled_service: ScheduledService {
                is_scheduled: self.scheduled_service.is_scheduled,
                service_center_id: center_id,
                service_center_name: center_name,
                date_time: self.scheduled_service.date_time,
            },
        }
    }
}

// Response de POST /book-service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookServiceResponse {
    pub booking_status: String,
    pub generated_log_id: String,
    pub assigned_center: String,
    pub message: String,
}

impl BookServiceResponse {
    pub fn confirmed(log_id: String, center_id: String) -> Self {
        Self {
            booking_status: STATUS_CONFIRMED.to_string(),
            generated_log_id: log_id,
            assigned_center: center_id,
            message: MESSAGE_SAVED.to_string(),
        }
    }

    pub fn already_booked(log_id: String, existing: &Booking) -> Self {
        Self {
            booking_status: existing.status.clone(),
            generated_log_id: log_id,
            assigned_center: existing.center_id().to_string(),
            message: MESSAGE_ALREADY_BOOKED.to_string(),
        }
    }
}
