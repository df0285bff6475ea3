//! Orquestador de reservas
//!
//! Secuencia de una petición POST /book-service:
//!
//! 1. Buscar la reserva existente del vehículo (error -> 500, sin escrituras)
//! 2. Si ya está programada -> "already booked" con un log id no persistido
//! 3. Decidir el centro: el del cliente, o auto-asignación vía directorio + selector.
//!    Si el directorio falla se usa el centro de respaldo configurado; si responde
//!    pero no hay candidato elegible -> 404
//! 4. Guardar la reserva (insert o update condicionado) (error -> 500, sin log ni mirror)
//! 5. Guardar el log de auditoría (best-effort)
//! 6. Lanzar el mirror al centro (desacoplado)
//!
//! Todo lo anterior a la escritura de la reserva aborta la petición; todo lo
//! posterior es best-effort y corre en una tarea propia, así que sigue aunque
//! el cliente se desconecte.

use std::sync::Arc;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::dto::booking_dto::{BookServiceRequest, BookServiceResponse};
use crate::models::{generate_log_id, Booking, BookingAction, BookingState, LogEntry};
use crate::repositories::{AuditLogSink, BookingRepository, RepositoryError};
use crate::services::assignment::{select, SelectionPolicy};
use crate::services::center_directory::{company_prefix, CenterDirectory};
use crate::services::mirror_updater::MirrorUpdater;
use crate::utils::errors::{AppError, AppResult};

/// Parámetros de auto-asignación
#[derive(Debug, Clone)]
pub struct AssignmentSettings {
    pub policy: SelectionPolicy,
    pub fallback_center_id: String,
}

/// Centro decidido para una petición
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterAssignment {
    pub center_id: String,
    pub center_name: String,
    pub auto_assigned: bool,
}

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    logs: Arc<dyn AuditLogSink>,
    directory: Arc<dyn CenterDirectory>,
    mirror: MirrorUpdater,
    settings: AssignmentSettings,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        logs: Arc<dyn AuditLogSink>,
        directory: Arc<dyn CenterDirectory>,
        mirror: MirrorUpdater,
        settings: AssignmentSettings,
    ) -> Self {
        Self {
            bookings,
            logs,
            directory,
            mirror,
            settings,
        }
    }

    pub fn mirror(&self) -> &MirrorUpdater {
        &self.mirror
    }

    pub async fn book(&self, request: BookServiceRequest) -> AppResult<BookServiceResponse> {
        request.validate()?;
        let vehicle_id = request.vehicle_id.clone();

        let existing = self
            .bookings
            .find_by_vehicle(&vehicle_id)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to look up existing booking: {}", e)))?;

        let state = BookingState::of(existing.as_ref());
        if let (BookingState::Scheduled, Some(current)) = (state, existing.as_ref()) {
            return Ok(self.already_booked(current));
        }

        let assignment = self.determine_center(&request).await?;
        let booking = request.into_booking(assignment.center_id.clone(), assignment.center_name.clone());

        let write = match state {
            BookingState::Absent => self.bookings.insert(&booking).await.map(|_| ()),
            _ => self.bookings.update_in_place(&vehicle_id, &booking).await,
        };
        if let Err(e) = write {
            return self.resolve_failed_write(&vehicle_id, e).await;
        }

        let action = BookingAction::for_outcome(state != BookingState::Absent, assignment.auto_assigned);
        let log_id = generate_log_id();
        info!(
            vehicle_id = %vehicle_id,
            center_id = %assignment.center_id,
            log_id = %log_id,
            action = action.as_str(),
            "✅ Reserva guardada"
        );

        // La reserva ya está guardada: log y mirror no dependen de que el
        // cliente siga conectado
        let entry = LogEntry::for_booking(log_id.clone(), &booking, action);
        let logs = Arc::clone(&self.logs);
        let mirror = self.mirror.clone();
        let center_id = assignment.center_id.clone();
        let follow_up = self.mirror.track(async move {
            if let Err(e) = logs.append(&entry).await {
                warn!(
                    vehicle_id = %entry.vehicle_id,
                    log_id = %entry.log_id,
                    error = %e,
                    "⚠️ Error guardando log de reserva"
                );
            }
            mirror.dispatch(center_id, booking);
        });
        if let Err(e) = follow_up.await {
            warn!(vehicle_id = %vehicle_id, error = %e, "⚠️ Tarea de log/mirror terminó con error");
        }

        Ok(BookServiceResponse::confirmed(log_id, assignment.center_id))
    }

    /// Decidir el centro de la reserva
    pub async fn determine_center(&self, request: &BookServiceRequest) -> AppResult<CenterAssignment> {
        if let Some(center_id) = request.explicit_center_id() {
            return Ok(CenterAssignment {
                center_id: center_id.to_string(),
                center_name: request
                    .scheduled_service
                    .service_center_name
                    .clone()
                    .unwrap_or_default(),
                auto_assigned: false,
            });
        }

        let scope = company_prefix(&request.vehicle_id)?;
        debug!(vehicle_id = %request.vehicle_id, scope, "🏢 Empresa detectada");

        let candidates = match self.directory.list_candidates(scope).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    scope,
                    error = %e,
                    fallback = %self.settings.fallback_center_id,
                    "⚠️ Directorio de centros no disponible, usando centro de respaldo"
                );
                return Ok(CenterAssignment {
                    center_id: self.settings.fallback_center_id.clone(),
                    center_name: String::new(),
                    auto_assigned: true,
                });
            }
        };

        let chosen = select(&candidates, self.settings.policy).map_err(|_| {
            AppError::NotFound(format!("No eligible service center found for company: {}", scope))
        })?;

        info!(
            scope,
            center_id = %chosen.id,
            load = chosen.current_bookings,
            free = chosen.free_capacity(),
            "🎯 Centro auto-asignado"
        );

        Ok(CenterAssignment {
            center_id: chosen.id.clone(),
            center_name: chosen.name.clone(),
            auto_assigned: true,
        })
    }

    pub async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        Ok(self.bookings.list_all().await?)
    }

    pub async fn list_logs(&self) -> AppResult<Vec<LogEntry>> {
        Ok(self.logs.list_all().await?)
    }

    fn already_booked(&self, existing: &Booking) -> BookServiceResponse {
        // el log id se devuelve pero no se persiste
        let log_id = generate_log_id();
        info!(
            vehicle_id = %existing.vehicle_id,
            center_id = %existing.center_id(),
            "📌 Vehículo ya tiene una reserva programada"
        );
        BookServiceResponse::already_booked(log_id, existing)
    }

    /// Una escritura condicionada perdida se reevalúa: si la otra petición dejó
    /// la reserva programada, se responde "already booked".
    async fn resolve_failed_write(
        &self,
        vehicle_id: &str,
        error: RepositoryError,
    ) -> AppResult<BookServiceResponse> {
        if let RepositoryError::Duplicate(_) = error {
            warn!(vehicle_id, "⚠️ Escritura concurrente detectada, releyendo reserva");
            if let Ok(Some(current)) = self.bookings.find_by_vehicle(vehicle_id).await {
                if current.is_scheduled() {
                    return Ok(self.already_booked(&current));
                }
            }
        }

        Err(AppError::Internal(format!("Failed to save booking: {}", error)))
    }
}
