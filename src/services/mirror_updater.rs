//! Mirror de reservas en el registro del centro
//!
//! Cada reserva guardada se replica en el registro del centro asignado con una
//! tarea desacoplada de la petición HTTP: tiene su propio timeout, no se cancela
//! si el cliente se desconecta, y su fallo solo se registra en el log.
//! Sin reintentos: como mucho una vez.
//!
//! # Apagado
//!
//! Las tareas se siguen con un `TaskTracker`. Al apagar, `drain` espera un tiempo
//! acotado; lo que siga en vuelo se abandona y se reporta.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::models::Booking;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("service center '{0}' not found")]
    UnknownCenter(String),

    #[error("mirror write failed: {0}")]
    Write(String),
}

#[async_trait]
pub trait CenterMirror: Send + Sync {
    async fn append_booking_to_center(&self, center_id: &str, booking: &Booking) -> Result<(), MirrorError>;
}

#[derive(Clone)]
pub struct MirrorUpdater {
    mirror: Arc<dyn CenterMirror>,
    tracker: TaskTracker,
    timeout: Duration,
}

impl MirrorUpdater {
    pub fn new(mirror: Arc<dyn CenterMirror>, timeout: Duration) -> Self {
        Self {
            mirror,
            tracker: TaskTracker::new(),
            timeout,
        }
    }

    /// Lanzar la actualización sin esperarla
    pub fn dispatch(&self, center_id: String, booking: Booking) {
        let mirror = Arc::clone(&self.mirror);
        let limit = self.timeout;

        self.tracker.spawn(async move {
            let update = mirror.append_booking_to_center(&center_id, &booking);
            match tokio::time::timeout(limit, update).await {
                Ok(Ok(())) => {
                    debug!(center_id = %center_id, vehicle_id = %booking.vehicle_id, "🪞 Reserva replicada en el centro");
                }
                Ok(Err(e)) => {
                    warn!(
                        center_id = %center_id,
                        vehicle_id = %booking.vehicle_id,
                        error = %e,
                        "⚠️ Error replicando la reserva en el centro"
                    );
                }
                Err(_) => {
                    warn!(
                        center_id = %center_id,
                        vehicle_id = %booking.vehicle_id,
                        timeout_ms = limit.as_millis() as u64,
                        "⏰ Timeout replicando la reserva en el centro"
                    );
                }
            }
        });
    }

    /// Ejecutar una tarea en el mismo tracker que los mirrors.
    ///
    /// La tarea sigue aunque se suelte el `JoinHandle`, y `drain` la espera.
    pub fn track<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tracker.spawn(task)
    }

    /// Tareas de mirror todavía en vuelo
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Esperar (acotado) a que terminen las tareas pendientes.
    ///
    /// Devuelve `false` si quedó alguna sin terminar.
    pub async fn drain(&self, limit: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            info!(pending, "⏳ Esperando tareas de mirror pendientes...");
        }

        match tokio::time::timeout(limit, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(abandoned = self.tracker.len(), "⚠️ Tareas de mirror abandonadas al apagar");
                false
            }
        }
    }
}
