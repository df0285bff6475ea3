//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. No hay handles globales: todo se construye
//! una vez en `main` y se inyecta aquí.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::services::booking_service::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(bookings: BookingService) -> Self {
        Self {
            bookings: Arc::new(bookings),
            started_at: Utc::now(),
        }
    }
}
