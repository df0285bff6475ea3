//! Rutas HTTP

pub mod booking_routes;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Router completo de la API
pub fn create_app_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(booking_routes::create_booking_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
