use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::dto::booking_dto::{BookServiceRequest, BookServiceResponse};
use crate::models::{Booking, LogEntry};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/system-status", get(system_status))
        .route("/book-service", post(book_service))
        .route("/bookings", get(list_bookings))
        .route("/logs", get(list_logs))
}

async fn book_service(
    State(state): State<AppState>,
    payload: Result<Json<BookServiceRequest>, JsonRejection>,
) -> AppResult<Json<BookServiceResponse>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(format!("Invalid JSON: {}", e.body_text())))?;
    let response = state.bookings.book(request).await?;
    Ok(Json(response))
}

async fn list_bookings(State(state): State<AppState>) -> AppResult<Json<Vec<Booking>>> {
    Ok(Json(state.bookings.list_bookings().await?))
}

async fn list_logs(State(state): State<AppState>) -> AppResult<Json<Vec<LogEntry>>> {
    Ok(Json(state.bookings.list_logs().await?))
}

async fn system_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "Active",
        "message": "System is running smoothly",
        "time": chrono::Utc::now().to_rfc3339(),
        "startedAt": state.started_at.to_rfc3339(),
        "pendingMirrorUpdates": state.bookings.mirror().pending(),
    }))
}
