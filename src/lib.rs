//! Booking intake service
//!
//! Recibe reservas de servicio para vehículos, auto-asigna un centro cuando
//! el cliente no lo indica, guarda reserva y log, y replica la reserva en el
//! registro del centro de forma desacoplada.

pub mod cache;
pub mod clients;
pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
