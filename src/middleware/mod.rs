//! Middleware del sistema

pub mod cors;

pub use cors::cors_middleware;
