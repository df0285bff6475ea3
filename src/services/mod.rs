//! Services module
//!
//! Este módulo contiene la lógica de negocio: selección de centro, contrato del
//! directorio, mirror desacoplado y el orquestador de reservas.

pub mod assignment;
pub mod booking_service;
pub mod center_directory;
pub mod mirror_updater;

pub use assignment::{select, NoCandidate, SelectionPolicy};
pub use booking_service::{AssignmentSettings, BookingService, CenterAssignment};
pub use center_directory::{company_prefix, CenterDirectory, DirectoryError};
pub use mirror_updater::{CenterMirror, MirrorError, MirrorUpdater};
