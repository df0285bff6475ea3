//! Implementaciones en memoria
//!
//! Usadas con `STORAGE_BACKEND=memory` para correr sin PostgreSQL y en los tests.
//! Respetan las mismas escrituras condicionadas que PostgreSQL.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuditLogSink, BookingRepository, LogWriteError, RepositoryError};
use crate::models::{Booking, LogEntry, ServiceCenter};
use crate::services::center_directory::{CenterDirectory, DirectoryError};
use crate::services::mirror_updater::{CenterMirror, MirrorError};

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<String, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_bookings(bookings: Vec<Booking>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.bookings.write().await;
            for booking in bookings {
                map.insert(booking.vehicle_id.clone(), booking);
            }
        }
        repo
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_by_vehicle(&self, vehicle_id: &str) -> Result<Option<Booking>, RepositoryError> {
        Ok(self.bookings.read().await.get(vehicle_id).cloned())
    }

    async fn insert(&self, booking: &Booking) -> Result<Uuid, RepositoryError> {
        let mut map = self.bookings.write().await;
        if map.contains_key(&booking.vehicle_id) {
            return Err(RepositoryError::Duplicate(booking.vehicle_id.clone()));
        }
        map.insert(booking.vehicle_id.clone(), booking.clone());
        Ok(Uuid::new_v4())
    }

    async fn update_in_place(&self, vehicle_id: &str, booking: &Booking) -> Result<(), RepositoryError> {
        let mut map = self.bookings.write().await;
        match map.get_mut(vehicle_id) {
            Some(current) if !current.is_scheduled() => {
                *current = booking.clone();
                Ok(())
            }
            _ => Err(RepositoryError::Duplicate(vehicle_id.to_string())),
        }
    }

    async fn list_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        let mut all: Vec<Booking> = self.bookings.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
        Ok(all)
    }
}

#[derive(Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<LogEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLogSink for InMemoryAuditLog {
    async fn append(&self, entry: &LogEntry) -> Result<(), LogWriteError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<LogEntry>, RepositoryError> {
        Ok(self.entries.read().await.clone())
    }
}

/// Centros en memoria: directorio y destino del mirror a la vez
#[derive(Default)]
pub struct InMemoryCenterStore {
    centers: RwLock<Vec<ServiceCenter>>,
    mirrored: RwLock<HashMap<String, Vec<Booking>>>,
}

impl InMemoryCenterStore {
    pub fn new(centers: Vec<ServiceCenter>) -> Self {
        Self {
            centers: RwLock::new(centers),
            mirrored: RwLock::new(HashMap::new()),
        }
    }

    /// Reservas replicadas en un centro
    pub async fn mirrored_bookings(&self, center_id: &str) -> Vec<Booking> {
        self.mirrored
            .read()
            .await
            .get(center_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn center(&self, center_id: &str) -> Option<ServiceCenter> {
        self.centers
            .read()
            .await
            .iter()
            .find(|c| c.id == center_id)
            .cloned()
    }
}

#[async_trait]
impl CenterDirectory for InMemoryCenterStore {
    async fn list_candidates(&self, scope: &str) -> Result<Vec<ServiceCenter>, DirectoryError> {
        let scope = scope.to_lowercase();
        Ok(self
            .centers
            .read()
            .await
            .iter()
            .filter(|c| c.is_active && c.name.to_lowercase().starts_with(&scope))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CenterMirror for InMemoryCenterStore {
    async fn append_booking_to_center(&self, center_id: &str, booking: &Booking) -> Result<(), MirrorError> {
        {
            let mut centers = self.centers.write().await;
            let center = centers
                .iter_mut()
                .find(|c| c.id == center_id)
                .ok_or_else(|| MirrorError::UnknownCenter(center_id.to_string()))?;
            center.current_bookings += 1;
        }

        self.mirrored
            .write()
            .await
            .entry(center_id.to_string())
            .or_default()
            .push(booking.clone());
        Ok(())
    }
}
