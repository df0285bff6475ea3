//! Centros de servicio en PostgreSQL
//!
//! Sirve como directorio local (lectura) y como destino del mirror de
//! reservas (append al array `bookings` del centro).

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use tracing::debug;

use crate::models::booking::Booking;
use crate::models::service_center::{ServiceCenter, ServiceCenterRow};
use crate::services::center_directory::{CenterDirectory, DirectoryError};
use crate::services::mirror_updater::{CenterMirror, MirrorError};

pub struct PgCenterDirectory {
    pool: PgPool,
    timeout: Duration,
}

impl PgCenterDirectory {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl CenterDirectory for PgCenterDirectory {
    async fn list_candidates(&self, scope: &str) -> Result<Vec<ServiceCenter>, DirectoryError> {
        let query = sqlx::query_as::<_, ServiceCenterRow>(
            r#"
            SELECT center_id, name, location, capacity, is_active,
                   jsonb_array_length(bookings) AS booking_count
            FROM service_centers
            WHERE is_active = TRUE AND starts_with(lower(name), lower($1))
            ORDER BY created_at, center_id
            "#,
        )
        .bind(scope)
        .fetch_all(&self.pool);

        let rows = tokio::time::timeout(self.timeout, query)
            .await
            .map_err(|_| DirectoryError::Timeout(self.timeout))?
            .map_err(|e| DirectoryError::Query(e.to_string()))?;

        debug!(scope, count = rows.len(), "📋 Centros candidatos desde la base local");
        Ok(rows.into_iter().map(ServiceCenter::from).collect())
    }
}

pub struct PgCenterMirror {
    pool: PgPool,
}

impl PgCenterMirror {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CenterMirror for PgCenterMirror {
    async fn append_booking_to_center(&self, center_id: &str, booking: &Booking) -> Result<(), MirrorError> {
        let result = sqlx::query(
            r#"
            UPDATE service_centers
            SET bookings = bookings || jsonb_build_array($2::jsonb)
            WHERE center_id = $1
            "#,
        )
        .bind(center_id)
        .bind(sqlx::types::Json(booking))
        .execute(&self.pool)
        .await
        .map_err(|e| MirrorError::Write(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(MirrorError::UnknownCenter(center_id.to_string()));
        }
        Ok(())
    }
}
