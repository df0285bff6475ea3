use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use super::{with_timeout, RepositoryError};
use crate::models::booking::{Booking, BookingRow};

/// Store autoritativo de reservas, indexado por vehicle id
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_vehicle(&self, vehicle_id: &str) -> Result<Option<Booking>, RepositoryError>;

    /// Insertar si no existe; `Duplicate` si otra petición llegó antes
    async fn insert(&self, booking: &Booking) -> Result<Uuid, RepositoryError>;

    /// Reemplazar solo mientras la reserva siga sin programar; `Duplicate` si no
    async fn update_in_place(&self, vehicle_id: &str, booking: &Booking) -> Result<(), RepositoryError>;

    async fn list_all(&self) -> Result<Vec<Booking>, RepositoryError>;
}

pub struct PgBookingRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_by_vehicle(&self, vehicle_id: &str) -> Result<Option<Booking>, RepositoryError> {
        with_timeout(self.timeout, async {
            let row = sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE vehicle_id = $1")
                .bind(vehicle_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Query(format!("Error finding booking: {}", e)))?;

            Ok(row.map(Booking::from))
        })
        .await
    }

    async fn insert(&self, booking: &Booking) -> Result<Uuid, RepositoryError> {
        with_timeout(self.timeout, async {
            let now = Utc::now();
            let inserted: Option<(Uuid,)> = sqlx::query_as(
                r#"
                INSERT INTO bookings (
                    id, vehicle_id, user_id, confirmation_code, status, is_scheduled,
                    service_center_id, service_center_name, scheduled_at, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
                ON CONFLICT (vehicle_id) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&booking.vehicle_id)
            .bind(&booking.user_id)
            .bind(&booking.confirmation_code)
            .bind(&booking.status)
            .bind(booking.scheduled_service.is_scheduled)
            .bind(&booking.scheduled_service.service_center_id)
            .bind(&booking.scheduled_service.service_center_name)
            .bind(&booking.scheduled_service.date_time)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Write(format!("Error creating booking: {}", e)))?;

            inserted
                .map(|(id,)| id)
                .ok_or_else(|| RepositoryError::Duplicate(booking.vehicle_id.clone()))
        })
        .await
    }

    async fn update_in_place(&self, vehicle_id: &str, booking: &Booking) -> Result<(), RepositoryError> {
        with_timeout(self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE bookings
                SET user_id = $2, confirmation_code = $3, status = $4, is_scheduled = $5,
                    service_center_id = $6, service_center_name = $7, scheduled_at = $8, updated_at = $9
                WHERE vehicle_id = $1 AND is_scheduled = FALSE
                "#,
            )
            .bind(vehicle_id)
            .bind(&booking.user_id)
            .bind(&booking.confirmation_code)
            .bind(&booking.status)
            .bind(booking.scheduled_service.is_scheduled)
            .bind(&booking.scheduled_service.service_center_id)
            .bind(&booking.scheduled_service.service_center_name)
            .bind(&booking.scheduled_service.date_time)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Write(format!("Error updating booking: {}", e)))?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::Duplicate(vehicle_id.to_string()));
            }
            Ok(())
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        with_timeout(self.timeout, async {
            let rows = sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::Query(format!("Error listing bookings: {}", e)))?;

            Ok(rows.into_iter().map(Booking::from).collect())
        })
        .await
    }
}
