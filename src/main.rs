use anyhow::Result;
use std::net::SocketAddr;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use booking_intake::cache::{CacheConfig, CachedCenterDirectory, RedisClient};
use booking_intake::clients::HttpCenterDirectory;
use booking_intake::config::{DatabaseConfig, DirectoryBackend, EnvironmentConfig, StorageBackend};
use booking_intake::database::DatabaseConnection;
use booking_intake::middleware::cors_middleware;
use booking_intake::repositories::{
    AuditLogSink, BookingRepository, InMemoryAuditLog, InMemoryBookingRepository, InMemoryCenterStore,
    PgAuditLogSink, PgBookingRepository, PgCenterDirectory, PgCenterMirror,
};
use booking_intake::services::{AssignmentSettings, BookingService, CenterDirectory, CenterMirror, MirrorUpdater};
use booking_intake::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging (RUST_LOG tiene prioridad)
    let default_level = if config.is_development() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    info!("🚗 Booking Intake - Reservas de servicio para vehículos");
    info!("======================================================");
    info!("🌍 Entorno: {}", config.environment);
    let service = build_booking_service(&config).await?;
    let mirror = service.mirror().clone();

    let app = create_app_router(AppState::new(service), cors_middleware(&config.cors_origins));

    let addr: SocketAddr = config.server_url().parse()?;
    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /system-status - Estado del sistema");
    info!("   POST /book-service - Crear o actualizar reserva");
    info!("   GET  /bookings - Listar reservas");
    info!("   GET  /logs - Listar logs de reservas");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    // Mirror: best-effort, espera acotada
    if !mirror.drain(config.shutdown_drain).await {
        warn!("⚠️ Algunas actualizaciones de centros no terminaron antes del apagado");
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Construir repositorios, directorio y mirror según la configuración
async fn build_booking_service(config: &EnvironmentConfig) -> Result<BookingService> {
    let storage = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let connection = DatabaseConnection::new(&DatabaseConfig::from_url(url)).await?;
            Storage::postgres(connection.pool().clone(), config.store_timeout)
        }
        StorageBackend::Memory => {
            warn!("⚠️ Usando almacenamiento en memoria: los datos se pierden al reiniciar");
            Storage::memory()
        }
    };
    let Storage {
        bookings,
        logs,
        local_directory,
        mirror,
    } = storage;

    let directory: Arc<dyn CenterDirectory> = match config.center_directory {
        DirectoryBackend::Database => local_directory,
        DirectoryBackend::Http => {
            info!("🌐 Directorio remoto de centros: {}", config.center_directory_url);
            Arc::new(HttpCenterDirectory::new(
                config.center_directory_url.clone(),
                config.directory_timeout,
            )?)
        }
    };

    let directory: Arc<dyn CenterDirectory> = match &config.redis_url {
        Some(redis_url) => {
            let cache_config = CacheConfig {
                redis_url: redis_url.clone(),
                default_ttl: config.center_cache_ttl,
            };
            match RedisClient::new(cache_config).await {
                Ok(redis) => {
                    let ttl = redis.default_ttl();
                    Arc::new(CachedCenterDirectory::new(directory, redis, ttl))
                }
                Err(e) => {
                    warn!("⚠️ Redis no disponible, directorio sin cache: {}", e);
                    directory
                }
            }
        }
        None => directory,
    };

    let settings = AssignmentSettings {
        policy: config.selection_policy,
        fallback_center_id: config.fallback_center_id.clone(),
    };
    info!(
        policy = ?settings.policy,
        fallback = %settings.fallback_center_id,
        "🎯 Política de asignación configurada"
    );

    Ok(BookingService::new(
        bookings,
        logs,
        directory,
        MirrorUpdater::new(mirror, config.mirror_timeout),
        settings,
    ))
}

/// Stores de reservas, logs y centros del backend elegido
struct Storage {
    bookings: Arc<dyn BookingRepository>,
    logs: Arc<dyn AuditLogSink>,
    local_directory: Arc<dyn CenterDirectory>,
    mirror: Arc<dyn CenterMirror>,
}

impl Storage {
    fn postgres(pool: PgPool, timeout: Duration) -> Self {
        Self {
            bookings: Arc::new(PgBookingRepository::new(pool.clone(), timeout)),
            logs: Arc::new(PgAuditLogSink::new(pool.clone(), timeout)),
            local_directory: Arc::new(PgCenterDirectory::new(pool.clone(), timeout)),
            mirror: Arc::new(PgCenterMirror::new(pool)),
        }
    }

    fn memory() -> Self {
        let centers = Arc::new(InMemoryCenterStore::default());
        Self {
            bookings: Arc::new(InMemoryBookingRepository::new()),
            logs: Arc::new(InMemoryAuditLog::new()),
            local_directory: centers.clone(),
            mirror: centers,
        }
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
