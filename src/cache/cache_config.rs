//! Configuración de cache

/// Configuración del cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    /// Segundos; corto porque la carga de los centros cambia con cada reserva
    pub default_ttl: u64,
}
