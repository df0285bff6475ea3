//! Cache del directorio de centros
//!
//! Decorador sobre cualquier `CenterDirectory`. Útil con el directorio remoto,
//! que puede tardar decenas de segundos en cold start. El TTL debe ser corto:
//! la carga de un centro cambia con cada reserva replicada.
//! Si Redis falla se consulta el directorio directamente.
//!
//! Mientras una entrada vive, las cargas no se actualizan: todas las
//! auto-asignaciones de esa empresa eligen el mismo centro "menos cargado"
//! durante `CENTER_CACHE_TTL_SECS` (15 s por defecto). Con tráfico alto
//! conviene bajar el TTL o no configurar `REDIS_URL`.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::CacheOperations;
use crate::models::ServiceCenter;
use crate::services::center_directory::{CenterDirectory, DirectoryError};

pub fn centers_cache_key(scope: &str) -> String {
    format!("booking_intake:centers:{}", scope.to_lowercase())
}

pub struct CachedCenterDirectory<C> {
    inner: Arc<dyn CenterDirectory>,
    cache: C,
    ttl: u64,
}

impl<C: CacheOperations> CachedCenterDirectory<C> {
    pub fn new(inner: Arc<dyn CenterDirectory>, cache: C, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl<C: CacheOperations> CenterDirectory for CachedCenterDirectory<C> {
    async fn list_candidates(&self, scope: &str) -> Result<Vec<ServiceCenter>, DirectoryError> {
        let key = centers_cache_key(scope);

        match self.cache.get::<Vec<ServiceCenter>>(&key).await {
            Ok(Some(centers)) => {
                debug!(scope, count = centers.len(), "📥 Centros desde cache");
                return Ok(centers);
            }
            Ok(None) => {}
            Err(e) => warn!(scope, error = %e, "⚠️ Cache de centros no disponible"),
        }

        let centers = self.inner.list_candidates(scope).await?;

        if let Err(e) = self.cache.set(&key, &centers, self.ttl).await {
            warn!(scope, error = %e, "⚠️ No se pudo guardar centros en cache");
        }
        Ok(centers)
    }
}
