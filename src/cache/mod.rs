//! Cache
//!
//! Cliente Redis y cache de corta duración para el directorio de centros.

pub mod cache_config;
pub mod center_cache;
pub mod redis_client;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

pub use cache_config::CacheConfig;
pub use center_cache::CachedCenterDirectory;
pub use redis_client::RedisClient;

/// Operaciones de cache clave/valor con TTL
#[async_trait::async_trait]
pub trait CacheOperations: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: u64) -> Result<()>;
}
