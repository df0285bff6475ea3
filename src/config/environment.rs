//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables tienen
//! valor por defecto salvo `DATABASE_URL` cuando el backend es PostgreSQL.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::services::assignment::SelectionPolicy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Dónde se guardan reservas, logs y centros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

/// De dónde salen los centros candidatos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryBackend {
    /// Consulta local a la tabla service_centers
    Database,
    /// API remota de asignación
    Http,
}

impl FromStr for DirectoryBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(DirectoryBackend::Database),
            "http" | "remote" => Ok(DirectoryBackend::Http),
            _ => Err(()),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub storage_backend: StorageBackend,
    pub center_directory: DirectoryBackend,
    pub center_directory_url: String,
    pub directory_timeout: Duration,
    pub store_timeout: Duration,
    pub mirror_timeout: Duration,
    pub shutdown_drain: Duration,
    pub selection_policy: SelectionPolicy,
    pub fallback_center_id: String,
    pub redis_url: Option<String>,
    pub center_cache_ttl: u64,
    pub cors_origins: Vec<String>,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Leer la configuración de una fuente arbitraria (útil en tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage_backend = parse_or(&get, "STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database_url = get("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 8080)?,
            database_url,
            storage_backend,
            center_directory: parse_or(&get, "CENTER_DIRECTORY", DirectoryBackend::Database)?,
            center_directory_url: get("CENTER_DIRECTORY_URL")
                .unwrap_or_else(|| "https://admin-ey-1.onrender.com".to_string()),
            directory_timeout: Duration::from_secs(parse_or(&get, "DIRECTORY_TIMEOUT_SECS", 30)?),
            store_timeout: Duration::from_secs(parse_or(&get, "STORE_TIMEOUT_SECS", 10)?),
            mirror_timeout: Duration::from_secs(parse_or(&get, "MIRROR_TIMEOUT_SECS", 5)?),
            shutdown_drain: Duration::from_secs(parse_or(&get, "SHUTDOWN_DRAIN_SECS", 10)?),
            selection_policy: parse_or(&get, "SELECTION_POLICY", SelectionPolicy::LeastLoad)?,
            fallback_center_id: get("FALLBACK_CENTER_ID").unwrap_or_else(|| "CENTER_DEFAULT".to_string()),
            redis_url: get("REDIS_URL"),
            center_cache_ttl: parse_or(&get, "CENTER_CACHE_TTL_SECS", 15)?,
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<EnvironmentConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/bookings")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.storage_backend, StorageBackend::Postgres);
        assert_eq!(cfg.center_directory, DirectoryBackend::Database);
        assert_eq!(cfg.directory_timeout, Duration::from_secs(30));
        assert_eq!(cfg.mirror_timeout, Duration::from_secs(5));
        assert_eq!(cfg.selection_policy, SelectionPolicy::LeastLoad);
        assert_eq!(cfg.fallback_center_id, "CENTER_DEFAULT");
        assert!(cfg.redis_url.is_none());
        assert!(cfg.cors_origins.is_empty());
        assert!(cfg.is_development());
    }

    #[test]
    fn test_database_url_required_for_postgres() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
        assert!(config(&[("STORAGE_BACKEND", "memory")]).is_ok());
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = config(&[("STORAGE_BACKEND", "memory"), ("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "PORT",
                value: "eighty".to_string()
            }
        );

        let err = config(&[("STORAGE_BACKEND", "memory"), ("SELECTION_POLICY", "random")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SELECTION_POLICY", .. }));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("STORAGE_BACKEND", "memory"),
            ("CENTER_DIRECTORY", "http"),
            ("SELECTION_POLICY", "max_free_capacity"),
            ("FALLBACK_CENTER_ID", "SC_FALLBACK"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("PORT", "3000"),
        ])
        .unwrap();

        assert_eq!(cfg.center_directory, DirectoryBackend::Http);
        assert_eq!(cfg.selection_policy, SelectionPolicy::MaxFreeCapacity);
        assert_eq!(cfg.fallback_center_id, "SC_FALLBACK");
        assert_eq!(cfg.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(cfg.server_url(), "0.0.0.0:3000");
    }
}
