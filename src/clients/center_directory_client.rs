//! Cliente HTTP para el directorio remoto de centros
//!
//! `GET {base}/get-center-by-name/{empresa}` devuelve un array de centros.
//! El servicio remoto puede estar en cold start, por eso el timeout es largo.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::models::ServiceCenter;
use crate::services::center_directory::{CenterDirectory, DirectoryError};

/// Centro tal como lo devuelve la API remota
#[derive(Debug, Deserialize)]
struct RemoteCenter {
    #[serde(rename = "_id", default)]
    raw_id: Option<serde_json::Value>,
    #[serde(rename = "centerId", default)]
    center_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    capacity: i32,
    #[serde(default)]
    bookings: Vec<serde_json::Value>,
    #[serde(default)]
    is_active: bool,
}

impl From<RemoteCenter> for ServiceCenter {
    fn from(remote: RemoteCenter) -> Self {
        // centerId manda; si falta, un _id de tipo string
        let id = remote
            .center_id
            .filter(|id| !id.trim().is_empty())
            .or_else(|| match remote.raw_id {
                Some(serde_json::Value::String(id)) => Some(id),
                _ => None,
            })
            .unwrap_or_default();

        ServiceCenter {
            id,
            name: remote.name,
            location: remote.location,
            capacity: remote.capacity,
            is_active: remote.is_active,
            current_bookings: remote.bookings.len(),
        }
    }
}

pub struct HttpCenterDirectory {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCenterDirectory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn lookup_url(&self, scope: &str) -> String {
        format!("{}/get-center-by-name/{}", self.base_url, urlencoding::encode(scope))
    }
}

#[async_trait]
impl CenterDirectory for HttpCenterDirectory {
    async fn list_candidates(&self, scope: &str) -> Result<Vec<ServiceCenter>, DirectoryError> {
        let url = self.lookup_url(scope);
        log::info!("🌐 Consultando centros en: {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "BookingIntake/1.0")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DirectoryError::Timeout(self.timeout)
                } else {
                    DirectoryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        log::info!("📡 Directorio respondió: {}", status);
        if !status.is_success() {
            log::error!("❌ Directorio de centros falló con status {}", status);
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                DirectoryError::Timeout(self.timeout)
            } else {
                DirectoryError::Transport(e.to_string())
            }
        })?;

        let centers: Vec<RemoteCenter> =
            serde_json::from_str(&body).map_err(|e| DirectoryError::Payload(e.to_string()))?;

        log::info!("✅ {} centros recibidos para '{}'", centers.len(), scope);
        Ok(centers.into_iter().map(ServiceCenter::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_center_mapping() {
        let remote: RemoteCenter = serde_json::from_value(json!({
            "_id": { "$oid": "65a1" },
            "centerId": "SC_01",
            "name": "PQR Motors North",
            "location": "Lyon",
            "capacity": 10,
            "specializations": ["engine"],
            "bookings": [{ "vehicleId": "PQR_1" }, { "vehicleId": "PQR_2" }],
            "is_active": true
        }))
        .unwrap();

        let center = ServiceCenter::from(remote);
        assert_eq!(center.id, "SC_01");
        assert_eq!(center.current_bookings, 2);
        assert_eq!(center.free_capacity(), 8);
        assert!(center.is_active);
    }

    #[test]
    fn test_remote_center_falls_back_to_string_id() {
        let remote: RemoteCenter = serde_json::from_value(json!({ "_id": "abc123", "name": "X" })).unwrap();
        assert_eq!(ServiceCenter::from(remote).id, "abc123");

        let remote: RemoteCenter = serde_json::from_value(json!({ "_id": { "$oid": "1" } })).unwrap();
        assert_eq!(ServiceCenter::from(remote).id, "");
    }

    #[test]
    fn test_lookup_url_is_encoded() {
        let directory = HttpCenterDirectory::new("https://admin.example.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            directory.lookup_url("PQR GROUP"),
            "https://admin.example.com/get-center-by-name/PQR%20GROUP"
        );
    }
}
