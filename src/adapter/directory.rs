//! HTTP client for the device/vehicle directory service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::port::directory::{Device, DeviceDirectory};

pub struct DirectoryClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Wire shape of a directory device row.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceDto {
    id: String,
    vin: Option<String>,
    #[serde(default)]
    country_code: String,
    postal_code: Option<String>,
    model_year: Option<i32>,
    odometer: Option<i64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    device_definition_id: Option<String>,
}

impl From<DeviceDto> for Device {
    fn from(dto: DeviceDto) -> Self {
        Device {
            id: dto.id,
            vin: dto.vin,
            country: dto.country_code,
            postal_code: dto.postal_code,
            model_year: dto.model_year,
            odometer: dto.odometer,
            latitude: dto.latitude,
            longitude: dto.longitude,
            device_definition_id: dto.device_definition_id,
        }
    }
}

impl DirectoryClient {
    #[must_use]
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    async fn patch_device(&self, id: &str, body: serde_json::Value) -> Result<()> {
        let url = format!("{}/devices/{}", self.base_url, id);
        self.client
            .patch(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::DeviceNotFound {
                device_id: id.to_string(),
                reason: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| Error::DeviceNotFound {
                device_id: id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl DeviceDirectory for DirectoryClient {
    async fn get_device(&self, id: &str) -> Result<Device> {
        let url = format!("{}/devices/{}", self.base_url, id);
        debug!(device_id = %id, "fetching device from directory");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| Error::DeviceNotFound {
                device_id: id.to_string(),
                reason: e.to_string(),
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::DeviceNotFound {
                device_id: id.to_string(),
                reason: "no such device".into(),
            }),
            status if status.is_success() => {
                let dto: DeviceDto = response.json().await.map_err(|e| Error::DeviceNotFound {
                    device_id: id.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(dto.into())
            }
            status => Err(Error::DeviceNotFound {
                device_id: id.to_string(),
                reason: format!("directory returned status {status}"),
            }),
        }
    }

    async fn set_postal_code(&self, id: &str, postal_code: &str) -> Result<()> {
        self.patch_device(id, json!({ "postalCode": postal_code }))
            .await
    }

    async fn set_vendor_style(&self, id: &str, style_id: &str) -> Result<()> {
        self.patch_device(id, json!({ "vendorStyleId": style_id }))
            .await
    }
}
