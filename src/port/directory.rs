//! Device/vehicle directory port.

use async_trait::async_trait;

use crate::error::Result;

/// A vehicle/device row as the directory service reports it.
#[derive(Debug, Clone)]
pub struct Device {
    pub id: String,
    pub vin: Option<String>,
    /// ISO-3166 alpha-3 country code.
    pub country: String,
    pub postal_code: Option<String>,
    pub model_year: Option<i32>,
    /// Last observed odometer reading, in miles.
    pub odometer: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device_definition_id: Option<String>,
}

/// Lookup and backfill access to the vehicle directory.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn get_device(&self, id: &str) -> Result<Device>;

    /// Cache a reverse-geocoded postal code back onto the device record.
    async fn set_postal_code(&self, id: &str, postal_code: &str) -> Result<()>;

    /// Backfill the vendor style identifier extracted from enrichment data.
    async fn set_vendor_style(&self, id: &str, style_id: &str) -> Result<()>;
}
