//! Reverse-geocoding REST client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::port::geocoder::{GeocodedLocation, Geocoder};

pub struct ReverseGeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ReverseGeocodeClient {
    #[must_use]
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl Geocoder for ReverseGeocodeClient {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<GeocodedLocation> {
        let url = format!("{}/reverse", self.base_url);
        debug!(latitude, longitude, "reverse geocoding");

        let body: Value = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Geocode(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Geocode(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::Geocode(e.to_string()))?;

        let postal_code = body
            .get("postalCode")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Geocode("response carried no postal code".into()))?;
        let country = body
            .get("country")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(GeocodedLocation {
            postal_code: postal_code.to_string(),
            country: country.to_string(),
        })
    }
}
