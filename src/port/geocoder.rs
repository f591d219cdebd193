//! Reverse-geocoding port.

use async_trait::async_trait;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct GeocodedLocation {
    pub postal_code: String,
    pub country: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<GeocodedLocation>;
}
