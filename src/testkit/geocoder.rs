use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::port::geocoder::{GeocodedLocation, Geocoder};

/// Geocoder fake that always resolves to one location, or always fails.
pub struct StaticGeocoder {
    location: Option<GeocodedLocation>,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    #[must_use]
    pub fn resolving(postal_code: &str, country: &str) -> Self {
        Self {
            location: Some(GeocodedLocation {
                postal_code: postal_code.to_string(),
                country: country.to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            location: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn reverse_geocode(&self, _latitude: f64, _longitude: f64) -> Result<GeocodedLocation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.location
            .clone()
            .ok_or_else(|| Error::Geocode("scripted geocode failure".to_string()))
    }
}
