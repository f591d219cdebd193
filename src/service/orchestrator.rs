//! Vendor pull orchestration.
//!
//! Decides whether a fresh vendor pull is warranted, fetches, and persists —
//! idempotently with respect to repeated invocation for the same VIN inside
//! the re-pull window. Vendor failures are never retried here; cadence is
//! owned by the window and by the facade's explicit re-request throttles.

use std::sync::Arc;

use chrono::{Datelike, Duration, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{
    estimate_mileage, PayloadField, PullStatus, RequestMetadata, ValuationRecord, Vendor, Vin,
};
use crate::error::{Error, Result};
use crate::port::directory::{Device, DeviceDirectory};
use crate::port::vendor::{MarketVendor, PricingQuery, PricingVendor};
use crate::port::{Geocoder, ValuationRepository};

pub struct ValuationOrchestrator {
    repository: Arc<dyn ValuationRepository>,
    directory: Arc<dyn DeviceDirectory>,
    drivly: Arc<dyn PricingVendor>,
    vincario: Arc<dyn MarketVendor>,
    geocoder: Arc<dyn Geocoder>,
    repull_window: Duration,
}

impl ValuationOrchestrator {
    pub fn new(
        repository: Arc<dyn ValuationRepository>,
        directory: Arc<dyn DeviceDirectory>,
        drivly: Arc<dyn PricingVendor>,
        vincario: Arc<dyn MarketVendor>,
        geocoder: Arc<dyn Geocoder>,
        repull_window_days: i64,
    ) -> Self {
        Self {
            repository,
            directory,
            drivly,
            vincario,
            geocoder,
            repull_window: Duration::days(repull_window_days),
        }
    }

    /// Pull a valuation for the VIN, routed by the owning device's country.
    pub async fn pull_valuation(&self, vin: &str, user_device_id: &str) -> Result<PullStatus> {
        let vin = Vin::try_new(vin)?;
        let device = self.directory.get_device(user_device_id).await?;
        match Vendor::for_country(&device.country) {
            Vendor::Drivly => self.pull_drivly_valuation(&vin, &device).await,
            Vendor::Vincario => self.pull_vincario_valuation(&vin, &device).await,
        }
    }

    /// Pull an instant offer for the VIN (Drivly, North America only).
    pub async fn pull_offer(&self, vin: &str, user_device_id: &str) -> Result<PullStatus> {
        let vin = Vin::try_new(vin)?;
        let device = self.directory.get_device(user_device_id).await?;
        self.pull_drivly_offer(&vin, &device).await
    }

    pub async fn pull_drivly_valuation(&self, vin: &Vin, device: &Device) -> Result<PullStatus> {
        if self.inside_repull_window(vin, PayloadField::DrivlyPricing)? {
            return Ok(PullStatus::Skipped);
        }

        let (metadata, query) = self.request_inputs(device).await;
        let pricing = self
            .drivly
            .fetch_pricing(vin, &query)
            .await
            .map_err(|source| Error::Vendor {
                vendor: "drivly",
                vin: vin.to_string(),
                source,
            })?;

        // Opportunistic; never fatal to the pull.
        let edmunds = self.edmunds_enrichment(vin, device).await;

        let mut record = ValuationRecord::new(vin, &device.id);
        record.request_metadata = Some(serde_json::to_value(&metadata)?);
        record.drivly_pricing = Some(pricing);
        record.edmunds = edmunds;
        self.repository.insert(&record)?;

        info!(vin = %vin, device_id = %device.id, "pulled drivly valuation");
        Ok(PullStatus::PulledValuationDrivly)
    }

    pub async fn pull_vincario_valuation(&self, vin: &Vin, device: &Device) -> Result<PullStatus> {
        // Drivly owns North America; Vincario never runs there.
        if Vendor::for_country(&device.country) == Vendor::Drivly {
            return Ok(PullStatus::Skipped);
        }
        if self.inside_repull_window(vin, PayloadField::Vincario)? {
            return Ok(PullStatus::Skipped);
        }

        let (metadata, _query) = self.request_inputs(device).await;
        let valuation = self
            .vincario
            .fetch_market_valuation(vin)
            .await
            .map_err(|source| Error::Vendor {
                vendor: "vincario",
                vin: vin.to_string(),
                source,
            })?;

        let mut record = ValuationRecord::new(vin, &device.id);
        record.request_metadata = Some(serde_json::to_value(&metadata)?);
        record.vincario = Some(valuation);
        self.repository.insert(&record)?;

        info!(vin = %vin, device_id = %device.id, "pulled vincario valuation");
        Ok(PullStatus::PulledValuationVincario)
    }

    pub async fn pull_drivly_offer(&self, vin: &Vin, device: &Device) -> Result<PullStatus> {
        if Vendor::for_country(&device.country) != Vendor::Drivly {
            return Err(Error::OffersUnsupported {
                country: device.country.clone(),
            });
        }
        if self.inside_repull_window(vin, PayloadField::DrivlyOffer)? {
            return Ok(PullStatus::Skipped);
        }

        let (metadata, query) = self.request_inputs(device).await;
        let offers = self
            .drivly
            .fetch_offers(vin, &query)
            .await
            .map_err(|source| Error::Vendor {
                vendor: "drivly",
                vin: vin.to_string(),
                source,
            })?;

        let mut record = ValuationRecord::new(vin, &device.id);
        record.request_metadata = Some(serde_json::to_value(&metadata)?);
        record.drivly_offer = Some(offers);
        self.repository.insert(&record)?;

        info!(vin = %vin, device_id = %device.id, "pulled drivly offers");
        Ok(PullStatus::PulledOfferDrivly)
    }

    /// The dedup invariant: at most one live pull per VIN per vendor per
    /// re-pull window.
    fn inside_repull_window(&self, vin: &Vin, field: PayloadField) -> Result<bool> {
        match self.repository.find_latest_with(vin.as_str(), field)? {
            Some(latest) => Ok(latest.updated_at + self.repull_window > Utc::now()),
            None => Ok(false),
        }
    }

    /// Compute the mileage and postal code forwarded to the vendor, plus the
    /// metadata snapshot persisted with the record.
    async fn request_inputs(&self, device: &Device) -> (RequestMetadata, PricingQuery) {
        let (mileage, mileage_estimated) = match device.odometer {
            Some(observed) => (Some(observed), false),
            None => {
                let estimate = device
                    .model_year
                    .map(|model_year| estimate_mileage(model_year, Utc::now().year()));
                (estimate, true)
            }
        };

        let zip_code = match &device.postal_code {
            Some(postal_code) => Some(postal_code.clone()),
            None => self.lookup_postal_code(device).await,
        };

        let metadata = RequestMetadata {
            mileage,
            zip_code: zip_code.clone(),
            mileage_estimated,
        };
        let query = PricingQuery { mileage, zip_code };
        (metadata, query)
    }

    async fn lookup_postal_code(&self, device: &Device) -> Option<String> {
        let latitude = device.latitude?;
        let longitude = device.longitude?;

        match self.geocoder.reverse_geocode(latitude, longitude).await {
            Ok(location) => {
                if let Err(e) = self
                    .directory
                    .set_postal_code(&device.id, &location.postal_code)
                    .await
                {
                    warn!(device_id = %device.id, error = %e, "failed to cache postal code onto device");
                }
                Some(location.postal_code)
            }
            Err(e) => {
                warn!(device_id = %device.id, error = %e, "reverse geocoding failed");
                None
            }
        }
    }

    /// Fetch Edmunds enrichment once per device lifetime and backfill the
    /// style identifier. Every failure path logs and returns `None`.
    async fn edmunds_enrichment(&self, vin: &Vin, device: &Device) -> Option<Value> {
        match self.repository.exists_with(&device.id, PayloadField::Edmunds) {
            Ok(true) => return None,
            Ok(false) => {}
            Err(e) => {
                warn!(device_id = %device.id, error = %e, "edmunds lifetime check failed");
                return None;
            }
        }

        match self.drivly.fetch_edmunds(vin).await {
            Ok(payload) => {
                if let Some(style_id) = extract_style_id(&payload) {
                    if let Err(e) = self.directory.set_vendor_style(&device.id, &style_id).await {
                        warn!(device_id = %device.id, error = %e, "failed to backfill vendor style");
                    }
                }
                Some(payload)
            }
            Err(e) => {
                warn!(vin = %vin, error = %e, "edmunds enrichment fetch failed");
                None
            }
        }
    }
}

/// Read the Edmunds style identifier, tolerating both the nested and flat
/// shapes the vendor has emitted.
fn extract_style_id(payload: &Value) -> Option<String> {
    let value = payload
        .pointer("/style/id")
        .or_else(|| payload.get("styleId"))?;
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn style_id_from_nested_shape() {
        let payload = json!({ "style": { "id": 401_778_613 } });
        assert_eq!(extract_style_id(&payload).as_deref(), Some("401778613"));
    }

    #[test]
    fn style_id_from_flat_shape() {
        let payload = json!({ "styleId": "401778613" });
        assert_eq!(extract_style_id(&payload).as_deref(), Some("401778613"));
    }

    #[test]
    fn style_id_absent() {
        assert_eq!(extract_style_id(&json!({ "make": "Chevrolet" })), None);
    }
}
