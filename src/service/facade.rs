//! Device-facing valuation operations.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::warn;

use crate::domain::{DeviceOffer, DeviceValuation, PayloadField, PullStatus, Vendor, Vin};
use crate::error::{Error, Result};
use crate::port::directory::Device;
use crate::port::{DeviceDirectory, ValuationRepository};

use super::orchestrator::ValuationOrchestrator;
use super::projector::{project_offers, project_valuations};

pub struct DeviceValuationService {
    repository: Arc<dyn ValuationRepository>,
    directory: Arc<dyn DeviceDirectory>,
    orchestrator: Arc<ValuationOrchestrator>,
    offer_throttle: Duration,
}

impl DeviceValuationService {
    pub fn new(
        repository: Arc<dyn ValuationRepository>,
        directory: Arc<dyn DeviceDirectory>,
        orchestrator: Arc<ValuationOrchestrator>,
        offer_throttle_days: i64,
    ) -> Self {
        Self {
            repository,
            directory,
            orchestrator,
            offer_throttle: Duration::days(offer_throttle_days),
        }
    }

    /// The current valuation view for a device. Devices with no VIN or no
    /// stored pulls get an empty view, never an error.
    pub async fn get_valuations(&self, user_device_id: &str) -> Result<DeviceValuation> {
        let device = self.directory.get_device(user_device_id).await?;
        let Some(vin) = &device.vin else {
            return Ok(DeviceValuation::default());
        };

        let mut records = Vec::new();
        for field in [PayloadField::DrivlyPricing, PayloadField::Vincario] {
            if let Some(record) = self.repository.find_latest_with(vin, field)? {
                records.push(record);
            }
        }
        Ok(project_valuations(&records))
    }

    /// The current instant-offer view for a device.
    pub async fn get_offers(&self, user_device_id: &str) -> Result<DeviceOffer> {
        let device = self.directory.get_device(user_device_id).await?;
        let Some(vin) = &device.vin else {
            return Ok(DeviceOffer::default());
        };

        let latest = self
            .repository
            .find_latest_with(vin, PayloadField::DrivlyOffer)?;
        Ok(project_offers(latest.as_ref()))
    }

    /// Request a fresh instant-offer pull, subject to the re-request
    /// throttle. Only Drivly countries are eligible.
    pub async fn request_instant_offer(&self, user_device_id: &str) -> Result<PullStatus> {
        let device = self.directory.get_device(user_device_id).await?;
        if Vendor::for_country(&device.country) != Vendor::Drivly {
            return Err(Error::OffersUnsupported {
                country: device.country.clone(),
            });
        }
        let vin = device_vin(&device)?;

        self.check_offer_throttle(vin.as_str())?;
        self.orchestrator.pull_offer(vin.as_str(), &device.id).await
    }

    /// Request a fresh valuation pull for the device's home vendor, falling
    /// back to the other vendor when the primary fails.
    pub async fn request_valuation_only(&self, user_device_id: &str) -> Result<PullStatus> {
        let device = self.directory.get_device(user_device_id).await?;
        let vin = device_vin(&device)?;

        let primary = Vendor::for_country(&device.country);
        match self.pull_for(primary, &vin, &device).await {
            Ok(status) => Ok(status),
            Err(e) => {
                warn!(
                    vin = %vin,
                    vendor = primary.id(),
                    error = %e,
                    "primary valuation pull failed, trying fallback"
                );
                self.pull_for(primary.secondary(), &vin, &device).await
            }
        }
    }

    async fn pull_for(&self, vendor: Vendor, vin: &Vin, device: &Device) -> Result<PullStatus> {
        match vendor {
            Vendor::Drivly => self.orchestrator.pull_drivly_valuation(vin, device).await,
            Vendor::Vincario => self.orchestrator.pull_vincario_valuation(vin, device).await,
        }
    }

    /// A device may re-request offers only when the last attempt inside the
    /// throttle window produced no usable offer and no error-free response.
    fn check_offer_throttle(&self, vin: &str) -> Result<()> {
        let Some(latest) = self
            .repository
            .find_latest_with(vin, PayloadField::DrivlyOffer)?
        else {
            return Ok(());
        };
        if latest.updated_at + self.offer_throttle <= Utc::now() {
            return Ok(());
        }

        let projected = project_offers(Some(&latest));
        let offers: Vec<_> = projected
            .offer_sets
            .iter()
            .flat_map(|set| set.offers.iter())
            .collect();

        if offers.iter().any(|offer| offer.is_usable()) {
            return Err(Error::AlreadyRequested {
                days: self.offer_throttle.num_days(),
            });
        }
        if !offers.is_empty() && offers.iter().all(|offer| offer.error.is_some()) {
            return Err(Error::LastRequestErrored);
        }
        // Declines without usable prices or errors: let the user retry.
        Ok(())
    }
}

fn device_vin(device: &Device) -> Result<Vin> {
    let vin = device.vin.as_deref().ok_or_else(|| Error::DeviceNotFound {
        device_id: device.id.clone(),
        reason: "device has no VIN".to_string(),
    })?;
    Vin::try_new(vin)
}
