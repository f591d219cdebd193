//! Persisted valuation pull records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::vin::Vin;

/// The vendor payload columns a record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadField {
    DrivlyPricing,
    DrivlyOffer,
    Edmunds,
    Vincario,
}

impl PayloadField {
    pub fn column(self) -> &'static str {
        match self {
            PayloadField::DrivlyPricing => "drivly_pricing",
            PayloadField::DrivlyOffer => "drivly_offer",
            PayloadField::Edmunds => "edmunds",
            PayloadField::Vincario => "vincario",
        }
    }
}

/// Snapshot of the inputs used for a vendor pull, written once at pull time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    pub mileage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// True when the mileage came from the age-based estimate rather than
    /// an observed odometer reading.
    #[serde(default)]
    pub mileage_estimated: bool,
}

/// One row per pull attempt per VIN.
///
/// Records are append-only: a vendor attempt either produces a brand-new
/// record or is skipped, and no row is ever mutated after insert. Each
/// payload column is set at most once, at creation, by the orchestrator that
/// owns that vendor; `None` means "not pulled from that vendor for this
/// record".
#[derive(Debug, Clone)]
pub struct ValuationRecord {
    pub id: Uuid,
    pub vin: String,
    pub user_device_id: Option<String>,
    pub vehicle_token_id: Option<i64>,
    pub request_metadata: Option<Value>,
    pub drivly_pricing: Option<Value>,
    pub drivly_offer: Option<Value>,
    pub edmunds: Option<Value>,
    pub vincario: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ValuationRecord {
    pub fn new(vin: &Vin, user_device_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            vin: vin.as_str().to_string(),
            user_device_id: Some(user_device_id.to_string()),
            vehicle_token_id: None,
            request_metadata: None,
            drivly_pricing: None,
            drivly_offer: None,
            edmunds: None,
            vincario: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn payload(&self, field: PayloadField) -> Option<&Value> {
        match field {
            PayloadField::DrivlyPricing => self.drivly_pricing.as_ref(),
            PayloadField::DrivlyOffer => self.drivly_offer.as_ref(),
            PayloadField::Edmunds => self.edmunds.as_ref(),
            PayloadField::Vincario => self.vincario.as_ref(),
        }
    }

    /// Parse the request-metadata snapshot, tolerating older shapes.
    pub fn metadata(&self) -> Option<RequestMetadata> {
        self.request_metadata
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}
