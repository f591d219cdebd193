//! Canonical instant-offer view model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One sub-vendor's offer entry.
///
/// Price, decline reason and error are independent, non-exclusive fields: a
/// vendor can simultaneously report a price-ineligible decline reason and an
/// upstream error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub vendor: String,
    pub price: Option<i64>,
    pub decline_reason: Option<String>,
    pub error: Option<String>,
}

impl Offer {
    pub fn is_usable(&self) -> bool {
        matches!(self.price, Some(price) if price > 0)
    }
}

/// Offers from one source, normalized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSet {
    pub source: String,
    pub updated: DateTime<Utc>,
    pub mileage: Option<i64>,
    pub zip_code: Option<String>,
    pub offers: Vec<Offer>,
}

/// All offer sets for one vehicle; empty means "no offers pulled yet".
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceOffer {
    pub offer_sets: Vec<OfferSet>,
}

impl DeviceOffer {
    pub fn is_empty(&self) -> bool {
        self.offer_sets.is_empty()
    }
}
