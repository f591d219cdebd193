//! Vendor client ports.
//!
//! The pipeline treats vendor APIs as opaque fetch functions returning raw
//! JSON; payloads are persisted as-is and only interpreted at projection
//! time, so vendor schema drift never breaks the write path.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Vin;
use crate::error::VendorError;

pub type VendorResult<T> = std::result::Result<T, VendorError>;

/// Inputs forwarded with a pricing or offer call.
#[derive(Debug, Clone, Default)]
pub struct PricingQuery {
    pub mileage: Option<i64>,
    pub zip_code: Option<String>,
}

/// Drivly-style vendor: VIN pricing, instant offers, and Edmunds enrichment.
#[async_trait]
pub trait PricingVendor: Send + Sync {
    async fn fetch_pricing(&self, vin: &Vin, query: &PricingQuery) -> VendorResult<Value>;

    async fn fetch_offers(&self, vin: &Vin, query: &PricingQuery) -> VendorResult<Value>;

    /// Edmunds enrichment data; fetched opportunistically, once per device
    /// lifetime, and never fatal to a pull.
    async fn fetch_edmunds(&self, vin: &Vin) -> VendorResult<Value>;
}

/// Vincario-style vendor: aggregate market valuation only.
#[async_trait]
pub trait MarketVendor: Send + Sync {
    async fn fetch_market_valuation(&self, vin: &Vin) -> VendorResult<Value>;
}
