//! Drivly-style vendor REST client.
//!
//! Fetches pricing, instant offers, and Edmunds enrichment for a VIN. The
//! response body is kept as raw JSON; the projector owns interpretation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::domain::Vin;
use crate::error::VendorError;
use crate::port::vendor::{PricingQuery, PricingVendor, VendorResult};

pub struct DrivlyClient {
    client: Client,
    base_url: String,
    api_key: String,
    /// Per-request timeout; the offers endpoint is slow.
    timeout: Duration,
}

impl DrivlyClient {
    #[must_use]
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            timeout,
        }
    }

    async fn get_json(&self, vin: &Vin, url: String, query: &[(&str, String)]) -> VendorResult<Value> {
        debug!(url = %url, "fetching from drivly");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(VendorError::NoData {
                vin: vin.to_string(),
            }),
            status if status.is_success() => Ok(response.json().await?),
            status => Err(VendorError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    fn pricing_params(query: &PricingQuery) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(mileage) = query.mileage {
            params.push(("mileage", mileage.to_string()));
        }
        if let Some(zip) = &query.zip_code {
            params.push(("zipcode", zip.clone()));
        }
        params
    }
}

#[async_trait]
impl PricingVendor for DrivlyClient {
    async fn fetch_pricing(&self, vin: &Vin, query: &PricingQuery) -> VendorResult<Value> {
        let url = format!("{}/api/vin/{}/pricing", self.base_url, vin);
        self.get_json(vin, url, &Self::pricing_params(query)).await
    }

    async fn fetch_offers(&self, vin: &Vin, query: &PricingQuery) -> VendorResult<Value> {
        let url = format!("{}/api/vin/{}/offers", self.base_url, vin);
        self.get_json(vin, url, &Self::pricing_params(query)).await
    }

    async fn fetch_edmunds(&self, vin: &Vin) -> VendorResult<Value> {
        let url = format!("{}/api/vin/{}/edmunds", self.base_url, vin);
        self.get_json(vin, url, &[]).await
    }
}
