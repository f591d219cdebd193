//! Vincario-style vendor REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::domain::Vin;
use crate::error::VendorError;
use crate::port::vendor::{MarketVendor, VendorResult};

pub struct VincarioClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl VincarioClient {
    #[must_use]
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl MarketVendor for VincarioClient {
    async fn fetch_market_valuation(&self, vin: &Vin) -> VendorResult<Value> {
        let url = format!("{}/vehicle-market-value/{}", self.base_url, vin);
        debug!(url = %url, "fetching from vincario");

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
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
}
