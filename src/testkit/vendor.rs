use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::domain::Vin;
use crate::error::VendorError;
use crate::port::vendor::{MarketVendor, PricingQuery, PricingVendor, VendorResult};

/// A realistic flat-shape Drivly pricing payload.
pub fn sample_drivly_pricing() -> Value {
    json!({
        "vin": "1GAHG35R141233251",
        "source": "blackbook",
        "retailClean": 42_000,
        "retailAverage": 40_000,
        "retailRough": 36_000,
        "tradeInClean": 34_000,
        "tradeInAverage": 32_000,
        "tradeInRough": 28_000,
    })
}

/// A Drivly offers payload with one usable buyer.
pub fn sample_drivly_offers() -> Value {
    json!({
        "vroom": { "price": 21_000 },
        "carvana": { "declineReason": "Not eligible" },
        "carmax": { "price": 19_500 },
    })
}

/// A Vincario market-value payload.
pub fn sample_vincario_valuation() -> Value {
    json!({
        "vin": "WAUZZZ4V4KA000002",
        "market_price": {
            "price_avg": 20_000,
            "price_above": 24_000,
            "price_below": 16_000,
            "price_currency": "EUR",
        },
        "market_odometer": { "odometer_avg": 80_000, "odometer_unit": "km" },
    })
}

/// Pricing vendor fake fed from per-endpoint scripts. When a script runs
/// dry the sample payload is served, so most tests only script failures.
#[derive(Default)]
pub struct ScriptedPricingVendor {
    pricing: Mutex<VecDeque<VendorResult<Value>>>,
    offers: Mutex<VecDeque<VendorResult<Value>>>,
    edmunds: Mutex<VecDeque<VendorResult<Value>>>,
    pricing_calls: AtomicUsize,
    offers_calls: AtomicUsize,
    edmunds_calls: AtomicUsize,
    queries: Mutex<Vec<PricingQuery>>,
}

impl ScriptedPricingVendor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_pricing(&self, result: VendorResult<Value>) {
        self.pricing.lock().push_back(result);
    }

    pub fn script_offers(&self, result: VendorResult<Value>) {
        self.offers.lock().push_back(result);
    }

    pub fn script_edmunds(&self, result: VendorResult<Value>) {
        self.edmunds.lock().push_back(result);
    }

    pub fn pricing_calls(&self) -> usize {
        self.pricing_calls.load(Ordering::SeqCst)
    }

    pub fn offers_calls(&self) -> usize {
        self.offers_calls.load(Ordering::SeqCst)
    }

    pub fn edmunds_calls(&self) -> usize {
        self.edmunds_calls.load(Ordering::SeqCst)
    }

    /// Queries observed by `fetch_pricing` and `fetch_offers`, in order.
    pub fn queries(&self) -> Vec<PricingQuery> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl PricingVendor for ScriptedPricingVendor {
    async fn fetch_pricing(&self, _vin: &Vin, query: &PricingQuery) -> VendorResult<Value> {
        self.pricing_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.clone());
        self.pricing
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(sample_drivly_pricing()))
    }

    async fn fetch_offers(&self, _vin: &Vin, query: &PricingQuery) -> VendorResult<Value> {
        self.offers_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.clone());
        self.offers
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(sample_drivly_offers()))
    }

    async fn fetch_edmunds(&self, _vin: &Vin) -> VendorResult<Value> {
        self.edmunds_calls.fetch_add(1, Ordering::SeqCst);
        self.edmunds
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "style": { "id": 401_778_613 } })))
    }
}

/// Market vendor fake, same scripting model.
#[derive(Default)]
pub struct ScriptedMarketVendor {
    valuations: Mutex<VecDeque<VendorResult<Value>>>,
    calls: AtomicUsize,
}

impl ScriptedMarketVendor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_valuation(&self, result: VendorResult<Value>) {
        self.valuations.lock().push_back(result);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketVendor for ScriptedMarketVendor {
    async fn fetch_market_valuation(&self, _vin: &Vin) -> VendorResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.valuations
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(sample_vincario_valuation()))
    }
}

/// A generic vendor failure for scripting error paths.
pub fn vendor_failure() -> VendorError {
    VendorError::Malformed("scripted vendor failure".to_string())
}
