//! Canonical valuation view model, derived from stored vendor payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// How the odometer figure attached to a valuation was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OdometerSource {
    /// Observed odometer reading from the vehicle.
    Real,
    /// Age-based estimate computed at pull time.
    Estimated,
    /// Aggregate market odometer reported by the vendor.
    Market,
}

/// Clean/average/rough price figures plus the resolved top-level figure.
///
/// Figures are whole currency units; `resolved` follows the precedence
/// explicit average, mean of present clean/rough, single available figure,
/// and is 0 when the vendor reported nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBand {
    pub clean: Option<i64>,
    pub average: Option<i64>,
    pub rough: Option<i64>,
    pub resolved: i64,
}

impl PriceBand {
    /// Build a band from figures that have already had zero filtered to
    /// `None`, applying the resolution precedence.
    pub fn resolve(clean: Option<i64>, average: Option<i64>, rough: Option<i64>) -> Self {
        let resolved = match (average, clean, rough) {
            (Some(avg), _, _) => avg,
            (None, Some(c), Some(r)) => ((c as f64 + r as f64) / 2.0).round() as i64,
            (None, Some(c), None) => c,
            (None, None, Some(r)) => r,
            (None, None, None) => 0,
        };
        Self {
            clean,
            average,
            rough,
            resolved,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.resolved > 0
    }
}

/// One vendor's normalized valuation entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSet {
    /// Provenance, including composite forms like `drivly:blackbook` when
    /// the vendor payload itself selected a sub-vendor.
    pub vendor: String,
    pub updated: DateTime<Utc>,
    pub mileage: Option<i64>,
    pub zip_code: Option<String>,
    pub currency: String,
    pub trade_in: PriceBand,
    pub retail: PriceBand,
    /// Rounded mean of resolved retail and trade-in when both are usable,
    /// otherwise whichever one is.
    pub user_display_price: i64,
    pub odometer: Option<i64>,
    pub odometer_source: OdometerSource,
}

/// All valuation sets for one vehicle. Empty is a normal "nothing pulled
/// yet" state, never an error.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceValuation {
    pub valuation_sets: Vec<ValuationSet>,
}

impl DeviceValuation {
    pub fn is_empty(&self) -> bool {
        self.valuation_sets.is_empty()
    }
}
