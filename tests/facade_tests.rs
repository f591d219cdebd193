//! Facade operations: read projections, offer throttles, and the
//! primary/fallback valuation path.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use valuations::domain::{PullStatus, ValuationRecord, Vin};
use valuations::error::Error;
use valuations::port::directory::Device;
use valuations::service::{DeviceValuationService, ValuationOrchestrator};
use valuations::testkit::{
    vendor_failure, InMemoryRepository, ScriptedMarketVendor, ScriptedPricingVendor,
    StaticDirectory, StaticGeocoder,
};

const VIN: &str = "1GAHG35R141233251";

struct Harness {
    repository: Arc<InMemoryRepository>,
    drivly: Arc<ScriptedPricingVendor>,
    vincario: Arc<ScriptedMarketVendor>,
    facade: DeviceValuationService,
}

fn harness(directory: StaticDirectory) -> Harness {
    let repository = Arc::new(InMemoryRepository::new());
    let directory = Arc::new(directory);
    let drivly = Arc::new(ScriptedPricingVendor::new());
    let vincario = Arc::new(ScriptedMarketVendor::new());
    let orchestrator = Arc::new(ValuationOrchestrator::new(
        repository.clone(),
        directory.clone(),
        drivly.clone(),
        vincario.clone(),
        Arc::new(StaticGeocoder::failing()),
        14,
    ));
    let facade = DeviceValuationService::new(
        repository.clone(),
        directory.clone(),
        orchestrator,
        30,
    );
    Harness {
        repository,
        drivly,
        vincario,
        facade,
    }
}

fn device(id: &str, country: &str) -> Device {
    Device {
        id: id.to_string(),
        vin: Some(VIN.to_string()),
        country: country.to_string(),
        postal_code: Some("48226".to_string()),
        model_year: Some(2021),
        odometer: Some(36_000),
        latitude: None,
        longitude: None,
        device_definition_id: None,
    }
}

fn backdated_offer_record(device_id: &str, age: Duration, payload: serde_json::Value) -> ValuationRecord {
    let vin = Vin::try_new(VIN).unwrap();
    let mut record = ValuationRecord::new(&vin, device_id);
    record.drivly_offer = Some(payload);
    record.created_at = Utc::now() - age;
    record.updated_at = Utc::now() - age;
    record
}

#[tokio::test]
async fn pulled_valuation_shows_up_in_the_read_model() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "USA")));

    let status = h.facade.request_valuation_only("d1").await.unwrap();
    assert_eq!(status, PullStatus::PulledValuationDrivly);

    let view = h.facade.get_valuations("d1").await.unwrap();
    assert_eq!(view.valuation_sets.len(), 1);
    let set = &view.valuation_sets[0];
    // The sample payload carries a blackbook source marker.
    assert_eq!(set.vendor, "drivly:blackbook");
    assert_eq!(set.currency, "USD");
    assert!(set.user_display_price > 0);
}

#[tokio::test]
async fn nothing_pulled_reads_as_empty_not_error() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "USA")));

    let valuations = h.facade.get_valuations("d1").await.unwrap();
    let offers = h.facade.get_offers("d1").await.unwrap();

    assert!(valuations.is_empty());
    assert!(offers.is_empty());
}

#[tokio::test]
async fn device_without_vin_reads_as_empty() {
    let mut d = device("d1", "USA");
    d.vin = None;
    let h = harness(StaticDirectory::new().with_device(d));

    let view = h.facade.get_valuations("d1").await.unwrap();
    assert!(view.is_empty());
}

#[tokio::test]
async fn instant_offer_pull_then_read() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "USA")));

    let status = h.facade.request_instant_offer("d1").await.unwrap();
    assert_eq!(status, PullStatus::PulledOfferDrivly);

    let view = h.facade.get_offers("d1").await.unwrap();
    assert_eq!(view.offer_sets.len(), 1);
    assert!(view.offer_sets[0].offers.iter().any(|o| o.is_usable()));
}

#[tokio::test]
async fn usable_offer_inside_the_throttle_blocks_re_request() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "USA")));

    h.facade.request_instant_offer("d1").await.unwrap();
    let second = h.facade.request_instant_offer("d1").await;

    assert!(matches!(second, Err(Error::AlreadyRequested { days: 30 })));
    assert_eq!(h.drivly.offers_calls(), 1);
}

#[tokio::test]
async fn errored_offer_inside_the_throttle_blocks_with_last_error() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "USA")));
    h.repository.seed(backdated_offer_record(
        "d1",
        Duration::days(2),
        json!({
            "vroom": { "error": "upstream timeout" },
            "carvana": { "error": "upstream timeout" },
        }),
    ));

    let result = h.facade.request_instant_offer("d1").await;

    assert!(matches!(result, Err(Error::LastRequestErrored)));
    assert_eq!(h.drivly.offers_calls(), 0);
}

#[tokio::test]
async fn stale_offer_record_does_not_throttle() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "USA")));
    h.repository.seed(backdated_offer_record(
        "d1",
        Duration::days(31),
        json!({ "vroom": { "price": 21_000 } }),
    ));

    let status = h.facade.request_instant_offer("d1").await.unwrap();

    assert_eq!(status, PullStatus::PulledOfferDrivly);
    assert_eq!(h.drivly.offers_calls(), 1);
}

#[tokio::test]
async fn declined_offers_allow_a_retry() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "USA")));
    h.repository.seed(backdated_offer_record(
        "d1",
        Duration::days(2),
        json!({ "carvana": { "declineReason": "Vehicle too old" } }),
    ));

    let result = h.facade.request_instant_offer("d1").await;

    // Declines are not throttled, but the orchestrator's own dedup window
    // still applies to the fresh record.
    assert!(matches!(result, Ok(PullStatus::Skipped)));
}

#[tokio::test]
async fn offers_outside_north_america_are_unsupported() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "DEU")));

    let result = h.facade.request_instant_offer("d1").await;

    assert!(matches!(result, Err(Error::OffersUnsupported { .. })));
    assert_eq!(h.drivly.offers_calls(), 0);
}

#[tokio::test]
async fn valuation_only_falls_back_to_the_secondary_vendor() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "DEU")));
    h.vincario.script_valuation(Err(vendor_failure()));

    let status = h.facade.request_valuation_only("d1").await.unwrap();

    assert_eq!(status, PullStatus::PulledValuationDrivly);
    assert_eq!(h.vincario.call_count(), 1);
    assert_eq!(h.drivly.pricing_calls(), 1);
}

#[tokio::test]
async fn valuation_only_surfaces_the_error_when_both_vendors_fail() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "DEU")));
    h.vincario.script_valuation(Err(vendor_failure()));
    h.drivly.script_pricing(Err(vendor_failure()));

    let result = h.facade.request_valuation_only("d1").await;

    assert!(matches!(result, Err(Error::Vendor { vendor: "drivly", .. })));
    assert_eq!(h.repository.record_count(), 0);
}

#[tokio::test]
async fn both_vendor_views_project_together() {
    let h = harness(StaticDirectory::new().with_device(device("d1", "USA")));

    // A Drivly pull plus an older Vincario record from before the vehicle
    // moved continents.
    h.facade.request_valuation_only("d1").await.unwrap();
    let vin = Vin::try_new(VIN).unwrap();
    let mut imported = ValuationRecord::new(&vin, "d1");
    imported.vincario = Some(json!({
        "market_price": { "price_avg": 18_000 },
    }));
    imported.updated_at = Utc::now() - Duration::days(60);
    h.repository.seed(imported);

    let view = h.facade.get_valuations("d1").await.unwrap();
    let vendors: Vec<_> = view
        .valuation_sets
        .iter()
        .map(|s| s.vendor.as_str())
        .collect();
    assert_eq!(vendors, vec!["drivly:blackbook", "vincario"]);
}
