//! Diesel store integration tests against a file-backed SQLite database.
//!
//! The pool hands out multiple connections, so `:memory:` (one database per
//! connection) is unusable here; each test gets its own temp file.

use chrono::{Duration, Utc};
use serde_json::json;
use tempfile::TempDir;

use valuations::adapter::store::{create_pool, run_migrations, DieselValuationRepository};
use valuations::domain::{PayloadField, ValuationRecord, Vin};
use valuations::port::ValuationRepository;

const VIN: &str = "1GAHG35R141233251";

fn repository(dir: &TempDir) -> DieselValuationRepository {
    let path = dir.path().join("valuations.db");
    let pool = create_pool(path.to_str().unwrap()).unwrap();
    run_migrations(&pool).unwrap();
    DieselValuationRepository::new(pool)
}

fn pricing_record(vin: &str, device_id: &str) -> ValuationRecord {
    let vin = Vin::try_new(vin).unwrap();
    let mut record = ValuationRecord::new(&vin, device_id);
    record.request_metadata = Some(json!({
        "mileage": 36_000,
        "zipCode": "48226",
        "mileageEstimated": false,
    }));
    record.drivly_pricing = Some(json!({ "retailAverage": 40_000 }));
    record
}

#[test]
fn insert_then_find_round_trips_payloads() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);

    let record = pricing_record(VIN, "d1");
    repo.insert(&record).unwrap();

    let found = repo
        .find_latest_with(VIN, PayloadField::DrivlyPricing)
        .unwrap()
        .expect("record should be found");

    assert_eq!(found.id, record.id);
    assert_eq!(found.vin, VIN);
    assert_eq!(found.user_device_id.as_deref(), Some("d1"));
    assert_eq!(found.drivly_pricing, record.drivly_pricing);
    let metadata = found.metadata().unwrap();
    assert_eq!(metadata.mileage, Some(36_000));
    assert_eq!(metadata.zip_code.as_deref(), Some("48226"));
}

#[test]
fn find_latest_orders_by_updated_at() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);

    let mut older = pricing_record(VIN, "d1");
    older.created_at = Utc::now() - Duration::days(20);
    older.updated_at = Utc::now() - Duration::days(20);
    let newer = pricing_record(VIN, "d1");

    repo.insert(&older).unwrap();
    repo.insert(&newer).unwrap();

    let found = repo
        .find_latest_with(VIN, PayloadField::DrivlyPricing)
        .unwrap()
        .unwrap();
    assert_eq!(found.id, newer.id);
}

#[test]
fn find_latest_filters_by_payload_field() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);

    // Newest record carries only an offer payload.
    let pricing = pricing_record(VIN, "d1");
    repo.insert(&pricing).unwrap();

    let vin = Vin::try_new(VIN).unwrap();
    let mut offer = ValuationRecord::new(&vin, "d1");
    offer.drivly_offer = Some(json!({ "vroom": { "price": 21_000 } }));
    offer.updated_at = Utc::now() + Duration::seconds(5);
    repo.insert(&offer).unwrap();

    let latest_pricing = repo
        .find_latest_with(VIN, PayloadField::DrivlyPricing)
        .unwrap()
        .unwrap();
    assert_eq!(latest_pricing.id, pricing.id);

    let latest_offer = repo
        .find_latest_with(VIN, PayloadField::DrivlyOffer)
        .unwrap()
        .unwrap();
    assert_eq!(latest_offer.id, offer.id);

    assert!(repo
        .find_latest_with(VIN, PayloadField::Vincario)
        .unwrap()
        .is_none());
}

#[test]
fn find_latest_scopes_by_vin() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);

    repo.insert(&pricing_record(VIN, "d1")).unwrap();

    let other = repo
        .find_latest_with("WAUZZZ4V4KA000002", PayloadField::DrivlyPricing)
        .unwrap();
    assert!(other.is_none());
}

#[test]
fn exists_with_tracks_device_payload_history() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);

    let vin = Vin::try_new(VIN).unwrap();
    let mut record = ValuationRecord::new(&vin, "d1");
    record.edmunds = Some(json!({ "style": { "id": 401_778_613 } }));
    repo.insert(&record).unwrap();

    assert!(repo.exists_with("d1", PayloadField::Edmunds).unwrap());
    assert!(!repo.exists_with("d1", PayloadField::Vincario).unwrap());
    assert!(!repo.exists_with("d2", PayloadField::Edmunds).unwrap());
}
