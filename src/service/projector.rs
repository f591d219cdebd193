//! Projection of stored vendor payloads into the read-model types.
//!
//! Vendor payloads are persisted verbatim, so the projector has to tolerate
//! every shape the vendors have actually emitted: flat and nested band
//! figures, numbers encoded as strings, and zero standing in for absent.

use serde_json::Value;

use crate::domain::{
    DeviceOffer, DeviceValuation, Offer, OfferSet, PriceBand, RequestMetadata, OdometerSource,
    ValuationRecord, ValuationSet,
};

/// Offer buyers Drivly aggregates, in display order.
const OFFER_VENDORS: [&str; 3] = ["vroom", "carvana", "carmax"];

/// Project the latest per-vendor valuation records into the device read
/// model. Records with no usable figures yield no set.
pub fn project_valuations(records: &[ValuationRecord]) -> DeviceValuation {
    let mut valuation_sets = Vec::new();
    for record in records {
        if let Some(payload) = &record.drivly_pricing {
            if let Some(set) = drivly_set(payload, record) {
                valuation_sets.push(set);
            }
        }
        if let Some(payload) = &record.vincario {
            if let Some(set) = vincario_set(payload, record) {
                valuation_sets.push(set);
            }
        }
    }
    DeviceValuation { valuation_sets }
}

/// Project the latest offer record into the device read model.
pub fn project_offers(record: Option<&ValuationRecord>) -> DeviceOffer {
    let Some(record) = record else {
        return DeviceOffer::default();
    };
    let Some(payload) = &record.drivly_offer else {
        return DeviceOffer::default();
    };

    // Some responses wrap the buyer entries in an "offers" object.
    let root = payload.get("offers").unwrap_or(payload);

    let offers: Vec<Offer> = OFFER_VENDORS
        .iter()
        .filter_map(|vendor| {
            let entry = root.get(*vendor)?;
            Some(Offer {
                vendor: (*vendor).to_string(),
                price: number_at(entry.get("price")),
                decline_reason: string_at(entry.get("declineReason")),
                error: string_at(entry.get("error")),
            })
        })
        .collect();

    if offers.is_empty() {
        return DeviceOffer::default();
    }

    let metadata = record.metadata().unwrap_or_default();
    DeviceOffer {
        offer_sets: vec![OfferSet {
            source: "drivly".to_string(),
            updated: record.updated_at,
            mileage: metadata.mileage,
            zip_code: metadata.zip_code,
            offers,
        }],
    }
}

fn drivly_set(payload: &Value, record: &ValuationRecord) -> Option<ValuationSet> {
    let retail = resolve_band(payload, &["retail"]);
    let trade_in = resolve_band(payload, &["tradeIn", "trade"]);
    if retail.resolved == 0 && trade_in.resolved == 0 {
        return None;
    }

    let vendor = match string_at(payload.get("source")) {
        Some(source) => format!("drivly:{source}"),
        None => "drivly".to_string(),
    };

    let metadata = record.metadata().unwrap_or_default();
    let (odometer, odometer_source) = metadata_odometer(&metadata);

    Some(ValuationSet {
        vendor,
        updated: record.updated_at,
        mileage: metadata.mileage,
        zip_code: metadata.zip_code,
        currency: "USD".to_string(),
        user_display_price: display_price(&retail, &trade_in),
        trade_in,
        retail,
        odometer,
        odometer_source,
    })
}

fn vincario_set(payload: &Value, record: &ValuationRecord) -> Option<ValuationSet> {
    let average = vincario_figure(payload, "price_avg");
    let clean = vincario_figure(payload, "price_above");
    let rough = vincario_figure(payload, "price_below");

    let retail = PriceBand::resolve(clean, average, rough);
    if retail.resolved == 0 {
        return None;
    }
    let trade_in = PriceBand::default();

    let metadata = record.metadata().unwrap_or_default();
    let (odometer, odometer_source) =
        match number_at(payload.pointer("/market_odometer/odometer_avg")) {
            Some(market_avg) => (Some(market_avg), OdometerSource::Market),
            None => metadata_odometer(&metadata),
        };

    Some(ValuationSet {
        vendor: "vincario".to_string(),
        updated: record.updated_at,
        mileage: metadata.mileage,
        zip_code: metadata.zip_code,
        currency: "EUR".to_string(),
        user_display_price: retail.resolved,
        trade_in,
        retail,
        odometer,
        odometer_source,
    })
}

/// Resolve a price band from a Drivly payload, trying each base key in turn
/// for both the flat (`retailClean`) and nested (`retail.clean`) shapes.
fn resolve_band(payload: &Value, bases: &[&str]) -> PriceBand {
    let average = band_figure(payload, bases, "average");
    let clean = band_figure(payload, bases, "clean");
    let rough = band_figure(payload, bases, "rough");

    let mut band = PriceBand::resolve(clean, average, rough);
    if band.resolved == 0 {
        // Some sources return a single scalar under the base key.
        if let Some(scalar) = bases.iter().find_map(|base| number_at(payload.get(*base))) {
            band.resolved = scalar;
        }
    }
    band
}

fn band_figure(payload: &Value, bases: &[&str], suffix: &str) -> Option<i64> {
    for base in bases {
        let flat = format!("{base}{}", capitalize(suffix));
        if let Some(n) = number_at(payload.get(flat.as_str())) {
            return Some(n);
        }
        if let Some(n) = number_at(payload.get(*base).and_then(|v| v.get(suffix))) {
            return Some(n);
        }
    }
    None
}

fn vincario_figure(payload: &Value, key: &str) -> Option<i64> {
    number_at(payload.pointer(&format!("/market_price/{key}")))
        .or_else(|| number_at(payload.get(format!("market_{key}").as_str())))
}

/// The price shown to the user: the rounded mean of retail and trade-in when
/// both are usable, otherwise whichever one is.
fn display_price(retail: &PriceBand, trade_in: &PriceBand) -> i64 {
    match (retail.is_usable(), trade_in.is_usable()) {
        (true, true) => {
            let mean = (retail.resolved as f64 + trade_in.resolved as f64) / 2.0;
            mean.round() as i64
        }
        (true, false) => retail.resolved,
        (false, true) => trade_in.resolved,
        (false, false) => 0,
    }
}

fn metadata_odometer(metadata: &RequestMetadata) -> (Option<i64>, OdometerSource) {
    let source = if metadata.mileage_estimated {
        OdometerSource::Estimated
    } else {
        OdometerSource::Real
    };
    (metadata.mileage, source)
}

/// Read a figure that may arrive as a JSON number or a numeric string.
/// Zero means "no data" in every vendor payload we ingest.
fn number_at(value: Option<&Value>) -> Option<i64> {
    let value = value?;
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let rounded = n.round() as i64;
    (rounded != 0).then_some(rounded)
}

fn string_at(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Vin;
    use serde_json::json;

    fn record_with_pricing(payload: Value) -> ValuationRecord {
        let vin = Vin::try_new("1GAHG35R141233251").unwrap();
        let mut record = ValuationRecord::new(&vin, "device-1");
        record.request_metadata = Some(json!({
            "mileage": 36000,
            "zipCode": "10001",
            "mileageEstimated": false,
        }));
        record.drivly_pricing = Some(payload);
        record
    }

    fn record_with_vincario(payload: Value) -> ValuationRecord {
        let vin = Vin::try_new("1GAHG35R141233251").unwrap();
        let mut record = ValuationRecord::new(&vin, "device-1");
        record.vincario = Some(payload);
        record
    }

    #[test]
    fn trade_in_band_averages_clean_and_rough() {
        let record = record_with_pricing(json!({
            "tradeInClean": 10000,
            "tradeInRough": 8000,
        }));
        let projected = project_valuations(std::slice::from_ref(&record));
        assert_eq!(projected.valuation_sets.len(), 1);
        assert_eq!(projected.valuation_sets[0].trade_in.resolved, 9000);
    }

    #[test]
    fn retail_only_payload_displays_retail() {
        let record = record_with_pricing(json!({ "retail": { "average": 40000 } }));
        let projected = project_valuations(std::slice::from_ref(&record));
        let set = &projected.valuation_sets[0];
        assert_eq!(set.vendor, "drivly");
        assert_eq!(set.retail.resolved, 40000);
        assert_eq!(set.user_display_price, 40000);
    }

    #[test]
    fn display_price_is_rounded_mean_of_both_bands() {
        let record = record_with_pricing(json!({
            "retailAverage": 40001,
            "tradeInAverage": 30000,
        }));
        let projected = project_valuations(std::slice::from_ref(&record));
        // (40001 + 30000) / 2 = 35000.5, rounds up.
        assert_eq!(projected.valuation_sets[0].user_display_price, 35001);
    }

    #[test]
    fn zero_figures_yield_no_set() {
        let record = record_with_pricing(json!({
            "retailAverage": 0,
            "tradeInAverage": 0,
        }));
        let projected = project_valuations(std::slice::from_ref(&record));
        assert!(projected.is_empty());
    }

    #[test]
    fn numeric_strings_are_parsed() {
        let record = record_with_pricing(json!({ "retailAverage": "40000" }));
        let projected = project_valuations(std::slice::from_ref(&record));
        assert_eq!(projected.valuation_sets[0].retail.resolved, 40000);
    }

    #[test]
    fn source_becomes_composite_vendor_name() {
        let record = record_with_pricing(json!({
            "source": "blackbook",
            "retailAverage": 40000,
        }));
        let projected = project_valuations(std::slice::from_ref(&record));
        assert_eq!(projected.valuation_sets[0].vendor, "drivly:blackbook");
    }

    #[test]
    fn vincario_maps_market_price_bands() {
        let record = record_with_vincario(json!({
            "market_price": {
                "price_avg": 20000,
                "price_above": 24000,
                "price_below": 16000,
            },
            "market_odometer": { "odometer_avg": 80000 },
        }));
        let projected = project_valuations(std::slice::from_ref(&record));
        let set = &projected.valuation_sets[0];
        assert_eq!(set.vendor, "vincario");
        assert_eq!(set.currency, "EUR");
        assert_eq!(set.retail.resolved, 20000);
        assert_eq!(set.retail.clean, Some(24000));
        assert_eq!(set.retail.rough, Some(16000));
        assert_eq!(set.user_display_price, 20000);
        assert_eq!(set.odometer, Some(80000));
        assert_eq!(set.odometer_source, OdometerSource::Market);
    }

    #[test]
    fn offers_project_prices_and_decline_reasons() {
        let vin = Vin::try_new("1GAHG35R141233251").unwrap();
        let mut record = ValuationRecord::new(&vin, "device-1");
        record.drivly_offer = Some(json!({
            "vroom": { "price": 21000 },
            "carvana": { "declineReason": "Vehicle too old" },
            "carmax": { "error": "timeout" },
        }));

        let projected = project_offers(Some(&record));
        assert_eq!(projected.offer_sets.len(), 1);
        let offers = &projected.offer_sets[0].offers;
        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].price, Some(21000));
        assert!(offers[0].is_usable());
        assert_eq!(offers[1].decline_reason.as_deref(), Some("Vehicle too old"));
        assert!(!offers[1].is_usable());
        assert_eq!(offers[2].error.as_deref(), Some("timeout"));
    }

    #[test]
    fn no_offer_record_projects_empty() {
        let projected = project_offers(None);
        assert!(projected.is_empty());
    }
}
