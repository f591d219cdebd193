//! Vendor-agnostic domain types and rules.

pub mod country;
pub mod mileage;
pub mod offer;
pub mod record;
pub mod status;
pub mod valuation;
pub mod vin;

pub use country::{Vendor, NORTH_AMERICA};
pub use mileage::estimate_mileage;
pub use offer::{DeviceOffer, Offer, OfferSet};
pub use record::{PayloadField, RequestMetadata, ValuationRecord};
pub use status::PullStatus;
pub use valuation::{DeviceValuation, OdometerSource, PriceBand, ValuationSet};
pub use vin::Vin;
