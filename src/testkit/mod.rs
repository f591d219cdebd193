//! Scripted fakes for the port traits, used by unit and integration tests.
//!
//! Enabled via the `testkit` feature (always on under `cfg(test)`).

mod directory;
mod geocoder;
mod repository;
mod vendor;

pub use directory::StaticDirectory;
pub use geocoder::StaticGeocoder;
pub use repository::InMemoryRepository;
pub use vendor::{
    sample_drivly_offers, sample_drivly_pricing, sample_vincario_valuation, vendor_failure,
    ScriptedMarketVendor, ScriptedPricingVendor,
};
