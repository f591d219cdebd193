//! Trait seams for external collaborators (hexagonal ports).

pub mod directory;
pub mod geocoder;
pub mod queue;
pub mod repository;
pub mod vendor;

pub use directory::{Device, DeviceDirectory};
pub use geocoder::{GeocodedLocation, Geocoder};
pub use queue::{Delivery, DurableQueue};
pub use repository::ValuationRepository;
pub use vendor::{MarketVendor, PricingQuery, PricingVendor, VendorResult};
