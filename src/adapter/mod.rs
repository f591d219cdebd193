//! Implementations of ports (hexagonal adapters).

pub mod cache;
pub mod directory;
pub mod drivly;
pub mod geocode;
pub mod queue;
pub mod store;
pub mod vincario;

pub use cache::CachedDirectory;
pub use directory::DirectoryClient;
pub use drivly::DrivlyClient;
pub use geocode::ReverseGeocodeClient;
pub use queue::InMemoryQueue;
pub use vincario::VincarioClient;
