//! Application services: pull orchestration, queue consumption, projection,
//! and the device-facing facade.

pub mod consumer;
pub mod facade;
pub mod orchestrator;
pub mod projector;

pub use consumer::{Disposition, QueueConsumer, RevaluationRequest};
pub use facade::DeviceValuationService;
pub use orchestrator::ValuationOrchestrator;
pub use projector::{project_offers, project_valuations};
