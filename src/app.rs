//! Application wiring: builds the adapter stack and runs the consumer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::adapter::store::{create_pool, run_migrations, DieselValuationRepository};
use crate::adapter::{CachedDirectory, DirectoryClient, DrivlyClient, ReverseGeocodeClient, VincarioClient};
use crate::config::Config;
use crate::error::Result;
use crate::port::{DeviceDirectory, DurableQueue, ValuationRepository};
use crate::service::{DeviceValuationService, QueueConsumer, ValuationOrchestrator};

/// Main application struct.
pub struct App;

impl App {
    /// Run the revaluation consumer until the process is signalled.
    pub async fn run(config: Config, queue: Arc<dyn DurableQueue>) -> Result<()> {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        Self::run_with_shutdown(config, queue, shutdown_rx).await
    }

    /// Run the revaluation consumer until `shutdown` flips to true.
    pub async fn run_with_shutdown(
        config: Config,
        queue: Arc<dyn DurableQueue>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let components = Components::build(&config)?;
        info!(database = %config.database, "valuation pipeline started");

        let consumer = QueueConsumer::new(
            queue,
            components.directory.clone(),
            components.orchestrator.clone(),
            Duration::from_secs(config.pipeline.fetch_wait_secs),
        );
        consumer.run(shutdown).await
    }
}

/// The wired service graph, shared by the consumer and any facade host.
pub struct Components {
    pub repository: Arc<dyn ValuationRepository>,
    pub directory: Arc<dyn DeviceDirectory>,
    pub orchestrator: Arc<ValuationOrchestrator>,
    pub facade: Arc<DeviceValuationService>,
}

impl Components {
    pub fn build(config: &Config) -> Result<Self> {
        let pool = create_pool(&config.database)?;
        run_migrations(&pool)?;
        let repository: Arc<dyn ValuationRepository> =
            Arc::new(DieselValuationRepository::new(pool));

        let vendor_timeout = Duration::from_secs(config.pipeline.vendor_timeout_secs);
        let drivly = Arc::new(DrivlyClient::new(
            config.drivly.base_url.clone(),
            config.drivly.api_key.clone(),
            vendor_timeout,
        ));
        let vincario = Arc::new(VincarioClient::new(
            config.vincario.base_url.clone(),
            config.vincario.api_key.clone(),
            vendor_timeout,
        ));
        let geocoder = Arc::new(ReverseGeocodeClient::new(
            config.geocoder.base_url.clone(),
            config.geocoder.api_key.clone(),
        ));

        let directory_client = Arc::new(DirectoryClient::new(
            config.directory.base_url.clone(),
            config.directory.api_key.clone(),
        ));
        let directory: Arc<dyn DeviceDirectory> = Arc::new(CachedDirectory::new(
            directory_client,
            Duration::from_secs(config.pipeline.device_cache_ttl_secs),
        ));

        let orchestrator = Arc::new(ValuationOrchestrator::new(
            repository.clone(),
            directory.clone(),
            drivly,
            vincario,
            geocoder,
            config.pipeline.repull_window_days,
        ));

        let facade = Arc::new(DeviceValuationService::new(
            repository.clone(),
            directory.clone(),
            orchestrator.clone(),
            config.pipeline.offer_throttle_days,
        ));

        Ok(Self {
            repository,
            directory,
            orchestrator,
            facade,
        })
    }
}
