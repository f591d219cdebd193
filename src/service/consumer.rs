//! Durable-queue consumer for revaluation requests.
//!
//! One message, one VIN. Faulty messages are isolated: a bad payload or an
//! unresolvable device naks the message for redelivery, while anything past
//! that point acks regardless of outcome because the re-pull window, not
//! queue redelivery, owns retry cadence for vendor traffic.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{Vendor, Vin};
use crate::error::Result;
use crate::port::{Delivery, DeviceDirectory, DurableQueue};

use super::orchestrator::ValuationOrchestrator;

/// Wire shape of a revaluation request message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevaluationRequest {
    pub vin: String,
    pub user_device_id: String,
}

/// What to do with a delivery once handling finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ack,
    Nak,
}

pub struct QueueConsumer {
    queue: Arc<dyn DurableQueue>,
    directory: Arc<dyn DeviceDirectory>,
    orchestrator: Arc<ValuationOrchestrator>,
    fetch_wait: Duration,
}

impl QueueConsumer {
    pub fn new(
        queue: Arc<dyn DurableQueue>,
        directory: Arc<dyn DeviceDirectory>,
        orchestrator: Arc<ValuationOrchestrator>,
        fetch_wait: Duration,
    ) -> Self {
        Self {
            queue,
            directory,
            orchestrator,
            fetch_wait,
        }
    }

    /// Consume until the shutdown signal flips. Individual message failures
    /// never terminate the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("revaluation consumer started");
        loop {
            if *shutdown.borrow() {
                info!("revaluation consumer stopping");
                return Ok(());
            }

            let fetched = tokio::select! {
                fetched = self.queue.fetch(self.fetch_wait) => match fetched {
                    Ok(fetched) => fetched,
                    Err(e) => {
                        warn!(error = %e, "queue fetch failed");
                        continue;
                    }
                },
                _ = shutdown.changed() => continue,
            };

            let Some(delivery) = fetched else {
                continue;
            };

            let outcome = match self.handle(&delivery).await {
                Disposition::Ack => self.queue.ack(&delivery).await,
                Disposition::Nak => self.queue.nak(&delivery).await,
            };
            if let Err(e) = outcome {
                warn!(delivery_id = delivery.id, error = %e, "failed to settle delivery");
            }
        }
    }

    async fn handle(&self, delivery: &Delivery) -> Disposition {
        if delivery.redelivery_count > 0 {
            debug!(
                delivery_id = delivery.id,
                redeliveries = delivery.redelivery_count,
                "handling redelivered message"
            );
        }

        let request: RevaluationRequest = match serde_json::from_str(&delivery.payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(delivery_id = delivery.id, error = %e, "malformed revaluation request");
                return Disposition::Nak;
            }
        };

        let device = match self.directory.get_device(&request.user_device_id).await {
            Ok(device) => device,
            Err(e) => {
                warn!(
                    device_id = %request.user_device_id,
                    error = %e,
                    "device lookup failed"
                );
                return Disposition::Nak;
            }
        };

        // Vendor calls can outlive the delivery's redelivery deadline.
        if let Err(e) = self.queue.in_progress(delivery).await {
            warn!(delivery_id = delivery.id, error = %e, "failed to extend delivery deadline");
        }

        let vin = match Vin::try_new(&request.vin) {
            Ok(vin) => vin,
            Err(e) => {
                warn!(vin = %request.vin, error = %e, "rejected revaluation request");
                return Disposition::Ack;
            }
        };

        let pulled = match Vendor::for_country(&device.country) {
            Vendor::Drivly => self.orchestrator.pull_drivly_valuation(&vin, &device).await,
            Vendor::Vincario => {
                self.orchestrator
                    .pull_vincario_valuation(&vin, &device)
                    .await
            }
        };

        match pulled {
            Ok(status) => {
                info!(vin = %vin, device_id = %device.id, status = %status, "revaluation handled");
            }
            Err(e) => {
                warn!(vin = %vin, device_id = %device.id, error = %e, "revaluation pull failed");
            }
        }
        Disposition::Ack
    }
}
