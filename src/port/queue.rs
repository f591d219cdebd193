//! Durable queue port.
//!
//! Mirrors the primitives of a durable pull subscription: bounded-wait
//! fetch, positive/negative acknowledgment, and an in-progress extension of
//! the ack deadline for long-running work. Delivery is at-least-once and
//! unordered; the orchestrator's idempotent dedup check is what makes
//! duplicate or out-of-order delivery safe.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// A message fetched from the queue, identified for acknowledgment routing.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub id: u64,
    pub payload: String,
    /// Number of prior deliveries of this message. Observability only; it
    /// never changes handling.
    pub redelivery_count: u32,
}

#[async_trait]
pub trait DurableQueue: Send + Sync {
    /// Fetch the next message, waiting up to `max_wait`.
    ///
    /// A wait that elapses with nothing to deliver returns `Ok(None)`; it is
    /// not an error.
    async fn fetch(&self, max_wait: Duration) -> Result<Option<Delivery>>;

    /// Positively acknowledge: the message is done and never redelivered.
    async fn ack(&self, delivery: &Delivery) -> Result<()>;

    /// Negatively acknowledge: the queue schedules redelivery after a
    /// backoff it owns.
    async fn nak(&self, delivery: &Delivery) -> Result<()>;

    /// Signal the message is being worked on, extending its ack deadline.
    async fn in_progress(&self, delivery: &Delivery) -> Result<()>;
}
