//! In-memory durable-queue adapter.
//!
//! Backs tests and local runs; the production queue binds behind
//! [`DurableQueue`] instead. Redelivery follows the port contract: nak'd
//! messages return to the ready list after a configurable backoff with their
//! redelivery count bumped, acked messages are gone for good.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::error::Result;
use crate::port::queue::{Delivery, DurableQueue};

struct Queued {
    delivery: Delivery,
    not_before: Instant,
}

#[derive(Default)]
struct QueueInner {
    next_id: u64,
    ready: Vec<Queued>,
    /// Fetched but not yet acked or nak'd.
    pending: HashMap<u64, Delivery>,
    acked: u64,
    naked: u64,
    progress_marks: u64,
}

pub struct InMemoryQueue {
    inner: Mutex<QueueInner>,
    notify: Notify,
    redelivery_backoff: Duration,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::with_backoff(Duration::from_millis(0))
    }

    /// Queue whose nak'd messages only become fetchable again after
    /// `redelivery_backoff`.
    #[must_use]
    pub fn with_backoff(redelivery_backoff: Duration) -> Self {
        Self {
            inner: Mutex::new(QueueInner::default()),
            notify: Notify::new(),
            redelivery_backoff,
        }
    }

    pub fn publish(&self, payload: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let delivery = Delivery {
            id: inner.next_id,
            payload: payload.into(),
            redelivery_count: 0,
        };
        inner.ready.push(Queued {
            delivery,
            not_before: Instant::now(),
        });
        drop(inner);
        self.notify.notify_one();
    }

    pub fn acked(&self) -> u64 {
        self.inner.lock().acked
    }

    pub fn naked(&self) -> u64 {
        self.inner.lock().naked
    }

    pub fn progress_marks(&self) -> u64 {
        self.inner.lock().progress_marks
    }

    /// Messages neither acked nor nak'd yet, ready or in flight.
    pub fn depth(&self) -> usize {
        let inner = self.inner.lock();
        inner.ready.len() + inner.pending.len()
    }

    fn pop_due(&self) -> Option<Delivery> {
        let mut inner = self.inner.lock();
        let now = Instant::now();
        let position = inner.ready.iter().position(|q| q.not_before <= now)?;
        let queued = inner.ready.remove(position);
        inner
            .pending
            .insert(queued.delivery.id, queued.delivery.clone());
        Some(queued.delivery)
    }
}

#[async_trait]
impl DurableQueue for InMemoryQueue {
    async fn fetch(&self, max_wait: Duration) -> Result<Option<Delivery>> {
        let deadline = Instant::now() + max_wait;
        loop {
            if let Some(delivery) = self.pop_due() {
                return Ok(Some(delivery));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            // Wake on publish/nak or poll again when a backoff may have
            // elapsed, whichever comes first.
            let wait = (deadline - now).min(Duration::from_millis(10));
            let _ = tokio::time::timeout(wait, self.notify.notified()).await;
        }
    }

    async fn ack(&self, delivery: &Delivery) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.pending.remove(&delivery.id).is_some() {
            inner.acked += 1;
        }
        Ok(())
    }

    async fn nak(&self, delivery: &Delivery) -> Result<()> {
        let redelivery_backoff = self.redelivery_backoff;
        let mut inner = self.inner.lock();
        if let Some(mut message) = inner.pending.remove(&delivery.id) {
            message.redelivery_count += 1;
            inner.naked += 1;
            inner.ready.push(Queued {
                delivery: message,
                not_before: Instant::now() + redelivery_backoff,
            });
            drop(inner);
            self.notify.notify_one();
        }
        Ok(())
    }

    async fn in_progress(&self, _delivery: &Delivery) -> Result<()> {
        self.inner.lock().progress_marks += 1;
        Ok(())
    }
}
