//! TTL cache over the device directory.
//!
//! Vendor pulls and facade reads both resolve the same device rows; a short
//! TTL keeps repeated lookups off the directory service. Staleness within
//! the TTL is accepted; backfill writes invalidate the entry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::port::directory::{Device, DeviceDirectory};

pub struct CachedDirectory {
    inner: Arc<dyn DeviceDirectory>,
    entries: DashMap<String, (Device, Instant)>,
    ttl: Duration,
}

impl CachedDirectory {
    #[must_use]
    pub fn new(inner: Arc<dyn DeviceDirectory>, ttl: Duration) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            ttl,
        }
    }
}

#[async_trait]
impl DeviceDirectory for CachedDirectory {
    async fn get_device(&self, id: &str) -> Result<Device> {
        if let Some(entry) = self.entries.get(id) {
            let (device, cached_at) = entry.value();
            if cached_at.elapsed() < self.ttl {
                return Ok(device.clone());
            }
        }

        let device = self.inner.get_device(id).await?;
        self.entries
            .insert(id.to_string(), (device.clone(), Instant::now()));
        Ok(device)
    }

    async fn set_postal_code(&self, id: &str, postal_code: &str) -> Result<()> {
        self.inner.set_postal_code(id, postal_code).await?;
        self.entries.remove(id);
        Ok(())
    }

    async fn set_vendor_style(&self, id: &str, style_id: &str) -> Result<()> {
        self.inner.set_vendor_style(id, style_id).await?;
        self.entries.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::StaticDirectory;

    fn device(id: &str) -> Device {
        Device {
            id: id.to_string(),
            vin: Some("1GAHG35R141233251".into()),
            country: "USA".into(),
            postal_code: Some("48226".into()),
            model_year: Some(2021),
            odometer: None,
            latitude: None,
            longitude: None,
            device_definition_id: None,
        }
    }

    #[tokio::test]
    async fn second_lookup_hits_the_cache() {
        let inner = Arc::new(StaticDirectory::new().with_device(device("d1")));
        let cached = CachedDirectory::new(inner.clone(), Duration::from_secs(60));

        cached.get_device("d1").await.unwrap();
        cached.get_device("d1").await.unwrap();

        assert_eq!(inner.lookup_count(), 1);
    }

    #[tokio::test]
    async fn expired_entry_refetches() {
        let inner = Arc::new(StaticDirectory::new().with_device(device("d1")));
        let cached = CachedDirectory::new(inner.clone(), Duration::from_millis(10));

        cached.get_device("d1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        cached.get_device("d1").await.unwrap();

        assert_eq!(inner.lookup_count(), 2);
    }

    #[tokio::test]
    async fn backfill_invalidates_the_entry() {
        let inner = Arc::new(StaticDirectory::new().with_device(device("d1")));
        let cached = CachedDirectory::new(inner.clone(), Duration::from_secs(60));

        cached.get_device("d1").await.unwrap();
        cached.set_postal_code("d1", "10001").await.unwrap();
        let refreshed = cached.get_device("d1").await.unwrap();

        assert_eq!(inner.lookup_count(), 2);
        assert_eq!(refreshed.postal_code.as_deref(), Some("10001"));
    }
}
