use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{Error, Result};
use crate::port::directory::{Device, DeviceDirectory};

/// In-memory device directory with per-call counters.
#[derive(Default)]
pub struct StaticDirectory {
    devices: DashMap<String, Device>,
    lookups: AtomicUsize,
    fail_lookups: AtomicBool,
    styles: DashMap<String, String>,
}

impl StaticDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_device(self, device: Device) -> Self {
        self.devices.insert(device.id.clone(), device);
        self
    }

    /// Make every subsequent lookup fail with `DeviceNotFound`.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// The last vendor style backfilled for a device, if any.
    pub fn vendor_style(&self, id: &str) -> Option<String> {
        self.styles.get(id).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl DeviceDirectory for StaticDirectory {
    async fn get_device(&self, id: &str) -> Result<Device> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(Error::DeviceNotFound {
                device_id: id.to_string(),
                reason: "scripted lookup failure".to_string(),
            });
        }
        self.devices
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::DeviceNotFound {
                device_id: id.to_string(),
                reason: "no such device".to_string(),
            })
    }

    async fn set_postal_code(&self, id: &str, postal_code: &str) -> Result<()> {
        let mut entry = self.devices.get_mut(id).ok_or_else(|| Error::DeviceNotFound {
            device_id: id.to_string(),
            reason: "no such device".to_string(),
        })?;
        entry.value_mut().postal_code = Some(postal_code.to_string());
        Ok(())
    }

    async fn set_vendor_style(&self, id: &str, style_id: &str) -> Result<()> {
        self.styles.insert(id.to_string(), style_id.to_string());
        Ok(())
    }
}
