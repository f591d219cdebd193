use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::domain::{PayloadField, ValuationRecord};
use crate::error::{Error, Result};
use crate::port::ValuationRepository;

/// Append-only in-memory valuation repository.
#[derive(Default)]
pub struct InMemoryRepository {
    records: Mutex<Vec<ValuationRecord>>,
    fail_next_insert: AtomicBool,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pre-existing record, e.g. a backdated one for window tests.
    pub fn seed(&self, record: ValuationRecord) {
        self.records.lock().push(record);
    }

    /// Make the next insert fail with a database error.
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<ValuationRecord> {
        self.records.lock().clone()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }
}

impl ValuationRepository for InMemoryRepository {
    fn find_latest_with(
        &self,
        vin: &str,
        field: PayloadField,
    ) -> Result<Option<ValuationRecord>> {
        let records = self.records.lock();
        Ok(records
            .iter()
            .filter(|r| r.vin == vin && r.payload(field).is_some())
            .max_by_key(|r| r.updated_at)
            .cloned())
    }

    fn insert(&self, record: &ValuationRecord) -> Result<()> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(Error::Database("scripted insert failure".to_string()));
        }
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn exists_with(&self, user_device_id: &str, field: PayloadField) -> Result<bool> {
        let records = self.records.lock();
        Ok(records.iter().any(|r| {
            r.user_device_id.as_deref() == Some(user_device_id) && r.payload(field).is_some()
        }))
    }
}
