//! Persistence port for valuation records.

use crate::domain::{PayloadField, ValuationRecord};
use crate::error::Result;

/// Append-only storage for valuation pull records.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Rows are never updated or deleted; freshness questions are answered by
///   the most recent row carrying the payload in question
/// - `find_latest_with` must order by `updated_at` descending so the re-pull
///   window check sees the newest attempt
pub trait ValuationRepository: Send + Sync {
    /// Most recent record for `vin` whose `field` payload is populated.
    fn find_latest_with(&self, vin: &str, field: PayloadField)
        -> Result<Option<ValuationRecord>>;

    /// Append a new record.
    fn insert(&self, record: &ValuationRecord) -> Result<()>;

    /// Whether any record for the device carries the given payload,
    /// regardless of age.
    fn exists_with(&self, user_device_id: &str, field: PayloadField) -> Result<bool>;
}
