//! Outcomes of an orchestrator pull attempt.

use std::fmt;

/// Terminal outcome of a pull attempt.
///
/// `Skipped` is a normal idempotent no-op, not a failure; error outcomes
/// travel through [`crate::error::Error`] instead so callers cannot confuse
/// the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullStatus {
    PulledValuationDrivly,
    PulledValuationVincario,
    PulledOfferDrivly,
    /// A fresh record already exists inside the re-pull window.
    Skipped,
}

impl PullStatus {
    pub fn is_skipped(self) -> bool {
        matches!(self, PullStatus::Skipped)
    }
}

impl fmt::Display for PullStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PullStatus::PulledValuationDrivly => "pulled-valuation-drivly",
            PullStatus::PulledValuationVincario => "pulled-valuation-vincario",
            PullStatus::PulledOfferDrivly => "pulled-offer-drivly",
            PullStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}
