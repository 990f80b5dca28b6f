//! Natural-language summary port.

use crate::domain::summary::SummaryPayload;

pub trait SummaryPort {
    /// Short prose summary of `payload`, or `None` when disabled or unavailable.
    /// Implementations never fail; the report falls back to a fixed sentence.
    fn summarize(&self, payload: &SummaryPayload, enabled: bool) -> Option<String>;
}
