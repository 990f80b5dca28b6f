//! Historical price source port.

use crate::domain::error::AgentError;
use crate::domain::price::{Period, PriceSeries};

pub trait PriceSourcePort {
    /// Daily close prices for `ticker` covering `period`, oldest first.
    ///
    /// Unknown tickers and empty windows are errors; the executor records
    /// the error text verbatim.
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<PriceSeries, AgentError>;
}
