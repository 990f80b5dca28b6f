//! Chart rendering port.

use crate::domain::error::AgentError;
use crate::domain::price::{Period, PricePoint};

/// Renders chart artifacts and returns a reference (usually a file path) to each.
pub trait ChartPort {
    fn render_single(
        &self,
        series: &[PricePoint],
        ticker: &str,
        period: Period,
    ) -> Result<String, AgentError>;

    fn render_comparison(
        &self,
        series_a: &[PricePoint],
        series_b: &[PricePoint],
        ticker_a: &str,
        ticker_b: &str,
        period: Period,
    ) -> Result<String, AgentError>;
}
