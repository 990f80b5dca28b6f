//! Yahoo Finance price source.
//!
//! The connector is async; each fetch drives it on a current-thread tokio
//! runtime so callers see a plain blocking port.

use crate::domain::error::AgentError;
use crate::domain::price::{Period, PricePoint, PriceSeries};
use crate::ports::price_port::PriceSourcePort;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

pub struct YahooPriceAdapter;

impl YahooPriceAdapter {
    pub fn new() -> Self {
        Self
    }

    fn unavailable(ticker: &str, reason: impl Into<String>) -> AgentError {
        AgentError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    async fn fetch(
        ticker: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<PriceSeries, AgentError> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| Self::unavailable(ticker, e.to_string()))?;
        let response = provider
            .get_quote_history(ticker, start, end)
            .await
            .map_err(|e| Self::unavailable(ticker, e.to_string()))?;
        let quotes = response
            .quotes()
            .map_err(|e| Self::unavailable(ticker, e.to_string()))?;

        let mut series: PriceSeries = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(PricePoint {
                    date,
                    close: q.close,
                })
            })
            .collect();
        series.sort_by_key(|p| p.date);
        Ok(series)
    }
}

impl Default for YahooPriceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSourcePort for YahooPriceAdapter {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<PriceSeries, AgentError> {
        let now = Utc::now();
        let start_date = period.window_start(now.date_naive());
        let start_ts = start_date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(0);

        let start = OffsetDateTime::from_unix_timestamp(start_ts)
            .map_err(|e| Self::unavailable(ticker, format!("invalid start timestamp: {e}")))?;
        let end = OffsetDateTime::from_unix_timestamp(now.timestamp())
            .map_err(|e| Self::unavailable(ticker, format!("invalid end timestamp: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let series = runtime.block_on(Self::fetch(ticker, start, end))?;

        if series.is_empty() {
            return Err(Self::unavailable(
                ticker,
                format!("No data found for ticker: {ticker}"),
            ));
        }
        debug!(ticker, %period, points = series.len(), "loaded yahoo prices");
        Ok(series)
    }
}
