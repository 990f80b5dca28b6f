//! CSV file price source.
//!
//! One file per ticker, `{base_path}/{TICKER}.csv`, with a header row naming at
//! least a `date` and a `close` column. The window for a period ends at the
//! newest row in the file, so results do not depend on today's date.

use crate::domain::error::AgentError;
use crate::domain::price::{Period, PricePoint, PriceSeries};
use crate::ports::price_port::PriceSourcePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }

    fn no_data(ticker: &str) -> AgentError {
        AgentError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("No data found for ticker: {ticker}"),
        }
    }

    fn invalid(ticker: &str, reason: String) -> AgentError {
        AgentError::DataUnavailable {
            ticker: ticker.to_string(),
            reason,
        }
    }

    fn read_all(&self, ticker: &str) -> Result<PriceSeries, AgentError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "price file unreadable");
            Self::no_data(ticker)
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| Self::invalid(ticker, format!("CSV parse error: {e}")))?
            .clone();
        let column = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let date_col = column("date")
            .ok_or_else(|| Self::invalid(ticker, "missing date column".into()))?;
        let close_col = column("close")
            .ok_or_else(|| Self::invalid(ticker, "missing close column".into()))?;

        let mut series = Vec::new();
        for record in rdr.records() {
            let record =
                record.map_err(|e| Self::invalid(ticker, format!("CSV parse error: {e}")))?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            // Timestamps such as "2024-01-02 00:00:00-05:00" keep only the date part.
            let date_part = date_str.get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map_err(|e| Self::invalid(ticker, format!("invalid date '{date_str}': {e}")))?;

            let close_str = record.get(close_col).unwrap_or_default().trim();
            let close: f64 = close_str
                .parse()
                .map_err(|e| Self::invalid(ticker, format!("invalid close '{close_str}': {e}")))?;

            series.push(PricePoint { date, close });
        }

        series.sort_by_key(|p| p.date);
        Ok(series)
    }
}

impl PriceSourcePort for CsvPriceAdapter {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<PriceSeries, AgentError> {
        let mut series = self.read_all(ticker)?;
        let Some(last) = series.last().map(|p| p.date) else {
            return Err(Self::no_data(ticker));
        };
        let start = period.window_start(last);
        series.retain(|p| p.date >= start);
        debug!(ticker, %period, %start, points = series.len(), "loaded csv prices");
        Ok(series)
    }
}
