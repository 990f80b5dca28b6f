//! Structured metrics bundle handed to summary generators.

use super::metrics::{ComparisonReason, MetricsResult, Winner};
use super::price::start_end_close;
use super::store::RunStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    Single,
    Comparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerSummary {
    pub ticker: String,
    pub metrics: MetricsResult,
    pub start_close: Option<f64>,
    pub end_close: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub winner: Winner,
    pub reason: ComparisonReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPayload {
    pub mode: SummaryMode,
    pub period: String,
    pub tickers: Vec<TickerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonSummary>,
}

impl SummaryPayload {
    /// Builds the payload from whatever the run recorded for `tickers`.
    /// Missing metrics appear as undefined values rather than being dropped.
    pub fn from_store(store: &RunStore, tickers: &[&str], period: &str) -> Self {
        let mode = if tickers.len() == 2 {
            SummaryMode::Comparison
        } else {
            SummaryMode::Single
        };

        let tickers = tickers
            .iter()
            .map(|&ticker| {
                let (start_close, end_close) = store
                    .data(ticker)
                    .and_then(|s| start_end_close(s))
                    .map_or((None, None), |(s, e)| (Some(s), Some(e)));
                TickerSummary {
                    ticker: ticker.to_string(),
                    metrics: store.metrics(ticker).copied().unwrap_or_default(),
                    start_close,
                    end_close,
                }
            })
            .collect();

        let comparison = match mode {
            SummaryMode::Comparison => store.comparison().map(|c| ComparisonSummary {
                winner: c.winner.clone(),
                reason: c.reason,
            }),
            SummaryMode::Single => None,
        };

        Self {
            mode,
            period: period.to_string(),
            tickers,
            comparison,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
