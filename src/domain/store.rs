//! Run-scoped results shared between the executor and the reporting side.
//!
//! One writer per run: only [`crate::domain::executor::Agent`] takes
//! `&mut RunStore`. Reporting receives `&RunStore`. Ticker entries keep the
//! order in which they were first written, which is also the order used when
//! picking the two sides of a comparison.

use super::metrics::{ComparisonResult, MetricsResult};
use super::price::{Period, PriceSeries};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Ok,
    Error,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Ok => f.write_str("ok"),
            FetchStatus::Error => f.write_str("error"),
        }
    }
}

/// Everything recorded for one ticker during a run.
#[derive(Debug, Clone, Default)]
pub struct TickerRecord {
    pub status: Option<FetchStatus>,
    pub data: Option<PriceSeries>,
    pub period: Option<Period>,
    pub metrics: Option<MetricsResult>,
    pub chart_path: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RunStore {
    tickers: Vec<(String, TickerRecord)>,
    metrics_order: Vec<String>,
    comparison: Option<ComparisonResult>,
    comparison_chart_path: Option<String>,
    comparison_error: Option<String>,
    use_llm_summary: bool,
}

impl Default for RunStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStore {
    pub fn new() -> Self {
        Self {
            tickers: Vec::new(),
            metrics_order: Vec::new(),
            comparison: None,
            comparison_chart_path: None,
            comparison_error: None,
            use_llm_summary: true,
        }
    }

    fn entry_mut(&mut self, ticker: &str) -> &mut TickerRecord {
        let idx = match self.tickers.iter().position(|(t, _)| t == ticker) {
            Some(idx) => idx,
            None => {
                self.tickers.push((ticker.to_string(), TickerRecord::default()));
                self.tickers.len() - 1
            }
        };
        &mut self.tickers[idx].1
    }

    pub fn record(&self, ticker: &str) -> Option<&TickerRecord> {
        self.tickers
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|(_, record)| record)
    }

    /// Tickers in first-write order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(|(t, _)| t.as_str())
    }

    pub fn set_data(&mut self, ticker: &str, data: PriceSeries, period: Period) {
        let entry = self.entry_mut(ticker);
        entry.data = Some(data);
        entry.status = Some(FetchStatus::Ok);
        entry.period = Some(period);
    }

    pub fn set_error(&mut self, ticker: &str, error: impl Into<String>) {
        let entry = self.entry_mut(ticker);
        entry.status = Some(FetchStatus::Error);
        entry.error = Some(error.into());
    }

    pub fn set_metrics(&mut self, ticker: &str, metrics: MetricsResult) {
        self.entry_mut(ticker).metrics = Some(metrics);
        if !self.metrics_order.iter().any(|t| t == ticker) {
            self.metrics_order.push(ticker.to_string());
        }
    }

    pub fn set_chart_path(&mut self, ticker: &str, path: impl Into<String>) {
        self.entry_mut(ticker).chart_path = Some(path.into());
    }

    pub fn status(&self, ticker: &str) -> Option<FetchStatus> {
        self.record(ticker).and_then(|r| r.status)
    }

    pub fn data(&self, ticker: &str) -> Option<&PriceSeries> {
        self.record(ticker).and_then(|r| r.data.as_ref())
    }

    pub fn period(&self, ticker: &str) -> Option<Period> {
        self.record(ticker).and_then(|r| r.period)
    }

    pub fn metrics(&self, ticker: &str) -> Option<&MetricsResult> {
        self.record(ticker).and_then(|r| r.metrics.as_ref())
    }

    pub fn chart_path(&self, ticker: &str) -> Option<&str> {
        self.record(ticker).and_then(|r| r.chart_path.as_deref())
    }

    pub fn error(&self, ticker: &str) -> Option<&str> {
        self.record(ticker).and_then(|r| r.error.as_deref())
    }

    /// Tickers holding metrics, in the order their metrics were stored.
    pub fn tickers_with_metrics(&self) -> Vec<&str> {
        self.metrics_order.iter().map(String::as_str).collect()
    }

    pub fn set_comparison(&mut self, comparison: ComparisonResult) {
        self.comparison = Some(comparison);
    }

    pub fn comparison(&self) -> Option<&ComparisonResult> {
        self.comparison.as_ref()
    }

    pub fn set_comparison_chart_path(&mut self, path: impl Into<String>) {
        self.comparison_chart_path = Some(path.into());
    }

    pub fn comparison_chart_path(&self) -> Option<&str> {
        self.comparison_chart_path.as_deref()
    }

    pub fn set_comparison_error(&mut self, error: impl Into<String>) {
        self.comparison_error = Some(error.into());
    }

    pub fn comparison_error(&self) -> Option<&str> {
        self.comparison_error.as_deref()
    }

    pub fn set_use_llm_summary(&mut self, enabled: bool) {
        self.use_llm_summary = enabled;
    }

    pub fn use_llm_summary(&self) -> bool {
        self.use_llm_summary
    }
}
