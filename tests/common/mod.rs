#![allow(dead_code)]

use chrono::NaiveDate;
use finagent::domain::error::AgentError;
use finagent::domain::price::{Period, PricePoint, PriceSeries};
use finagent::domain::summary::SummaryPayload;
use finagent::ports::chart_port::ChartPort;
use finagent::ports::price_port::PriceSourcePort;
use finagent::ports::summary_port::SummaryPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily closes starting 2024-01-01.
pub fn make_series(closes: &[f64]) -> PriceSeries {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

pub struct MockPriceSource {
    pub series: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, Period)>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, ticker: &str, closes: &[f64]) -> Self {
        self.series.insert(ticker.to_string(), make_series(closes));
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceSourcePort for MockPriceSource {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<PriceSeries, AgentError> {
        self.requests
            .borrow_mut()
            .push((ticker.to_string(), period));
        if let Some(reason) = self.errors.get(ticker) {
            return Err(AgentError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.series.get(ticker).cloned().unwrap_or_default())
    }
}

/// Returns predictable artifact names and remembers every call.
#[derive(Default)]
pub struct RecordingCharts {
    pub single: RefCell<Vec<(String, Period, usize)>>,
    pub comparisons: RefCell<Vec<(String, String, Period)>>,
}

impl ChartPort for RecordingCharts {
    fn render_single(
        &self,
        series: &[PricePoint],
        ticker: &str,
        period: Period,
    ) -> Result<String, AgentError> {
        self.single
            .borrow_mut()
            .push((ticker.to_string(), period, series.len()));
        Ok(format!("charts/{ticker}_{period}.svg"))
    }

    fn render_comparison(
        &self,
        _series_a: &[PricePoint],
        _series_b: &[PricePoint],
        ticker_a: &str,
        ticker_b: &str,
        period: Period,
    ) -> Result<String, AgentError> {
        self.comparisons
            .borrow_mut()
            .push((ticker_a.to_string(), ticker_b.to_string(), period));
        Ok(format!("charts/compare_{ticker_a}_{ticker_b}_{period}.svg"))
    }
}

pub struct FailingCharts;

impl ChartPort for FailingCharts {
    fn render_single(
        &self,
        _series: &[PricePoint],
        _ticker: &str,
        _period: Period,
    ) -> Result<String, AgentError> {
        Err(AgentError::ChartRender {
            reason: "output directory is read-only".into(),
        })
    }

    fn render_comparison(
        &self,
        _series_a: &[PricePoint],
        _series_b: &[PricePoint],
        _ticker_a: &str,
        _ticker_b: &str,
        _period: Period,
    ) -> Result<String, AgentError> {
        Err(AgentError::ChartRender {
            reason: "output directory is read-only".into(),
        })
    }
}

/// Summary generator that answers only when enabled, recording each flag it saw.
pub struct CannedSummary {
    pub text: String,
    pub flags: RefCell<Vec<bool>>,
}

impl CannedSummary {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            flags: RefCell::new(Vec::new()),
        }
    }
}

impl SummaryPort for CannedSummary {
    fn summarize(&self, _payload: &SummaryPayload, enabled: bool) -> Option<String> {
        self.flags.borrow_mut().push(enabled);
        enabled.then(|| self.text.clone())
    }
}
