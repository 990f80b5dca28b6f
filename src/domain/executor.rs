//! Sequential task executor.
//!
//! Tasks run one at a time in plan order. A failed fetch is recorded against
//! its ticker and the run moves on; that ticker's metrics task then becomes a
//! no-op. Chart rendering errors are not absorbed: they come back out of
//! [`Agent::run`] because a missing artifact means the output side is
//! misconfigured.

use super::error::AgentError;
use super::metrics::{self, MetricsResult};
use super::price::Period;
use super::store::{FetchStatus, RunStore};
use super::task::Task;
use crate::ports::chart_port::ChartPort;
use crate::ports::price_port::PriceSourcePort;
use tracing::{debug, info, warn};

pub const COMPARISON_UNAVAILABLE: &str =
    "Comparison could not be performed because one or more tickers were invalid.";

pub struct Agent<'a> {
    prices: &'a dyn PriceSourcePort,
    charts: &'a dyn ChartPort,
}

impl<'a> Agent<'a> {
    pub fn new(prices: &'a dyn PriceSourcePort, charts: &'a dyn ChartPort) -> Self {
        Self { prices, charts }
    }

    pub fn run(&self, tasks: &[Task], store: &mut RunStore) -> Result<(), AgentError> {
        info!(tasks = tasks.len(), "starting run");
        for task in tasks {
            debug!(%task, "executing task");
            match task {
                Task::FetchData { ticker, period } => self.fetch_data(ticker, *period, store),
                Task::ComputeMetrics { ticker } => self.compute_metrics(ticker, store)?,
                Task::CompareMetrics => self.compare_metrics(store)?,
            }
        }
        info!("run complete");
        Ok(())
    }

    fn fetch_data(&self, ticker: &str, period: Period, store: &mut RunStore) {
        let fetched = self.prices.fetch_history(ticker, period).and_then(|series| {
            if series.is_empty() {
                Err(AgentError::DataUnavailable {
                    ticker: ticker.to_string(),
                    reason: format!("No data found for ticker: {ticker}"),
                })
            } else {
                Ok(series)
            }
        });

        match fetched {
            Ok(series) => {
                info!(ticker, %period, points = series.len(), "fetched price history");
                store.set_data(ticker, series, period);
            }
            Err(e) => {
                let reason = match e {
                    AgentError::DataUnavailable { reason, .. } => reason,
                    other => other.to_string(),
                };
                warn!(ticker, %reason, "price fetch failed");
                store.set_error(ticker, reason);
            }
        }
    }

    fn compute_metrics(&self, ticker: &str, store: &mut RunStore) -> Result<(), AgentError> {
        if store.status(ticker) != Some(FetchStatus::Ok) {
            debug!(ticker, "skipping metrics: no data");
            return Ok(());
        }
        let Some(series) = store.data(ticker) else {
            return Ok(());
        };

        let result = match MetricsResult::compute(series) {
            Ok(m) => m,
            Err(e) => {
                warn!(ticker, error = %e, "metrics unavailable");
                return Ok(());
            }
        };
        let period = store.period(ticker).unwrap_or_default();
        let chart = self.charts.render_single(series, ticker, period)?;

        debug!(ticker, chart = %chart, "metrics computed");
        store.set_chart_path(ticker, chart);
        store.set_metrics(ticker, result);
        Ok(())
    }

    fn compare_metrics(&self, store: &mut RunStore) -> Result<(), AgentError> {
        let ready: Vec<String> = store
            .tickers_with_metrics()
            .into_iter()
            .map(str::to_string)
            .collect();
        let [ticker_a, ticker_b] = ready.as_slice() else {
            record_comparison_unavailable(store, ready.len());
            return Ok(());
        };

        let pair = (
            store.metrics(ticker_a).copied(),
            store.metrics(ticker_b).copied(),
        );
        let (Some(metrics_a), Some(metrics_b)) = pair else {
            record_comparison_unavailable(store, ready.len());
            return Ok(());
        };
        let comparison = metrics::compare(&metrics_a, &metrics_b, ticker_a, ticker_b);
        info!(winner = %comparison.winner, reason = %comparison.reason, "comparison complete");
        store.set_comparison(comparison);

        let period = store.period(ticker_a).unwrap_or_default();
        let chart = match (store.data(ticker_a), store.data(ticker_b)) {
            (Some(a), Some(b)) => self
                .charts
                .render_comparison(a, b, ticker_a, ticker_b, period)?,
            _ => return Ok(()),
        };
        store.set_comparison_chart_path(chart);
        Ok(())
    }
}

fn record_comparison_unavailable(store: &mut RunStore, ready: usize) {
    let err = AgentError::ComparisonUnavailable {
        reason: COMPARISON_UNAVAILABLE.to_string(),
    };
    warn!(ready, "comparison skipped");
    store.set_comparison_error(err.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::Winner;
    use crate::domain::price::{PricePoint, PriceSeries};
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct StubPrices {
        series: HashMap<String, PriceSeries>,
    }

    impl StubPrices {
        fn with(mut self, ticker: &str, closes: &[f64]) -> Self {
            self.series.insert(ticker.to_string(), series(closes));
            self
        }
    }

    impl PriceSourcePort for StubPrices {
        fn fetch_history(&self, ticker: &str, _period: Period) -> Result<PriceSeries, AgentError> {
            self.series
                .get(ticker)
                .cloned()
                .ok_or_else(|| AgentError::DataUnavailable {
                    ticker: ticker.to_string(),
                    reason: format!("No data found for ticker: {ticker}"),
                })
        }
    }

    #[derive(Default)]
    struct StubCharts {
        calls: RefCell<Vec<String>>,
    }

    impl ChartPort for StubCharts {
        fn render_single(
            &self,
            _series: &[PricePoint],
            ticker: &str,
            period: Period,
        ) -> Result<String, AgentError> {
            let path = format!("{ticker}_{period}.svg");
            self.calls.borrow_mut().push(path.clone());
            Ok(path)
        }

        fn render_comparison(
            &self,
            _a: &[PricePoint],
            _b: &[PricePoint],
            ticker_a: &str,
            ticker_b: &str,
            period: Period,
        ) -> Result<String, AgentError> {
            let path = format!("compare_{ticker_a}_{ticker_b}_{period}.svg");
            self.calls.borrow_mut().push(path.clone());
            Ok(path)
        }
    }

    fn series(values: &[f64]) -> PriceSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                close,
            })
            .collect()
    }

    fn two_ticker_tasks(a: &str, b: &str) -> Vec<Task> {
        vec![
            Task::FetchData { ticker: a.into(), period: Period::default() },
            Task::ComputeMetrics { ticker: a.into() },
            Task::FetchData { ticker: b.into(), period: Period::default() },
            Task::ComputeMetrics { ticker: b.into() },
            Task::CompareMetrics,
        ]
    }

    #[test]
    fn single_ticker_run_stores_metrics_and_chart() {
        let prices = StubPrices::default().with("AAPL", &[100.0, 102.0, 101.0, 105.0]);
        let charts = StubCharts::default();
        let mut store = RunStore::new();

        let tasks = vec![
            Task::FetchData { ticker: "AAPL".into(), period: Period::months(6) },
            Task::ComputeMetrics { ticker: "AAPL".into() },
        ];
        Agent::new(&prices, &charts).run(&tasks, &mut store).unwrap();

        assert_eq!(store.status("AAPL"), Some(FetchStatus::Ok));
        assert!(store.metrics("AAPL").is_some());
        assert_eq!(store.chart_path("AAPL"), Some("AAPL_6mo.svg"));
        assert_eq!(store.period("AAPL"), Some(Period::months(6)));
    }

    #[test]
    fn failed_fetch_is_isolated() {
        let prices = StubPrices::default().with("YY", &[10.0, 11.0, 12.5]);
        let charts = StubCharts::default();
        let mut store = RunStore::new();

        Agent::new(&prices, &charts)
            .run(&two_ticker_tasks("XX", "YY"), &mut store)
            .unwrap();

        assert_eq!(store.status("XX"), Some(FetchStatus::Error));
        assert_eq!(store.error("XX"), Some("No data found for ticker: XX"));
        assert!(store.metrics("XX").is_none());
        assert_eq!(store.status("YY"), Some(FetchStatus::Ok));
        assert!(store.metrics("YY").is_some());
        assert_eq!(store.comparison_error(), Some(COMPARISON_UNAVAILABLE));
        assert!(store.comparison().is_none());
        assert!(store.comparison_chart_path().is_none());
        assert_eq!(charts.calls.borrow().len(), 1);
    }

    #[test]
    fn empty_series_counts_as_fetch_failure() {
        let prices = StubPrices::default().with("EMPTY", &[]);
        let charts = StubCharts::default();
        let mut store = RunStore::new();

        let tasks = vec![
            Task::FetchData { ticker: "EMPTY".into(), period: Period::default() },
            Task::ComputeMetrics { ticker: "EMPTY".into() },
        ];
        Agent::new(&prices, &charts).run(&tasks, &mut store).unwrap();

        assert_eq!(store.status("EMPTY"), Some(FetchStatus::Error));
        assert!(charts.calls.borrow().is_empty());
    }

    #[test]
    fn comparison_uses_processing_order_not_alphabetical() {
        let prices = StubPrices::default()
            .with("ZZ", &[10.0, 11.0, 10.5, 12.0])
            .with("AA", &[10.0, 10.0]);
        let charts = StubCharts::default();
        let mut store = RunStore::new();

        Agent::new(&prices, &charts)
            .run(&two_ticker_tasks("ZZ", "AA"), &mut store)
            .unwrap();

        assert_eq!(store.comparison_chart_path(), Some("compare_ZZ_AA_1y.svg"));
        let comparison = store.comparison().unwrap();
        // AA has constant prices, so only ZZ has a Sharpe ratio.
        assert_eq!(comparison.winner, Winner::Ticker("ZZ".into()));
        assert!(store.comparison_error().is_none());
    }

    #[test]
    fn comparison_with_one_ready_ticker_records_unavailable() {
        let prices = StubPrices::default().with("AA", &[10.0, 11.0, 12.0]);
        let charts = StubCharts::default();
        let mut store = RunStore::new();

        let tasks = vec![
            Task::FetchData { ticker: "AA".into(), period: Period::default() },
            Task::ComputeMetrics { ticker: "AA".into() },
            Task::CompareMetrics,
        ];
        Agent::new(&prices, &charts).run(&tasks, &mut store).unwrap();

        let expected = AgentError::ComparisonUnavailable {
            reason: COMPARISON_UNAVAILABLE.into(),
        }
        .to_string();
        assert_eq!(store.comparison_error(), Some(expected.as_str()));
        assert!(store.comparison().is_none());
    }

    #[test]
    fn metrics_task_for_unknown_ticker_is_noop() {
        let prices = StubPrices::default();
        let charts = StubCharts::default();
        let mut store = RunStore::new();

        Agent::new(&prices, &charts)
            .run(&[Task::ComputeMetrics { ticker: "AAPL".into() }], &mut store)
            .unwrap();
        assert_eq!(store.tickers().count(), 0);
    }
}
