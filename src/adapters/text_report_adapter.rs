//! Plain-text analysis and comparison reports.

use crate::domain::error::AgentError;
use crate::domain::metrics::MetricsResult;
use crate::domain::store::{FetchStatus, RunStore};
use crate::domain::summary::SummaryPayload;
use crate::ports::summary_port::SummaryPort;
use std::fs;
use std::path::Path;
use tracing::info;

const UNKNOWN_ERROR: &str = "Unknown error";

pub(crate) fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}%", v * 100.0))
}

pub(crate) fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

fn push_metrics(lines: &mut Vec<String>, metrics: &MetricsResult) {
    lines.push(format!("- Total Return: {}", percent(metrics.total_return)));
    lines.push(format!("- Volatility: {}", percent(metrics.volatility)));
    lines.push(format!("- Sharpe Ratio: {}", ratio(metrics.sharpe_ratio)));
}

/// `analysis_{T}_{period}.txt` for one ticker, `comparison_{A}_{B}_{period}.txt` for two.
pub fn report_filename(tickers: &[&str], period: &str) -> Option<String> {
    match tickers {
        [t] => Some(format!("analysis_{t}_{period}.txt")),
        [a, b] => Some(format!("comparison_{a}_{b}_{period}.txt")),
        _ => None,
    }
}

/// Turns what a run recorded into a readable report. Never mutates the store.
pub struct ReportSynthesizer<'a> {
    summary: &'a dyn SummaryPort,
    period: String,
}

impl<'a> ReportSynthesizer<'a> {
    pub fn new(summary: &'a dyn SummaryPort, period: impl Into<String>) -> Self {
        Self {
            summary,
            period: period.into(),
        }
    }

    pub fn generate_report(&self, store: &RunStore, tickers: &[&str]) -> String {
        match tickers {
            [ticker] => self.single_report(store, ticker),
            [a, b] => self.comparison_report(store, a, b),
            _ => "Unable to generate report.".to_string(),
        }
    }

    fn llm_summary(&self, store: &RunStore, tickers: &[&str]) -> Option<String> {
        let payload = SummaryPayload::from_store(store, tickers, &self.period);
        self.summary.summarize(&payload, store.use_llm_summary())
    }

    fn single_report(&self, store: &RunStore, ticker: &str) -> String {
        let mut lines = vec![
            "=== STOCK ANALYSIS REPORT ===\n".to_string(),
            format!("Ticker: {ticker}"),
            format!("Time Period: {}\n", self.period),
        ];

        if store.status(ticker) != Some(FetchStatus::Ok) {
            let error = store.error(ticker).unwrap_or(UNKNOWN_ERROR);
            lines.push("Error:".into());
            lines.push(format!(
                "- Unable to retrieve data for {ticker}.\n- Reason: {error}"
            ));
            lines.push("\nPlease check the ticker symbol and try again.".into());
            return lines.join("\n");
        }

        let metrics = store.metrics(ticker).copied().unwrap_or_default();
        lines.push("Performance Metrics:".into());
        push_metrics(&mut lines, &metrics);

        match self.llm_summary(store, &[ticker]) {
            Some(text) => {
                lines.push(String::new());
                lines.push("LLM Summary (Optional):".into());
                lines.push(text);
                lines.push(String::new());
            }
            None => {
                lines.push("\nSummary:".into());
                match (metrics.total_return, metrics.volatility) {
                    (Some(tr), Some(vol)) => lines.push(format!(
                        "Over the selected period, {ticker} showed a total return of {} with a \
                         volatility of {}. This provides a snapshot of the stock\u{2019}s overall \
                         performance and risk profile.",
                        percent(Some(tr)),
                        percent(Some(vol)),
                    )),
                    _ => lines.push(format!(
                        "Over the selected period, {ticker} produced a set of performance \
                         metrics. This provides a snapshot of overall performance and risk."
                    )),
                }
            }
        }

        lines.join("\n")
    }

    fn comparison_report(&self, store: &RunStore, ticker_a: &str, ticker_b: &str) -> String {
        let mut lines = vec![
            "=== STOCK COMPARISON REPORT ===\n".to_string(),
            format!("Time Period: {}\n", self.period),
        ];

        let failed: Vec<&str> = [ticker_a, ticker_b]
            .into_iter()
            .filter(|t| store.status(t) != Some(FetchStatus::Ok))
            .collect();
        if !failed.is_empty() {
            lines.push("Comparison Error:".into());
            for ticker in failed {
                let error = store.error(ticker).unwrap_or(UNKNOWN_ERROR);
                lines.push(format!("- {ticker}: {error}"));
            }
            lines.push(
                "\nComparison could not be performed because one or more tickers did not \
                 return valid data."
                    .into(),
            );
            return lines.join("\n");
        }

        for ticker in [ticker_a, ticker_b] {
            let metrics = store.metrics(ticker).copied().unwrap_or_default();
            lines.push(format!("{ticker}:"));
            push_metrics(&mut lines, &metrics);
            lines.push(String::new());
        }

        let summary = self.llm_summary(store, &[ticker_a, ticker_b]);

        let comparison = store.comparison();
        match comparison {
            Some(c) => {
                lines.push(format!("Winner: {}", c.winner));
                lines.push(format!("Reason: {}\n", c.reason));
            }
            None => {
                let reason = store.comparison_error().unwrap_or("N/A");
                lines.push("Winner: N/A".into());
                lines.push(format!("Reason: {reason}\n"));
            }
        }
        lines.push(String::new());

        if let Some(text) = summary {
            lines.push("LLM Summary (Optional):".into());
            lines.push(text);
            lines.push(String::new());
            return lines.join("\n");
        }

        lines.push("Conclusion:".into());
        match comparison.and_then(|c| c.winner.ticker()) {
            Some(winner) => {
                let loser = if winner == ticker_a { ticker_b } else { ticker_a };
                lines.push(format!(
                    "Over the selected period, {winner} outperformed {loser} based on \
                     risk-adjusted performance and overall returns. This comparison highlights \
                     how return and volatility together provide a more complete picture than \
                     raw performance alone."
                ));
            }
            None => lines.push(format!(
                "Over the selected period, {ticker_a} and {ticker_b} performed similarly on a \
                 risk-adjusted basis. This comparison highlights how return and volatility \
                 together provide a more complete picture than raw performance alone."
            )),
        }

        lines.join("\n")
    }
}

/// Writes report text, creating the parent directory.
pub fn save_report(report: &str, path: &Path) -> Result<(), AgentError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report)?;
    info!(path = %path.display(), "report saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::summary_adapter::DisabledSummary;
    use crate::domain::metrics::compare;
    use crate::domain::price::{Period, PricePoint};
    use crate::domain::summary::SummaryPayload;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct FixedSummary {
        text: &'static str,
        calls: RefCell<Vec<(String, bool)>>,
    }

    impl SummaryPort for FixedSummary {
        fn summarize(&self, payload: &SummaryPayload, enabled: bool) -> Option<String> {
            self.calls.borrow_mut().push((payload.to_json(), enabled));
            enabled.then(|| self.text.to_string())
        }
    }

    fn series(values: &[f64]) -> Vec<PricePoint> {
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

    fn store_with(ticker: &str, values: &[f64]) -> RunStore {
        let mut store = RunStore::new();
        add(&mut store, ticker, values);
        store
    }

    fn add(store: &mut RunStore, ticker: &str, values: &[f64]) {
        let data = series(values);
        let metrics = MetricsResult::compute(&data).unwrap();
        store.set_data(ticker, data, Period::years(1));
        store.set_metrics(ticker, metrics);
    }

    #[test]
    fn filenames() {
        assert_eq!(
            report_filename(&["AAPL"], "1y").as_deref(),
            Some("analysis_AAPL_1y.txt")
        );
        assert_eq!(
            report_filename(&["AAPL", "MSFT"], "6mo").as_deref(),
            Some("comparison_AAPL_MSFT_6mo.txt")
        );
        assert_eq!(report_filename(&[], "1y"), None);
    }

    #[test]
    fn single_report_with_fallback_summary() {
        let store = store_with("AAPL", &[100.0, 110.0]);
        let report = ReportSynthesizer::new(&DisabledSummary, "1y").generate_report(&store, &["AAPL"]);

        assert!(report.starts_with("=== STOCK ANALYSIS REPORT ==="));
        assert!(report.contains("Ticker: AAPL"));
        assert!(report.contains("Time Period: 1y"));
        assert!(report.contains("- Total Return: 10.00%"));
        assert!(report.contains("- Volatility: 0.00%"));
        assert!(report.contains("- Sharpe Ratio: N/A"));
        assert!(report.contains("showed a total return of 10.00% with a volatility of 0.00%"));
    }

    #[test]
    fn single_report_for_failed_fetch() {
        let mut store = RunStore::new();
        store.set_error("XX", "No data found for ticker: XX");
        let report = ReportSynthesizer::new(&DisabledSummary, "1y").generate_report(&store, &["XX"]);

        assert!(report.contains("Error:"));
        assert!(report.contains("- Unable to retrieve data for XX."));
        assert!(report.contains("- Reason: No data found for ticker: XX"));
        assert!(!report.contains("Performance Metrics"));
    }

    #[test]
    fn llm_text_replaces_fallback_when_enabled() {
        let store = store_with("AAPL", &[100.0, 105.0, 103.0]);
        let summary = FixedSummary {
            text: "A short summary. Not financial advice.",
            calls: RefCell::new(Vec::new()),
        };
        let report = ReportSynthesizer::new(&summary, "1y").generate_report(&store, &["AAPL"]);

        assert!(report.contains("LLM Summary (Optional):"));
        assert!(report.contains("A short summary."));
        assert!(!report.contains("\nSummary:"));
        let calls = summary.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1);
        assert!(calls[0].0.contains("\"start_close\": 100.0"));
    }

    #[test]
    fn summary_flag_comes_from_store() {
        let mut store = store_with("AAPL", &[100.0, 105.0]);
        store.set_use_llm_summary(false);
        let summary = FixedSummary {
            text: "unused",
            calls: RefCell::new(Vec::new()),
        };
        let report = ReportSynthesizer::new(&summary, "1y").generate_report(&store, &["AAPL"]);

        assert!(!summary.calls.borrow()[0].1);
        assert!(report.contains("\nSummary:"));
    }

    #[test]
    fn comparison_report_names_winner() {
        let mut store = RunStore::new();
        add(&mut store, "AAA", &[100.0, 102.0, 101.0, 105.0]);
        add(&mut store, "BBB", &[100.0, 97.0, 99.0, 96.0]);
        let a = *store.metrics("AAA").unwrap();
        let b = *store.metrics("BBB").unwrap();
        store.set_comparison(compare(&a, &b, "AAA", "BBB"));

        let report =
            ReportSynthesizer::new(&DisabledSummary, "6mo").generate_report(&store, &["AAA", "BBB"]);

        assert!(report.starts_with("=== STOCK COMPARISON REPORT ==="));
        assert!(report.contains("AAA:\n- Total Return: 5.00%"));
        assert!(report.contains("BBB:\n- Total Return: -4.00%"));
        assert!(report.contains("Winner: AAA"));
        assert!(report.contains("Reason: Higher risk-adjusted return (Sharpe ratio)"));
        assert!(report.contains("AAA outperformed BBB"));
    }

    #[test]
    fn comparison_report_tie_is_similar() {
        let mut store = RunStore::new();
        add(&mut store, "AAA", &[100.0, 105.0]);
        add(&mut store, "BBB", &[200.0, 210.0]);
        let a = *store.metrics("AAA").unwrap();
        let b = *store.metrics("BBB").unwrap();
        store.set_comparison(compare(&a, &b, "AAA", "BBB"));

        let report =
            ReportSynthesizer::new(&DisabledSummary, "1y").generate_report(&store, &["AAA", "BBB"]);
        assert!(report.contains("Winner: Tie"));
        assert!(report.contains("AAA and BBB performed similarly"));
    }

    #[test]
    fn comparison_report_lists_fetch_errors() {
        let mut store = RunStore::new();
        store.set_error("XX", "No data found for ticker: XX");
        add(&mut store, "YY", &[100.0, 101.0]);
        store.set_comparison_error("Comparison could not be performed because one or more tickers were invalid.");

        let report =
            ReportSynthesizer::new(&DisabledSummary, "1y").generate_report(&store, &["XX", "YY"]);
        assert!(report.contains("Comparison Error:"));
        assert!(report.contains("- XX: No data found for ticker: XX"));
        assert!(!report.contains("- YY:"));
        assert!(!report.contains("Winner:"));
    }

    #[test]
    fn too_many_tickers_is_unable() {
        let store = RunStore::new();
        let report =
            ReportSynthesizer::new(&DisabledSummary, "1y").generate_report(&store, &["A", "B", "C"]);
        assert_eq!(report, "Unable to generate report.");
    }

    #[test]
    fn save_report_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = store_with("AAPL", &[100.0, 110.0]);
        let path = dir.path().join("generated").join("analysis_AAPL_1y.txt");
        let report = ReportSynthesizer::new(&DisabledSummary, "1y").generate_report(&store, &["AAPL"]);

        save_report(&report, &path).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, report);
        assert!(content.contains("Ticker: AAPL"));
    }
}
