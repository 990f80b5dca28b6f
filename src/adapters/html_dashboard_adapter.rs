//! HTML dashboard adapter implementing ReportPort.
//!
//! Renders `templates/dashboard.html` with one card per ticker that has
//! metrics, chart images linked relative to the dashboard file, and the
//! comparison outcome when one was recorded.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::adapters::text_report_adapter::{percent, ratio};
use crate::domain::error::AgentError;
use crate::domain::store::{FetchStatus, RunStore};
use crate::ports::report_port::ReportPort;
use askama::Template;
use tracing::info;

struct MetricCard {
    ticker: String,
    period: String,
    total_return: String,
    volatility: String,
    sharpe_ratio: String,
    chart_src: String,
}

struct Diagnostic {
    subject: String,
    message: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    cards: Vec<MetricCard>,
    has_charts: bool,
    has_comparison: bool,
    winner: String,
    reason: String,
    comparison_chart_src: String,
    has_diagnostics: bool,
    diagnostics: Vec<Diagnostic>,
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Path from `base_dir` to `target` with forward slashes, for use in `src`.
pub fn relative_path(target: &Path, base_dir: &Path) -> String {
    let target = absolute(target);
    let base = absolute(base_dir);

    let target_parts: Vec<Component<'_>> = target.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(base_parts[common..].iter().map(|_| "..".to_string()));
    parts.extend(
        target_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

pub struct HtmlDashboardAdapter;

impl HtmlDashboardAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlDashboardAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlDashboardAdapter {
    fn write(
        &self,
        store: &RunStore,
        tickers: &[&str],
        output_path: &Path,
    ) -> Result<PathBuf, AgentError> {
        let dashboard_dir = output_path.parent().unwrap_or_else(|| Path::new("."));
        let link = |path: Option<&str>| {
            path.map(|p| relative_path(Path::new(p), dashboard_dir))
                .unwrap_or_default()
        };

        let mut with_metrics = store.tickers_with_metrics();
        with_metrics.sort_unstable();

        let cards: Vec<MetricCard> = with_metrics
            .into_iter()
            .filter_map(|ticker| {
                let metrics = store.metrics(ticker)?;
                Some(MetricCard {
                    ticker: ticker.to_string(),
                    period: store
                        .period(ticker)
                        .map_or_else(|| "unknown".to_string(), |p| p.to_string()),
                    total_return: percent(metrics.total_return),
                    volatility: percent(metrics.volatility),
                    sharpe_ratio: ratio(metrics.sharpe_ratio),
                    chart_src: link(store.chart_path(ticker)),
                })
            })
            .collect();

        let (has_comparison, winner, reason) = match store.comparison() {
            Some(c) => (true, c.winner.to_string(), c.reason.to_string()),
            None => (false, String::new(), String::new()),
        };

        let mut diagnostics: Vec<Diagnostic> = tickers
            .iter()
            .filter(|t| store.status(t) == Some(FetchStatus::Error))
            .map(|t| Diagnostic {
                subject: t.to_string(),
                message: store.error(t).unwrap_or("Unknown error").to_string(),
            })
            .collect();
        if let Some(error) = store.comparison_error() {
            diagnostics.push(Diagnostic {
                subject: "Comparison".to_string(),
                message: error.to_string(),
            });
        }

        let template = DashboardTemplate {
            has_charts: cards.iter().any(|c| !c.chart_src.is_empty()),
            cards,
            has_comparison,
            winner,
            reason,
            comparison_chart_src: link(store.comparison_chart_path()),
            has_diagnostics: !diagnostics.is_empty(),
            diagnostics,
        };

        let html = template
            .render()
            .map_err(|e| AgentError::ReportRender {
                reason: e.to_string(),
            })?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, html)?;
        info!(path = %output_path.display(), "dashboard written");

        Ok(output_path.to_path_buf())
    }
}
