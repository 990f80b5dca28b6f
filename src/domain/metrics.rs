//! Return, volatility and risk-adjusted statistics over a close-price series,
//! plus the two-ticker ranking used by comparison runs.
//!
//! Everything here is pure: callers pass the series in and get values out.

use super::error::AgentError;
use super::price::PricePoint;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// `(p[i] - p[i-1]) / p[i-1]` for every consecutive pair.
pub fn daily_returns(series: &[PricePoint]) -> Vec<f64> {
    series
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

/// `(last - first) / first`.
pub fn total_return(series: &[PricePoint]) -> Result<f64, AgentError> {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => Ok((last.close - first.close) / first.close),
        _ => Err(AgentError::InsufficientData {
            points: 0,
            minimum: 1,
        }),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two returns.
pub fn volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let m = mean(returns);
    let variance =
        returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
    variance.sqrt()
}

/// Mean daily return over its volatility; `None` when volatility is exactly zero.
pub fn sharpe_ratio(returns: &[f64]) -> Option<f64> {
    let stddev = volatility(returns);
    if stddev == 0.0 {
        return None;
    }
    Some(mean(returns) / stddev)
}

/// Per-ticker statistics. A `None` field is undefined, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricsResult {
    pub total_return: Option<f64>,
    pub volatility: Option<f64>,
    pub sharpe_ratio: Option<f64>,
}

impl MetricsResult {
    pub fn compute(series: &[PricePoint]) -> Result<Self, AgentError> {
        let total = total_return(series)?;
        let returns = daily_returns(series);
        Ok(Self {
            total_return: finite(total),
            volatility: finite(volatility(&returns)),
            sharpe_ratio: sharpe_ratio(&returns).and_then(finite),
        })
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Outcome of a two-ticker comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    Ticker(String),
    /// Total returns were exactly equal.
    Tie,
    /// Sharpe ratios were equal, or nothing was comparable.
    Undecided,
}

impl Winner {
    pub fn ticker(&self) -> Option<&str> {
        match self {
            Winner::Ticker(t) => Some(t),
            Winner::Tie | Winner::Undecided => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Ticker(t) => f.write_str(t),
            Winner::Tie => f.write_str("Tie"),
            Winner::Undecided => f.write_str("None"),
        }
    }
}

impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Winner::Ticker(t) => serializer.serialize_str(t),
            Winner::Tie => serializer.serialize_str("Tie"),
            Winner::Undecided => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonReason {
    HigherSharpe,
    EqualSharpe,
    OnlyValidSharpe,
    HigherTotalReturn,
    EqualTotalReturn,
    OnlyValidTotalReturn,
    MetricsUnavailable,
}

impl ComparisonReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HigherSharpe => "Higher risk-adjusted return (Sharpe ratio)",
            Self::EqualSharpe => "Equal risk-adjusted performance",
            Self::OnlyValidSharpe => "Valid Sharpe ratio while the other is undefined",
            Self::HigherTotalReturn => "Higher total return",
            Self::EqualTotalReturn => "Both stocks performed equally",
            Self::OnlyValidTotalReturn => "Valid total return while the other is undefined",
            Self::MetricsUnavailable => "Neither Sharpe ratio nor total return is available",
        }
    }
}

impl fmt::Display for ComparisonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComparisonReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub winner: Winner,
    pub reason: ComparisonReason,
    pub compared_metrics: BTreeMap<String, MetricsResult>,
}

/// How two optional values rank against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ranking {
    First,
    Second,
    Equal,
    OnlyFirst,
    OnlySecond,
    Neither,
}

fn rank(a: Option<f64>, b: Option<f64>) -> Ranking {
    match (a, b) {
        (Some(a), Some(b)) => match a.partial_cmp(&b) {
            Some(Ordering::Greater) => Ranking::First,
            Some(Ordering::Less) => Ranking::Second,
            _ => Ranking::Equal,
        },
        (Some(_), None) => Ranking::OnlyFirst,
        (None, Some(_)) => Ranking::OnlySecond,
        (None, None) => Ranking::Neither,
    }
}

/// Ranks two metric sets. Sharpe ratio decides whenever either side has one;
/// total return is consulted only when neither does.
///
/// | Sharpe        | Total return  | Winner       | Reason                  |
/// |---------------|---------------|--------------|-------------------------|
/// | a > b / a < b | -             | higher side  | `HigherSharpe`          |
/// | a == b        | -             | `Undecided`  | `EqualSharpe`           |
/// | only one      | -             | that side    | `OnlyValidSharpe`       |
/// | neither       | a > b / a < b | higher side  | `HigherTotalReturn`     |
/// | neither       | a == b        | `Tie`        | `EqualTotalReturn`      |
/// | neither       | only one      | that side    | `OnlyValidTotalReturn`  |
/// | neither       | neither       | `Undecided`  | `MetricsUnavailable`    |
pub fn compare(
    metrics_a: &MetricsResult,
    metrics_b: &MetricsResult,
    label_a: &str,
    label_b: &str,
) -> ComparisonResult {
    use ComparisonReason as R;

    let a = || Winner::Ticker(label_a.to_string());
    let b = || Winner::Ticker(label_b.to_string());

    let (winner, reason) = match rank(metrics_a.sharpe_ratio, metrics_b.sharpe_ratio) {
        Ranking::First => (a(), R::HigherSharpe),
        Ranking::Second => (b(), R::HigherSharpe),
        Ranking::Equal => (Winner::Undecided, R::EqualSharpe),
        Ranking::OnlyFirst => (a(), R::OnlyValidSharpe),
        Ranking::OnlySecond => (b(), R::OnlyValidSharpe),
        Ranking::Neither => match rank(metrics_a.total_return, metrics_b.total_return) {
            Ranking::First => (a(), R::HigherTotalReturn),
            Ranking::Second => (b(), R::HigherTotalReturn),
            Ranking::Equal => (Winner::Tie, R::EqualTotalReturn),
            Ranking::OnlyFirst => (a(), R::OnlyValidTotalReturn),
            Ranking::OnlySecond => (b(), R::OnlyValidTotalReturn),
            Ranking::Neither => (Winner::Undecided, R::MetricsUnavailable),
        },
    };

    let mut compared_metrics = BTreeMap::new();
    compared_metrics.insert(label_a.to_string(), *metrics_a);
    compared_metrics.insert(label_b.to_string(), *metrics_b);

    ComparisonResult {
        winner,
        reason,
        compared_metrics,
    }
}
