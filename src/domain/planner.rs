//! Free-text request to task plan.
//!
//! Purely lexical: tickers are short alphabetic tokens that are not on the
//! stop-word list, and the period comes from a `<number> <unit>` pair.

use super::error::PlanError;
use super::price::Period;
use super::task::{Plan, Task};

pub const MAX_TICKERS: usize = 2;
pub const MAX_TICKER_LEN: usize = 5;

/// Words that look like tickers but are part of the request phrasing.
pub const STOP_WORDS: &[&str] = &[
    "ANALYZE", "COMPARE", "FOR", "OVER", "LAST", "PAST", "YEAR", "YEARS", "MONTH", "MONTHS",
    "AND", "THE", "PLEASE", "STOCK", "STOCKS", "ME", "MY", "WITH", "SUMMARY", "NO",
];

const TRIM_CHARS: &[char] = &['(', ')', '[', ']', '{', '}', ':', ';', '.', '!', '?', '"', '\''];

pub fn create_plan(text: &str) -> Result<Plan, PlanError> {
    let use_summary = summary_flag(text);
    let tickers = extract_tickers(text);
    let period = extract_period(text);

    if tickers.is_empty() {
        return Err(PlanError::NoTickers);
    }
    if tickers.len() > MAX_TICKERS {
        return Err(PlanError::TooManyTickers {
            found: tickers.len(),
        });
    }

    let mut tasks = Vec::with_capacity(tickers.len() * 2 + 1);
    for ticker in &tickers {
        tasks.push(Task::FetchData {
            ticker: ticker.clone(),
            period,
        });
        tasks.push(Task::ComputeMetrics {
            ticker: ticker.clone(),
        });
    }
    if tickers.len() == MAX_TICKERS {
        tasks.push(Task::CompareMetrics);
    }

    Plan::new(tasks, use_summary)
}

/// On by default. "no summary" turns it off, then "with summary" turns it
/// back on, so the latter wins when both appear.
pub fn summary_flag(text: &str) -> bool {
    let lower = text.to_lowercase();
    let mut enabled = true;
    if lower.contains("no summary") {
        enabled = false;
    }
    if lower.contains("with summary") {
        enabled = true;
    }
    enabled
}

/// Candidate tickers in first-seen order, deduplicated.
pub fn extract_tickers(text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    let mut tickers: Vec<String> = Vec::new();

    for token in upper.split(|c: char| c.is_whitespace() || c == ',') {
        let cleaned = token.trim_matches(TRIM_CHARS);
        if is_ticker_like(cleaned) && !tickers.iter().any(|t| t == cleaned) {
            tickers.push(cleaned.to_string());
        }
    }

    tickers
}

fn is_ticker_like(token: &str) -> bool {
    let len = token.chars().count();
    (1..=MAX_TICKER_LEN).contains(&len)
        && token.chars().all(char::is_alphabetic)
        && !STOP_WORDS.contains(&token)
}

/// First `<number> <unit>` pair whose unit mentions years or months.
pub fn extract_period(text: &str) -> Period {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    for pair in words.windows(2) {
        let (number, unit) = (pair[0], pair[1]);
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let Ok(count) = number.parse::<u32>() else {
            continue;
        };
        if unit.contains("year") {
            return Period::years(count);
        }
        if unit.contains("month") {
            return Period::months(count);
        }
    }

    Period::default()
}
