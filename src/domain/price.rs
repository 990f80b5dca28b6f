//! Close-price series and requested history periods.

use chrono::{Months, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronologically ordered close prices for one ticker.
pub type PriceSeries = Vec<PricePoint>;

/// Unit of a requested history span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    Years,
    Months,
}

/// Requested history span such as `1y` or `6mo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub count: u32,
    pub unit: PeriodUnit,
}

impl Period {
    pub const fn years(count: u32) -> Self {
        Self {
            count,
            unit: PeriodUnit::Years,
        }
    }

    pub const fn months(count: u32) -> Self {
        Self {
            count,
            unit: PeriodUnit::Months,
        }
    }

    /// Parses the `{n}y` / `{n}mo` form produced by `Display`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (digits, unit) = if let Some(n) = input.strip_suffix("mo") {
            (n, PeriodUnit::Months)
        } else if let Some(n) = input.strip_suffix('y') {
            (n, PeriodUnit::Years)
        } else {
            return None;
        };
        let count = digits.parse().ok()?;
        Some(Self { count, unit })
    }

    pub fn total_months(&self) -> u32 {
        match self.unit {
            PeriodUnit::Years => self.count.saturating_mul(12),
            PeriodUnit::Months => self.count,
        }
    }

    /// First date of the window that ends on `end`.
    pub fn window_start(&self, end: NaiveDate) -> NaiveDate {
        end.checked_sub_months(Months::new(self.total_months()))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::years(1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            PeriodUnit::Years => write!(f, "{}y", self.count),
            PeriodUnit::Months => write!(f, "{}mo", self.count),
        }
    }
}

/// First and last close of a series.
pub fn start_end_close(series: &[PricePoint]) -> Option<(f64, f64)> {
    Some((series.first()?.close, series.last()?.close))
}
