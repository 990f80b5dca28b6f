//! Task descriptors and the immutable plan handed to the executor.

use super::error::PlanError;
use super::price::Period;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    FetchData { ticker: String, period: Period },
    ComputeMetrics { ticker: String },
    /// Operates on every ticker that reached the metrics stage.
    CompareMetrics,
}

impl Task {
    pub fn ticker(&self) -> Option<&str> {
        match self {
            Task::FetchData { ticker, .. } | Task::ComputeMetrics { ticker } => Some(ticker),
            Task::CompareMetrics => None,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::FetchData { ticker, period } => write!(f, "fetch_data({ticker}, {period})"),
            Task::ComputeMetrics { ticker } => write!(f, "compute_metrics({ticker})"),
            Task::CompareMetrics => f.write_str("compare_metrics"),
        }
    }
}

/// Ordered tasks plus the summary flag; built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    tasks: Vec<Task>,
    use_summary: bool,
}

impl Plan {
    /// Checks the ordering rules before accepting a task list:
    /// every ticker is fetched before its metrics are computed, and a
    /// comparison is present only as the last task of a two-ticker plan.
    pub fn new(tasks: Vec<Task>, use_summary: bool) -> Result<Self, PlanError> {
        let mut fetched: Vec<&str> = Vec::new();

        for (i, task) in tasks.iter().enumerate() {
            match task {
                Task::FetchData { ticker, .. } => {
                    if !fetched.contains(&ticker.as_str()) {
                        fetched.push(ticker);
                    }
                }
                Task::ComputeMetrics { ticker } => {
                    if !fetched.contains(&ticker.as_str()) {
                        return Err(PlanError::MisorderedTasks {
                            reason: format!("metrics for {ticker} requested before its data"),
                        });
                    }
                }
                Task::CompareMetrics => {
                    if i + 1 != tasks.len() {
                        return Err(PlanError::MisorderedTasks {
                            reason: "comparison must be the final task".into(),
                        });
                    }
                    if fetched.len() != 2 {
                        return Err(PlanError::MisorderedTasks {
                            reason: format!(
                                "comparison needs exactly two tickers, plan has {}",
                                fetched.len()
                            ),
                        });
                    }
                }
            }
        }

        Ok(Self { tasks, use_summary })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn use_summary(&self) -> bool {
        self.use_summary
    }

    /// Distinct tickers in first-seen order.
    pub fn tickers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for ticker in self.tasks.iter().filter_map(Task::ticker) {
            if !out.contains(&ticker) {
                out.push(ticker);
            }
        }
        out
    }

    /// Period of the first fetch task.
    pub fn period(&self) -> Option<Period> {
        self.tasks.iter().find_map(|t| match t {
            Task::FetchData { period, .. } => Some(*period),
            _ => None,
        })
    }

    pub fn is_comparison(&self) -> bool {
        self.tasks.iter().any(|t| matches!(t, Task::CompareMetrics))
    }
}
