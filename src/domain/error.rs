//! Domain error types.

/// Reasons a request cannot be turned into a plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("no valid ticker symbols found in input")]
    NoTickers,

    #[error("too many tickers: found {found}, at most two are supported")]
    TooManyTickers { found: usize },

    #[error("malformed task list: {reason}")]
    MisorderedTasks { reason: String },
}

/// Top-level error type for finagent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] PlanError),

    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("insufficient data: have {points} price points, need {minimum}")]
    InsufficientData { points: usize, minimum: usize },

    /// Displays the bare reason; the run store keeps it as diagnostic text.
    #[error("{reason}")]
    ComparisonUnavailable { reason: String },

    #[error("chart rendering failed: {reason}")]
    ChartRender { reason: String },

    #[error("report rendering failed: {reason}")]
    ReportRender { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("summary generation failed: {reason}")]
    Summary { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Process exit status for this error's category.
    pub fn exit_code(&self) -> u8 {
        match self {
            AgentError::Io(_) => 1,
            AgentError::ConfigParse { .. } | AgentError::ConfigInvalid { .. } => 2,
            AgentError::InvalidRequest(_) => 3,
            AgentError::DataUnavailable { .. }
            | AgentError::InsufficientData { .. }
            | AgentError::ComparisonUnavailable { .. } => 4,
            AgentError::ChartRender { .. }
            | AgentError::ReportRender { .. }
            | AgentError::Summary { .. } => 5,
        }
    }
}

impl From<&AgentError> for std::process::ExitCode {
    fn from(err: &AgentError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_converts_into_invalid_request() {
        let err: AgentError = PlanError::TooManyTickers { found: 3 }.into();
        assert!(matches!(
            err,
            AgentError::InvalidRequest(PlanError::TooManyTickers { found: 3 })
        ));
        assert_eq!(
            err.to_string(),
            "invalid request: too many tickers: found 3, at most two are supported"
        );
    }

    #[test]
    fn data_unavailable_message_keeps_reason_verbatim() {
        let err = AgentError::DataUnavailable {
            ticker: "XX".into(),
            reason: "No data found for ticker: XX".into(),
        };
        assert_eq!(
            err.to_string(),
            "data unavailable for XX: No data found for ticker: XX"
        );
    }

    #[test]
    fn comparison_unavailable_displays_reason_only() {
        let err = AgentError::ComparisonUnavailable {
            reason: "only one ticker has metrics".into(),
        };
        assert_eq!(err.to_string(), "only one ticker has metrics");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn report_render_message() {
        let err = AgentError::ReportRender {
            reason: "missing field".into(),
        };
        assert_eq!(err.to_string(), "report rendering failed: missing field");
    }

    #[test]
    fn exit_codes_group_by_category() {
        let cases: [(AgentError, u8); 6] = [
            (AgentError::Io(std::io::Error::other("x")), 1),
            (
                AgentError::ConfigInvalid {
                    section: "data".into(),
                    key: "source".into(),
                    reason: "bad".into(),
                },
                2,
            ),
            (PlanError::NoTickers.into(), 3),
            (
                AgentError::InsufficientData {
                    points: 0,
                    minimum: 1,
                },
                4,
            ),
            (
                AgentError::ChartRender {
                    reason: "empty".into(),
                },
                5,
            ),
            (
                AgentError::ReportRender {
                    reason: "template".into(),
                },
                5,
            ),
        ];
        for (err, expected) in &cases {
            assert_eq!(err.exit_code(), *expected, "{err}");
        }
    }
}
