//! Report generation port.

use crate::domain::error::AgentError;
use crate::domain::store::RunStore;
use std::path::{Path, PathBuf};

/// Port for writing run results somewhere a person can read them.
pub trait ReportPort {
    /// Writes the report for `tickers` and returns the path written.
    fn write(
        &self,
        store: &RunStore,
        tickers: &[&str],
        output_path: &Path,
    ) -> Result<PathBuf, AgentError>;
}
