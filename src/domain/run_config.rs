//! Settings for one analysis run: where prices come from and where output goes.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Csv,
    Yahoo,
}

impl DataSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "yahoo" => Some(Self::Yahoo),
            _ => None,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Csv => f.write_str("csv"),
            DataSource::Yahoo => f.write_str("yahoo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryConfig {
    /// Global switch; a request can still opt out with "no summary".
    pub enabled: bool,
    pub api_key_env: String,
    pub model: String,
    pub api_base: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "OPENAI_API_KEY".into(),
            model: "gpt-4.1-mini".into(),
            api_base: "https://api.openai.com/v1".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_source: DataSource,
    pub data_dir: PathBuf,
    pub charts_dir: PathBuf,
    pub dashboard_path: PathBuf,
    pub reports_dir: PathBuf,
    pub summary: SummaryConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::Csv,
            data_dir: PathBuf::from("data"),
            charts_dir: PathBuf::from("output/charts"),
            dashboard_path: PathBuf::from("output/dashboard/index.html"),
            reports_dir: PathBuf::from("reports/generated"),
            summary: SummaryConfig::default(),
        }
    }
}

impl RunConfig {
    /// Moves chart and dashboard output under `dir`, keeping their file layout.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.charts_dir = dir.join("charts");
        self.dashboard_path = dir.join("dashboard").join("index.html");
        self.reports_dir = dir.join("reports");
        self
    }
}
