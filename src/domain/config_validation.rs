//! Configuration validation.
//!
//! Every key is optional; these checks only reject values that are present
//! but unusable.

use crate::domain::error::AgentError;
use crate::domain::run_config::DataSource;
use crate::ports::config_port::ConfigPort;

const PATH_KEYS: &[(&str, &str)] = &[
    ("data", "dir"),
    ("output", "charts_dir"),
    ("output", "dashboard"),
    ("output", "reports_dir"),
];

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), AgentError> {
    validate_data_source(config)?;
    validate_paths(config)?;
    validate_summary(config)?;
    Ok(())
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), AgentError> {
    if let Some(source) = config.get_string("data", "source") {
        if DataSource::parse(&source).is_none() {
            return Err(AgentError::ConfigInvalid {
                section: "data".to_string(),
                key: "source".to_string(),
                reason: format!("unknown data source '{source}' (expected csv or yahoo)"),
            });
        }
    }
    Ok(())
}

fn validate_paths(config: &dyn ConfigPort) -> Result<(), AgentError> {
    for &(section, key) in PATH_KEYS {
        if let Some(value) = config.get_string(section, key) {
            if value.trim().is_empty() {
                return Err(AgentError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: "path must not be empty".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_summary(config: &dyn ConfigPort) -> Result<(), AgentError> {
    for key in ["api_key_env", "model", "api_base"] {
        if let Some(value) = config.get_string("summary", key) {
            if value.trim().is_empty() {
                return Err(AgentError::ConfigInvalid {
                    section: "summary".to_string(),
                    key: key.to_string(),
                    reason: format!("{key} must not be empty"),
                });
            }
        }
    }
    Ok(())
}
