//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod planner;
pub mod price;
pub mod run_config;
pub mod store;
pub mod summary;
pub mod task;
