//! Port traits for the collaborators the pipeline talks to.

pub mod chart_port;
pub mod config_port;
pub mod price_port;
pub mod report_port;
pub mod summary_port;
