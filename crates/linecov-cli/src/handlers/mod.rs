//! Command handlers - kept out of main.rs for testability

pub mod report;

pub use report::{build_report_config, execute_report, load_export};
