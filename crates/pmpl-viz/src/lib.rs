//! Chart primitives and the dataset reports built on them.

pub mod plot;
pub mod reports;

pub use reports::{run_report, run_reports, Report, ReportSummary};
