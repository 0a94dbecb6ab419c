//! Command-line interface
//!
//! Argument definitions and the report command they drive.

pub mod args;
pub mod report;

pub use args::Cli;
pub use report::run_report;
