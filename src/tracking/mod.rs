//! Tracking-log reconciliation
//!
//! Studio tracking logs are newline-delimited JSON. Only a handful of edit
//! event types are of interest; each one names (or implies) a node of the
//! course tree, and a formatted line is appended to that node's event log.

pub mod event;
pub mod extract;
pub mod matcher;
pub mod stats;

pub use event::{EditAction, LogEvent};
pub use extract::{extract_location, extract_location_text};
pub use matcher::{EventMatcher, MatchTarget};
pub use stats::MatchStats;
