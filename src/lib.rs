//! # Course events
//!
//! Rebuilds a course's content tree from a content-store export and
//! annotates each node with the authoring events found for it in a
//! tracking log.
//!
//! ## Usage
//!
//! ```bash
//! course-tree-events --org MITx --course 6.002x --store modulestore.json \
//!     --log tracking.log --out events.tsv
//! ```
//!
//! ## Modules
//!
//! - `location` - Content identifiers (`i4x://...`) and clone templates
//! - `store` - Content-store records and the stores that serve them
//! - `tree` - Arena-backed course tree and its builder
//! - `tracking` - Tracking-log events and the matcher that attaches them to nodes
//! - `report` - Tab-separated report writer and the run summary
//! - `config` - Layered run configuration
//! - `app` - Logging and fatal error handling for the binary
//! - `cli` - Command-line arguments and the report command
pub mod app;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod location;
pub mod report;
pub mod store;
pub mod timestamp;
pub mod tracking;
pub mod tree;

pub use error::{Error, Result};
pub use location::{Location, LocationError, TemplateLocation};
pub use report::{OutputEncoding, TreeEventReporter};
pub use store::{ContentStore, JsonFileStore, MemoryStore, ModuleRecord};
pub use tracking::{EventMatcher, MatchStats};
pub use tree::{CourseTree, CourseTreeBuilder};
