//! Content store access
//!
//! The course tree is built from module records held in a document store.
//! The store itself is an external collaborator; this module defines the
//! record shape the tree builder needs and the [`ContentStore`] seam it reads
//! through.
//!
//! - [`JsonFileStore`] reads a document-store export from disk
//! - [`MemoryStore`] serves records held in memory

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::location::{Location, LocationResult};
use crate::timestamp::{from_epoch_millis, parse_timestamp};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Categories fetched for a course tree. Anything else, and everything
/// beneath it, stays out of the tree.
pub const COURSE_CATEGORIES: [&str; 12] = [
    "course",
    "chapter",
    "sequential",
    "vertical",
    "wrapper",
    "problemset",
    "conditional",
    "randomize",
    "html",
    "video",
    "discussion",
    "problem",
];

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read content store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed content store record at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Query capability over the content store
pub trait ContentStore {
    /// Every module of `org`/`course` whose category is in [`COURSE_CATEGORIES`]
    fn course_modules(&self, org: &str, course: &str) -> StoreResult<Vec<ModuleRecord>>;
}

/// Filter applied to store records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleQuery {
    pub org: String,
    pub course: String,
    pub categories: Vec<String>,
}

impl ModuleQuery {
    pub fn course(org: &str, course: &str) -> Self {
        Self {
            org: org.to_string(),
            course: course.to_string(),
            categories: COURSE_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn matches(&self, record: &ModuleRecord) -> bool {
        record.id.org == self.org
            && record.id.course == self.course
            && self.categories.iter().any(|c| *c == record.id.category)
    }
}

/// One module document, as projected from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub definition: Definition,
    #[serde(default)]
    pub metadata: Metadata,
}

/// The structured `_id` of a module document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordId {
    pub tag: String,
    pub org: String,
    pub course: String,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub revision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub children: Vec<String>,
}

/// Module metadata; only `display_name` and `start` are interpreted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub display_name: Option<Value>,
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(flatten)]
    pub inherited: BTreeMap<String, Value>,
}

impl RecordId {
    pub fn location(&self) -> LocationResult<Location> {
        Location::new(
            &self.tag,
            &self.org,
            &self.course,
            &self.category,
            &self.name,
            self.revision.as_deref(),
        )
    }
}

impl ModuleRecord {
    /// Display name as text; non-string scalars are rendered, anything else is absent.
    pub fn display_name(&self) -> Option<String> {
        match self.metadata.display_name.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// `metadata.start`, as a string or an extended-JSON `$date`.
    ///
    /// `None` when absent, `Some(Err(raw))` when present but unreadable.
    pub fn start_date(&self) -> Option<Result<DateTime<FixedOffset>, String>> {
        let raw = self.metadata.start.as_ref()?;
        let parsed = match raw {
            Value::Null => return None,
            Value::String(s) => parse_timestamp(s),
            Value::Object(map) => match map.get("$date") {
                Some(Value::String(s)) => parse_timestamp(s),
                Some(Value::Number(n)) => n.as_i64().and_then(from_epoch_millis),
                _ => None,
            },
            _ => None,
        };
        Some(parsed.ok_or_else(|| raw.to_string()))
    }

    pub fn children(&self) -> &[String] {
        &self.definition.children
    }
}
