//! Run configuration
//!
//! Values come from, in increasing precedence: built-in defaults, a TOML
//! file, `COURSE_EVENTS_*` environment variables, and command-line flags.
//! [`ReportConfig`] holds the partially filled layers; [`ReportConfig::resolve`]
//! checks that everything a run needs is present.

pub mod loader;

pub use loader::ConfigLoader;

use crate::diagnostics::DEFAULT_MAX_DETAILS;
use crate::error::{Error, Result};
use crate::report::{OutputEncoding, SummaryFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix of every environment variable read by [`ReportConfig::merge_env_with`]
pub const ENV_PREFIX: &str = "COURSE_EVENTS_";

/// One configuration layer; unset fields defer to lower layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub org: Option<String>,
    pub course: Option<String>,
    pub log: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub encoding: Option<OutputEncoding>,
    pub summary: Option<SummaryFormat>,
    pub log_level: Option<String>,
    pub max_details: Option<usize>,
}

/// Fully specified settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub org: String,
    pub course: String,
    pub log: PathBuf,
    pub out: PathBuf,
    pub store: PathBuf,
    pub encoding: OutputEncoding,
    pub summary: SummaryFormat,
    pub max_details: usize,
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `other` on top of `self`: fields set in `other` win.
    pub fn merge(&mut self, other: ReportConfig) {
        fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        overlay(&mut self.org, other.org);
        overlay(&mut self.course, other.course);
        overlay(&mut self.log, other.log);
        overlay(&mut self.out, other.out);
        overlay(&mut self.store, other.store);
        overlay(&mut self.encoding, other.encoding);
        overlay(&mut self.summary, other.summary);
        overlay(&mut self.log_level, other.log_level);
        overlay(&mut self.max_details, other.max_details);
    }

    /// Apply `COURSE_EVENTS_*` variables from the process environment.
    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `COURSE_EVENTS_*` variables from `lookup`.
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.is_empty());

        let mut layer = ReportConfig {
            org: var("ORG"),
            course: var("COURSE"),
            log: var("LOG").map(PathBuf::from),
            out: var("OUT").map(PathBuf::from),
            store: var("STORE").map(PathBuf::from),
            log_level: var("LOG_LEVEL"),
            ..ReportConfig::default()
        };

        if let Some(encoding) = var("ENCODING") {
            layer.encoding = Some(encoding.parse().map_err(Error::Config)?);
        }
        if let Some(max) = var("MAX_DETAILS") {
            let max = max.parse().map_err(|_| {
                Error::Config(format!("{ENV_PREFIX}MAX_DETAILS must be a number, got '{max}'"))
            })?;
            layer.max_details = Some(max);
        }

        self.merge(layer);
        Ok(())
    }

    /// Check required fields and fill defaults.
    pub fn resolve(self) -> Result<RunConfig> {
        fn required<T>(value: Option<T>, name: &str) -> Result<T> {
            value.ok_or_else(|| {
                Error::Config(format!(
                    "'{name}' is required (flag --{name}, config key '{name}' or {ENV_PREFIX}{})",
                    name.to_uppercase()
                ))
            })
        }

        Ok(RunConfig {
            org: required(self.org, "org")?,
            course: required(self.course, "course")?,
            log: required(self.log, "log")?,
            out: required(self.out, "out")?,
            store: required(self.store, "store")?,
            encoding: self.encoding.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            max_details: self.max_details.unwrap_or(DEFAULT_MAX_DETAILS),
        })
    }
}
