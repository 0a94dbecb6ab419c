//! CLI argument structures

use crate::config::ReportConfig;
use crate::report::{OutputEncoding, SummaryFormat};
use clap::Parser;
use std::path::PathBuf;

/// Annotate a course content tree with the authoring events from a tracking log
///
/// Required values may also come from the config file or from
/// COURSE_EVENTS_* environment variables.
#[derive(Parser, Debug)]
#[command(name = "course-tree-events")]
#[command(version)]
pub struct Cli {
    /// Organization of the course
    #[arg(long)]
    pub org: Option<String>,

    /// Course number
    #[arg(long)]
    pub course: Option<String>,

    /// Tracking log to scan, one JSON event per line
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Where to write the report
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Content store export (JSON array or one document per line)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Text encoding of the report
    #[arg(long, value_enum)]
    pub encoding: Option<OutputEncoding>,

    /// Format of the summary printed to stdout
    #[arg(long, value_enum)]
    pub summary: Option<SummaryFormat>,

    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The command-line configuration layer
    pub fn to_overrides(&self) -> ReportConfig {
        ReportConfig {
            org: self.org.clone(),
            course: self.course.clone(),
            log: self.log.clone(),
            out: self.out.clone(),
            store: self.store.clone(),
            encoding: self.encoding,
            summary: self.summary,
            ..ReportConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "course-tree-events",
            "--org",
            "MITx",
            "--course",
            "6.002x",
            "--encoding",
            "utf8",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let overrides = cli.to_overrides();
        assert_eq!(overrides.org.as_deref(), Some("MITx"));
        assert_eq!(overrides.course.as_deref(), Some("6.002x"));
        assert_eq!(overrides.encoding, Some(OutputEncoding::Utf8));
        assert!(overrides.log.is_none());
        assert!(overrides.summary.is_none());
    }

    #[test]
    fn test_unknown_encoding_is_a_usage_error() {
        let err = Cli::try_parse_from(["course-tree-events", "--encoding", "ebcdic"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
