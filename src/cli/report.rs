//! The report command: build the tree, scan the log, write the report

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::report::{RunSummary, TreeEventReporter};
use crate::store::JsonFileStore;
use crate::tracking::EventMatcher;
use crate::tree::CourseTreeBuilder;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Run one reconciliation as configured and write the report to `config.out`.
pub fn run_report(config: &RunConfig) -> Result<RunSummary> {
    let store = JsonFileStore::new(&config.store);
    let (mut tree, tree_stats) = CourseTreeBuilder::new(&store)
        .with_max_details(config.max_details)
        .build(&config.org, &config.course)?;

    if tree.is_empty() {
        warn!(
            "No course content found for {}/{} in {}",
            config.org,
            config.course,
            config.store.display()
        );
    }

    let log = File::open(&config.log).map_err(|source| Error::Input {
        path: config.log.clone(),
        source,
    })?;
    let matcher = EventMatcher::new(&config.org, &config.course).with_max_details(config.max_details);
    let log_stats = matcher
        .process(BufReader::new(log), &mut tree)
        .map_err(|source| Error::Input {
            path: config.log.clone(),
            source,
        })?;
    info!(
        "Matched {} of {} events from {}",
        log_stats.matched,
        log_stats.considered(),
        config.log.display()
    );

    let reporter = TreeEventReporter::new(config.encoding);
    write_atomically(&config.out, |sink| reporter.dump(&tree, sink)).map_err(|source| {
        Error::Output {
            path: config.out.clone(),
            source,
        }
    })?;
    info!("Report written to {}", config.out.display());

    Ok(RunSummary {
        org: config.org.clone(),
        course: config.course.clone(),
        report: config.out.clone(),
        events_written: tree.event_count(),
        tree: tree_stats,
        log: log_stats,
    })
}

/// Write through a temporary file in the destination directory, then rename
/// it into place. A failed run leaves any previous report untouched.
fn write_atomically<F>(path: &Path, write: F) -> std::io::Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> std::io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    debug!("Writing report through {}", temp.path().display());

    {
        let mut writer = BufWriter::new(&mut temp);
        write(&mut writer)?;
        writer.flush()?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{OutputEncoding, SummaryFormat};
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &Path) -> RunConfig {
        RunConfig {
            org: "org".into(),
            course: "course".into(),
            log: dir.join("tracking.log"),
            out: dir.join("out.tsv"),
            store: dir.join("store.json"),
            encoding: OutputEncoding::Utf8,
            summary: SummaryFormat::None,
            max_details: 5,
        }
    }

    const STORE: &str = r#"[
  {"_id": {"tag": "i4x", "org": "org", "course": "course", "category": "course", "name": "run"},
   "definition": {"children": []}, "metadata": {"display_name": "Circuits"}},
  {"_id": {"tag": "i4x", "org": "org", "course": "course", "category": "chapter", "name": "w1"},
   "definition": {"children": ["i4x://org/course/html/h1"]}, "metadata": {"display_name": "Week 1"}},
  {"_id": {"tag": "i4x", "org": "org", "course": "course", "category": "html", "name": "h1"},
   "definition": {"children": []}, "metadata": {"display_name": "Intro"}}
]"#;

    #[test]
    fn test_run_writes_report() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        fs::write(&config.store, STORE).unwrap();
        fs::write(
            &config.log,
            concat!(
                r#"{"event_type": "/save_item", "username": "alice", "time": "2013-01-01T00:00:00+00:00", "event": "{\"POST\": {\"id\": [\"i4x://org/course/html/h1\"]}}"}"#,
                "\n",
                "garbage\n",
            ),
        )
        .unwrap();

        let summary = run_report(&config).unwrap();
        assert_eq!(summary.events_written, 1);
        assert_eq!(summary.tree.nodes, 3);
        assert_eq!(summary.log.malformed_lines, 1);

        let report = fs::read_to_string(&config.out).unwrap();
        assert!(report.starts_with("course\tCircuits\ti4x://org/course/course/run\n"));
        assert!(report.ends_with(
            "html\tIntro\ti4x://org/course/html/h1\tsave_item\talice\t01/01/2013 00:00\n"
        ));
    }

    #[test]
    fn test_missing_log_is_an_input_error() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        fs::write(&config.store, STORE).unwrap();

        let err = run_report(&config).unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
        assert!(!config.out.exists());
    }

    #[test]
    fn test_unwritable_destination_is_an_output_error() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        fs::write(&config.store, STORE).unwrap();
        fs::write(&config.log, "").unwrap();
        config.out = dir.path().join("missing-dir").join("out.tsv");

        let err = run_report(&config).unwrap_err();
        assert!(matches!(err, Error::Output { .. }));
    }
}
