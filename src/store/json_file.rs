//! Content store backed by a document-store export file
//!
//! Accepts either newline-delimited documents (the export tool's default) or
//! a single JSON array of documents.

use super::{ContentStore, ModuleQuery, ModuleRecord, StoreError, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> StoreResult<Vec<ModuleRecord>> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_export(&content)
    }
}

/// Decode an export, detecting array versus line-delimited layout.
pub fn parse_export(content: &str) -> StoreResult<Vec<ModuleRecord>> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).map_err(|source| StoreError::Parse {
            line: source.line(),
            source,
        });
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| StoreError::Parse {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

impl ContentStore for JsonFileStore {
    fn course_modules(&self, org: &str, course: &str) -> StoreResult<Vec<ModuleRecord>> {
        let query = ModuleQuery::course(org, course);
        let records = self.read_records()?;
        let total = records.len();
        let selected: Vec<_> = records.into_iter().filter(|r| query.matches(r)).collect();
        debug!(
            "Selected {} of {} records from {} for {}/{}",
            selected.len(),
            total,
            self.path.display(),
            org,
            course
        );
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LINES: &str = r#"{"_id": {"tag": "i4x", "org": "o", "course": "c", "category": "course", "name": "run"}}

{"_id": {"tag": "i4x", "org": "o", "course": "c", "category": "chapter", "name": "ch1"}}
{"_id": {"tag": "i4x", "org": "o", "course": "other", "category": "chapter", "name": "ch2"}}
{"_id": {"tag": "i4x", "org": "o", "course": "c", "category": "static_tab", "name": "tab"}}
"#;

    #[test]
    fn test_reads_line_delimited_export() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(LINES.as_bytes()).unwrap();

        let store = JsonFileStore::new(file.path());
        let records = store.course_modules("o", "c").unwrap();
        let names: Vec<_> = records.iter().map(|r| r.id.name.as_str()).collect();
        assert_eq!(names, vec!["run", "ch1"]);
    }

    #[test]
    fn test_reads_array_export() {
        let content = r#"[
            {"_id": {"tag": "i4x", "org": "o", "course": "c", "category": "course", "name": "run"}},
            {"_id": {"tag": "i4x", "org": "o", "course": "c", "category": "html", "name": "h1"}}
        ]"#;
        let records = parse_export(content).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_reports_malformed_line_number() {
        let content = "{\"_id\": {\"tag\": \"i4x\", \"org\": \"o\", \"course\": \"c\", \"category\": \"course\", \"name\": \"r\"}}\n{broken\n";
        match parse_export(content) {
            Err(StoreError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let store = JsonFileStore::new("/nonexistent/modulestore.json");
        assert!(matches!(
            store.course_modules("o", "c"),
            Err(StoreError::Io { .. })
        ));
    }
}
