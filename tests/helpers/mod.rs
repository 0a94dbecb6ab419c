//! Fixtures shared by the integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const ORG: &str = "MITx";
pub const COURSE: &str = "6.002x";

/// A store document for `MITx/6.002x`
pub fn module(category: &str, name: &str, display_name: Option<&str>, children: &[&str]) -> Value {
    let mut metadata = serde_json::Map::new();
    if let Some(display_name) = display_name {
        metadata.insert("display_name".into(), json!(display_name));
    }
    json!({
        "_id": {
            "tag": "i4x",
            "org": ORG,
            "course": COURSE,
            "category": category,
            "name": name,
            "revision": null,
        },
        "definition": {"children": children},
        "metadata": metadata,
    })
}

pub fn url(category: &str, name: &str) -> String {
    format!("i4x://{ORG}/{COURSE}/{category}/{name}")
}

/// A small course: one chapter holding a sequence, a unit and two leaves
pub fn sample_modules() -> Vec<Value> {
    let mut course = module("course", "2012_Fall", Some("Circuits and Electronics"), &[]);
    course["metadata"]["start"] = json!("2012-09-05T12:00:00Z");
    vec![
        course,
        module("chapter", "Week_1", Some("Week 1"), &[&url("sequential", "Lecture_1")]),
        module("sequential", "Lecture_1", Some("Lecture 1"), &[&url("vertical", "Unit_1")]),
        module(
            "vertical",
            "Unit_1",
            Some("Circuit basics"),
            &[&url("problem", "Ohm"), &url("html", "Welcome")],
        ),
        module("problem", "Ohm", Some("Ohm's law"), &[]),
        module("html", "Welcome", Some("Blank HTML Page"), &[]),
        module("chapter", "Week_2", Some("Week 2"), &[&url("sequential", "Missing")]),
    ]
}

/// A tracking-log line for an event whose payload is a JSON-encoded string
pub fn log_line(event_type: &str, username: &str, time: &str, payload: &str) -> String {
    json!({
        "username": username,
        "host": "studio.edx.org",
        "event_source": "browser",
        "event_type": event_type,
        "time": time,
        "ip": "127.0.0.1",
        "agent": "Mozilla/5.0",
        "event": payload,
        "page": null,
    })
    .to_string()
}

pub fn post_payload(post: Value) -> String {
    json!({"GET": {}, "POST": post}).to_string()
}

/// Temporary directory holding a store export, a log and the report path
pub struct Workspace {
    pub dir: TempDir,
    pub store: PathBuf,
    pub log: PathBuf,
    pub out: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store = dir.path().join("modulestore.json");
        let log = dir.path().join("tracking.log");
        let out = dir.path().join("events.tsv");
        Self {
            dir,
            store,
            log,
            out,
        }
    }

    /// Write the store as one document per line
    pub fn write_store(&self, modules: &[Value]) {
        let content: Vec<String> = modules.iter().map(Value::to_string).collect();
        fs::write(&self.store, content.join("\n")).expect("write store");
    }

    pub fn write_log(&self, lines: &[String]) {
        fs::write(&self.log, lines.join("\n")).expect("write log");
    }

    pub fn report(&self) -> String {
        String::from_utf8(fs::read(&self.out).expect("read report")).expect("utf-8 report")
    }
}
