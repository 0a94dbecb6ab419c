//! Matches tracking-log events to course tree nodes
//!
//! Identifier-bearing events match by full location equality. Clone and
//! course-creation events carry no usable identifier for the new node, so
//! they match on category and display name instead. The first depth-first
//! match wins. Events that match nothing are dropped.

use super::event::{post_value, EditAction, LogEvent};
use super::extract::extract_location;
use super::stats::MatchStats;
use crate::diagnostics::DEFAULT_MAX_DETAILS;
use crate::location::{Location, TemplateLocation};
use crate::timestamp::{format_timestamp, parse_timestamp};
use crate::tree::{CourseTree, NodeId};
use std::io::{self, BufRead};
use tracing::{debug, info, trace};

/// Clone templates of these categories are named by the posted display name
const CONTAINER_CATEGORIES: [&str; 3] = ["vertical", "sequential", "chapter"];

/// How an event identifies its node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTarget {
    /// Exact location, searched across the whole tree
    Location(Location),
    /// Category and display name, searched across the whole tree
    Named {
        category: String,
        display_name: String,
    },
    /// Category and display name, searched among the roots only
    NamedRoot {
        category: String,
        display_name: String,
    },
}

/// Why an event did not reach the matching step
#[derive(Debug, Clone, PartialEq, Eq)]
enum Skip {
    Malformed(String),
    InvalidIdentifier(String),
    OutOfScope,
}

pub struct EventMatcher {
    org: String,
    course: String,
    max_details: usize,
}

impl EventMatcher {
    /// Matcher scoped to events for `org`/`course`
    pub fn new(org: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            course: course.into(),
            max_details: DEFAULT_MAX_DETAILS,
        }
    }

    pub fn with_max_details(mut self, max_details: usize) -> Self {
        self.max_details = max_details;
        self
    }

    /// Scan a newline-delimited log, annotating `tree` in place.
    ///
    /// Only read failures are errors. Lines that are not valid UTF-8 are
    /// decoded lossily and lines that are not JSON are skipped.
    pub fn process<R: BufRead>(&self, mut input: R, tree: &mut CourseTree) -> io::Result<MatchStats> {
        let mut stats = MatchStats::with_limit(self.max_details);
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }
            self.process_line(line_no, &line, tree, &mut stats);
        }

        info!(
            "Processed {} log lines: {} matched, {} unmatched, {} malformed",
            stats.lines, stats.matched, stats.unmatched, stats.malformed_lines
        );
        Ok(stats)
    }

    /// Handle a single log line.
    pub fn process_line(
        &self,
        line_no: usize,
        line: &str,
        tree: &mut CourseTree,
        stats: &mut MatchStats,
    ) {
        stats.lines += 1;

        let Some(event) = LogEvent::from_line(line) else {
            trace!("Line {} is not a decodable event", line_no);
            stats.malformed_lines += 1;
            stats
                .diagnostics
                .error(format!("line {line_no}: not a decodable JSON event"));
            return;
        };

        let Some(action) = event.event_type.as_deref().and_then(EditAction::classify) else {
            stats.ignored_events += 1;
            return;
        };

        let Some(time) = event.time.as_deref().and_then(parse_timestamp) else {
            stats.malformed_lines += 1;
            stats
                .diagnostics
                .error(format!("line {line_no}: {} without a readable time", action.label()));
            return;
        };

        let target = match self.resolve_target(action, &event) {
            Ok(target) => target,
            Err(Skip::OutOfScope) => {
                debug!("Line {}: {} is outside {}/{}", line_no, action.label(), self.org, self.course);
                stats.out_of_scope += 1;
                return;
            }
            Err(Skip::InvalidIdentifier(reason)) => {
                stats.invalid_identifiers += 1;
                stats
                    .diagnostics
                    .error(format!("line {line_no}: {reason}"));
                return;
            }
            Err(Skip::Malformed(reason)) => {
                stats.malformed_lines += 1;
                stats
                    .diagnostics
                    .error(format!("line {line_no}: {reason}"));
                return;
            }
        };

        let Some(id) = find_target(tree, &target) else {
            debug!("Line {}: no node for {:?}", line_no, target);
            stats.unmatched += 1;
            return;
        };

        let node = tree.node(id);
        if action == EditAction::CreateCourse {
            match node.start_date {
                Some(start) => debug!("{} starts {}", node.display_name, start.to_rfc3339()),
                None => debug!("{} has no start date", node.display_name),
            }
        }
        let entry = format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            node.category(),
            node.display_name,
            node.location.url(),
            action.label(),
            event.username(),
            format_timestamp(&time)
        );
        debug!("Line {}: {}", line_no, entry);
        tree.append_event(id, entry);
        stats.record_match(action.label());
    }

    fn resolve_target(&self, action: EditAction, event: &LogEvent) -> Result<MatchTarget, Skip> {
        if action.uses_embedded_location() {
            return self.embedded_target(action, event);
        }
        match action {
            EditAction::CreateCourse => self.course_target(event),
            _ => self.clone_target(event),
        }
    }

    fn course_target(&self, event: &LogEvent) -> Result<MatchTarget, Skip> {
        let post = event
            .post()
            .ok_or_else(|| Skip::Malformed("create_new_course without a POST body".into()))?;

        let org = post_value(&post, "org");
        let number = post_value(&post, "number");
        if org.is_some_and(|o| o != self.org) || number.is_some_and(|n| n != self.course) {
            return Err(Skip::OutOfScope);
        }

        let display_name = post_value(&post, "display_name")
            .ok_or_else(|| Skip::Malformed("create_new_course without display_name".into()))?;

        Ok(MatchTarget::NamedRoot {
            category: "course".to_string(),
            display_name: display_name.to_string(),
        })
    }

    fn clone_target(&self, event: &LogEvent) -> Result<MatchTarget, Skip> {
        let post = event
            .post()
            .ok_or_else(|| Skip::Malformed("clone_item without a POST body".into()))?;

        let parent = post_value(&post, "parent_location")
            .ok_or_else(|| Skip::Malformed("clone_item without parent_location".into()))?;
        let parent = Location::parse(parent)
            .map_err(|e| Skip::InvalidIdentifier(format!("clone_item parent: {e}")))?;
        if !parent.in_course(&self.org, &self.course) {
            return Err(Skip::OutOfScope);
        }

        let template = post_value(&post, "template")
            .ok_or_else(|| Skip::Malformed("clone_item without template".into()))?;
        let template = TemplateLocation::parse(template)
            .map_err(|e| Skip::InvalidIdentifier(format!("clone_item template: {e}")))?;

        let display_name = if CONTAINER_CATEGORIES.contains(&template.category()) {
            post_value(&post, "display_name")
                .ok_or_else(|| Skip::Malformed("clone_item without display_name".into()))?
                .to_string()
        } else {
            template.spaced_display_name()
        };

        Ok(MatchTarget::Named {
            category: template.category().to_string(),
            display_name,
        })
    }

    fn embedded_target(&self, action: EditAction, event: &LogEvent) -> Result<MatchTarget, Skip> {
        let payload = event
            .raw_payload()
            .ok_or_else(|| Skip::Malformed(format!("{} without a payload", action.label())))?;

        let location = extract_location(&payload)
            .ok_or_else(|| {
                Skip::InvalidIdentifier(format!("{} payload has no location", action.label()))
            })?
            .map_err(|e| Skip::InvalidIdentifier(format!("{}: {e}", action.label())))?;

        if !location.in_course(&self.org, &self.course) {
            return Err(Skip::OutOfScope);
        }
        Ok(MatchTarget::Location(location))
    }
}

fn find_target(tree: &CourseTree, target: &MatchTarget) -> Option<NodeId> {
    match target {
        MatchTarget::Location(location) => tree.find_by_location(location),
        MatchTarget::Named {
            category,
            display_name,
        } => tree.find_by_name(category, display_name),
        MatchTarget::NamedRoot {
            category,
            display_name,
        } => tree.find_root_by_name(category, display_name),
    }
}
