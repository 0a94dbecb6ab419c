//! Counters collected while matching a tracking log

use crate::diagnostics::Diagnostics;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// Non-blank lines read
    pub lines: usize,
    /// Lines that did not decode, or recognized events missing a usable
    /// payload or timestamp
    pub malformed_lines: usize,
    /// Events whose type is not an edit action
    pub ignored_events: usize,
    /// Events for another org or course
    pub out_of_scope: usize,
    /// Events whose identifier could not be parsed
    pub invalid_identifiers: usize,
    pub matched: usize,
    /// Events with no corresponding tree node
    pub unmatched: usize,
    /// Matched events per action label
    pub by_action: BTreeMap<String, usize>,
    pub diagnostics: Diagnostics,
}

impl MatchStats {
    pub fn with_limit(max_details: usize) -> Self {
        Self {
            diagnostics: Diagnostics::with_limit(max_details),
            ..Self::default()
        }
    }

    pub(crate) fn record_match(&mut self, label: &str) {
        self.matched += 1;
        *self.by_action.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Recognized events that reached the matching step
    pub fn considered(&self) -> usize {
        self.matched + self.unmatched
    }
}
