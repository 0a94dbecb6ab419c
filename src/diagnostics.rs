//! Per-run counters for recoverable problems
//!
//! Skipped lines, orphaned children and similar conditions never abort a run.
//! They are tallied here and handed back to the caller alongside the result.

use serde::Serialize;

/// Default cap on how many detail messages are kept
pub const DEFAULT_MAX_DETAILS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub errors: usize,
    pub warnings: usize,
    pub details: Vec<String>,
    #[serde(skip)]
    max_details: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_DETAILS)
    }
}

impl Diagnostics {
    pub fn with_limit(max_details: usize) -> Self {
        Self {
            errors: 0,
            warnings: 0,
            details: Vec::new(),
            max_details,
        }
    }

    pub fn error(&mut self, detail: impl Into<String>) {
        self.errors += 1;
        self.record(format!("error: {}", detail.into()));
    }

    pub fn warning(&mut self, detail: impl Into<String>) {
        self.warnings += 1;
        self.record(format!("warning: {}", detail.into()));
    }

    fn record(&mut self, detail: String) {
        if self.details.len() < self.max_details {
            self.details.push(detail);
        }
    }

    /// Number of problems whose detail message was dropped by the cap
    pub fn suppressed(&self) -> usize {
        (self.errors + self.warnings).saturating_sub(self.details.len())
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_caps_details() {
        let mut diag = Diagnostics::with_limit(2);
        diag.error("bad line 3");
        diag.warning("orphan child");
        diag.warning("another orphan");

        assert_eq!(diag.errors, 1);
        assert_eq!(diag.warnings, 2);
        assert_eq!(diag.details, vec!["error: bad line 3", "warning: orphan child"]);
        assert_eq!(diag.suppressed(), 1);
        assert!(!diag.is_clean());
    }

    #[test]
    fn test_default_is_clean() {
        assert!(Diagnostics::default().is_clean());
    }
}
