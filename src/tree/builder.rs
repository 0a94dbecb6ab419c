//! Builds a [`CourseTree`] from content-store records
//!
//! The course record becomes the root. Each chapter record is attached under
//! it and its declared children are resolved recursively against the fetched
//! records. Children that were not fetched are skipped, so the tree never
//! extends past the store's category allow-list.

use super::{CourseTree, NodeId, TreeNode};
use crate::diagnostics::{Diagnostics, DEFAULT_MAX_DETAILS};
use crate::location::Location;
use crate::store::{ContentStore, ModuleRecord, StoreResult};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Counters collected while building a tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Records returned by the store query
    pub records: usize,
    /// Nodes placed in the tree
    pub nodes: usize,
    pub course_roots: usize,
    /// Records whose `_id` is not a valid location
    pub invalid_records: usize,
    /// Declared children with no fetched record
    pub orphaned_children: usize,
    /// Declared children whose identifier does not parse
    pub invalid_children: usize,
    /// Children already placed under another parent
    pub reparented_children: usize,
    pub diagnostics: Diagnostics,
}

pub struct CourseTreeBuilder<'a, S: ContentStore + ?Sized> {
    store: &'a S,
    max_details: usize,
}

impl<'a, S: ContentStore + ?Sized> CourseTreeBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            max_details: DEFAULT_MAX_DETAILS,
        }
    }

    pub fn with_max_details(mut self, max_details: usize) -> Self {
        self.max_details = max_details;
        self
    }

    /// Query the store for `org`/`course` and assemble the tree.
    pub fn build(&self, org: &str, course: &str) -> StoreResult<(CourseTree, BuildStats)> {
        let records = self.store.course_modules(org, course)?;
        info!(
            "Building course tree for {}/{} from {} records",
            org,
            course,
            records.len()
        );
        Ok(assemble(&records, self.max_details))
    }
}

/// Assemble a tree from already-fetched records.
pub fn assemble(records: &[ModuleRecord], max_details: usize) -> (CourseTree, BuildStats) {
    let mut stats = BuildStats {
        records: records.len(),
        diagnostics: Diagnostics::with_limit(max_details),
        ..BuildStats::default()
    };

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        match record.id.location() {
            Ok(location) => entries.push((location, record)),
            Err(e) => {
                stats.invalid_records += 1;
                stats.diagnostics.error(format!(
                    "record {}/{} skipped: {}",
                    record.id.category, record.id.name, e
                ));
            }
        }
    }

    let mut assembly = Assembly {
        entries: &entries,
        index: HashMap::new(),
        placed: HashSet::new(),
        tree: CourseTree::new(),
        stats,
    };
    for (idx, (location, _)) in entries.iter().enumerate() {
        assembly.index.entry(location).or_insert(idx);
    }

    assembly.place_course_roots();
    assembly.place_chapters();

    let Assembly {
        tree, mut stats, ..
    } = assembly;
    stats.nodes = tree.len();
    info!(
        "Course tree has {} nodes under {} root(s)",
        stats.nodes,
        tree.roots().len()
    );
    (tree, stats)
}

struct Assembly<'r> {
    entries: &'r [(Location, &'r ModuleRecord)],
    index: HashMap<&'r Location, usize>,
    placed: HashSet<usize>,
    tree: CourseTree,
    stats: BuildStats,
}

impl<'r> Assembly<'r> {
    fn place_course_roots(&mut self) {
        let entries = self.entries;
        for (idx, (location, record)) in entries.iter().enumerate() {
            if location.category() != "course" {
                continue;
            }

            let start = match record.start_date() {
                Some(Ok(start)) => Some(start),
                Some(Err(raw)) => {
                    warn!("Unreadable start date {} on {}", raw, location);
                    self.stats
                        .diagnostics
                        .warning(format!("unreadable start date {raw} on {location}"));
                    None
                }
                None => None,
            };

            let display_name = record
                .display_name()
                .unwrap_or_else(|| location.name().to_string());
            match start {
                Some(start) => debug!("[course] {} ({}) starts {}", display_name, location, start),
                None => debug!("[course] {} ({})", display_name, location),
            }

            let node = TreeNode::new(display_name, location.clone(), 0).with_start_date(start);
            self.tree.add_root(node);
            self.placed.insert(idx);
            self.stats.course_roots += 1;
        }

        if self.stats.course_roots > 1 {
            warn!(
                "Found {} course records; chapters attach to the first",
                self.stats.course_roots
            );
            self.stats.diagnostics.warning(format!(
                "{} course records found for one course",
                self.stats.course_roots
            ));
        }
    }

    fn place_chapters(&mut self) {
        let entries = self.entries;
        let course_root = self.tree.roots().first().copied();

        for (idx, (location, record)) in entries.iter().enumerate() {
            if location.category() != "chapter" || self.placed.contains(&idx) {
                continue;
            }

            let depth = if course_root.is_some() { 1 } else { 0 };
            let node = TreeNode::new(
                record.display_name().unwrap_or_default(),
                location.clone(),
                depth,
            );
            debug!("[chapter] {} ({})", node.display_name, location);

            let id = match course_root {
                Some(root) => self.tree.add_child(root, node),
                None => self.tree.add_root(node),
            };
            self.placed.insert(idx);
            self.place_children(id, record, depth);
        }
    }

    fn place_children(&mut self, parent: NodeId, record: &ModuleRecord, depth: usize) {
        let entries = self.entries;
        let depth = depth + 1;

        for child in record.children() {
            let location = match Location::parse(child) {
                Ok(location) => location,
                Err(e) => {
                    self.stats.invalid_children += 1;
                    self.stats
                        .diagnostics
                        .error(format!("child '{child}' of {}: {e}", record.id.name));
                    continue;
                }
            };

            let Some(&idx) = self.index.get(&location) else {
                debug!("Child {} not in fetched records, skipping", location);
                self.stats.orphaned_children += 1;
                self.stats
                    .diagnostics
                    .warning(format!("child {location} has no record"));
                continue;
            };

            if !self.placed.insert(idx) {
                warn!("{} already placed under another parent", location);
                self.stats.reparented_children += 1;
                self.stats
                    .diagnostics
                    .warning(format!("child {location} claimed by more than one parent"));
                continue;
            }

            let (child_location, child_record) = &entries[idx];
            let node = TreeNode::new(
                child_record.display_name().unwrap_or_default(),
                child_location.clone(),
                depth,
            );
            debug!(
                "{} [{}] {}",
                "-".repeat(depth),
                child_location.category(),
                node.display_name
            );
            let id = self.tree.add_child(parent, node);
            self.place_children(id, child_record, depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    fn record(category: &str, name: &str, display: Option<&str>, children: &[&str]) -> ModuleRecord {
        let mut metadata = serde_json::Map::new();
        if let Some(display) = display {
            metadata.insert("display_name".into(), Value::String(display.into()));
        }
        serde_json::from_value(json!({
            "_id": {"tag": "i4x", "org": "org", "course": "course", "category": category, "name": name},
            "definition": {"children": children},
            "metadata": metadata,
        }))
        .unwrap()
    }

    fn url(category: &str, name: &str) -> String {
        format!("i4x://org/course/{category}/{name}")
    }

    #[test]
    fn test_missing_child_record_is_omitted() {
        let store = MemoryStore::new(vec![
            record("course", "X", Some("Course X"), &[]),
            record("chapter", "A", Some("A"), &[&url("vertical", "C")]),
            record("chapter", "B", Some("B"), &[]),
        ]);

        let (tree, stats) = CourseTreeBuilder::new(&store).build("org", "course").unwrap();

        assert_eq!(tree.roots().len(), 1);
        let root = tree.roots()[0];
        let chapters = tree.children(root);
        assert_eq!(chapters.len(), 2);
        assert_eq!(tree.node(chapters[0]).display_name, "A");
        assert!(tree.children(chapters[0]).is_empty());
        assert!(tree.children(chapters[1]).is_empty());
        assert_eq!(stats.orphaned_children, 1);
        assert_eq!(stats.nodes, 3);
    }

    #[test]
    fn test_builds_nested_levels_with_depths() {
        let store = MemoryStore::new(vec![
            record("course", "run", None, &[]),
            record("chapter", "ch", Some("Week 1"), &[&url("sequential", "seq")]),
            record("sequential", "seq", Some("Lesson"), &[&url("vertical", "unit")]),
            record("vertical", "unit", Some("Unit"), &[&url("problem", "p1"), &url("html", "h1")]),
            record("problem", "p1", Some("Problem 1"), &[]),
            record("html", "h1", None, &[]),
        ]);

        let (tree, stats) = CourseTreeBuilder::new(&store).build("org", "course").unwrap();

        let depths: Vec<_> = tree
            .preorder()
            .map(|id| (tree.node(id).location.name().to_string(), tree.node(id).depth))
            .collect();
        assert_eq!(
            depths,
            vec![
                ("run".to_string(), 0),
                ("ch".to_string(), 1),
                ("seq".to_string(), 2),
                ("unit".to_string(), 3),
                ("p1".to_string(), 4),
                ("h1".to_string(), 4),
            ]
        );
        // course root falls back to its location name, other nodes to blank
        assert_eq!(tree.node(tree.roots()[0]).display_name, "run");
        let h1 = tree
            .find_by_location(&Location::parse(&url("html", "h1")).unwrap())
            .unwrap();
        assert_eq!(tree.node(h1).display_name, "");
        assert!(stats.diagnostics.is_clean());
    }

    #[test]
    fn test_course_start_date_is_captured() {
        let mut course = record("course", "run", Some("Circuits"), &[]);
        course.metadata.start = Some(json!("2013-03-04T12:00:00Z"));
        let (tree, _) = assemble(&[course], 10);
        let root = tree.node(tree.roots()[0]);
        assert_eq!(root.display_name, "Circuits");
        assert!(root.start_date.is_some());
    }

    #[test]
    fn test_chapters_become_roots_without_course() {
        let (tree, stats) = assemble(
            &[record("chapter", "A", Some("A"), &[]), record("chapter", "B", Some("B"), &[])],
            10,
        );
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.node(tree.roots()[0]).depth, 0);
        assert_eq!(stats.course_roots, 0);
    }

    #[test]
    fn test_multiple_course_records_are_surfaced() {
        let (tree, stats) = assemble(
            &[
                record("course", "r1", None, &[]),
                record("course", "r2", None, &[]),
                record("chapter", "A", Some("A"), &[]),
            ],
            10,
        );
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.children(tree.roots()[0]).len(), 1);
        assert_eq!(stats.course_roots, 2);
        assert_eq!(stats.diagnostics.warnings, 1);
    }

    #[test]
    fn test_cycles_and_shared_children_place_once() {
        let (tree, stats) = assemble(
            &[
                record("chapter", "A", Some("A"), &[&url("vertical", "v")]),
                record("vertical", "v", Some("V"), &[&url("chapter", "A"), &url("html", "h")]),
                record("chapter", "B", Some("B"), &[&url("html", "h")]),
                record("html", "h", Some("H"), &[]),
            ],
            10,
        );
        assert_eq!(tree.len(), 4);
        assert_eq!(stats.reparented_children, 2);
    }

    #[test]
    fn test_invalid_child_identifier_is_counted() {
        let (tree, stats) = assemble(
            &[record("chapter", "A", Some("A"), &["not a location"])],
            10,
        );
        assert_eq!(tree.len(), 1);
        assert_eq!(stats.invalid_children, 1);
        assert_eq!(stats.diagnostics.errors, 1);
    }
}
