//! Tab-separated report of the annotated course tree
//!
//! The report has two sections written one after the other:
//!
//! 1. the tree, one line per node in pre-order, indented with one tab per
//!    level: `category<TAB>display_name<TAB>location`
//! 2. a header line followed by every node's event log, in the same order
//!
//! Display names are written as-is; tabs or newlines inside them are not
//! escaped.

pub mod encoding;
pub mod summary;

pub use encoding::OutputEncoding;
pub use summary::{RunSummary, SummaryFormat};

use crate::tree::CourseTree;
use std::io::{self, Write};

/// Header line that opens the event section
pub const EVENT_HEADER: &str = "component\tname\tlocation\tevent\tuser\tdatetime";

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeEventReporter {
    encoding: OutputEncoding,
}

impl TreeEventReporter {
    pub fn new(encoding: OutputEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    /// Write both report sections to `sink`.
    pub fn dump<W: Write>(&self, tree: &CourseTree, sink: &mut W) -> io::Result<()> {
        for id in tree.preorder() {
            let node = tree.node(id);
            let line = format!(
                "{}{}\t{}\t{}",
                "\t".repeat(node.depth),
                node.category(),
                node.display_name,
                node.location.url()
            );
            self.write_line(sink, &line)?;
        }

        self.write_line(sink, EVENT_HEADER)?;

        for id in tree.preorder() {
            for entry in tree.node(id).event_log() {
                self.write_line(sink, entry)?;
            }
        }
        Ok(())
    }

    /// Render the report into memory.
    pub fn render(&self, tree: &CourseTree) -> Vec<u8> {
        let mut out = Vec::new();
        self.dump(tree, &mut out)
            .expect("writing to a Vec never fails");
        out
    }

    fn write_line<W: Write>(&self, sink: &mut W, line: &str) -> io::Result<()> {
        sink.write_all(&self.encoding.encode(line))?;
        sink.write_all(b"\n")
    }
}
