//! Reconstruction result with statistics.

use serde::{Deserialize, Serialize};

/// Result of reconstructing markup, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupResult {
    /// The markup fragment
    pub content: String,

    /// Reconstruction statistics
    pub stats: ReconstructionStats,
}

impl MarkupResult {
    /// Create a new markup result.
    pub fn new(content: String, stats: ReconstructionStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while reconstructing markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionStats {
    /// Label records consumed
    pub records: u32,

    /// Spans opened
    pub spans_opened: u32,

    /// Spans closed
    pub spans_closed: u32,

    /// Label lines skipped as malformed
    pub malformed_lines: u32,

    /// Records whose unit could not be matched in the document
    pub desync_count: u32,

    /// Records with a label outside the taxonomy
    pub unknown_labels: u32,
}

impl ReconstructionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment record count.
    pub fn add_record(&mut self) {
        self.records += 1;
    }

    /// Increment desynchronization count.
    pub fn add_desync(&mut self) {
        self.desync_count += 1;
    }

    /// Increment unknown label count.
    pub fn add_unknown_label(&mut self) {
        self.unknown_labels += 1;
    }

    /// True if nothing had to be skipped, guessed or left unwrapped.
    pub fn is_clean(&self) -> bool {
        self.malformed_lines == 0 && self.desync_count == 0 && self.unknown_labels == 0
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ReconstructionStats) {
        self.records += other.records;
        self.spans_opened += other.spans_opened;
        self.spans_closed += other.spans_closed;
        self.malformed_lines += other.malformed_lines;
        self.desync_count += other.desync_count;
        self.unknown_labels += other.unknown_labels;
    }
}
