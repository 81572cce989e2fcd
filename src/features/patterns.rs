//! Detection of running headers and footers.

use super::lexical::line_pattern;
use super::options::EncoderOptions;
use crate::model::Document;
use std::collections::{HashMap, HashSet};

/// Frequency table of the first-line patterns of the blocks at the top and
/// bottom of every page.
///
/// The table is read-only once built. Which occurrence came first is
/// tracked by the scan through [`PatternTracker`].
#[derive(Debug, Clone, Default)]
pub struct RepetitionTable {
    counts: HashMap<String, usize>,
    edge_blocks: usize,
    min_length: usize,
}

impl RepetitionTable {
    /// Count the patterns of `doc`.
    pub fn build(doc: &Document, options: &EncoderOptions) -> Self {
        let mut table = Self {
            counts: HashMap::new(),
            edge_blocks: options.edge_blocks,
            min_length: options.min_pattern_length,
        };
        for index in 0..doc.block_count() {
            if !table.is_edge_block(doc, index) {
                continue;
            }
            let Some(block) = doc.block(index) else {
                continue;
            };
            let first_line = block.text.split(['\n', '\r']).next().unwrap_or_default();
            let pattern = line_pattern(first_line);
            if pattern.chars().count() > table.min_length {
                *table.counts.entry(pattern).or_insert(0) += 1;
            }
        }
        log::debug!("{} distinct edge patterns", table.counts.len());
        table
    }

    /// True if the block is among the first or last blocks of its page.
    pub fn is_edge_block(&self, doc: &Document, index: usize) -> bool {
        let (Some(position), Some(page)) = (doc.block_index_in_page(index), doc.page_of_block(index))
        else {
            return false;
        };
        position < self.edge_blocks || position + self.edge_blocks >= page.block_count()
    }

    /// True if `pattern` occurs on more than one edge block.
    pub fn is_repetitive(&self, pattern: &str) -> bool {
        self.counts.get(pattern).is_some_and(|&n| n > 1)
    }
}

/// Repetition flags of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Repetition {
    /// The pattern is repeated
    pub repetitive: bool,
    /// First time the scan meets this repeated pattern
    pub first: bool,
}

/// Remembers which repeated patterns the scan has already met.
#[derive(Debug, Clone, Default)]
pub struct PatternTracker {
    seen: HashSet<String>,
}

impl PatternTracker {
    /// Flags for a line of text.
    pub fn observe(&mut self, table: &RepetitionTable, line: &str) -> Repetition {
        let pattern = line_pattern(line);
        if !table.is_repetitive(&pattern) {
            return Repetition::default();
        }
        let first = self.seen.insert(pattern);
        Repetition {
            repetitive: true,
            first,
        }
    }
}
