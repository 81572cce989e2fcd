//! Pointers into the document and the pieces that make up zones.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A position in the document, addressed three ways at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentPointer {
    /// Index of the block in document order
    pub block: usize,
    /// Index of the token inside its block
    pub token_block_pos: usize,
    /// Index of the token in the flat tokenization
    pub token_doc_pos: usize,
}

impl DocumentPointer {
    /// Create a pointer.
    pub fn new(block: usize, token_block_pos: usize, token_doc_pos: usize) -> Self {
        Self {
            block,
            token_block_pos,
            token_doc_pos,
        }
    }
}

impl Ord for DocumentPointer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.token_doc_pos
            .cmp(&other.token_doc_pos)
            .then(self.block.cmp(&other.block))
            .then(self.token_block_pos.cmp(&other.token_block_pos))
    }
}

impl PartialOrd for DocumentPointer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An inclusive range of tokens, `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentPiece {
    /// First token of the piece
    pub start: DocumentPointer,
    /// Last token of the piece
    pub end: DocumentPointer,
}

impl DocumentPiece {
    /// Create a piece.
    pub fn new(start: DocumentPointer, end: DocumentPointer) -> Self {
        Self { start, end }
    }

    /// Number of tokens covered.
    pub fn token_count(&self) -> usize {
        self.end.token_doc_pos.saturating_sub(self.start.token_doc_pos) + 1
    }
}

/// A zone: a sorted set of possibly non-contiguous pieces.
pub type Zone = BTreeSet<DocumentPiece>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pieces_sort_by_start() {
        let late = DocumentPiece::new(DocumentPointer::new(3, 0, 40), DocumentPointer::new(4, 2, 55));
        let early = DocumentPiece::new(DocumentPointer::new(0, 0, 0), DocumentPointer::new(1, 5, 12));
        let zone: Zone = [late, early].into_iter().collect();
        let first = zone.iter().next().copied();
        assert_eq!(first, Some(early));
        assert_eq!(early.token_count(), 13);
    }
}
