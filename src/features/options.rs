//! Feature encoder options.

use crate::error::{Error, Result};
use crate::model::Document;

/// Options for feature encoding.
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// Reject documents with more blocks than this
    pub max_blocks: usize,

    /// Reject documents with more tokens than this
    pub max_tokens: usize,

    /// Bins for document and page positions
    pub position_bins: u32,

    /// Bins for inter-block spacing
    pub spacing_bins: u32,

    /// Bins for character density
    pub density_bins: u32,

    /// Bins for line length (line-level records)
    pub line_length_bins: u32,

    /// Patterns this long or shorter never count as repetitive
    pub min_pattern_length: usize,

    /// Blocks at each end of a page inspected for running headers and footers
    pub edge_blocks: usize,
}

impl EncoderOptions {
    /// Create new encoder options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block ceiling.
    pub fn with_max_blocks(mut self, max: usize) -> Self {
        self.max_blocks = max;
        self
    }

    /// Set the token ceiling.
    pub fn with_max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = max;
        self
    }

    /// Set the bin counts for position, spacing and density.
    pub fn with_bins(mut self, position: u32, spacing: u32, density: u32) -> Self {
        self.position_bins = position;
        self.spacing_bins = spacing;
        self.density_bins = density;
        self
    }

    /// Set the bin count for line lengths.
    pub fn with_line_length_bins(mut self, bins: u32) -> Self {
        self.line_length_bins = bins;
        self
    }

    /// Reject `doc` if it exceeds a size ceiling.
    pub fn check_limits(&self, doc: &Document) -> Result<()> {
        if doc.token_count() > self.max_tokens {
            return Err(Error::TooManyTokens {
                count: doc.token_count(),
                limit: self.max_tokens,
            });
        }
        if doc.block_count() > self.max_blocks {
            return Err(Error::TooManyBlocks {
                count: doc.block_count(),
                limit: self.max_blocks,
            });
        }
        Ok(())
    }
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            max_blocks: 100_000,
            max_tokens: 1_000_000,
            position_bins: 12,
            spacing_bins: 5,
            density_bins: 5,
            line_length_bins: 10,
            min_pattern_length: 8,
            edge_blocks: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BoundingBox, LayoutToken, Page};

    #[test]
    fn test_defaults() {
        let options = EncoderOptions::new();
        assert_eq!(options.position_bins, 12);
        assert_eq!(options.spacing_bins, 5);
        assert_eq!(options.density_bins, 5);
        assert_eq!(options.line_length_bins, 10);
    }

    #[test]
    fn test_check_limits() {
        let mut page = Page::a4(1);
        for i in 0..3 {
            page.add_block(Block::new(
                BoundingBox::new(0.0, 20.0 * i as f64, 10.0, 10.0),
                vec![LayoutToken::new("x"), LayoutToken::new("y")],
            ));
        }
        let doc = Document::new(vec![page]);

        assert!(EncoderOptions::new().check_limits(&doc).is_ok());
        let err = EncoderOptions::new()
            .with_max_blocks(2)
            .check_limits(&doc)
            .unwrap_err();
        assert!(matches!(err, Error::TooManyBlocks { count: 3, limit: 2 }));
        let err = EncoderOptions::new()
            .with_max_tokens(5)
            .check_limits(&doc)
            .unwrap_err();
        assert!(matches!(err, Error::TooManyTokens { count: 6, limit: 5 }));
    }
}
