//! Document-level types.

use super::{Block, DocumentPiece, DocumentPointer, DocumentStatistics, LayoutToken, Page, Zone};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// A laid-out document: pages of blocks of tokens.
///
/// Blocks and tokens are also addressable in flat document order. The flat
/// index is built when the document is constructed or deserialized, so the
/// page list is read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "DocumentData")]
pub struct Document {
    pages: Vec<Page>,

    /// Spacing and density bounds
    pub statistics: DocumentStatistics,

    /// Labeled zones, keyed by label (e.g. `<body>`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    zones: BTreeMap<String, Zone>,

    #[serde(skip)]
    blocks: Vec<BlockRef>,

    #[serde(skip)]
    token_count: usize,
}

/// Location of a block in the page tree.
#[derive(Debug, Clone, Copy)]
struct BlockRef {
    page: usize,
    index: usize,
    first_token: usize,
}

/// Serialized form of a [`Document`].
#[derive(Deserialize)]
struct DocumentData {
    pages: Vec<Page>,
    #[serde(default)]
    statistics: Option<DocumentStatistics>,
    #[serde(default)]
    zones: BTreeMap<String, Zone>,
}

impl From<DocumentData> for Document {
    fn from(data: DocumentData) -> Self {
        let mut doc = Document::new(data.pages);
        if let Some(statistics) = data.statistics {
            doc.statistics = statistics;
        }
        doc.zones = data.zones;
        doc
    }
}

impl Document {
    /// Build a document from its pages. Missing block text is derived from
    /// the tokens and statistics are computed from block geometry.
    pub fn new(mut pages: Vec<Page>) -> Self {
        for block in pages.iter_mut().flat_map(|p| p.blocks.iter_mut()) {
            block.fill_text();
        }

        let mut blocks = Vec::new();
        let mut token_count = 0;
        for (page_idx, page) in pages.iter().enumerate() {
            for (index, block) in page.blocks.iter().enumerate() {
                blocks.push(BlockRef {
                    page: page_idx,
                    index,
                    first_token: token_count,
                });
                token_count += block.tokens.len();
            }
        }

        let statistics = DocumentStatistics::compute(&pages);
        Self {
            pages,
            statistics,
            zones: BTreeMap::new(),
            blocks,
            token_count,
        }
    }

    /// Replace the computed statistics with externally supplied ones.
    pub fn with_statistics(mut self, statistics: DocumentStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a JSON document from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of blocks over all pages.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of tokens in the flat tokenization.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block by document-order index.
    pub fn block(&self, index: usize) -> Option<&Block> {
        let r = self.blocks.get(index)?;
        self.pages.get(r.page)?.blocks.get(r.index)
    }

    /// Page holding the block at `index`.
    pub fn page_of_block(&self, index: usize) -> Option<&Page> {
        self.blocks.get(index).and_then(|r| self.pages.get(r.page))
    }

    /// Position of the block inside its page.
    pub fn block_index_in_page(&self, index: usize) -> Option<usize> {
        self.blocks.get(index).map(|r| r.index)
    }

    /// Flat index of the first token of the block at `index`.
    pub fn first_token_of_block(&self, index: usize) -> Option<usize> {
        self.blocks.get(index).map(|r| r.first_token)
    }

    /// Blocks in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    /// The flat tokenization.
    pub fn tokens(&self) -> impl Iterator<Item = &LayoutToken> + '_ {
        self.blocks().flat_map(|b| b.tokens.iter())
    }

    /// Token by flat index.
    pub fn token(&self, index: usize) -> Option<&LayoutToken> {
        if index >= self.token_count {
            return None;
        }
        let block_idx = self.blocks.partition_point(|r| r.first_token <= index) - 1;
        let r = self.blocks[block_idx];
        self.block(block_idx)?.tokens.get(index - r.first_token)
    }

    /// Pointer to a token given its block and position in the block.
    pub fn pointer(&self, block: usize, token_block_pos: usize) -> Option<DocumentPointer> {
        let first = self.first_token_of_block(block)?;
        Some(DocumentPointer::new(block, token_block_pos, first + token_block_pos))
    }

    /// A single piece spanning every token, or `None` for a document without tokens.
    pub fn whole_document(&self) -> Option<Zone> {
        let has_tokens = |i: &usize| self.block(*i).is_some_and(|b| !b.tokens.is_empty());
        let first_block = (0..self.block_count()).find(has_tokens)?;
        let last_block = (0..self.block_count()).rev().find(has_tokens)?;
        let last_len = self.block(last_block)?.tokens.len();
        let start = self.pointer(first_block, 0)?;
        let end = self.pointer(last_block, last_len - 1)?;
        Some(std::iter::once(DocumentPiece::new(start, end)).collect())
    }

    /// Sum of token text lengths over the pieces of `zone`.
    pub fn full_text_length(&self, zone: &Zone) -> usize {
        zone.iter()
            .flat_map(|piece| piece.start.token_doc_pos..=piece.end.token_doc_pos)
            .filter_map(|i| self.token(i))
            .map(LayoutToken::char_len)
            .sum()
    }

    /// Zone previously stored under `label`.
    pub fn zone(&self, label: &str) -> Option<&Zone> {
        self.zones.get(label)
    }

    /// All stored zones.
    pub fn zones(&self) -> &BTreeMap<String, Zone> {
        &self.zones
    }

    /// Store the zones produced by segmentation, replacing earlier ones.
    pub fn set_zones(&mut self, zones: BTreeMap<String, Zone>) {
        self.zones = zones;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
