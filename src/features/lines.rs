//! Splitting blocks into lines aligned with their tokens.
//!
//! The line encoder, the line reconstructor and the zone builder all walk
//! blocks through [`block_lines`], so they agree on which lines exist and
//! which of them produce records.

use super::lexical::filter_line;
use crate::model::{Block, Document, LayoutToken};
use std::ops::Range;

/// One line of a block's raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineUnit<'a> {
    /// Block index in document order
    pub block: usize,
    /// Line index inside the block text
    pub line: usize,
    /// Line text without terminator
    pub text: &'a str,
    /// Character offset of the line inside the block text
    pub offset: usize,
    /// Positions of the line's tokens inside the block, possibly empty
    pub tokens: Range<usize>,
}

impl<'a> LineUnit<'a> {
    /// First whitespace-delimited word.
    pub fn first_word(&self) -> Option<&'a str> {
        self.text.split_whitespace().next()
    }

    /// Second whitespace-delimited word.
    pub fn second_word(&self) -> Option<&'a str> {
        self.text.split_whitespace().nth(1)
    }

    /// True if the line produces a feature record.
    pub fn is_featurable(&self) -> bool {
        self.first_word().is_some() && !filter_line(self.text.trim())
    }

    /// Number of characters in the line.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Token carrying the line's layout: its first visible token, or the
    /// block's first token when the line has none.
    pub fn layout_token(&self, block: &'a Block) -> Option<&'a LayoutToken> {
        block
            .tokens
            .get(self.tokens.clone())
            .and_then(|tokens| {
                tokens
                    .iter()
                    .find(|t| !t.text.is_empty() && !t.is_space() && !t.is_newline())
            })
            .or_else(|| block.tokens.first())
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// All lines of a block, with the tokens that fall on each of them.
///
/// Tokens are assigned by counting the line terminators they carry. Tokens
/// beyond the last text line are left unassigned.
pub fn block_lines(index: usize, block: &Block) -> Vec<LineUnit<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for (line, text) in block.text.split(is_line_break).enumerate() {
        lines.push(LineUnit {
            block: index,
            line,
            text,
            offset,
            tokens: 0..0,
        });
        offset += text.chars().count() + 1;
    }

    let mut current = 0;
    let mut unassigned = 0;
    for (pos, token) in block.tokens.iter().enumerate() {
        if !token.is_newline() {
            match lines.get_mut(current) {
                Some(unit) if unit.tokens.is_empty() => unit.tokens = pos..pos + 1,
                Some(unit) => unit.tokens.end = pos + 1,
                None => unassigned += 1,
            }
        }
        current += token.line_breaks();
    }
    if unassigned > 0 {
        log::debug!(
            "block {}: {} tokens past the last of {} text lines",
            index,
            unassigned,
            lines.len()
        );
    }

    lines
}

/// Featurable lines of the whole document, in order.
///
/// Blocks without tokens are skipped: their lines have no layout.
pub fn featurable_lines(doc: &Document) -> impl Iterator<Item = LineUnit<'_>> + '_ {
    doc.blocks()
        .enumerate()
        .filter(|(_, block)| !block.tokens.is_empty())
        .flat_map(|(index, block)| block_lines(index, block))
        .filter(LineUnit::is_featurable)
}
