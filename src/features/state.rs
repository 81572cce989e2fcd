//! Running state of an encoding pass.

use super::patterns::PatternTracker;
use super::record::{BlockStatus, FeatureRecord, FontSizeStatus, FontStatus, LineStatus, PageStatus};
use crate::model::LayoutToken;

/// Everything an encoding pass remembers between units.
///
/// One value per pass; nothing is shared between documents.
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    /// Number of the page being scanned
    pub page: Option<u32>,
    /// Set on a page change, cleared by the first record of the page
    pub new_page: bool,
    /// Bottom of the previous block of the page
    pub lowest_pos: f64,
    /// Gap between the current block and the previous one
    pub spacing: f64,
    pub font: Option<String>,
    pub font_size: Option<i64>,
    /// X coordinate where the previous line started
    pub line_start_x: Option<f64>,
    /// Characters consumed in the document
    pub doc_chars: usize,
    /// Characters consumed in the current page
    pub page_chars: usize,
    /// The previous token ended a line
    pub previous_newline: bool,
    pub patterns: PatternTracker,
}

impl ScanState {
    /// Create a fresh state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to a new block. Resets the page counters on a page change and
    /// returns the gap with the last processed block.
    ///
    /// A block starting above the bottom of that block (a column break)
    /// gets `fallback_spacing` instead of a negative gap.
    pub fn enter_block(&mut self, page: u32, top: f64, fallback_spacing: f64) -> f64 {
        if self.page != Some(page) {
            self.page = Some(page);
            self.new_page = true;
            self.lowest_pos = 0.0;
            self.page_chars = 0;
        }
        self.spacing = if self.lowest_pos > top {
            fallback_spacing
        } else {
            top - self.lowest_pos
        };
        self.spacing
    }

    /// Record the bottom of a block that was processed. Filtered blocks
    /// never reach this, so they do not move the spacing reference.
    pub fn leave_block(&mut self, bottom: f64) {
        self.lowest_pos = bottom;
    }

    /// Consume `chars` characters.
    pub fn advance(&mut self, chars: usize) {
        self.doc_chars += chars;
        self.page_chars += chars;
    }

    /// Page status of the next record. The first record of a page takes
    /// PAGESTART once.
    pub fn take_page_status(&mut self) -> PageStatus {
        if std::mem::take(&mut self.new_page) {
            PageStatus::Start
        } else {
            PageStatus::In
        }
    }

    /// Font transitions against the previous unit, then remember `token`'s font.
    pub fn font_transition(&mut self, token: &LayoutToken) -> (FontStatus, FontSizeStatus) {
        let font_status = match (&self.font, &token.font) {
            (Some(current), Some(font)) if current == font => FontStatus::SameFont,
            (Some(_), None) => FontStatus::SameFont,
            _ => FontStatus::NewFont,
        };
        if token.font.is_some() {
            self.font = token.font.clone();
        }

        let size = token.font_size as i64;
        let size_status = match self.font_size {
            None => FontSizeStatus::Higher,
            Some(current) if size > current => FontSizeStatus::Higher,
            Some(current) if size < current => FontSizeStatus::Lower,
            Some(_) => FontSizeStatus::Same,
        };
        self.font_size = Some(size);
        (font_status, size_status)
    }

    /// Record a line start at `token` and tell whether it is indented
    /// relative to the previous line start by more than one character.
    pub fn line_start(&mut self, token: &LayoutToken) -> bool {
        let char_width = match token.char_len() {
            0 => 0.0,
            n => token.width / n as f64,
        };
        let indented = self
            .line_start_x
            .is_some_and(|previous| token.x > previous + char_width);
        self.line_start_x = Some(token.x);
        indented
    }
}

/// Two-slot output buffer: a record stays pending until the next one is
/// known, so boundary corrections can still patch it.
#[derive(Debug, Default)]
pub struct RecordBuffer {
    pending: Option<FeatureRecord>,
    flushed: Vec<FeatureRecord>,
}

impl RecordBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The record not yet flushed.
    pub fn pending_mut(&mut self) -> Option<&mut FeatureRecord> {
        self.pending.as_mut()
    }

    /// A new line starts: the pending record ends its line.
    pub fn close_line(&mut self) {
        if let Some(previous) = self.pending.as_mut() {
            if previous.line_status != LineStatus::Start {
                previous.line_status = LineStatus::End;
            }
        }
    }

    /// A new page starts: the pending record ends the previous page.
    pub fn close_page(&mut self) {
        if let Some(previous) = self.pending.as_mut() {
            previous.page_status = PageStatus::End;
        }
    }

    /// Correct the pending record against `current`, flush it and keep
    /// `current` pending.
    ///
    /// A block start right after a record that only reached BLOCKIN means
    /// the previous block ended on whitespace: the pending record ends both
    /// its block and its line.
    pub fn push(&mut self, current: FeatureRecord) {
        if let Some(mut previous) = self.pending.take() {
            if current.block_status == BlockStatus::Start && previous.block_status == BlockStatus::In {
                previous.block_status = BlockStatus::End;
                previous.line_status = LineStatus::End;
            }
            self.flushed.push(previous);
        }
        self.pending = Some(current);
    }

    /// Flush the last record and return everything.
    pub fn finish(mut self) -> Vec<FeatureRecord> {
        if let Some(last) = self.pending.take() {
            self.flushed.push(last);
        }
        self.flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_block_spacing() {
        let mut state = ScanState::new();
        assert_eq!(state.enter_block(1, 40.0, 7.0), 40.0);
        state.leave_block(52.0);
        assert!(state.new_page);
        assert_eq!(state.take_page_status(), PageStatus::Start);
        assert_eq!(state.take_page_status(), PageStatus::In);

        assert_eq!(state.enter_block(1, 60.0, 7.0), 8.0);
        state.leave_block(72.0);
        // column break
        assert_eq!(state.enter_block(1, 40.0, 7.0), 7.0);
        state.leave_block(52.0);

        state.advance(10);
        assert_eq!(state.enter_block(2, 30.0, 7.0), 30.0);
        assert_eq!(state.page_chars, 0);
        assert_eq!(state.doc_chars, 10);
    }

    #[test]
    fn test_skipped_block_keeps_spacing_reference() {
        let mut state = ScanState::new();
        state.enter_block(1, 40.0, 7.0);
        state.leave_block(52.0);
        // an image block entered but never left
        state.enter_block(1, 60.0, 7.0);
        assert_eq!(state.enter_block(1, 300.0, 7.0), 248.0);
    }

    #[test]
    fn test_font_transition() {
        let mut state = ScanState::new();
        let body = LayoutToken::new("a").with_font("Times", 10.4);
        let title = LayoutToken::new("b").with_font("Times-Bold", 14.0);
        assert_eq!(
            state.font_transition(&body),
            (FontStatus::NewFont, FontSizeStatus::Higher)
        );
        assert_eq!(
            state.font_transition(&body),
            (FontStatus::SameFont, FontSizeStatus::Same)
        );
        assert_eq!(
            state.font_transition(&title),
            (FontStatus::NewFont, FontSizeStatus::Higher)
        );
        assert_eq!(
            state.font_transition(&body),
            (FontStatus::NewFont, FontSizeStatus::Lower)
        );
    }

    #[test]
    fn test_indentation_tolerance() {
        let mut state = ScanState::new();
        let at = |x: f64| LayoutToken::new("word").with_geometry(x, 0.0, 20.0, 10.0);
        assert!(!state.line_start(&at(50.0)));
        assert!(!state.line_start(&at(54.0)));
        assert!(state.line_start(&at(70.0)));
    }

    #[test]
    fn test_buffer_promotes_block_end() {
        let mut buffer = RecordBuffer::new();
        let mut first = FeatureRecord::new("end");
        first.block_status = BlockStatus::In;
        let mut second = FeatureRecord::new("Next");
        second.block_status = BlockStatus::Start;
        buffer.push(first);
        buffer.push(second);
        let records = buffer.finish();
        assert_eq!(records[0].block_status, BlockStatus::End);
        assert_eq!(records[0].line_status, LineStatus::End);
        assert_eq!(records[1].block_status, BlockStatus::Start);
    }
}
