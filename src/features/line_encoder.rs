//! Line-level feature encoding of a whole document.

use super::encoder::FeatureEncoder;
use super::lexical::punctuation_profile;
use super::lines::block_lines;
use super::options::EncoderOptions;
use super::patterns::{Repetition, RepetitionTable};
use super::record::{BlockStatus, FeatureRecord, Featurized, LineFeatures, LineStatus, PageStatus};
use super::scaling::linear_scaling;
use super::state::{RecordBuffer, ScanState};
use crate::error::Result;
use crate::model::Document;

impl FeatureEncoder {
    /// Encode every featurable line of `doc`, one record per line.
    ///
    /// The lexical unit of a record is the first word of its line; layout
    /// comes from the first visible token on that line.
    pub fn encode_lines<'a>(&self, doc: &'a Document) -> Result<Option<Featurized<'a>>> {
        self.options.check_limits(doc)?;
        if doc.is_empty() {
            log::debug!("document without blocks, nothing to encode");
            return Ok(None);
        }

        let full_length: usize = doc.blocks().map(|b| b.char_len()).sum();
        let repetitions = RepetitionTable::build(doc, &self.options);
        let mut state = ScanState::new();
        let mut buffer = RecordBuffer::new();
        let mut retained = Vec::new();

        for (block_index, block) in doc.blocks().enumerate() {
            let Some(page) = doc.page_of_block(block_index) else {
                continue;
            };
            let spacing = state.enter_block(
                page.number,
                block.bbox.y,
                doc.statistics.max_block_spacing / 5.0,
            );
            let block_start = (state.doc_chars, state.page_chars);
            state.advance(block.char_len());
            if block.tokens.is_empty() {
                continue;
            }
            state.leave_block(block.bbox.bottom());

            let lines = block_lines(block_index, block);
            let max_line_length = lines.iter().map(|l| l.char_len()).max().unwrap_or(0);
            let edge_block = repetitions.is_edge_block(doc, block_index);
            let context = self.block_context(doc, block, spacing, Repetition::default(), page);

            let featurable: Vec<_> = lines.iter().filter(|l| l.is_featurable()).collect();
            let page_length = page.char_length();
            for (k, line) in featurable.iter().enumerate() {
                let Some(word) = line.first_word() else {
                    continue;
                };
                let mut record = FeatureRecord::new(word);
                context.apply(&mut record);

                let previous_ended_block = buffer
                    .pending_mut()
                    .is_some_and(|p| p.block_status == BlockStatus::End);
                record.block_status = if k == 0 || previous_ended_block {
                    BlockStatus::Start
                } else if k + 1 == featurable.len() {
                    BlockStatus::End
                } else {
                    BlockStatus::In
                };
                record.line_status = LineStatus::Start;
                record.page_status = state.take_page_status();
                if record.page_status == PageStatus::Start {
                    buffer.close_page();
                }

                let doc_position = block_start.0 + line.offset;
                let page_position = block_start.1 + line.offset;
                record.relative_document_position = linear_scaling(
                    doc_position as f64,
                    full_length as f64,
                    self.options.position_bins,
                );

                if let Some(token) = line.layout_token(block) {
                    record = record.with_token_style(token);
                    let (font_status, font_size_status) = state.font_transition(token);
                    record.font_status = font_status;
                    record.font_size_status = font_size_status;
                    record.relative_page_position =
                        linear_scaling(token.y, page.height, self.options.position_bins);
                    record.indented = state.line_start(token);
                }

                if edge_block {
                    let repetition = state.patterns.observe(&repetitions, line.text);
                    record.repetitive = repetition.repetitive;
                    record.first_repetitive = repetition.first;
                }

                record.line = Some(LineFeatures {
                    second_string: line.second_word().map(str::to_string),
                    relative_page_char_position: linear_scaling(
                        page_position as f64,
                        page_length as f64,
                        self.options.position_bins,
                    ),
                    line_length: linear_scaling(
                        line.char_len() as f64,
                        max_line_length as f64,
                        self.options.line_length_bins,
                    ),
                    punctuation_profile: punctuation_profile(line.text),
                });

                retained.extend(block.tokens.get(line.tokens.clone()).unwrap_or_default());
                buffer.push(record);
            }
        }

        let records = buffer.finish();
        log::debug!("{} line records", records.len());
        Ok(Some(Featurized {
            records,
            tokens: retained,
        }))
    }
}

/// Encode the lines of `doc` with `options`.
pub fn line_features<'a>(doc: &'a Document, options: &EncoderOptions) -> Result<Option<Featurized<'a>>> {
    FeatureEncoder::new(options.clone()).encode_lines(doc)
}
