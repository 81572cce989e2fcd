//! Token-level feature encoding of a document zone.

use super::lexical::filter_line;
use super::options::EncoderOptions;
use super::patterns::{Repetition, RepetitionTable};
use super::record::{BlockStatus, FeatureRecord, Featurized, LineStatus, PageStatus};
use super::scaling::{linear_scaling, scale_in_range};
use super::state::{RecordBuffer, ScanState};
use crate::error::{Error, Result};
use crate::model::{has_media_marker, Block, Document, LayoutToken, Page, Zone};

/// Walks a document and turns its units into feature records.
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    pub(super) options: EncoderOptions,
}

/// Layout values shared by every unit of a block.
#[derive(Debug, Clone, Copy)]
pub(super) struct BlockContext {
    pub spacing: u32,
    pub density: u32,
    pub in_main_area: bool,
    pub bitmap_around: bool,
    pub vector_around: bool,
    pub repetition: Repetition,
    pub page_height: f64,
}

impl FeatureEncoder {
    /// Create an encoder.
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// The encoder options.
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encode every token of `zone`, one record per visible token.
    ///
    /// Returns `Ok(None)` when the zone or the document is empty. Fails
    /// before producing anything when the document exceeds a size ceiling.
    pub fn encode_tokens<'a>(&self, doc: &'a Document, zone: &Zone) -> Result<Option<Featurized<'a>>> {
        self.options.check_limits(doc)?;
        if zone.is_empty() || doc.is_empty() {
            log::debug!("empty zone, nothing to encode");
            return Ok(None);
        }

        let full_length = doc.full_text_length(zone);
        let repetitions = RepetitionTable::build(doc, &self.options);
        let mut state = ScanState::new();
        let mut buffer = RecordBuffer::new();
        let mut retained = Vec::new();

        for piece in zone {
            let (start, end) = (piece.start, piece.end);
            if start.block >= doc.block_count() {
                return Err(Error::InvalidZone(format!(
                    "piece starts at block {} but the document has {} blocks",
                    start.block,
                    doc.block_count()
                )));
            }
            let last_block = if end.block >= doc.block_count() {
                log::warn!(
                    "piece ends at block {} but the document has {} blocks",
                    end.block,
                    doc.block_count()
                );
                doc.block_count() - 1
            } else {
                end.block
            };

            for block_index in start.block..=last_block {
                let (Some(block), Some(page)) = (doc.block(block_index), doc.page_of_block(block_index))
                else {
                    continue;
                };
                let spacing = state.enter_block(
                    page.number,
                    block.bbox.y,
                    doc.statistics.max_block_spacing / 5.0,
                );
                if filter_line(&block.text) || block.tokens.is_empty() {
                    continue;
                }
                state.leave_block(block.bbox.bottom());

                let first_line = block.text.split(['\n', '\r']).next().unwrap_or_default();
                let repetition = if repetitions.is_edge_block(doc, block_index) {
                    state.patterns.observe(&repetitions, first_line)
                } else {
                    Repetition::default()
                };
                let mut context = self.block_context(doc, block, spacing, repetition, page);
                if page.main_area.is_none() {
                    // token records only lose the flag against a known main area
                    context.in_main_area = true;
                }

                let first = if block_index == start.block {
                    start.token_block_pos
                } else {
                    0
                };
                let mut last = if block_index == end.block {
                    end.token_block_pos + 1
                } else {
                    block.tokens.len()
                };
                if last > block.tokens.len() {
                    log::warn!(
                        "piece ends at token {} of block {} which has {} tokens",
                        end.token_block_pos,
                        block_index,
                        block.tokens.len()
                    );
                    last = block.tokens.len();
                }

                for n in first..last {
                    let token = &block.tokens[n];
                    retained.push(token);
                    if let Some(record) =
                        self.token_record(&mut state, &mut buffer, block, n, &context, full_length)
                    {
                        buffer.push(record);
                    }
                    state.advance(token.char_len());
                }
            }
        }

        let records = buffer.finish();
        log::debug!("{} token records from {} tokens", records.len(), retained.len());
        Ok(Some(Featurized {
            records,
            tokens: retained,
        }))
    }

    pub(super) fn block_context(
        &self,
        doc: &Document,
        block: &Block,
        spacing: f64,
        repetition: Repetition,
        page: &Page,
    ) -> BlockContext {
        let stats = &doc.statistics;
        let density = if has_media_marker(&block.text) {
            0.0
        } else {
            block.density()
        };
        let spacing = if spacing != 0.0 {
            scale_in_range(
                spacing,
                stats.min_block_spacing,
                stats.max_block_spacing,
                self.options.spacing_bins,
            )
        } else {
            0
        };
        BlockContext {
            spacing,
            density: scale_in_range(
                density,
                stats.min_char_density,
                stats.max_char_density,
                self.options.density_bins,
            ),
            in_main_area: page.in_main_area(&block.bbox),
            bitmap_around: block.has_bitmap(),
            vector_around: block.has_vector(),
            repetition,
            page_height: page.height,
        }
    }

    /// Record for the token at position `n` of `block`, or `None` when the
    /// token is whitespace or filtered out.
    fn token_record(
        &self,
        state: &mut ScanState,
        buffer: &mut RecordBuffer,
        block: &Block,
        n: usize,
        context: &BlockContext,
        full_length: usize,
    ) -> Option<FeatureRecord> {
        let token = &block.tokens[n];
        if token.is_newline() {
            state.previous_newline = true;
            return None;
        }
        let text: String = token.text.chars().filter(|c| !c.is_whitespace()).collect();
        if text.is_empty() || filter_line(&text) {
            return None;
        }

        let mut record = FeatureRecord::new(text).with_token_style(token);

        let mut new_line = false;
        if std::mem::take(&mut state.previous_newline) {
            new_line = true;
            record.indented = state.line_start(token);
        }

        let size = block.tokens.len();
        if n == 0 {
            record.line_status = LineStatus::Start;
            record.block_status = BlockStatus::Start;
            if !new_line {
                record.indented = state.line_start(token);
            }
            new_line = true;
        } else if n == size - 1 {
            record.line_status = if new_line {
                LineStatus::Start
            } else {
                LineStatus::End
            };
            record.block_status = BlockStatus::End;
            state.previous_newline = true;
        } else {
            let (end_line, end_block) = look_ahead(&block.tokens[n + 1..]);
            record.line_status = if new_line {
                LineStatus::Start
            } else if end_line {
                LineStatus::End
            } else {
                LineStatus::In
            };
            record.block_status = if end_block {
                BlockStatus::End
            } else {
                BlockStatus::In
            };
        }
        if new_line {
            buffer.close_line();
        }

        record.page_status = state.take_page_status();
        if record.page_status == PageStatus::Start {
            buffer.close_page();
        }

        let (font_status, font_size_status) = state.font_transition(token);
        record.font_status = font_status;
        record.font_size_status = font_size_status;

        record.relative_document_position = linear_scaling(
            state.doc_chars as f64,
            full_length as f64,
            self.options.position_bins,
        );
        record.relative_page_position =
            linear_scaling(token.y, context.page_height, self.options.position_bins);
        context.apply(&mut record);
        Some(record)
    }
}

impl BlockContext {
    pub(super) fn apply(&self, record: &mut FeatureRecord) {
        record.spacing = self.spacing;
        record.density = self.density;
        record.in_main_area = self.in_main_area;
        record.bitmap_around = self.bitmap_around;
        record.vector_around = self.vector_around;
        record.repetitive = self.repetition.repetitive;
        record.first_repetitive = self.repetition.first;
    }
}

fn is_trivial(token: &LayoutToken) -> bool {
    token.text.is_empty() || token.is_space() || has_media_marker(&token.text)
}

/// Scan the rest of a block: `(end_line, end_block)` for the unit before it.
///
/// A line break before any visible token ends the line; reaching the end of
/// the block without a visible token ends both.
fn look_ahead(rest: &[LayoutToken]) -> (bool, bool) {
    let mut end_line = false;
    for next in rest {
        if next.is_newline() {
            end_line = true;
        } else if !is_trivial(next) {
            return (end_line, false);
        }
    }
    (true, true)
}

/// Encode the tokens of `zone` with `options`.
pub fn token_features<'a>(
    doc: &'a Document,
    zone: &Zone,
    options: &EncoderOptions,
) -> Result<Option<Featurized<'a>>> {
    FeatureEncoder::new(options.clone()).encode_tokens(doc, zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn tokens(texts: &[&str]) -> Vec<LayoutToken> {
        let mut x = 50.0;
        texts
            .iter()
            .map(|t| {
                let token = LayoutToken::new(*t)
                    .with_geometry(x, 60.0, 6.0 * t.chars().count() as f64, 12.0)
                    .with_font("Times", 12.0);
                x += 6.0 * t.chars().count() as f64;
                token
            })
            .collect()
    }

    fn encode(doc: &Document) -> Featurized<'_> {
        let zone = doc.whole_document().unwrap();
        FeatureEncoder::default()
            .encode_tokens(doc, &zone)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_look_ahead() {
        assert_eq!(look_ahead(&tokens(&[" ", "b"])), (false, false));
        assert_eq!(look_ahead(&tokens(&["\n", "b"])), (true, false));
        assert_eq!(look_ahead(&tokens(&[" ", " "])), (true, true));
        assert_eq!(look_ahead(&tokens(&["\n", " ", "@IMAGE"])), (true, true));
    }

    #[test]
    fn test_line_breaks_inside_block() {
        let mut page = Page::a4(1);
        page.add_block(Block::new(
            BoundingBox::new(50.0, 60.0, 200.0, 30.0),
            tokens(&["Les", " ", "lois", "\n", "de", " ", "1905", "\n", "et", " ", "1910"]),
        ));
        let doc = Document::new(vec![page]);
        let out = encode(&doc);

        let lines: Vec<_> = out.records.iter().map(|r| r.line_status).collect();
        assert_eq!(
            lines,
            [
                LineStatus::Start,
                LineStatus::End,
                LineStatus::Start,
                LineStatus::End,
                LineStatus::Start,
                LineStatus::End,
            ]
        );
        let blocks: Vec<_> = out.records.iter().map(|r| r.block_status).collect();
        assert_eq!(blocks[0], BlockStatus::Start);
        assert!(blocks[1..5].iter().all(|b| *b == BlockStatus::In));
        assert_eq!(blocks[5], BlockStatus::End);
        assert_eq!(out.tokens.len(), 11);
    }

    #[test]
    fn test_page_boundaries() {
        let mut p1 = Page::a4(1);
        p1.add_block(Block::new(BoundingBox::new(50.0, 60.0, 200.0, 12.0), tokens(&["un", " ", "deux"])));
        let mut p2 = Page::a4(2);
        p2.add_block(Block::new(BoundingBox::new(50.0, 60.0, 200.0, 12.0), tokens(&["trois"])));
        let doc = Document::new(vec![p1, p2]);
        let out = encode(&doc);
        let pages: Vec<_> = out.records.iter().map(|r| r.page_status).collect();
        assert_eq!(pages, [PageStatus::Start, PageStatus::End, PageStatus::Start]);
    }

    #[test]
    fn test_zone_restricts_tokens() {
        let mut page = Page::a4(1);
        page.add_block(Block::new(
            BoundingBox::new(50.0, 60.0, 200.0, 12.0),
            tokens(&["a", " ", "b", " ", "c"]),
        ));
        let doc = Document::new(vec![page]);
        let piece = crate::model::DocumentPiece::new(
            doc.pointer(0, 2).unwrap(),
            doc.pointer(0, 4).unwrap(),
        );
        let zone: Zone = std::iter::once(piece).collect();
        let out = FeatureEncoder::default().encode_tokens(&doc, &zone).unwrap().unwrap();
        let strings: Vec<_> = out.records.iter().map(|r| r.string.as_str()).collect();
        assert_eq!(strings, ["b", "c"]);
        assert_eq!(out.tokens.len(), 3);
    }

    #[test]
    fn test_image_block_does_not_move_spacing() {
        let mut page = Page::a4(1);
        page.add_block(Block::new(BoundingBox::new(50.0, 40.0, 200.0, 12.0), tokens(&["Avant"])));
        page.add_block(Block::new(
            BoundingBox::new(50.0, 60.0, 200.0, 300.0),
            vec![LayoutToken::new("@IMAGE")],
        ));
        page.add_block(Block::new(BoundingBox::new(50.0, 400.0, 200.0, 12.0), tokens(&["Apres"])));
        let doc = Document::new(vec![page]).with_statistics(crate::model::DocumentStatistics {
            min_block_spacing: 0.0,
            max_block_spacing: 400.0,
            min_char_density: 0.0,
            max_char_density: 1.0,
        });

        let out = encode(&doc);
        let strings: Vec<_> = out.records.iter().map(|r| r.string.as_str()).collect();
        assert_eq!(strings, ["Avant", "Apres"]);
        // 348 points from the bottom of "Avant", not 40 from the image
        assert_eq!(out.records[1].spacing, 4);
    }

    #[test]
    fn test_piece_past_last_block() {
        let mut page = Page::a4(1);
        page.add_block(Block::new(BoundingBox::new(50.0, 60.0, 200.0, 12.0), tokens(&["a"])));
        let doc = Document::new(vec![page]);
        let outside = crate::model::DocumentPointer::new(4, 0, 9);
        let zone: Zone = std::iter::once(crate::model::DocumentPiece::new(outside, outside)).collect();
        let err = FeatureEncoder::default().encode_tokens(&doc, &zone).unwrap_err();
        assert!(matches!(err, Error::InvalidZone(_)));
    }

    #[test]
    fn test_empty_zone_is_none() {
        let doc = Document::new(vec![Page::a4(1)]);
        let out = FeatureEncoder::default().encode_tokens(&doc, &Zone::new()).unwrap();
        assert!(out.is_none());
    }
}
