//! Reconstruction of labeled units into nested markup.

use crate::error::{Error, Result};
use crate::features::featurable_lines;
use crate::features::lexical::{escape_html, markup_text};
use crate::label::{LabelRecord, LabelStream, TagSpec};
use crate::model::{Document, LayoutToken};

use super::{MarkupOptions, MarkupResult, ReconstructionStats, SyncPolicy};

/// Reconstruct markup from a line-level label stream and its document.
pub fn lines_to_markup(doc: &Document, labels: &str, options: &MarkupOptions) -> Result<MarkupResult> {
    MarkupRenderer::new(options.clone()).render_lines(doc, &LabelStream::parse(labels))
}

/// Reconstruct markup from a token-level label stream and the tokens the
/// encoder retained.
pub fn tokens_to_markup(
    tokens: &[&LayoutToken],
    labels: &str,
    options: &MarkupOptions,
) -> Result<MarkupResult> {
    MarkupRenderer::new(options.clone()).render_tokens(tokens, &LabelStream::parse(labels))
}

/// Markup renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkupRenderer {
    options: MarkupOptions,
}

impl MarkupRenderer {
    /// Create a new markup renderer.
    pub fn new(options: MarkupOptions) -> Self {
        Self { options }
    }

    /// Render a line-level stream. Every record consumes the featurable
    /// line of `doc` at its unit position, whose text replaces the record's
    /// unit. Lines of malformed label lines are skipped.
    pub fn render_lines(&self, doc: &Document, stream: &LabelStream) -> Result<MarkupResult> {
        let mut writer = SpanWriter::new(&self.options, stream.malformed);
        let mut cursor = featurable_lines(doc);
        let mut consumed = 0;

        for (index, record) in stream.records.iter().enumerate() {
            let skip = record.unit.saturating_sub(consumed);
            consumed += skip + 1;
            let text = match cursor.nth(skip) {
                Some(line) => {
                    if line.first_word() != Some(record.token.as_str()) {
                        log::warn!(
                            "label record {} ({:?}) does not match line {} of block {}",
                            index,
                            record.token,
                            line.line,
                            line.block
                        );
                        writer.stats.add_desync();
                    }
                    line.text.trim().to_string()
                }
                None => {
                    self.lost_sync(index, &mut writer.stats)?;
                    String::new()
                }
            };
            writer.write(record, &text, true, false);
        }

        Ok(writer.finish())
    }

    /// Render a token-level stream. The token cursor advances to the token
    /// matching each record, noting skipped spaces and line breaks.
    pub fn render_tokens(&self, tokens: &[&LayoutToken], stream: &LabelStream) -> Result<MarkupResult> {
        let mut writer = SpanWriter::new(&self.options, stream.malformed);
        let mut p = 0;

        for (index, record) in stream.records.iter().enumerate() {
            let start = p;
            let mut add_space = false;
            let mut new_line = record.has_feature("LINESTART");
            let mut matched = None;

            while p < tokens.len() {
                let token = tokens[p];
                p += 1;
                if token.is_space() {
                    add_space = true;
                } else if token.is_newline() {
                    new_line = true;
                } else if compact(&token.text) == record.token {
                    matched = Some(token);
                    break;
                }
            }

            let text = match matched {
                Some(token) => token.text.clone(),
                None => {
                    if p - start > 2 {
                        log::debug!("rewinding token cursor from {} to {}", p, start);
                        p = start;
                    }
                    self.lost_sync(index, &mut writer.stats)?;
                    record.token.clone()
                }
            };
            writer.write(record, &text, new_line, add_space);
        }

        Ok(writer.finish())
    }

    fn lost_sync(&self, index: usize, stats: &mut ReconstructionStats) -> Result<()> {
        match self.options.sync_policy {
            SyncPolicy::Abort => Err(Error::LostSynchronization { record: index }),
            SyncPolicy::Placeholder => {
                log::warn!("label record {} has no matching unit, using a placeholder", index);
                stats.add_desync();
                Ok(())
            }
        }
    }
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Writes spans: opens, continues and closes elements as labels change.
struct SpanWriter<'o> {
    options: &'o MarkupOptions,
    indent: String,
    out: String,
    current: Option<(String, Option<&'static TagSpec>)>,
    first: bool,
    stats: ReconstructionStats,
}

impl<'o> SpanWriter<'o> {
    fn new(options: &'o MarkupOptions, malformed: usize) -> Self {
        let stats = ReconstructionStats {
            malformed_lines: malformed as u32,
            ..ReconstructionStats::default()
        };
        Self {
            options,
            indent: options.indent(),
            out: String::new(),
            current: None,
            first: true,
            stats,
        }
    }

    fn write(&mut self, record: &LabelRecord, text: &str, new_line: bool, add_space: bool) {
        self.stats.add_record();
        let text = if self.options.substitute_bullets {
            markup_text(text)
        } else {
            escape_html(text).into_owned()
        };
        let tag = record.label.tag.as_str();

        let continuing = matches!(&self.current, Some((current, _)) if current == tag);
        if continuing {
            if new_line && !self.first {
                self.out.push_str("<lb/>");
            } else if add_space {
                self.out.push(' ');
            }
            self.out.push_str(&text);
        } else {
            self.close();
            let spec = self.options.taxonomy.lookup(tag);
            if spec.is_none() {
                log::warn!(
                    "label {} is not part of the {} taxonomy",
                    tag,
                    self.options.taxonomy.name()
                );
                self.stats.add_unknown_label();
            }
            self.out.push_str(&self.indent);
            if let Some(open) = spec.and_then(|s| s.open) {
                self.out.push_str(open);
            }
            self.out.push_str(&text);
            self.stats.spans_opened += 1;
            self.current = Some((tag.to_string(), spec));
        }
        self.first = false;
    }

    fn close(&mut self) {
        if let Some((_, spec)) = self.current.take() {
            if let Some(close) = spec.and_then(|s| s.close) {
                self.out.push_str(close);
            }
            self.out.push_str("\n\n");
            self.stats.spans_closed += 1;
        }
    }

    fn finish(mut self) -> MarkupResult {
        self.close();
        MarkupResult::new(self.out, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Taxonomy;
    use crate::model::{Block, BoundingBox, Page};

    fn doc(blocks: &[&str]) -> Document {
        let mut page = Page::a4(1);
        for (i, text) in blocks.iter().enumerate() {
            let mut tokens = Vec::new();
            for (j, line) in text.split('\n').enumerate() {
                if j > 0 {
                    tokens.push(LayoutToken::new("\n"));
                }
                for (k, word) in line.split(' ').enumerate() {
                    if k > 0 {
                        tokens.push(LayoutToken::new(" "));
                    }
                    tokens.push(LayoutToken::new(word));
                }
            }
            page.add_block(Block::new(
                BoundingBox::new(50.0, 50.0 + 40.0 * i as f64, 400.0, 30.0),
                tokens,
            ));
        }
        Document::new(vec![page])
    }

    #[test]
    fn test_lines_with_line_breaks() {
        let doc = doc(&["MANUEL DE\nDROIT", "Paris & Lyon", "Chapitre premier"]);
        let labels = "MANUEL <front>\nDROIT <front>\nParis <front>\nChapitre <body>\n";
        let options = MarkupOptions::new().with_indent(1);
        let result = lines_to_markup(&doc, labels, &options).unwrap();
        assert_eq!(
            result.content,
            "\t<front>MANUEL DE<lb/>DROIT<lb/>Paris &amp; Lyon</front>\n\n\t<body>Chapitre premier</body>\n\n"
        );
        assert_eq!(result.stats.spans_opened, 2);
        assert_eq!(result.stats.spans_closed, 2);
        assert!(result.stats.is_clean());
    }

    #[test]
    fn test_unwrapped_other_in_monograph() {
        let doc = doc(&["Sommaire", "Publicité"]);
        let labels = "Sommaire <toc>\nPublicité I-<other>\n";
        let options = MarkupOptions::new()
            .with_taxonomy(Taxonomy::monograph())
            .with_indent(0);
        let result = lines_to_markup(&doc, labels, &options).unwrap();
        assert_eq!(result.content, "<toc>Sommaire</toc>\n\nPublicité\n\n");
    }

    #[test]
    fn test_line_cursor_exhausted() {
        let doc = doc(&["Seule"]);
        let labels = "Seule <body>\nfantome <body>\n";
        let options = MarkupOptions::new().with_indent(0);
        let result = lines_to_markup(&doc, labels, &options).unwrap();
        assert_eq!(result.content, "<body>Seule<lb/></body>\n\n");
        assert_eq!(result.stats.desync_count, 1);

        let err = lines_to_markup(&doc, labels, &options.with_sync_policy(SyncPolicy::Abort))
            .unwrap_err();
        assert!(matches!(err, Error::LostSynchronization { record: 1 }));
    }

    #[test]
    fn test_token_cursor_rewinds() {
        let owned: Vec<LayoutToken> = ["Le", " ", "code", " ", "civil", " ", "francais"]
            .iter()
            .map(|t| LayoutToken::new(*t))
            .collect();
        let tokens: Vec<&LayoutToken> = owned.iter().collect();
        let labels = "Le <title>\ncode <title>\npenal <title>\ncivil <title>\n";
        let options = MarkupOptions::new()
            .with_taxonomy(Taxonomy::body_segmentation())
            .with_indent(0);
        let result = tokens_to_markup(&tokens, labels, &options).unwrap();
        assert_eq!(result.content, "<title>Le code penal civil</title>\n\n");
        assert_eq!(result.stats.desync_count, 1);
    }

    #[test]
    fn test_token_cursor_stays_at_end_after_short_search() {
        let owned: Vec<LayoutToken> = ["Le", " ", "code"]
            .iter()
            .map(|t| LayoutToken::new(*t))
            .collect();
        let tokens: Vec<&LayoutToken> = owned.iter().collect();
        let labels = "Le <body>\nnul <body>\ncode <body>\n";
        let options = MarkupOptions::new().with_indent(0);
        let result = tokens_to_markup(&tokens, labels, &options).unwrap();
        assert_eq!(result.content, "<body>Le nulcode</body>\n\n");
        assert_eq!(result.stats.desync_count, 2);
    }

    #[test]
    fn test_malformed_label_keeps_its_line() {
        let doc = doc(&["Alpha", "Beta", "Gamma"]);
        let labels = "Alpha <front>\nBeta\nGamma <body>\n";
        let result = lines_to_markup(&doc, labels, &MarkupOptions::new().with_indent(0)).unwrap();
        assert_eq!(result.content, "<front>Alpha</front>\n\n<body>Gamma</body>\n\n");
        assert_eq!(result.stats.malformed_lines, 1);
        assert_eq!(result.stats.desync_count, 0);
        assert_eq!(result.stats.records, 2);
    }

    #[test]
    fn test_unknown_label_is_not_wrapped() {
        let owned = [LayoutToken::new("x")];
        let tokens: Vec<&LayoutToken> = owned.iter().collect();
        let result = tokens_to_markup(&tokens, "x <mystery>\n", &MarkupOptions::new().with_indent(0))
            .unwrap();
        assert_eq!(result.content, "x\n\n");
        assert_eq!(result.stats.unknown_labels, 1);
        assert_eq!(result.stats.spans_opened, result.stats.spans_closed);
    }
}
