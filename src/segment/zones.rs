//! Zones from a line-level label stream.

use crate::features::featurable_lines;
use crate::label::LabelStream;
use crate::model::{Document, DocumentPiece, DocumentPointer, Zone};
use std::collections::BTreeMap;

/// Group the lines of `doc` by label.
///
/// Records are matched to featurable lines by unit position, as the line
/// encoder produced them, so a malformed label line leaves its line out of
/// every zone. Every maximal run of lines sharing a label becomes one
/// piece from the run's first token to its last token. Lines without
/// tokens are left out; records beyond the last line are ignored.
pub fn zones_from_labels(doc: &Document, stream: &LabelStream) -> BTreeMap<String, Zone> {
    let mut zones: BTreeMap<String, Zone> = BTreeMap::new();
    let mut run: Option<(&str, DocumentPointer, DocumentPointer)> = None;
    let mut lines = featurable_lines(doc);
    let mut consumed = 0;

    for (index, record) in stream.records.iter().enumerate() {
        let skip = record.unit.saturating_sub(consumed);
        consumed += skip + 1;
        let Some(line) = lines.nth(skip) else {
            log::warn!(
                "{} label records past the last line of the document",
                stream.records.len() - index
            );
            break;
        };
        if line.tokens.is_empty() {
            log::debug!("line {} of block {} has no tokens", line.line, line.block);
            continue;
        }
        let (Some(start), Some(end)) = (
            doc.pointer(line.block, line.tokens.start),
            doc.pointer(line.block, line.tokens.end - 1),
        ) else {
            continue;
        };

        let tag = record.label.tag.as_str();
        let continues = matches!(&run, Some((current, _, _)) if *current == tag);
        if continues {
            if let Some((_, _, run_end)) = run.as_mut() {
                *run_end = end;
            }
        } else {
            if let Some((label, first, last)) = run.take() {
                zones
                    .entry(label.to_string())
                    .or_default()
                    .insert(DocumentPiece::new(first, last));
            }
            run = Some((tag, start, end));
        }
    }
    if let Some((label, first, last)) = run {
        zones
            .entry(label.to_string())
            .or_default()
            .insert(DocumentPiece::new(first, last));
    }

    zones
}
