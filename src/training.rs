//! Labeled lines from annotated TEI training files.
//!
//! This is the inverse of line-level reconstruction: every line of an
//! annotated file becomes `first-word label`, with the `I-` prefix on the
//! first line of each span. Text outside any zone element is `<other>`.

use crate::error::Result;
use crate::label::{Label, Taxonomy};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;

const OTHER_LABEL: &str = "<other>";

/// One labeled line of training data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingLine {
    /// First word of the line
    pub token: String,
    /// Label of the enclosing zone
    pub label: Label,
}

impl fmt::Display for TrainingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.token, self.label)
    }
}

/// Element name of an opening sequence such as `<note type="other">`.
fn element_name(open: &str) -> &str {
    open.trim_start_matches('<')
        .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .next()
        .unwrap_or_default()
}

struct SpanLines {
    lines: Vec<TrainingLine>,
    line: String,
    label: String,
    begin: bool,
}

impl SpanLines {
    fn end_line(&mut self) {
        let line = std::mem::take(&mut self.line);
        if let Some(token) = line.split_whitespace().next() {
            self.lines.push(TrainingLine {
                token: token.to_string(),
                label: Label {
                    tag: self.label.clone(),
                    begin: self.begin,
                },
            });
            self.begin = false;
        }
    }

    fn start_span(&mut self, label: &str) {
        self.end_line();
        self.label = label.to_string();
        self.begin = true;
    }
}

/// Read the labeled lines of an annotated TEI file.
///
/// Zone elements are recognized through the opening elements of
/// `taxonomy`. `<lb/>` and `<pb/>` end lines; other line breaks in the file
/// are layout of the file itself and are ignored.
pub fn labels_from_tei(xml: &str, taxonomy: &Taxonomy) -> Result<Vec<TrainingLine>> {
    let zone_elements: Vec<(&str, &str)> = taxonomy
        .tags()
        .iter()
        .filter_map(|t| t.open.map(|open| (element_name(open), t.label)))
        .collect();

    let mut reader = Reader::from_str(xml);
    let mut in_text = false;
    let mut zone: Option<String> = None;
    let mut span = SpanLines {
        lines: Vec::new(),
        line: String::new(),
        label: OTHER_LABEL.to_string(),
        begin: true,
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "text" {
                    in_text = true;
                } else if in_text && zone.is_none() {
                    if let Some((_, label)) = zone_elements.iter().find(|(el, _)| *el == name) {
                        span.start_span(label);
                        zone = Some(name);
                    }
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if in_text && (name.as_ref() == b"lb" || name.as_ref() == b"pb") {
                    span.end_line();
                }
            }
            Event::Text(e) => {
                if in_text {
                    let text = e.unescape()?;
                    span.line.push_str(&text.replace(['\n', '\r'], " "));
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "text" {
                    span.end_line();
                    in_text = false;
                } else if zone.as_deref() == Some(name.as_str()) {
                    span.start_span(OTHER_LABEL);
                    zone = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    span.end_line();

    log::debug!("{} labeled lines read", span.lines.len());
    Ok(span.lines)
}
