//! Parsing of the labeler output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix the labeler puts on the first unit of a span.
pub const BEGIN_PREFIX: &str = "I-";

/// A label, split into its base tag and the span-begin flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    /// Base tag in angle brackets, e.g. `<body>`
    pub tag: String,
    /// The labeler marked this unit as the first of a span
    pub begin: bool,
}

impl Label {
    /// Parse `I-<body>`, `<body>` or `body`.
    pub fn parse(raw: &str) -> Self {
        let (begin, rest) = match raw.strip_prefix(BEGIN_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let tag = if rest.starts_with('<') && rest.ends_with('>') {
            rest.to_string()
        } else {
            format!("<{}>", rest)
        };
        Self { tag, begin }
    }

    /// A continuation label for `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self::parse(&tag.into())
    }

    /// Mark as first unit of a span.
    pub fn begin(mut self) -> Self {
        self.begin = true;
        self
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin {
            f.write_str(BEGIN_PREFIX)?;
        }
        f.write_str(&self.tag)
    }
}

/// One line of labeler output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    /// The lexical unit
    pub token: String,
    /// Feature values between the unit and the label
    pub features: Vec<String>,
    /// The label
    pub label: Label,
    /// Position among the non-blank label lines, malformed ones included
    #[serde(default)]
    pub unit: usize,
}

impl LabelRecord {
    /// Parse one line. Needs at least a unit and a label.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return None;
        }
        let label = Label::parse(fields.pop()?);
        let token = fields.remove(0).to_string();
        Some(Self {
            token,
            features: fields.into_iter().map(str::to_string).collect(),
            label,
            unit: 0,
        })
    }

    /// True if the record carries the feature value `value`.
    pub fn has_feature(&self, value: &str) -> bool {
        self.features.iter().any(|f| f == value)
    }
}

/// The parsed label stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStream {
    /// Well-formed records in order
    pub records: Vec<LabelRecord>,
    /// Lines skipped because they had fewer than two fields
    pub malformed: usize,
}

impl LabelStream {
    /// Parse labeler output. Blank lines separate sequences and are
    /// ignored. Malformed lines are skipped and counted, but still take
    /// a unit position.
    pub fn parse(text: &str) -> Self {
        let mut stream = Self::default();
        let lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());
        for (unit, (number, line)) in lines.enumerate() {
            match LabelRecord::parse(line) {
                Some(record) => stream.records.push(LabelRecord { unit, ..record }),
                None => {
                    log::warn!("skipping malformed label line {}: {:?}", number + 1, line);
                    stream.malformed += 1;
                }
            }
        }
        stream
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no record was parsed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
