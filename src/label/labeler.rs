//! The sequence labeler seam.

use super::stream::LabelStream;
use crate::error::{Error, Result};

/// An opaque model turning a feature stream into a label stream.
///
/// The input has one feature line per unit. The output must have the same
/// lines with a label appended to each.
pub trait SequenceLabeler {
    /// Label a feature stream.
    fn label(&self, features: &str) -> Result<String>;

    /// Label a feature stream and parse the result.
    ///
    /// Fails when the labeler returns fewer records than it was given.
    fn label_stream(&self, features: &str) -> Result<LabelStream> {
        let expected = features.lines().filter(|l| !l.trim().is_empty()).count();
        let stream = LabelStream::parse(&self.label(features)?);
        if stream.len() + stream.malformed < expected {
            return Err(Error::Labeler(format!(
                "expected {} labeled lines, got {}",
                expected,
                stream.len() + stream.malformed
            )));
        }
        Ok(stream)
    }
}

impl<F> SequenceLabeler for F
where
    F: Fn(&str) -> Result<String>,
{
    fn label(&self, features: &str) -> Result<String> {
        self(features)
    }
}

/// Labels every unit with the same tag. Useful to produce blank training
/// material and in tests.
#[derive(Debug, Clone)]
pub struct ConstantLabeler {
    tag: String,
}

impl ConstantLabeler {
    /// Create a labeler answering `tag` for every unit.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl SequenceLabeler for ConstantLabeler {
    fn label(&self, features: &str) -> Result<String> {
        let mut out = String::with_capacity(features.len() + features.lines().count() * (self.tag.len() + 1));
        for line in features.lines() {
            if line.trim().is_empty() {
                out.push('\n');
                continue;
            }
            out.push_str(line);
            out.push(' ');
            out.push_str(&self.tag);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_labeler() {
        let labeler = |features: &str| -> Result<String> {
            Ok(features
                .lines()
                .map(|l| format!("{} <body>\n", l))
                .collect())
        };
        let stream = labeler.label_stream("a x\nb y\n").unwrap();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.records[1].features, ["y"]);
    }

    #[test]
    fn test_short_answer_is_an_error() {
        let labeler = |_: &str| -> Result<String> { Ok("a <body>\n".to_string()) };
        let err = labeler.label_stream("a x\nb y\n").unwrap_err();
        assert!(matches!(err, Error::Labeler(_)));
    }

    #[test]
    fn test_constant_labeler() {
        let out = ConstantLabeler::new("<front>").label("a 1\nb 2\n").unwrap();
        assert_eq!(out, "a 1 <front>\nb 2 <front>\n");
    }
}
