//! Label taxonomies and the markup element of every label.

use serde::Serialize;

/// Markup for one label: the opening and closing sequences.
///
/// A label without elements is emitted as bare text followed by a blank
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagSpec {
    /// Label as produced by the labeler, e.g. `<front>`
    pub label: &'static str,
    /// Opening element, e.g. `<front>`
    pub open: Option<&'static str>,
    /// Closing element, e.g. `</front>`
    pub close: Option<&'static str>,
}

impl TagSpec {
    const fn wrapped(label: &'static str, open: &'static str, close: &'static str) -> Self {
        Self {
            label,
            open: Some(open),
            close: Some(close),
        }
    }

    const fn unwrapped(label: &'static str) -> Self {
        Self {
            label,
            open: None,
            close: None,
        }
    }

    /// True if the label opens and closes an element.
    pub fn is_wrapped(&self) -> bool {
        self.open.is_some()
    }
}

const SEGMENTATION: &[TagSpec] = &[
    TagSpec::wrapped("<front>", "<front>", "</front>"),
    TagSpec::wrapped("<body>", "<body>", "</body>"),
    TagSpec::wrapped("<back>", "<back>", "</back>"),
    TagSpec::wrapped("<annex>", "<annex>", "</annex>"),
    TagSpec::wrapped("<other>", "<other>", "</other>"),
];

const MONOGRAPH: &[TagSpec] = &[
    TagSpec::wrapped("<cover>", "<cover>", "</cover>"),
    TagSpec::wrapped("<title>", "<title>", "</title>"),
    TagSpec::wrapped("<publisher>", "<publisher>", "</publisher>"),
    TagSpec::wrapped("<summary>", "<summary>", "</summary>"),
    TagSpec::wrapped("<biography>", "<biography>", "</biography>"),
    TagSpec::wrapped("<advertisement>", "<advertisement>", "</advertisement>"),
    TagSpec::wrapped("<toc>", "<toc>", "</toc>"),
    TagSpec::wrapped("<tof>", "<tof>", "</tof>"),
    TagSpec::wrapped("<preface>", "<preface>", "</preface>"),
    TagSpec::wrapped("<dedication>", "<dedication>", "</dedication>"),
    TagSpec::wrapped("<unit>", "<unit>", "</unit>"),
    TagSpec::wrapped("<reference>", "<reference>", "</reference>"),
    TagSpec::wrapped("<annex>", "<annex>", "</annex>"),
    TagSpec::wrapped("<index>", "<index>", "</index>"),
    TagSpec::wrapped("<glossary>", "<glossary>", "</glossary>"),
    TagSpec::wrapped("<back>", "<back>", "</back>"),
    TagSpec::unwrapped("<other>"),
];

const BODY_SEGMENTATION: &[TagSpec] = &[
    TagSpec::wrapped("<entry>", "<entry>", "</entry>"),
    TagSpec::wrapped("<title>", "<title>", "</title>"),
    TagSpec::wrapped("<titledesc>", "<titledesc>", "</titledesc>"),
    TagSpec::wrapped("<other>", "<note type=\"other\">", "</note>"),
];

/// A closed set of labels for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Taxonomy {
    name: &'static str,
    tags: &'static [TagSpec],
}

impl Taxonomy {
    /// Coarse document segmentation: front, body, back, annex, other.
    pub fn segmentation() -> Self {
        Self {
            name: "segmentation",
            tags: SEGMENTATION,
        }
    }

    /// Fine-grained monograph segmentation. `<other>` is not wrapped.
    pub fn monograph() -> Self {
        Self {
            name: "monograph",
            tags: MONOGRAPH,
        }
    }

    /// Segmentation of the body into catalogue entries.
    pub fn body_segmentation() -> Self {
        Self {
            name: "body-segmentation",
            tags: BODY_SEGMENTATION,
        }
    }

    /// Look a taxonomy up by name.
    pub fn by_name(name: &str) -> Option<Self> {
        [Self::segmentation(), Self::monograph(), Self::body_segmentation()]
            .into_iter()
            .find(|t| t.name == name)
    }

    /// Taxonomy name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All labels, in declaration order.
    pub fn tags(&self) -> &'static [TagSpec] {
        self.tags
    }

    /// Markup for `label`, or `None` for a label outside the taxonomy.
    pub fn lookup(&self, label: &str) -> Option<&'static TagSpec> {
        self.tags.iter().find(|t| t.label == label)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::segmentation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_open_has_a_close() {
        for taxonomy in [
            Taxonomy::segmentation(),
            Taxonomy::monograph(),
            Taxonomy::body_segmentation(),
        ] {
            for tag in taxonomy.tags() {
                assert_eq!(tag.open.is_some(), tag.close.is_some(), "{}", tag.label);
            }
        }
    }

    #[test]
    fn test_lookup() {
        let body = Taxonomy::body_segmentation();
        let other = body.lookup("<other>").unwrap();
        assert_eq!(other.open, Some("<note type=\"other\">"));
        assert_eq!(other.close, Some("</note>"));
        assert!(!Taxonomy::monograph().lookup("<other>").unwrap().is_wrapped());
        assert!(Taxonomy::segmentation().lookup("<toc>").is_none());
        assert_eq!(Taxonomy::monograph().tags().len(), 17);
        assert_eq!(Taxonomy::by_name("monograph"), Some(Taxonomy::monograph()));
        assert_eq!(Taxonomy::by_name("unknown"), None);
    }
}
