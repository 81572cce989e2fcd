//! TEI envelopes for reconstructed and blank training material.

use crate::features::lexical::markup_text;
use crate::model::LayoutToken;

/// Wrap a markup fragment in a TEI document.
pub fn wrap_tei(body: &str, id: Option<&str>, lang: &str) -> String {
    let mut out = String::with_capacity(body.len() + 200);
    out.push_str("<?xml version=\"1.0\" ?>\n<tei xml:space=\"preserve\">\n\t<teiHeader>\n");
    match id {
        Some(id) => {
            out.push_str("\t\t<fileDesc xml:id=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(id));
            out.push_str("\"/>\n");
        }
        None => out.push_str("\t\t<fileDesc/>\n"),
    }
    out.push_str("\t</teiHeader>\n\t<text xml:lang=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(lang));
    out.push_str("\">\n");
    out.push_str(body.trim_end_matches('\n'));
    out.push_str("\n\t</text>\n</tei>\n");
    out
}

/// Escaped text of `tokens`, concatenated as laid out. Used as unlabeled
/// training material.
pub fn blank_text<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a LayoutToken>,
{
    tokens.into_iter().map(|t| markup_text(&t.text)).collect()
}
