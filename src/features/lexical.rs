//! Lexical utilities shared by the encoders and reconstructors.

use super::record::{Capitalisation, DigitClass, PunctuationType};
use crate::model::has_media_marker;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static ALL_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static ALL_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{P}\p{S}]+$").unwrap());

/// Characters counted by [`punctuation_profile`].
const PROFILE_PUNCTUATION: &str =
    "(（[•*,:;?.!/)）-−–‐«»„\"“”‘’'`$#@]*♦♥♣♠";

const IMAGE_EXTENSIONS: [&str; 5] = [".pbm", ".ppm", ".svg", ".jpg", ".png"];

/// Marker the layout extractor puts in front of bullet list items.
pub const BULLET_MARKER: &str = "@BULLET";

/// The first `n` characters of `s`, or all of it when shorter.
pub fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Signature of a line used to spot running headers and footers.
///
/// Letters only, accents stripped, lowercased: page numbers and punctuation
/// do not make two occurrences of the same header differ.
pub fn line_pattern(line: &str) -> String {
    line.nfkd()
        .filter(|c| !is_combining_mark(*c) && c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True if the line is degenerate and must not produce a record:
/// empty, a media placeholder, or an image file reference.
pub fn filter_line(line: &str) -> bool {
    line.is_empty()
        || has_media_marker(line)
        || IMAGE_EXTENSIONS.iter().any(|ext| line.contains(ext))
}

/// The punctuation characters of `line`, in order.
pub fn punctuation_profile(line: &str) -> String {
    line.chars()
        .filter(|c| PROFILE_PUNCTUATION.contains(*c))
        .collect()
}

/// Escape text for element content.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escape text and replace bullet markers.
pub fn markup_text(text: &str) -> String {
    let escaped = escape_html(text);
    if escaped.contains(BULLET_MARKER) {
        escaped.replace(BULLET_MARKER, "\u{2022}")
    } else {
        escaped.into_owned()
    }
}

/// Capitalisation class of a token.
pub fn capitalisation(text: &str) -> Capitalisation {
    let mut upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return match text.chars().next() {
                Some(first) if first.is_uppercase() => Capitalisation::InitCap,
                _ => Capitalisation::NoCaps,
            };
        }
        upper |= c.is_uppercase();
    }
    if upper {
        Capitalisation::AllCap
    } else {
        Capitalisation::NoCaps
    }
}

/// Digit class of a token.
pub fn digit_class(text: &str) -> DigitClass {
    if ALL_DIGITS.is_match(text) {
        DigitClass::AllDigit
    } else if text.chars().any(|c| c.is_numeric()) {
        DigitClass::ContainsDigits
    } else {
        DigitClass::NoDigit
    }
}

/// Punctuation class of a token.
pub fn punctuation_type(text: &str) -> PunctuationType {
    match text {
        "(" | "[" => PunctuationType::OpenBracket,
        ")" | "]" => PunctuationType::EndBracket,
        "." => PunctuationType::Dot,
        "," => PunctuationType::Comma,
        "-" | "\u{2013}" | "\u{2014}" => PunctuationType::Hyphen,
        "\"" | "'" | "`" | "\u{201C}" | "\u{201D}" | "\u{2018}" | "\u{2019}" | "«" | "»" => {
            PunctuationType::Quote
        }
        _ if ALL_PUNCT.is_match(text) => PunctuationType::Punct,
        _ => PunctuationType::NoPunct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix() {
        assert_eq!(prefix("Chapter", 3), "Cha");
        assert_eq!(prefix("1", 4), "1");
        assert_eq!(prefix("été", 2), "ét");
    }

    #[test]
    fn test_line_pattern_ignores_numbers() {
        assert_eq!(line_pattern("Journal Officiel - 12"), "journalofficiel");
        assert_eq!(
            line_pattern("Journal Officiel - 13"),
            line_pattern("JOURNAL OFFICIEL 14")
        );
        assert_eq!(line_pattern("Écrits"), "ecrits");
    }

    #[test]
    fn test_filter_line() {
        assert!(filter_line(""));
        assert!(filter_line("@IMAGE page-001.png"));
        assert!(filter_line("figure.svg"));
        assert!(!filter_line("Chapter"));
    }

    #[test]
    fn test_punctuation_profile() {
        assert_eq!(punctuation_profile("Dupont (Jean), p. 12."), "(),..");
        assert_eq!(punctuation_profile("plain words"), "");
    }

    #[test]
    fn test_markup_text() {
        assert_eq!(markup_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(markup_text("@BULLET item"), "\u{2022} item");
    }

    #[test]
    fn test_classes() {
        assert_eq!(capitalisation("Chapter"), Capitalisation::InitCap);
        assert_eq!(capitalisation("UNESCO"), Capitalisation::AllCap);
        assert_eq!(capitalisation("word"), Capitalisation::NoCaps);
        assert_eq!(capitalisation("12"), Capitalisation::NoCaps);
        assert_eq!(digit_class("1987"), DigitClass::AllDigit);
        assert_eq!(digit_class("p12"), DigitClass::ContainsDigits);
        assert_eq!(digit_class("page"), DigitClass::NoDigit);
        assert_eq!(punctuation_type("("), PunctuationType::OpenBracket);
        assert_eq!(punctuation_type("."), PunctuationType::Dot);
        assert_eq!(punctuation_type(";"), PunctuationType::Punct);
        assert_eq!(punctuation_type("word"), PunctuationType::NoPunct);
    }
}
