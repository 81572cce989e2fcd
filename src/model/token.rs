//! Layout tokens.

use serde::{Deserialize, Serialize};

/// The atomic lexical unit produced by layout extraction.
///
/// Whitespace and line breaks are tokens too: they carry no features of
/// their own but mark spacing and line boundaries for the encoders and
/// reconstructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutToken {
    /// Token text
    pub text: String,

    /// Left coordinate in points
    #[serde(default)]
    pub x: f64,

    /// Top coordinate in points
    #[serde(default)]
    pub y: f64,

    /// Width in points
    #[serde(default)]
    pub width: f64,

    /// Height in points
    #[serde(default)]
    pub height: f64,

    /// Font name
    #[serde(default)]
    pub font: Option<String>,

    /// Font size in points
    #[serde(default)]
    pub font_size: f64,

    /// Bold flag
    #[serde(default)]
    pub bold: bool,

    /// Italic flag
    #[serde(default)]
    pub italic: bool,
}

impl LayoutToken {
    /// Create a token with text only; geometry and font left empty.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            font: None,
            font_size: 0.0,
            bold: false,
            italic: false,
        }
    }

    /// Set the position and size.
    pub fn with_geometry(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Set the font name and size.
    pub fn with_font(mut self, font: impl Into<String>, size: f64) -> Self {
        self.font = Some(font.into());
        self.font_size = size;
        self
    }

    /// Set the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the italic flag.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// True if the token is only whitespace without any line terminator.
    pub fn is_space(&self) -> bool {
        self.is_blank() && self.line_breaks() == 0
    }

    /// True if the token is only whitespace with at least one line terminator.
    pub fn is_newline(&self) -> bool {
        self.is_blank() && self.line_breaks() > 0
    }

    fn is_blank(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }

    /// Number of line terminators in the token text.
    pub fn line_breaks(&self) -> usize {
        self.text.chars().filter(|&c| c == '\n' || c == '\r').count()
    }

    /// Number of characters in the token text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_classes() {
        assert!(LayoutToken::new(" ").is_space());
        assert!(LayoutToken::new("\u{00A0}").is_space());
        assert!(!LayoutToken::new("").is_space());
        assert!(LayoutToken::new("\r\n").is_newline());
        assert!(!LayoutToken::new("a\n").is_newline());
        assert_eq!(LayoutToken::new("\r\n").line_breaks(), 2);
    }

    #[test]
    fn test_builder() {
        let token = LayoutToken::new("Chapter")
            .with_geometry(72.0, 40.0, 50.0, 12.0)
            .with_font("Times-Bold", 14.0)
            .with_bold(true);
        assert_eq!(token.font.as_deref(), Some("Times-Bold"));
        assert!(token.bold);
        assert!(!token.italic);
        assert_eq!(token.char_len(), 7);
    }
}
