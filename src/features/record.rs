//! Feature records and their discrete values.

use super::lexical::prefix;
use crate::model::LayoutToken;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! feature_values {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Value as written in the feature stream.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

feature_values! {
    /// Position of a unit inside its block.
    BlockStatus {
        /// First unit of the block
        Start => "BLOCKSTART",
        /// Neither first nor last
        In => "BLOCKIN",
        /// Last unit of the block
        End => "BLOCKEND",
    }
}

feature_values! {
    /// Position of a unit inside its line.
    LineStatus {
        /// First unit of the line
        Start => "LINESTART",
        /// Neither first nor last
        In => "LINEIN",
        /// Last unit of the line
        End => "LINEEND",
    }
}

feature_values! {
    /// Position of a unit inside its page.
    PageStatus {
        /// First unit of the page
        Start => "PAGESTART",
        /// Neither first nor last
        In => "PAGEIN",
        /// Last unit of the page
        End => "PAGEEND",
    }
}

feature_values! {
    /// Whether the font name changed since the previous unit.
    FontStatus {
        /// Font differs from the previous unit
        NewFont => "NEWFONT",
        /// Same font as the previous unit
        SameFont => "SAMEFONT",
    }
}

feature_values! {
    /// Direction of the font size change since the previous unit.
    FontSizeStatus {
        /// Larger, or the first unit of the stream
        Higher => "HIGHERFONT",
        /// Same integer size
        Same => "SAMEFONTSIZE",
        /// Smaller
        Lower => "LOWERFONT",
    }
}

feature_values! {
    /// Capitalisation class.
    Capitalisation {
        /// Upper-case first letter, lower-case letters follow
        InitCap => "INITCAP",
        /// Upper-case letters only
        AllCap => "ALLCAP",
        /// Anything else
        NoCaps => "NOCAPS",
    }
}

feature_values! {
    /// Digit class.
    DigitClass {
        /// Digits only
        AllDigit => "ALLDIGIT",
        /// At least one digit
        ContainsDigits => "CONTAINSDIGITS",
        /// No digit
        NoDigit => "NODIGIT",
    }
}

feature_values! {
    /// Punctuation class.
    PunctuationType {
        /// Not punctuation
        NoPunct => "NOPUNCT",
        /// `(` or `[`
        OpenBracket => "OPENBRACKET",
        /// `)` or `]`
        EndBracket => "ENDBRACKET",
        /// `.`
        Dot => "DOT",
        /// `,`
        Comma => "COMMA",
        /// Hyphen or dash
        Hyphen => "HYPHEN",
        /// Any quote mark
        Quote => "QUOTE",
        /// Other punctuation or symbols
        Punct => "PUNCT",
    }
}

/// Extra values carried by line-level records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFeatures {
    /// Second whitespace-delimited word of the line
    pub second_string: Option<String>,
    /// Scaled character position inside the page
    pub relative_page_char_position: u32,
    /// Line length relative to the longest line of its block
    pub line_length: u32,
    /// Punctuation characters of the line
    pub punctuation_profile: String,
}

/// One feature record per processed unit (token or line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// The lexical unit, without spaces
    pub string: String,
    pub block_status: BlockStatus,
    pub line_status: LineStatus,
    pub page_status: PageStatus,
    pub font_status: FontStatus,
    pub font_size_status: FontSizeStatus,
    pub capitalisation: Capitalisation,
    pub digit: DigitClass,
    pub punctuation: PunctuationType,
    pub bold: bool,
    pub italic: bool,
    pub single_char: bool,
    /// Part of a pattern repeated across pages
    pub repetitive: bool,
    /// First occurrence of a repeated pattern
    pub first_repetitive: bool,
    pub bitmap_around: bool,
    pub vector_around: bool,
    pub in_main_area: bool,
    /// Scaled position in the document
    pub relative_document_position: u32,
    /// Scaled vertical position in the page
    pub relative_page_position: u32,
    /// Scaled gap with the previous block
    pub spacing: u32,
    /// Scaled character density of the block
    pub density: u32,
    /// The line starts to the right of the previous line start
    pub indented: bool,
    /// Present on line-level records only
    pub line: Option<LineFeatures>,
}

impl FeatureRecord {
    /// A record for `string` with lexical classes filled in and layout
    /// values neutral.
    pub fn new(string: impl Into<String>) -> Self {
        let string = string.into();
        Self {
            block_status: BlockStatus::In,
            line_status: LineStatus::In,
            page_status: PageStatus::In,
            font_status: FontStatus::SameFont,
            font_size_status: FontSizeStatus::Same,
            capitalisation: super::lexical::capitalisation(&string),
            digit: super::lexical::digit_class(&string),
            punctuation: super::lexical::punctuation_type(&string),
            bold: false,
            italic: false,
            single_char: string.chars().count() == 1,
            repetitive: false,
            first_repetitive: false,
            bitmap_around: false,
            vector_around: false,
            in_main_area: true,
            relative_document_position: 0,
            relative_page_position: 0,
            spacing: 0,
            density: 0,
            indented: false,
            line: None,
            string,
        }
    }

    /// Copy the typographic flags of `token`.
    pub fn with_token_style(mut self, token: &LayoutToken) -> Self {
        self.bold = token.bold;
        self.italic = token.italic;
        self
    }

    /// Capitalisation as written in the stream: digits have no case.
    pub fn printed_capitalisation(&self) -> Capitalisation {
        if self.digit == DigitClass::AllDigit {
            Capitalisation::NoCaps
        } else {
            self.capitalisation
        }
    }

    /// The whitespace-separated fields of the feature vector.
    pub fn fields(&self) -> Vec<String> {
        let flag = |b: bool| if b { "1" } else { "0" }.to_string();
        let mut fields = vec![
            self.string.clone(),
            self.string.to_lowercase(),
        ];
        for n in 1..=4 {
            fields.push(prefix(&self.string, n).to_string());
        }
        fields.extend([
            self.block_status.to_string(),
            self.line_status.to_string(),
            self.page_status.to_string(),
            self.font_status.to_string(),
            self.font_size_status.to_string(),
            self.printed_capitalisation().to_string(),
            self.digit.to_string(),
            self.punctuation.to_string(),
            flag(self.bold),
            flag(self.italic),
            flag(self.single_char),
            flag(self.repetitive),
            flag(self.first_repetitive),
            flag(self.bitmap_around || self.vector_around),
            flag(self.in_main_area),
            self.relative_document_position.to_string(),
            self.relative_page_position.to_string(),
            self.spacing.to_string(),
            self.density.to_string(),
            flag(self.indented),
        ]);
        if let Some(line) = &self.line {
            fields.push(line.second_string.clone().unwrap_or_else(|| "no".to_string()));
            fields.push(line.relative_page_char_position.to_string());
            fields.push(line.line_length.to_string());
            if line.punctuation_profile.is_empty() {
                fields.push("no".to_string());
            } else {
                fields.push(line.punctuation_profile.clone());
            }
            fields.push(line.punctuation_profile.chars().count().to_string());
        }
        fields
    }

    /// The feature vector line, without terminator.
    pub fn to_vector(&self) -> String {
        self.fields().join(" ")
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_vector())
    }
}

/// Records of one encoding pass and the raw tokens they were built from.
#[derive(Debug, Clone, Default)]
pub struct Featurized<'a> {
    /// One record per processed unit
    pub records: Vec<FeatureRecord>,
    /// Raw tokens in document order, kept for re-synchronization
    pub tokens: Vec<&'a LayoutToken>,
}

impl<'a> Featurized<'a> {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no record was produced.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The flat feature stream: one newline-terminated line per record.
    pub fn feature_string(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_vector());
            out.push('\n');
        }
        out
    }
}
