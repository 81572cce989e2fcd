//! # zonelabel
//!
//! Layout-aware feature extraction for sequence labeling, and reconstruction
//! of labeled units into TEI-like markup.
//!
//! A laid-out [`Document`] (pages, blocks, tokens with geometry and fonts)
//! is encoded into one feature line per unit. An external sequence labeler
//! appends a label to each line. The labeled stream is then walked in
//! lock-step with the document to rebuild nested markup.
//!
//! ## Quick Start
//!
//! ```no_run
//! use zonelabel::{Document, EncoderOptions, MarkupOptions};
//!
//! fn main() -> zonelabel::Result<()> {
//!     let doc = Document::load("document.json")?;
//!
//!     // One feature line per text line
//!     let features = zonelabel::line_features(&doc, &EncoderOptions::default())?;
//!     if let Some(features) = features {
//!         print!("{}", features.feature_string());
//!     }
//!
//!     // ... run the labeler, then rebuild markup from its output
//!     let labels = std::fs::read_to_string("document.labels")?;
//!     let markup = zonelabel::lines_to_markup(&doc, &labels, &MarkupOptions::default())?;
//!     println!("{}", markup.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two granularities**: token-level encoding of a zone, line-level
//!   encoding of a whole document
//! - **Running layout state**: font and size changes, indentation, block
//!   spacing, page boundaries, running headers and footers
//! - **Deterministic reconstruction**: every span opened is closed, and
//!   desynchronization is reported instead of guessed
//! - **Parallel batches**: independent documents segmented with Rayon

pub mod error;
pub mod features;
pub mod label;
pub mod model;
pub mod render;
pub mod segment;
pub mod training;

pub use error::{Error, Result};
pub use features::{
    line_features, token_features, EncoderOptions, FeatureEncoder, FeatureRecord, Featurized,
};
pub use label::{ConstantLabeler, Label, LabelStream, SequenceLabeler, Taxonomy};
pub use model::{
    Block, BoundingBox, Document, DocumentPiece, DocumentPointer, DocumentStatistics, GraphicKind,
    LayoutToken, Page, Zone,
};
pub use render::{
    blank_text, lines_to_markup, tokens_to_markup, wrap_tei, MarkupOptions, MarkupRenderer,
    MarkupResult, ReconstructionStats, SyncPolicy,
};
pub use segment::{zones_from_labels, BodySegmenter, Segmentation, Segmenter};
pub use training::{labels_from_tei, TrainingLine};

/// Feature stream of the lines of `doc`, or `None` for an empty document.
///
/// # Example
///
/// ```no_run
/// let doc = zonelabel::Document::load("document.json").unwrap();
/// let stream = zonelabel::line_feature_string(&doc, &Default::default()).unwrap();
/// ```
pub fn line_feature_string(doc: &Document, options: &EncoderOptions) -> Result<Option<String>> {
    Ok(line_features(doc, options)?.map(|f| f.feature_string()))
}

/// Feature stream of the tokens of `zone`, or `None` for an empty zone.
pub fn token_feature_string(
    doc: &Document,
    zone: &Zone,
    options: &EncoderOptions,
) -> Result<Option<String>> {
    Ok(token_features(doc, zone, options)?.map(|f| f.feature_string()))
}

/// Unlabeled training text of `zone`, wrapped in a TEI envelope.
pub fn blank_training(doc: &Document, zone: &Zone, id: Option<&str>) -> String {
    let tokens = zone
        .iter()
        .flat_map(|piece| piece.start.token_doc_pos..=piece.end.token_doc_pos)
        .filter_map(|i| doc.token(i));
    wrap_tei(&blank_text(tokens), id, "fr")
}
