//! Layout-aware feature encoding.
//!
//! The encoders walk a [`Document`](crate::model::Document) in reading order
//! and emit one [`FeatureRecord`] per unit. Token-level encoding works on a
//! zone, line-level encoding on the whole document. Records are written to
//! the labeler as one whitespace-separated line each:
//!
//! ```text
//! Chapter chapter C Ch Cha Chap BLOCKSTART LINESTART PAGESTART NEWFONT HIGHERFONT INITCAP NODIGIT NOPUNCT 1 0 0 0 0 0 1 0 0 4 2 0
//! ```

mod encoder;
mod line_encoder;
mod lines;
mod options;
mod patterns;
mod record;
mod scaling;
mod state;

pub mod lexical;

pub use encoder::{token_features, FeatureEncoder};
pub use line_encoder::line_features;
pub use lines::{block_lines, featurable_lines, LineUnit};
pub use options::EncoderOptions;
pub use patterns::{PatternTracker, Repetition, RepetitionTable};
pub use record::{
    BlockStatus, Capitalisation, DigitClass, FeatureRecord, Featurized, FontSizeStatus, FontStatus,
    LineFeatures, LineStatus, PageStatus, PunctuationType,
};
pub use scaling::{linear_scaling, scale_in_range};
pub use state::{RecordBuffer, ScanState};
