//! Rendering of labeled units to markup.
//!
//! Each maximal run of units sharing a label becomes one element of the
//! active [`Taxonomy`](crate::label::Taxonomy). Text is escaped and line
//! breaks inside a span are written as `<lb/>`.

mod markup;
mod options;
mod result;
mod tei;

pub use markup::{lines_to_markup, tokens_to_markup, MarkupRenderer};
pub use options::{MarkupOptions, SyncPolicy};
pub use result::{MarkupResult, ReconstructionStats};
pub use tei::{blank_text, wrap_tei};
