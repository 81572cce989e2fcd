//! Document model types for layout-aware feature extraction.
//!
//! A document is a tree of pages, blocks and tokens as delivered by a layout
//! extractor. The same tokens are also addressed in flat document order,
//! which is how zones and pointers refer to them.

mod document;
mod page;
mod piece;
mod statistics;
mod token;

pub use document::Document;
pub use page::{Block, BoundingBox, GraphicKind, Page};
pub use piece::{DocumentPiece, DocumentPointer, Zone};
pub use statistics::DocumentStatistics;
pub(crate) use statistics::has_media_marker;
pub use token::LayoutToken;
