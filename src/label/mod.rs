//! Labels: the labeler seam, the label stream and the taxonomies.

mod labeler;
mod stream;
mod taxonomy;

pub use labeler::{ConstantLabeler, SequenceLabeler};
pub use stream::{Label, LabelRecord, LabelStream, BEGIN_PREFIX};
pub use taxonomy::{TagSpec, Taxonomy};
