//! Segmentation pipelines: encode, label, rebuild zones and markup.

mod pipeline;
mod zones;

pub use pipeline::{BodySegmenter, Segmentation, Segmenter, BODY_LABEL};
pub use zones::zones_from_labels;
