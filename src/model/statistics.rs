//! Document-wide bounds used to normalize discretized features.

use super::Page;
use serde::{Deserialize, Serialize};

/// Spacing and density bounds over every block of a document.
///
/// These are normally supplied by the layout extractor. [`compute`] derives
/// them from block geometry when the input does not carry them.
///
/// [`compute`]: DocumentStatistics::compute
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentStatistics {
    /// Smallest vertical gap between consecutive blocks of a page
    pub min_block_spacing: f64,
    /// Largest vertical gap between consecutive blocks of a page
    pub max_block_spacing: f64,
    /// Smallest characters-per-area ratio of a block
    pub min_char_density: f64,
    /// Largest characters-per-area ratio of a block
    pub max_char_density: f64,
}

impl DocumentStatistics {
    /// Derive the bounds from the blocks of `pages`.
    ///
    /// Gaps are measured from the bottom of the previous block of the same
    /// page (the page top for the first block). Negative gaps, i.e. column
    /// breaks, and blocks without area are ignored.
    pub fn compute(pages: &[Page]) -> Self {
        let mut spacing: Option<(f64, f64)> = None;
        let mut density: Option<(f64, f64)> = None;

        for page in pages {
            let mut lowest = 0.0;
            for block in &page.blocks {
                let gap = block.bbox.y - lowest;
                if gap >= 0.0 {
                    spacing = Some(widen(spacing, gap));
                }
                lowest = block.bbox.bottom();

                if block.bbox.area() > 0.0 && !has_media_marker(&block.text) {
                    density = Some(widen(density, block.density()));
                }
            }
        }

        let (min_block_spacing, max_block_spacing) = spacing.unwrap_or_default();
        let (min_char_density, max_char_density) = density.unwrap_or_default();
        Self {
            min_block_spacing,
            max_block_spacing,
            min_char_density,
            max_char_density,
        }
    }
}

fn widen(bounds: Option<(f64, f64)>, value: f64) -> (f64, f64) {
    match bounds {
        Some((min, max)) => (min.min(value), max.max(value)),
        None => (value, value),
    }
}

pub(crate) fn has_media_marker(text: &str) -> bool {
    text.contains("@PAGE") || text.contains("@IMAGE")
}
