//! Page-level types.

use super::LayoutToken;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left coordinate
    pub x: f64,
    /// Top coordinate
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// Create a box from its top-left corner and dimensions.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True if the two boxes overlap. Touching edges count as overlap.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

/// Kind of graphic object attached to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicKind {
    /// Raster image
    Bitmap,
    /// Vector drawing
    Vector,
    /// Bounding box of a group of vector drawings
    VectorBox,
}

impl GraphicKind {
    /// True for bitmaps.
    pub fn is_bitmap(self) -> bool {
        self == GraphicKind::Bitmap
    }

    /// True for vector drawings and vector boxes.
    pub fn is_vector(self) -> bool {
        matches!(self, GraphicKind::Vector | GraphicKind::VectorBox)
    }
}

/// A block of text on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Block geometry
    pub bbox: BoundingBox,

    /// Raw text, possibly with embedded line breaks.
    /// Derived from the tokens when the input omits it.
    #[serde(default)]
    pub text: String,

    /// Tokens in reading order
    #[serde(default)]
    pub tokens: Vec<LayoutToken>,

    /// Graphics located around the block
    #[serde(default)]
    pub graphics: Vec<GraphicKind>,
}

impl Block {
    /// Create a block whose text is the concatenation of its tokens.
    pub fn new(bbox: BoundingBox, tokens: Vec<LayoutToken>) -> Self {
        let text = tokens.iter().map(|t| t.text.as_str()).collect();
        Self {
            bbox,
            text,
            tokens,
            graphics: Vec::new(),
        }
    }

    /// Attach a graphic.
    pub fn with_graphic(mut self, kind: GraphicKind) -> Self {
        self.graphics.push(kind);
        self
    }

    /// Override the raw text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// True if a bitmap is attached.
    pub fn has_bitmap(&self) -> bool {
        self.graphics.iter().any(|g| g.is_bitmap())
    }

    /// True if a vector graphic is attached.
    pub fn has_vector(&self) -> bool {
        self.graphics.iter().any(|g| g.is_vector())
    }

    /// Number of characters in the raw text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Characters per square point, or 0 when the block has no area.
    pub fn density(&self) -> f64 {
        let area = self.bbox.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.char_len() as f64 / area
    }

    /// True if the block carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub(crate) fn fill_text(&mut self) {
        if self.text.is_empty() && !self.tokens.is_empty() {
            self.text = self.tokens.iter().map(|t| t.text.as_str()).collect();
        }
    }
}

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    #[serde(default)]
    pub width: f64,

    /// Page height in points
    pub height: f64,

    /// Main content area (excludes headers, footers and margins)
    #[serde(default)]
    pub main_area: Option<BoundingBox>,

    /// Blocks in reading order
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f64, height: f64) -> Self {
        Self {
            number,
            width,
            height,
            main_area: None,
            blocks: Vec::new(),
        }
    }

    /// Create a new page with standard A4 size.
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0)
    }

    /// Set the main content area.
    pub fn with_main_area(mut self, area: BoundingBox) -> Self {
        self.main_area = Some(area);
        self
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Sum of the character lengths of the page's blocks.
    pub fn char_length(&self) -> usize {
        self.blocks.iter().map(Block::char_len).sum()
    }

    /// True if the page has a main area and `bbox` lies in or across it.
    pub fn in_main_area(&self, bbox: &BoundingBox) -> bool {
        self.main_area
            .as_ref()
            .is_some_and(|area| area.contains(bbox) || area.intersects(bbox))
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
