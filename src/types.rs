use std::fmt;

use euclid::{Rect, rect};

use crate::text::{flatten_blocks, normalize_sentences};
use crate::utils::parse_font_size_px;

/// Rendered page coordinates: pixels, origin top-left, y growing downwards.
pub struct PageSpace;
pub type PageRect = Rect<f64, PageSpace>;

/// Rounded font size in pixels. `None` marks a style string that could not be
/// parsed; it never compares equal to anything, itself included.
pub type FontSize = Option<i64>;

/// One positioned run of text as emitted by the renderer.
#[derive(Debug, Clone)]
pub struct TextFragment {
    pub rect: PageRect,
    /// Font size style string, e.g. `"12px"`.
    pub font_size_px: String,
    pub text: String,
}

impl TextFragment {
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        font_size_px: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        TextFragment {
            rect: rect(x, y, width, height),
            font_size_px: font_size_px.into(),
            text: text.into(),
        }
    }

    pub fn x(&self) -> f64 {
        self.rect.origin.x
    }

    pub fn y(&self) -> f64 {
        self.rect.origin.y
    }

    pub fn width(&self) -> f64 {
        self.rect.size.width
    }

    pub fn height(&self) -> f64 {
        self.rect.size.height
    }

    /// The style font size rounded up to a whole pixel.
    pub fn font_size(&self) -> FontSize {
        parse_font_size_px(&self.font_size_px).map(|v| v.ceil() as i64)
    }
}

impl fmt::Display for TextFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} at ({:.1}, {:.1}) {:.1}x{:.1} [{}]",
            self.text,
            self.x(),
            self.y(),
            self.width(),
            self.height(),
            self.font_size_px
        )
    }
}

/// Dominant left edge, right edge and font size of a document.
///
/// Each field is `None` when no fragment contributed a usable value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub left: Option<i64>,
    pub right: Option<i64>,
    pub font_size: Option<i64>,
}

impl Bounds {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.font_size.is_none()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field(v: Option<i64>) -> String {
            v.map_or_else(|| "-".to_owned(), |v| v.to_string())
        }
        write!(
            f,
            "(left: {}, right: {}, font size: {})",
            field(self.left),
            field(self.right),
            field(self.font_size)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Heading => f.write_str("heading"),
            BlockKind::Paragraph => f.write_str("paragraph"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    /// A single space between two fragments.
    Separator,
}

impl Part {
    pub fn as_str(&self) -> &str {
        match self {
            Part::Text(text) => text,
            Part::Separator => " ",
        }
    }
}

/// A run of fragments classified as a heading or a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Size of the fragment that opened the block; `None` for the initial
    /// block and for blocks opened by an unparseable size.
    pub font_size: FontSize,
    pub parts: Vec<Part>,
}

impl Block {
    pub(crate) fn initial() -> Self {
        Block {
            kind: BlockKind::Paragraph,
            font_size: None,
            parts: Vec::new(),
        }
    }

    pub(crate) fn opened_by(kind: BlockKind, font_size: FontSize, text: &str) -> Self {
        Block {
            kind,
            font_size,
            parts: vec![Part::Text(text.to_owned())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn text(&self) -> String {
        self.parts.iter().map(Part::as_str).collect()
    }
}

/// Output of a reconstruction pass: the bounds it used and the blocks it built.
///
/// `Display` (and [`TextOutput::to_text`]) gives the flattened text with
/// sentence boundaries normalised.
#[derive(Debug, Clone)]
pub struct TextOutput {
    bounds: Bounds,
    blocks: Vec<Block>,
}

impl TextOutput {
    pub(crate) fn new(bounds: Bounds, blocks: Vec<Block>) -> Self {
        TextOutput { bounds, blocks }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn to_text(&self) -> String {
        normalize_sentences(&flatten_blocks(&self.blocks))
    }
}

impl fmt::Display for TextOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
