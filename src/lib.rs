//! Text reflow for rendered PDF pages
//!
//! This library rebuilds headings, paragraphs and sentence breaks from the
//! positioned text fragments a PDF renderer lays out on the page. It estimates
//! the dominant text column and body font size, groups fragments into blocks,
//! decides where spaces belong and finally puts each sentence on its own line.

mod bounds;
mod error;
mod extract;
mod output;
mod render;
mod text;
mod types;
mod utils;

// Re-export error type
pub use error::ExtractError;

// Re-export extraction API
pub use extract::{
    ReadingOrder, TextExtractor, TextExtractorBuilder, extract_text, from_fragments,
};

// Re-export the analysis passes
pub use bounds::estimate_bounds;
pub use output::{
    BlockOutput, ColumnFilter, Cursor, reconstruct, reconstruct_with, should_add_space,
};
pub use render::{RenderEvents, Renderer, TextLayerCollector};
pub use text::{flatten_blocks, normalize_sentences};

// Re-export public types
pub use types::{
    Block, BlockKind, Bounds, FontSize, PageRect, PageSpace, Part, TextFragment, TextOutput,
};
