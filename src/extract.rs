use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::bounds::estimate_bounds;
use crate::error::ExtractError;
use crate::output::{ColumnFilter, reconstruct_with};
use crate::render::{RenderEvents, Renderer, TextLayerCollector};
use crate::types::{TextFragment, TextOutput};

/// How fragments are ordered before analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadingOrder {
    /// Keep the order the renderer emitted fragments in.
    #[default]
    Emission,
    /// Sort top to bottom, then left to right. The sort is stable.
    Positional,
}

impl ReadingOrder {
    pub fn apply(&self, fragments: &mut [TextFragment]) {
        if let ReadingOrder::Positional = self {
            fragments.sort_by(|a, b| a.y().total_cmp(&b.y()).then(a.x().total_cmp(&b.x())));
        }
    }
}

/// Builder for configuring text reconstruction.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use pdf_reflow::{ColumnFilter, ReadingOrder, TextExtractor};
///
/// let extractor = TextExtractor::builder()
///     .column_filter(ColumnFilter::LeftAndRightEdge)
///     .reading_order(ReadingOrder::Positional)
///     .render_timeout(Duration::from_secs(30))
///     .build();
/// # let _ = extractor;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextExtractorBuilder {
    column_filter: ColumnFilter,
    reading_order: ReadingOrder,
    render_timeout: Option<Duration>,
}

impl TextExtractorBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose which fragments count as body text.
    pub fn column_filter(mut self, column_filter: ColumnFilter) -> Self {
        self.column_filter = column_filter;
        self
    }

    /// Choose the order fragments are analysed in.
    pub fn reading_order(mut self, reading_order: ReadingOrder) -> Self {
        self.reading_order = reading_order;
        self
    }

    /// Give up on a renderer that has not reported every page within `timeout`.
    ///
    /// A timeout too large to fit in an [`Instant`] waits without limit.
    pub fn render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = Some(timeout);
        self
    }

    /// Build the extractor configuration.
    pub fn build(self) -> TextExtractor {
        TextExtractor {
            column_filter: self.column_filter,
            reading_order: self.reading_order,
            render_timeout: self.render_timeout,
        }
    }
}

/// Turns rendered text fragments into headings, paragraphs and sentences.
///
/// # Examples
///
/// ```
/// use pdf_reflow::{TextExtractor, TextFragment};
///
/// let fragments = vec![
///     TextFragment::new(0.0, 0.0, 50.0, 10.0, "12px", "Hello"),
///     TextFragment::new(55.0, 0.0, 40.0, 10.0, "12px", "world"),
/// ];
/// let output = TextExtractor::default().extract_fragments(fragments);
/// assert_eq!(output.to_string(), "Hello world");
///
/// for block in output.blocks() {
///     println!("{}: {}", block.kind, block.text());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    column_filter: ColumnFilter,
    reading_order: ReadingOrder,
    render_timeout: Option<Duration>,
}

impl TextExtractor {
    /// Create a builder for configuring extraction options.
    pub fn builder() -> TextExtractorBuilder {
        TextExtractorBuilder::new()
    }

    /// Analyse a complete set of fragments for one document.
    pub fn extract_fragments(&self, mut fragments: Vec<TextFragment>) -> TextOutput {
        self.reading_order.apply(&mut fragments);
        let bounds = estimate_bounds(&fragments);
        let blocks = reconstruct_with(&fragments, &bounds, self.column_filter);
        TextOutput::new(bounds, blocks)
    }

    /// Render `doc` and analyse its text once every page has reported.
    pub fn extract<R: Renderer>(
        &self,
        renderer: &mut R,
        doc: &R::Document,
    ) -> Result<TextOutput, ExtractError> {
        let page_count = renderer.page_count(doc);
        let mut collector = TextLayerCollector::new(page_count);
        let (events, receiver) = RenderEvents::channel();

        debug!("rendering {} pages", page_count);
        renderer.render(doc, events)?;

        let deadline = self
            .render_timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));
        let fragments = loop {
            if let Some(fragments) = collector.take() {
                break fragments;
            }

            let event = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    receiver.recv_timeout(remaining).map_err(|e| {
                        if let RecvTimeoutError::Timeout = e {
                            warn!("timed out waiting for text layers");
                        }
                    })
                }
                None => receiver.recv().map_err(|_| ()),
            };

            let Ok(event) = event else {
                return Err(ExtractError::IncompleteRender {
                    rendered: collector.rendered(),
                    expected: collector.page_count(),
                });
            };

            let fragments = collector.on_text_layer_rendered(event.page, event.fragments);
            if let Some(fragments) = fragments {
                break fragments;
            }
        };

        Ok(self.extract_fragments(fragments))
    }
}

/// Analyse fragments using default settings.
///
/// This is a convenience function equivalent to
/// `TextExtractor::default().extract_fragments(fragments)`.
pub fn from_fragments(fragments: Vec<TextFragment>) -> TextOutput {
    TextExtractor::default().extract_fragments(fragments)
}

/// Render `doc` and return its reflowed text using default settings.
pub fn extract_text<R: Renderer>(
    renderer: &mut R,
    doc: &R::Document,
) -> Result<String, ExtractError> {
    Ok(TextExtractor::default().extract(renderer, doc)?.to_text())
}
