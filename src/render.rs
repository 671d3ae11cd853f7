use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::types::TextFragment;

/// A rendering engine able to produce positioned text fragments for a document.
///
/// Nothing downstream runs until every page has reported its text layer
/// through [`RenderEvents`]; [`TextLayerCollector`] does that bookkeeping.
pub trait Renderer {
    type Document;

    /// Number of pages the document declares.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Start rendering `doc`.
    ///
    /// Implementations call [`RenderEvents::text_layer_rendered`] once per
    /// finished page, either before returning or later from another thread.
    fn render(&mut self, doc: &Self::Document, events: RenderEvents) -> Result<(), ExtractError>;
}

#[derive(Debug)]
pub(crate) struct TextLayerRendered {
    pub(crate) page: usize,
    pub(crate) fragments: Vec<TextFragment>,
}

/// Handle a renderer uses to report finished pages. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RenderEvents {
    sender: Sender<TextLayerRendered>,
}

impl RenderEvents {
    pub(crate) fn channel() -> (RenderEvents, Receiver<TextLayerRendered>) {
        let (sender, receiver) = mpsc::channel();
        (RenderEvents { sender }, receiver)
    }

    /// Report that the text layer of `page` (zero-based) is complete.
    ///
    /// Returns `false` when nobody is listening any more.
    pub fn text_layer_rendered(&self, page: usize, fragments: Vec<TextFragment>) -> bool {
        self.sender
            .send(TextLayerRendered { page, fragments })
            .is_ok()
    }
}

/// Gathers per-page text layers until the whole document is available.
#[derive(Debug)]
pub struct TextLayerCollector {
    page_count: usize,
    pages: BTreeMap<usize, Vec<TextFragment>>,
    done: bool,
}

impl TextLayerCollector {
    pub fn new(page_count: usize) -> Self {
        TextLayerCollector {
            page_count,
            pages: BTreeMap::new(),
            done: false,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Number of distinct pages reported so far.
    pub fn rendered(&self) -> usize {
        self.pages.len()
    }

    pub fn is_complete(&self) -> bool {
        self.done || self.pages.len() == self.page_count
    }

    /// Record a finished page.
    ///
    /// Returns every fragment of the document, in page order, the first time
    /// the last missing page arrives; `None` otherwise.
    pub fn on_text_layer_rendered(
        &mut self,
        page: usize,
        fragments: Vec<TextFragment>,
    ) -> Option<Vec<TextFragment>> {
        if self.done {
            warn!("page {} rendered after the document was complete", page);
            return None;
        }
        if page >= self.page_count {
            warn!("page {} is out of range ({})", page, self.page_count);
            return None;
        }

        debug!("page {} rendered with {} fragments", page, fragments.len());
        if self.pages.insert(page, fragments).is_some() {
            warn!("page {} rendered twice, keeping the latest", page);
        }

        self.take()
    }

    /// Hand over the collected fragments if the document is complete and has
    /// not been handed over yet. A zero-page document is complete from the start.
    pub fn take(&mut self) -> Option<Vec<TextFragment>> {
        if self.done || !self.is_complete() {
            return None;
        }
        self.done = true;
        Some(
            std::mem::take(&mut self.pages)
                .into_values()
                .flatten()
                .collect(),
        )
    }
}
