use std::thread;
use std::time::Duration;

use pdf_reflow::{ExtractError, RenderEvents, Renderer, TextExtractor, TextFragment};

/// Stands in for a real viewer: reports each page from a worker thread.
struct PagedRenderer;

impl Renderer for PagedRenderer {
    type Document = Vec<Vec<TextFragment>>;

    fn page_count(&self, doc: &Self::Document) -> usize {
        doc.len()
    }

    fn render(
        &mut self,
        doc: &Self::Document,
        events: RenderEvents,
    ) -> Result<(), ExtractError> {
        let pages = doc.clone();
        thread::spawn(move || {
            for (page, fragments) in pages.into_iter().enumerate().rev() {
                events.text_layer_rendered(page, fragments);
            }
        });
        Ok(())
    }
}

fn document() -> Vec<Vec<TextFragment>> {
    vec![
        vec![
            TextFragment::new(72.0, 60.0, 260.0, 24.0, "24px", "A short article"),
            TextFragment::new(72.0, 110.0, 300.0, 12.0, "12px", "Fragments come in"),
            TextFragment::new(72.0, 124.0, 300.0, 12.0, "12px", "from the ren-"),
            TextFragment::new(72.0, 138.0, 300.0, 12.0, "12px", "derer. Each one"),
            TextFragment::new(72.0, 152.0, 180.0, 12.0, "12px", "has a position and a"),
            TextFragment::new(254.0, 152.0, 60.0, 12.0, "12.4px", "size."),
            TextFragment::new(30.0, 780.0, 12.0, 12.0, "10px", "1"),
        ],
        vec![
            TextFragment::new(72.0, 860.0, 200.0, 18.0, "18px", "Second page"),
            TextFragment::new(72.0, 900.0, 300.0, 12.0, "12px", "Headings start where"),
            TextFragment::new(72.0, 914.0, 300.0, 12.0, "12px", "the type grows."),
            TextFragment::new(30.0, 1580.0, 12.0, 12.0, "10px", "2"),
        ],
    ]
}

fn main() {
    simple_logger::SimpleLogger::new().init().unwrap();

    let extractor = TextExtractor::builder()
        .render_timeout(Duration::from_secs(5))
        .build();

    match extractor.extract(&mut PagedRenderer, &document()) {
        Ok(output) => {
            println!("=== Bounds ===\n");
            println!("{}", output.bounds());

            println!("\n=== Blocks ===\n");
            for (idx, block) in output.blocks().iter().enumerate() {
                let label = format!("{} {:?}", block.kind, block.font_size);
                println!("Block {} ({}): {:?}", idx, label, block.text());
            }

            println!("\n=== Text ===\n");
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error extracting text: {}", e);
            std::process::exit(1);
        }
    }
}
