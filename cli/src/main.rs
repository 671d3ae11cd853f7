use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use pdf_reflow::{
    ColumnFilter, ExtractError, Part, ReadingOrder, RenderEvents, Renderer, TextExtractor,
    TextFragment,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Reflowed text with one sentence per paragraph
    Plain,
    /// One line per block, tagged with its kind and font size
    Blocks,
    /// Bounds plus every block with its individual parts
    Debug,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColumnArg {
    /// Drop fragments left of the body column
    Left,
    /// Drop fragments left or right of the body column
    LeftRight,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Keep the order fragments appear in the stream
    Emission,
    /// Sort fragments top to bottom, then left to right
    Positional,
}

#[derive(Parser)]
#[command(name = "pdf-reflow")]
#[command(about = "Rebuild paragraphs and sentences from rendered PDF text fragments")]
#[command(long_about = None)]
struct Args {
    /// JSON lines fragment stream; reads stdin when omitted or "-"
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Column filter applied against the dominant edges
    #[arg(long, value_enum, default_value_t = ColumnArg::Left)]
    column_filter: ColumnArg,

    /// Fragment ordering before analysis
    #[arg(long, value_enum, default_value_t = OrderArg::Emission)]
    reading_order: OrderArg,

    /// Give up if the stream does not complete within this many milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Log analysis decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// One line of the fragment stream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FragmentRecord {
    #[serde(default)]
    page: usize,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    font_size: String,
    #[serde(default)]
    text: String,
}

/// A recorded document: fragments grouped by page.
struct RecordedDocument {
    pages: BTreeMap<usize, Vec<TextFragment>>,
}

impl RecordedDocument {
    fn read<R: BufRead>(reader: R) -> Result<RecordedDocument, ExtractError> {
        let mut pages: BTreeMap<usize, Vec<TextFragment>> = BTreeMap::new();
        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: FragmentRecord = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(e) => {
                    let message = format!("line {}: {}", line_idx + 1, e);
                    return Err(ExtractError::RendererError(message));
                }
            };
            pages.entry(record.page).or_default().push(TextFragment::new(
                record.x,
                record.y,
                record.width,
                record.height,
                record.font_size,
                record.text,
            ));
        }
        Ok(RecordedDocument { pages })
    }
}

/// Replays a recorded fragment stream, one completion event per page.
struct ReplayRenderer;

impl Renderer for ReplayRenderer {
    type Document = RecordedDocument;

    fn page_count(&self, doc: &RecordedDocument) -> usize {
        doc.pages.keys().next_back().map_or(0, |&last| last + 1)
    }

    fn render(&mut self, doc: &RecordedDocument, events: RenderEvents) -> Result<(), ExtractError> {
        for page in 0..self.page_count(doc) {
            let fragments = doc.pages.get(&page).cloned().unwrap_or_default();
            tracing::debug!("replaying page {} ({} fragments)", page, fragments.len());
            if !events.text_layer_rendered(page, fragments) {
                return Err(ExtractError::RendererError(
                    "text layer listener went away".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .unwrap();

    let document = match &args.file {
        Some(path) if path.as_os_str() != "-" => File::open(path)
            .map_err(ExtractError::from)
            .and_then(|file| RecordedDocument::read(BufReader::new(file))),
        _ => RecordedDocument::read(io::stdin().lock()),
    };
    let document = match document {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error reading fragments: {}", e);
            std::process::exit(1);
        }
    };

    // Build extractor from the command line options
    let mut builder = TextExtractor::builder()
        .column_filter(match args.column_filter {
            ColumnArg::Left => ColumnFilter::LeftEdge,
            ColumnArg::LeftRight => ColumnFilter::LeftAndRightEdge,
        })
        .reading_order(match args.reading_order {
            OrderArg::Emission => ReadingOrder::Emission,
            OrderArg::Positional => ReadingOrder::Positional,
        });
    if let Some(ms) = args.timeout_ms {
        builder = builder.render_timeout(Duration::from_millis(ms));
    }
    let extractor = builder.build();

    let output = match extractor.extract(&mut ReplayRenderer, &document) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error extracting text: {}", e);
            std::process::exit(1);
        }
    };

    // Print in requested format
    match args.format {
        OutputFormat::Plain => {
            println!("{}", output);
        }
        OutputFormat::Blocks => {
            for block in output.blocks() {
                match block.font_size {
                    Some(size) => println!("[{} {}px] {}", block.kind, size, block.text()),
                    None => println!("[{}] {}", block.kind, block.text()),
                }
            }
        }
        OutputFormat::Debug => {
            println!("Bounds: {}", output.bounds());
            for (block_idx, block) in output.blocks().iter().enumerate() {
                if block.is_empty() {
                    println!("Block {}: (empty)", block_idx);
                    continue;
                }

                println!("Block {}: {} {:?}", block_idx, block.kind, block.font_size);
                for (part_idx, part) in block.parts.iter().enumerate() {
                    match part {
                        Part::Text(text) => println!("  Part {}: {:?}", part_idx, text),
                        Part::Separator => println!("  Part {}: (space)", part_idx),
                    }
                }
            }
        }
    }
}
