use std::fmt::Formatter;

#[derive(Debug)]
pub enum ExtractError {
    /// The renderer stopped (or timed out) before every page reported its text layer.
    IncompleteRender {
        rendered: usize,
        expected: usize,
    },
    RendererError(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            ExtractError::IncompleteRender { rendered, expected } => write!(
                f,
                "Rendering incomplete: {} of {} pages reported text",
                rendered, expected
            ),
            ExtractError::RendererError(e) => write!(f, "Renderer error: {}", e),
            ExtractError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::IoError(e)
    }
}
