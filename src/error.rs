use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse fragment input: {0}")]
    FragmentInput(#[from] serde_json::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("table on pages {first_page}-{last_page} is too ambiguous (confidence={confidence:.2})")]
    AmbiguousTable {
        first_page: u32,
        last_page: u32,
        confidence: f32,
    },
}
