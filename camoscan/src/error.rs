use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the camoscan pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be decoded or does not describe a valid image.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An output artifact could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
