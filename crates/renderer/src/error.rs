//! Error types for encoding and writing images.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown colour map: {0}")]
    UnknownPalette(String),

    #[error("Band shapes differ: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    #[error("Unsupported image format for path: {0}")]
    UnsupportedFormat(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Image write failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
