//! Error types for core buffer operations.

use thiserror::Error;

/// Result type alias using [`ImageError`] as the error type.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors that can occur when constructing or validating pixel buffers.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Buffer length does not match `width * height * channels`.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// Width or height is zero.
    #[error("invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    /// Channel count is not 1, 3 or 4.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u32),
}
