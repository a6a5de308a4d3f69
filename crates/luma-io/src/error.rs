//! Error types for I/O operations.
//!
//! Unified error handling for both image formats. Signature and
//! compression failures are distinct variants so callers can rely on a
//! malformed file being rejected before any device resource is touched.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported or undetected format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Wrong signature or otherwise corrupted file.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// Compressed BMP data (only uncompressed is supported).
    #[error("unsupported BMP compression mode: {0}")]
    UnsupportedCompression(u32),

    /// Bit depth outside the supported set.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Decoded data failed pixel-buffer validation.
    #[error(transparent)]
    Image(#[from] luma_core::ImageError),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
