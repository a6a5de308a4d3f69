//! I/O traits for image readers and writers.
//!
//! These traits define the interface the format-specific codecs implement.

use crate::IoResult;
use luma_core::ImageBuffer;
use std::path::Path;

/// Trait for image format readers.
pub trait ImageReader {
    /// Reads an image from a file path.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<ImageBuffer>;

    /// Reads an image from memory.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<ImageBuffer>;
}

/// Trait for image format writers.
pub trait ImageWriter {
    /// Writes an image to a file path.
    fn write<P: AsRef<Path>>(&self, path: P, image: &ImageBuffer) -> IoResult<()>;

    /// Writes an image to memory.
    fn write_to_memory(&self, image: &ImageBuffer) -> IoResult<Vec<u8>>;
}
