//! # luma-io
//!
//! Image I/O for the luma pipeline.
//!
//! Reading and writing of the two formats the pipeline supports:
//!
//! - **JPEG** - via `jpeg-decoder` / `jpeg-encoder`; decodes to RGB order
//! - **BMP** - manual fixed-layout codec; decodes to BGR order
//!
//! # Architecture
//!
//! - [`ImageReader`] / [`ImageWriter`] - traits the codecs implement
//! - [`read`] / [`write`] - high-level functions with format auto-detection
//! - [`Format`] - magic-byte detection with extension fallback
//!
//! Every decoded [`ImageBuffer`] carries the [`ChannelOrder`] of its data;
//! the compute kernel downstream is selected to match, so the luminance
//! weights always land on the right channels.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use luma_io::{read, write};
//!
//! let image = read("input.bmp")?;
//! // ... convert ...
//! write("output.bmp", &gray)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;
mod traits;

pub mod bmp;
pub mod jpeg;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use traits::{ImageReader, ImageWriter};

// Re-exported so codec callers get the buffer types from one place.
pub use luma_core::{ChannelOrder, ImageBuffer};

use std::path::Path;
use tracing::debug;

/// Reads an image from a file, auto-detecting the format.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the format is not
/// supported, or the file is corrupted.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuffer> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    debug!(path = %path.display(), ?format, "reading image");

    match format {
        Format::Jpeg => jpeg::read(path),
        Format::Bmp => bmp::read(path),
        Format::Unknown => Err(IoError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )),
    }
}

/// Writes an image to a file, detecting the format from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be created or the format is not
/// supported for writing.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageBuffer) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);
    debug!(path = %path.display(), ?format, "writing image");

    match format {
        Format::Jpeg => jpeg::write(path, image),
        Format::Bmp => bmp::write(path, image),
        Format::Unknown => Err(IoError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )),
    }
}
