//! Owned pixel buffer container.
//!
//! [`ImageBuffer`] is the format-agnostic container handed between the
//! codecs and the compute pipeline: a contiguous, row-major, interleaved
//! 8-bit buffer plus the dimensions and channel order that describe it.

use crate::error::{ImageError, Result};

/// Byte order of interleaved color data.
///
/// Codecs produce buffers in their native order (BMP rows are
/// blue-green-red, JPEG decodes to red-green-blue), and the compute kernel
/// has to read the same order or the luminance weights land on the wrong
/// channels. Every decoded [`ImageBuffer`] carries the order of its data;
/// single-channel buffers ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Blue, green, red (+ alpha for 4-channel data).
    #[default]
    Bgr,
    /// Red, green, blue (+ alpha for 4-channel data).
    Rgb,
}

impl ChannelOrder {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bgr => "BGR",
            Self::Rgb => "RGB",
        }
    }
}

/// Contiguous interleaved 8-bit image buffer.
///
/// Invariant: `data.len() == width * height * channels`, with positive
/// dimensions and 1, 3 or 4 channels. [`ImageBuffer::from_raw`] enforces
/// this at construction so downstream code can index freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of interleaved channels (1, 3 or 4).
    pub channels: u32,
    /// Channel order of the data. Ignored when `channels == 1`.
    pub order: ChannelOrder,
    /// Raw pixel data, row-major, `width * height * channels` bytes.
    pub data: Vec<u8>,
}

impl ImageBuffer {
    /// Creates a buffer from raw pixel data, validating the invariants.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u32,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions(width, height));
        }
        if !matches!(channels, 1 | 3 | 4) {
            return Err(ImageError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            order,
            data,
        })
    }

    /// Creates a single-channel grayscale buffer.
    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, 1, ChannelOrder::default(), data)
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total number of bytes (`pixels * channels`).
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    /// True for single-channel data.
    pub fn is_gray(&self) -> bool {
        self.channels == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_valid() {
        let img = ImageBuffer::from_raw(4, 2, 3, ChannelOrder::Bgr, vec![0; 24]).unwrap();
        assert_eq!(img.pixel_count(), 8);
        assert_eq!(img.byte_len(), 24);
        assert!(!img.is_gray());
    }

    #[test]
    fn test_from_raw_size_mismatch() {
        let err = ImageBuffer::from_raw(4, 2, 3, ChannelOrder::Bgr, vec![0; 23]).unwrap_err();
        assert!(matches!(
            err,
            ImageError::SizeMismatch {
                expected: 24,
                actual: 23
            }
        ));
    }

    #[test]
    fn test_from_raw_zero_dimension() {
        let err = ImageBuffer::from_raw(0, 2, 3, ChannelOrder::Bgr, vec![]).unwrap_err();
        assert!(matches!(err, ImageError::InvalidDimensions(0, 2)));
    }

    #[test]
    fn test_from_raw_bad_channels() {
        let err = ImageBuffer::from_raw(2, 2, 2, ChannelOrder::Bgr, vec![0; 8]).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedChannels(2)));
    }

    #[test]
    fn test_gray_constructor() {
        let img = ImageBuffer::gray(3, 3, vec![7; 9]).unwrap();
        assert!(img.is_gray());
        assert_eq!(img.byte_len(), 9);
    }
}
