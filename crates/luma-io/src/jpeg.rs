//! JPEG format support.
//!
//! Reading via [`jpeg_decoder`], writing via [`jpeg_encoder`]. JPEG decodes
//! to red-green-blue order, so buffers produced here carry
//! [`ChannelOrder::Rgb`]; grayscale sources are expanded to RGB so the
//! pipeline always sees three channels.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use luma_io::jpeg;
//!
//! let image = jpeg::read("photo.jpg")?;
//! jpeg::write("output.jpg", &image)?;
//! ```
//!
//! # With quality control
//!
//! ```rust,ignore
//! use luma_io::jpeg::{JpegWriter, JpegWriterOptions};
//! use luma_io::ImageWriter;
//!
//! let writer = JpegWriter::with_options(JpegWriterOptions { quality: 95 });
//! writer.write("highq.jpg", &image)?;
//! ```

use std::io::{BufReader, Cursor};
use std::path::Path;

use luma_core::{ChannelOrder, ImageBuffer};

use crate::{ImageReader, ImageWriter, IoError, IoResult};

// === Writer Options ===

/// Options for writing JPEG files.
#[derive(Debug, Clone)]
pub struct JpegWriterOptions {
    /// Quality level 1-100. Higher = better quality, larger files.
    /// Default: 90.
    pub quality: u8,
}

impl Default for JpegWriterOptions {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

// === JpegReader ===

/// JPEG file reader.
///
/// Decodes baseline and progressive JPEG; grayscale input is expanded to
/// RGB, CMYK is converted. The returned buffer is always 3-channel RGB.
#[derive(Debug, Clone, Default)]
pub struct JpegReader;

impl JpegReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }

    fn read_impl<R: std::io::Read>(&self, reader: R) -> IoResult<ImageBuffer> {
        let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(reader));
        let pixels = decoder
            .decode()
            .map_err(|e| IoError::DecodeError(e.to_string()))?;

        let info = decoder
            .info()
            .ok_or_else(|| IoError::DecodeError("missing JPEG frame info".into()))?;

        let rgb = match info.pixel_format {
            jpeg_decoder::PixelFormat::RGB24 => pixels,
            jpeg_decoder::PixelFormat::L8 => {
                pixels.iter().flat_map(|&l| [l, l, l]).collect()
            }
            jpeg_decoder::PixelFormat::CMYK32 => pixels
                .chunks_exact(4)
                .flat_map(|px| {
                    let k = px[3] as u16;
                    [
                        (px[0] as u16 * k / 255) as u8,
                        (px[1] as u16 * k / 255) as u8,
                        (px[2] as u16 * k / 255) as u8,
                    ]
                })
                .collect(),
            other => {
                return Err(IoError::DecodeError(format!(
                    "unsupported JPEG pixel format: {:?}",
                    other
                )));
            }
        };

        Ok(ImageBuffer::from_raw(
            info.width as u32,
            info.height as u32,
            3,
            ChannelOrder::Rgb,
            rgb,
        )?)
    }
}

impl ImageReader for JpegReader {
    /// Reads a JPEG file from disk.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<ImageBuffer> {
        let data = std::fs::read(path.as_ref())?;
        self.read_impl(Cursor::new(&data))
    }

    /// Reads a JPEG from a byte slice.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<ImageBuffer> {
        self.read_impl(Cursor::new(data))
    }
}

// === JpegWriter ===

/// JPEG file writer.
///
/// Single-channel buffers encode as luma-only JPEG, color buffers as RGB
/// (blue-green-red input is swapped on the way out).
#[derive(Debug, Clone, Default)]
pub struct JpegWriter {
    options: JpegWriterOptions,
}

impl JpegWriter {
    /// Creates a new writer with default options (quality 90).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with custom options.
    pub fn with_options(options: JpegWriterOptions) -> Self {
        Self { options }
    }

    fn write_impl(&self, image: &ImageBuffer) -> IoResult<Vec<u8>> {
        use jpeg_encoder::{ColorType, Encoder};

        let (color_type, pixel_data) = match image.channels {
            1 => (ColorType::Luma, image.data.clone()),
            3 | 4 => {
                let c = image.channels as usize;
                let rgb: Vec<u8> = image
                    .data
                    .chunks_exact(c)
                    .flat_map(|px| match image.order {
                        ChannelOrder::Rgb => [px[0], px[1], px[2]],
                        ChannelOrder::Bgr => [px[2], px[1], px[0]],
                    })
                    .collect();
                (ColorType::Rgb, rgb)
            }
            c => {
                return Err(IoError::EncodeError(format!(
                    "unsupported channel count: {}",
                    c
                )));
            }
        };

        let mut buffer = Vec::new();
        let encoder = Encoder::new(&mut buffer, self.options.quality);
        encoder
            .encode(
                &pixel_data,
                image.width as u16,
                image.height as u16,
                color_type,
            )
            .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

        Ok(buffer)
    }
}

impl ImageWriter for JpegWriter {
    /// Writes a JPEG file to disk.
    fn write<P: AsRef<Path>>(&self, path: P, image: &ImageBuffer) -> IoResult<()> {
        let data = self.write_to_memory(image)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }

    /// Writes a JPEG to a byte vector.
    fn write_to_memory(&self, image: &ImageBuffer) -> IoResult<Vec<u8>> {
        self.write_impl(image)
    }
}

// === Convenience Functions ===

/// Reads a JPEG file with default options.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuffer> {
    JpegReader::new().read(path)
}

/// Writes a JPEG file with default options (quality 90).
pub fn write<P: AsRef<Path>>(path: P, image: &ImageBuffer) -> IoResult<()> {
    JpegWriter::new().write(path, image)
}

// === Tests ===

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> ImageBuffer {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 8) as u8);
                data.push((y * 8) as u8);
                data.push(128);
            }
        }
        ImageBuffer::from_raw(width, height, 3, ChannelOrder::Rgb, data).unwrap()
    }

    /// Dimensions survive a lossy round-trip.
    #[test]
    fn test_roundtrip_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.jpg");

        let image = gradient(32, 24);
        write(&path, &image).unwrap();
        let loaded = read(&path).unwrap();

        assert_eq!(loaded.width, 32);
        assert_eq!(loaded.height, 24);
        assert_eq!(loaded.channels, 3);
        assert_eq!(loaded.order, ChannelOrder::Rgb);
    }

    #[test]
    fn test_memory_roundtrip() {
        let image = gradient(16, 16);

        let bytes = JpegWriter::new().write_to_memory(&image).unwrap();
        let loaded = JpegReader::new().read_from_memory(&bytes).unwrap();

        assert_eq!(loaded.width, 16);
        assert_eq!(loaded.height, 16);
    }

    /// Grayscale output encodes as luma and decodes back to expanded RGB.
    #[test]
    fn test_gray_write() {
        let gray = ImageBuffer::gray(16, 16, vec![128; 256]).unwrap();

        let bytes = JpegWriter::new().write_to_memory(&gray).unwrap();
        let loaded = JpegReader::new().read_from_memory(&bytes).unwrap();

        assert_eq!(loaded.width, 16);
        assert_eq!(loaded.height, 16);
        assert_eq!(loaded.channels, 3);
    }

    #[test]
    fn test_quality_affects_size() {
        let image = gradient(32, 32);

        let low = JpegWriter::with_options(JpegWriterOptions { quality: 40 })
            .write_to_memory(&image)
            .unwrap();
        let high = JpegWriter::with_options(JpegWriterOptions { quality: 99 })
            .write_to_memory(&image)
            .unwrap();

        assert!(high.len() >= low.len());
    }

    #[test]
    fn test_garbage_input_rejected() {
        let err = JpegReader::new()
            .read_from_memory(&[0u8; 64])
            .unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }

    /// BGR buffers are swapped on encode so red stays red on disk.
    #[test]
    fn test_bgr_swap_on_write() {
        // A solid red 8x8: BGR bytes (0, 0, 255).
        let data: Vec<u8> = (0..64).flat_map(|_| [0u8, 0, 255]).collect();
        let image = ImageBuffer::from_raw(8, 8, 3, ChannelOrder::Bgr, data).unwrap();

        let bytes = JpegWriter::new().write_to_memory(&image).unwrap();
        let loaded = JpegReader::new().read_from_memory(&bytes).unwrap();

        // Decoded RGB: red channel dominates.
        let px = &loaded.data[0..3];
        assert!(px[0] > 200 && px[1] < 60 && px[2] < 60);
    }
}
