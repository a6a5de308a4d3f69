//! BMP (Windows bitmap) format support.
//!
//! Uncompressed bitmaps with the classic 14-byte file header plus 40-byte
//! info header: interleaved blue-green-red rows, stored bottom-up and
//! padded to 4-byte boundaries.
//!
//! # Supported layouts
//!
//! | Bit depth | Read | Write | Notes |
//! |-----------|------|-------|-------|
//! | 8-bit | Yes | Yes | Palette-indexed; written with a gray ramp |
//! | 24-bit | Yes | Yes | BGR |
//! | 32-bit | Yes | Yes | BGRA |
//!
//! Compression modes other than `BI_RGB` (0) are rejected. The signature is
//! validated before anything else, so a non-BMP file fails fast with
//! [`IoError::InvalidFile`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use luma_io::bmp;
//!
//! let image = bmp::read("photo.bmp")?;
//! bmp::write("copy.bmp", &image)?;
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use luma_core::{ChannelOrder, ImageBuffer};

use crate::{ImageReader, ImageWriter, IoError, IoResult};

// === Constants ===

/// File signature: "BM".
const SIGNATURE: [u8; 2] = *b"BM";
/// File header size.
const FILE_HEADER_SIZE: u32 = 14;
/// BITMAPINFOHEADER size.
const INFO_HEADER_SIZE: u32 = 40;
/// BI_RGB: no compression.
const COMPRESSION_NONE: u32 = 0;

/// Rows are padded to 4-byte boundaries.
fn row_stride(width: u32, bytes_per_pixel: u32) -> usize {
    ((width as usize * bytes_per_pixel as usize) + 3) & !3
}

// === Header ===

/// Parsed BMP header pair (file header + info header).
#[derive(Debug, Clone)]
struct BmpHeader {
    /// Total file size as declared in the file header.
    #[allow(dead_code)]
    file_size: u32,
    /// Offset from the start of the file to the pixel data.
    data_offset: u32,
    /// Image width in pixels.
    width: u32,
    /// Absolute image height in pixels.
    height: u32,
    /// True when rows are stored top-down (negative declared height).
    top_down: bool,
    /// Bits per pixel (8, 24 or 32).
    bit_count: u16,
    /// Offset of the palette (right after the declared info header).
    palette_offset: u32,
    /// Palette entry count for indexed images.
    palette_len: u32,
    /// Declared image-data byte size (may be zero for BI_RGB).
    #[allow(dead_code)]
    image_size: u32,
}

impl BmpHeader {
    /// Reads and validates the header pair.
    fn read<R: Read + Seek>(reader: &mut R) -> IoResult<Self> {
        let mut signature = [0u8; 2];
        reader
            .read_exact(&mut signature)
            .map_err(|e| IoError::InvalidFile(format!("failed to read BMP signature: {}", e)))?;
        if signature != SIGNATURE {
            return Err(IoError::InvalidFile(format!(
                "bad BMP signature: {:02X} {:02X}",
                signature[0], signature[1]
            )));
        }

        let file_size = reader.read_u32::<LittleEndian>()?;
        reader.seek(SeekFrom::Current(4))?; // reserved fields
        let data_offset = reader.read_u32::<LittleEndian>()?;

        let info_size = reader.read_u32::<LittleEndian>()?;
        if info_size < INFO_HEADER_SIZE {
            return Err(IoError::InvalidFile(format!(
                "info header too small: {} bytes",
                info_size
            )));
        }
        let width_raw = reader.read_i32::<LittleEndian>()?;
        let height_raw = reader.read_i32::<LittleEndian>()?;
        let _planes = reader.read_u16::<LittleEndian>()?;
        let bit_count = reader.read_u16::<LittleEndian>()?;
        let compression = reader.read_u32::<LittleEndian>()?;
        let image_size = reader.read_u32::<LittleEndian>()?;
        reader.seek(SeekFrom::Current(8))?; // pixels-per-meter
        let clr_used = reader.read_u32::<LittleEndian>()?;
        let _clr_important = reader.read_u32::<LittleEndian>()?;

        if compression != COMPRESSION_NONE {
            return Err(IoError::UnsupportedCompression(compression));
        }
        if !matches!(bit_count, 8 | 24 | 32) {
            return Err(IoError::UnsupportedBitDepth(bit_count));
        }
        if width_raw <= 0 || height_raw == 0 {
            return Err(IoError::InvalidFile(format!(
                "invalid dimensions: {}x{}",
                width_raw, height_raw
            )));
        }

        let palette_len = if bit_count == 8 {
            let len = if clr_used == 0 { 256 } else { clr_used };
            if len > 256 {
                return Err(IoError::InvalidFile(format!(
                    "palette declares {} entries",
                    len
                )));
            }
            len
        } else {
            0
        };

        Ok(Self {
            file_size,
            data_offset,
            width: width_raw as u32,
            height: height_raw.unsigned_abs(),
            top_down: height_raw < 0,
            bit_count,
            palette_offset: FILE_HEADER_SIZE + info_size,
            palette_len,
            image_size,
        })
    }
}

// === Writer Options ===

/// Options for writing BMP files.
///
/// Currently empty; the bit depth is derived from the image's channel
/// count (1 → 8-bit indexed, 3 → 24-bit, 4 → 32-bit).
#[derive(Debug, Clone, Default)]
pub struct BmpWriterOptions {
    /// Reserved for future use.
    _reserved: (),
}

// === BmpReader ===

/// BMP file reader.
///
/// Produces top-down interleaved buffers in the format's native
/// blue-green-red order; indexed 8-bit images are expanded through their
/// palette.
#[derive(Debug, Clone, Default)]
pub struct BmpReader;

impl BmpReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }

    fn read_impl<R: Read + Seek>(&self, reader: &mut R) -> IoResult<ImageBuffer> {
        let header = BmpHeader::read(reader)?;

        // Palette sits between the info header and the pixel data.
        let palette = if header.palette_len > 0 {
            reader.seek(SeekFrom::Start(header.palette_offset as u64))?;
            let mut entries = Vec::with_capacity(header.palette_len as usize);
            for _ in 0..header.palette_len {
                let mut bgra = [0u8; 4];
                reader.read_exact(&mut bgra)?;
                entries.push([bgra[0], bgra[1], bgra[2]]);
            }
            entries
        } else {
            Vec::new()
        };

        reader.seek(SeekFrom::Start(header.data_offset as u64))?;

        let src_bpp = (header.bit_count / 8) as u32;
        let channels = match header.bit_count {
            8 => 3, // palette expands to BGR
            24 => 3,
            32 => 4,
            _ => unreachable!(),
        };
        let stride = row_stride(header.width, src_bpp);
        let row_bytes = header.width as usize * src_bpp as usize;
        let out_row_bytes = header.width as usize * channels as usize;

        let mut data = vec![0u8; header.height as usize * out_row_bytes];
        let mut row = vec![0u8; stride];
        for y in 0..header.height as usize {
            reader
                .read_exact(&mut row)
                .map_err(|e| IoError::DecodeError(format!("truncated pixel data: {}", e)))?;
            let dst_y = if header.top_down {
                y
            } else {
                header.height as usize - 1 - y
            };
            let dst = &mut data[dst_y * out_row_bytes..(dst_y + 1) * out_row_bytes];

            if header.bit_count == 8 {
                for (x, &index) in row[..row_bytes].iter().enumerate() {
                    let entry = palette.get(index as usize).ok_or_else(|| {
                        IoError::DecodeError(format!("palette index {} out of range", index))
                    })?;
                    dst[x * 3..x * 3 + 3].copy_from_slice(entry);
                }
            } else {
                dst.copy_from_slice(&row[..row_bytes]);
            }
        }

        Ok(ImageBuffer::from_raw(
            header.width,
            header.height,
            channels,
            ChannelOrder::Bgr,
            data,
        )?)
    }
}

impl ImageReader for BmpReader {
    /// Reads a BMP file from disk.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<ImageBuffer> {
        let data = std::fs::read(path.as_ref())?;
        self.read_impl(&mut Cursor::new(&data))
    }

    /// Reads a BMP from a byte slice.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<ImageBuffer> {
        self.read_impl(&mut Cursor::new(data))
    }
}

// === BmpWriter ===

/// BMP file writer.
///
/// Grayscale buffers are written as 8-bit indexed files with a 256-entry
/// gray ramp palette and the same dimensions as the source; color buffers
/// are written at 24 or 32 bits in blue-green-red order.
#[derive(Debug, Clone, Default)]
pub struct BmpWriter {
    #[allow(dead_code)]
    options: BmpWriterOptions,
}

impl BmpWriter {
    /// Creates a new writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with custom options.
    pub fn with_options(options: BmpWriterOptions) -> Self {
        Self { options }
    }

    fn write_impl(&self, image: &ImageBuffer) -> IoResult<Vec<u8>> {
        let bit_count: u16 = match image.channels {
            1 => 8,
            3 => 24,
            4 => 32,
            c => return Err(IoError::EncodeError(format!("unsupported channel count: {}", c))),
        };
        let bpp = (bit_count / 8) as u32;
        let palette_bytes = if bit_count == 8 { 256 * 4 } else { 0 };
        let stride = row_stride(image.width, bpp);
        let image_size = (stride * image.height as usize) as u32;
        let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + palette_bytes;
        let file_size = data_offset + image_size;

        let mut out = Vec::with_capacity(file_size as usize);

        // File header
        out.write_all(&SIGNATURE)?;
        out.write_u32::<LittleEndian>(file_size)?;
        out.write_u16::<LittleEndian>(0)?;
        out.write_u16::<LittleEndian>(0)?;
        out.write_u32::<LittleEndian>(data_offset)?;

        // Info header
        out.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
        out.write_i32::<LittleEndian>(image.width as i32)?;
        out.write_i32::<LittleEndian>(image.height as i32)?; // bottom-up
        out.write_u16::<LittleEndian>(1)?; // planes
        out.write_u16::<LittleEndian>(bit_count)?;
        out.write_u32::<LittleEndian>(COMPRESSION_NONE)?;
        out.write_u32::<LittleEndian>(image_size)?;
        out.write_i32::<LittleEndian>(2835)?; // 72 DPI in pixels/meter
        out.write_i32::<LittleEndian>(2835)?;
        out.write_u32::<LittleEndian>(if bit_count == 8 { 256 } else { 0 })?;
        out.write_u32::<LittleEndian>(0)?;

        // Gray ramp palette for indexed output
        if bit_count == 8 {
            for i in 0..=255u8 {
                out.write_all(&[i, i, i, 0])?;
            }
        }

        // Rows bottom-up, padded to the stride
        let row_bytes = image.width as usize * image.channels as usize;
        let padding = vec![0u8; stride - row_bytes];
        let swap_rb = image.channels >= 3 && image.order == ChannelOrder::Rgb;
        for y in (0..image.height as usize).rev() {
            let row = &image.data[y * row_bytes..(y + 1) * row_bytes];
            if swap_rb {
                let mut px = row.to_vec();
                for chunk in px.chunks_exact_mut(image.channels as usize) {
                    chunk.swap(0, 2);
                }
                out.write_all(&px)?;
            } else {
                out.write_all(row)?;
            }
            out.write_all(&padding)?;
        }

        Ok(out)
    }
}

impl ImageWriter for BmpWriter {
    /// Writes a BMP file to disk.
    fn write<P: AsRef<Path>>(&self, path: P, image: &ImageBuffer) -> IoResult<()> {
        let data = self.write_to_memory(image)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }

    /// Writes a BMP to a byte vector.
    fn write_to_memory(&self, image: &ImageBuffer) -> IoResult<Vec<u8>> {
        self.write_impl(image)
    }
}

// === Convenience Functions ===

/// Reads a BMP file with default options.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuffer> {
    BmpReader::new().read(path)
}

/// Writes a BMP file with default options.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageBuffer) -> IoResult<()> {
    BmpWriter::new().write(path, image)
}

// === Tests ===

#[cfg(test)]
mod tests {
    use super::*;

    fn bgr_image(width: u32, height: u32) -> ImageBuffer {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 40) as u8);
                data.push((y * 40) as u8);
                data.push(200);
            }
        }
        ImageBuffer::from_raw(width, height, 3, ChannelOrder::Bgr, data).unwrap()
    }

    /// 24-bit round-trip, including a width whose rows need padding.
    #[test]
    fn test_color_roundtrip_with_padding() {
        for width in [3u32, 4, 5] {
            let image = bgr_image(width, 4);
            let bytes = BmpWriter::new().write_to_memory(&image).unwrap();
            let loaded = BmpReader::new().read_from_memory(&bytes).unwrap();

            assert_eq!(loaded.width, width);
            assert_eq!(loaded.height, 4);
            assert_eq!(loaded.channels, 3);
            assert_eq!(loaded.order, ChannelOrder::Bgr);
            assert_eq!(loaded.data, image.data);
        }
    }

    /// Grayscale output goes through the 8-bit indexed path.
    #[test]
    fn test_gray_roundtrip() {
        let gray = ImageBuffer::gray(5, 3, (0..15u8).collect()).unwrap();
        let bytes = BmpWriter::new().write_to_memory(&gray).unwrap();

        let loaded = BmpReader::new().read_from_memory(&bytes).unwrap();
        // The gray ramp palette maps every index onto itself.
        assert_eq!(loaded.width, 5);
        assert_eq!(loaded.height, 3);
        assert_eq!(loaded.channels, 3);
        for (i, px) in loaded.data.chunks_exact(3).enumerate() {
            assert_eq!(px, [i as u8, i as u8, i as u8]);
        }
    }

    #[test]
    fn test_declared_sizes_are_consistent() {
        let gray = ImageBuffer::gray(5, 3, vec![9; 15]).unwrap();
        let bytes = BmpWriter::new().write_to_memory(&gray).unwrap();

        let mut cursor = Cursor::new(&bytes);
        let header = BmpHeader::read(&mut cursor).unwrap();
        assert_eq!(header.file_size as usize, bytes.len());
        assert_eq!(header.bit_count, 8);
        assert_eq!(header.data_offset, 14 + 40 + 1024);
        // 5 bytes per row padded to 8
        assert_eq!(header.image_size, 8 * 3);
    }

    #[test]
    fn test_bad_signature_rejected() {
        let err = BmpReader::new()
            .read_from_memory(b"XX not a bitmap at all")
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidFile(_)));
    }

    #[test]
    fn test_compressed_file_rejected() {
        let gray = ImageBuffer::gray(2, 2, vec![0; 4]).unwrap();
        let mut bytes = BmpWriter::new().write_to_memory(&gray).unwrap();
        // Patch the compression field (offset 14 + 16).
        bytes[30] = 1;
        let err = BmpReader::new().read_from_memory(&bytes).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedCompression(1)));
    }

    #[test]
    fn test_truncated_pixel_data_rejected() {
        let image = bgr_image(4, 4);
        let mut bytes = BmpWriter::new().write_to_memory(&image).unwrap();
        bytes.truncate(bytes.len() - 10);
        let err = BmpReader::new().read_from_memory(&bytes).unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.bmp");

        let image = bgr_image(6, 2);
        write(&path, &image).unwrap();
        let loaded = read(&path).unwrap();

        assert_eq!(loaded.data, image.data);
    }

    #[test]
    fn test_rgb_buffer_swapped_on_write() {
        // One red pixel declared RGB; on disk BMP stores BGR.
        let image =
            ImageBuffer::from_raw(1, 1, 3, ChannelOrder::Rgb, vec![255, 0, 0]).unwrap();
        let bytes = BmpWriter::new().write_to_memory(&image).unwrap();
        let loaded = BmpReader::new().read_from_memory(&bytes).unwrap();
        // Reader reports BGR: blue=0, green=0, red=255.
        assert_eq!(loaded.data, vec![0, 0, 255]);
    }
}
