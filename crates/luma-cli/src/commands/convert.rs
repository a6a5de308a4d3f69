//! Grayscale conversion command.
//!
//! The end-to-end flow: decode, acquire the GPU, run the luminance kernel,
//! encode. Output lands next to the input with a `_gray` suffix unless a
//! path is given, and stays in the input's format family.

use crate::ConvertArgs;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use luma_core::ImageBuffer;
use luma_gpu::{pipeline, GpuContext};
use luma_io::jpeg::{JpegWriter, JpegWriterOptions};
use luma_io::{Format, ImageWriter};

/// Runs the convert command.
pub fn run(args: ConvertArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    info!(
        input = %args.input.display(),
        width = image.width,
        height = image.height,
        channels = image.channels,
        "loaded image"
    );

    if verbose {
        println!(
            "Input: {} ({}x{}, {} channels, {})",
            args.input.display(),
            image.width,
            image.height,
            image.channels,
            image.order.name()
        );
    }

    if image.is_gray() {
        bail!(
            "{} is already single-channel; nothing to convert",
            args.input.display()
        );
    }

    let ctx = GpuContext::new().context("Failed to acquire a compute device")?;
    if verbose {
        println!(
            "Device: {} ({:?})",
            ctx.device_name(),
            ctx.backend()
        );
    }

    let gray_bytes = pipeline::to_grayscale(&ctx, &image)
        .context("Grayscale pipeline failed")?;
    let gray = ImageBuffer::gray(image.width, image.height, gray_bytes)
        .context("Pipeline returned a malformed buffer")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    debug!(output = %output.display(), "encoding result");

    match Format::from_extension(&output) {
        Format::Jpeg => JpegWriter::with_options(JpegWriterOptions {
            quality: args.quality,
        })
        .write(&output, &gray)
        .with_context(|| format!("Failed to save: {}", output.display()))?,
        _ => super::save_image(&output, &gray)?,
    }

    println!("Grayscale image written to {}", output.display());
    Ok(())
}

/// `photo.jpg` -> `photo_gray.jpg`, keeping the input's format family.
fn default_output(input: &PathBuf) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bmp");
    input.with_file_name(format!("{stem}_gray.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_keeps_extension() {
        assert_eq!(
            default_output(&PathBuf::from("/tmp/photo.jpg")),
            PathBuf::from("/tmp/photo_gray.jpg")
        );
        assert_eq!(
            default_output(&PathBuf::from("scan.bmp")),
            PathBuf::from("scan_gray.bmp")
        );
    }
}
