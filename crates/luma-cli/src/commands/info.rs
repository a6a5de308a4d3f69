//! Image information command.

use crate::InfoArgs;
use anyhow::Result;
use tracing::trace;

use luma_io::Format;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    for path in &args.input {
        trace!(path = %path.display(), "info::run");

        let format = Format::detect(path)?;
        let image = super::load_image(path)?;

        println!(
            "{}: {}x{}, {} channel(s), {}, {:?}",
            path.display(),
            image.width,
            image.height,
            image.channels,
            image.order.name(),
            format
        );
        if verbose {
            println!(
                "  {} pixels, {} bytes decoded",
                image.pixel_count(),
                image.byte_len()
            );
        }
    }
    Ok(())
}
