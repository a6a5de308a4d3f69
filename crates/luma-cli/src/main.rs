//! luma - GPU grayscale conversion CLI
//!
//! Loads a color image, runs the luminance kernel on the first available
//! GPU, and writes the single-channel result next to the input.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "luma")]
#[command(author, version, about = "GPU grayscale conversion")]
#[command(long_about = "
Converts color images to grayscale on the GPU.

Examples:
  luma convert photo.jpg                  # writes photo_gray.jpg
  luma convert scan.bmp -o out.bmp
  luma convert photo.jpg -q 95            # JPEG output quality
  luma info photo.jpg                     # show decoded image info
  luma device                             # show the selected adapter
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a color image to grayscale on the GPU
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Display the compute adapter that would be used
    #[command(visible_alias = "d")]
    Device,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input image (JPEG or BMP)
    input: PathBuf,

    /// Output image; defaults to `<input>_gray.<ext>`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Quality (1-100, for JPEG output)
    #[arg(short, long, default_value = "90")]
    quality: u8,
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Device => commands::device::run(cli.verbose),
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
