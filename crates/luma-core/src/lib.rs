//! # luma-core
//!
//! Core types for GPU grayscale image conversion.
//!
//! This crate provides the foundational types shared by the rest of the
//! luma-rs workspace:
//!
//! - [`ImageBuffer`] - Owned interleaved 8-bit pixel buffer
//! - [`ChannelOrder`] - Byte order of interleaved color data (BGR vs RGB)
//! - [`luminance_bt601_u8`] - The canonical per-pixel grayscale transform
//! - [`ImageError`] - Error type for buffer construction and validation
//!
//! ## Crate Structure
//!
//! This crate is the foundation of luma-rs and has no internal dependencies.
//! The other workspace crates depend on it:
//!
//! ```text
//! luma-core (this crate)
//!    ^
//!    |
//!    +-- luma-io  (JPEG/BMP codecs)
//!    +-- luma-gpu (compute pipeline)
//!    +-- luma-cli (command line tool)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;

pub use error::{ImageError, Result};
pub use image::{ChannelOrder, ImageBuffer};
pub use pixel::{
    luminance_bt601, luminance_bt601_u8, BT601_LUMA, BT601_LUMA_B, BT601_LUMA_G, BT601_LUMA_R,
};
