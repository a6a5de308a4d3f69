//! GPU compute pipeline for grayscale image conversion.
//!
//! Orchestrates a single compute kernel on the first available GPU-class
//! adapter: upload the interleaved color buffer, run the per-pixel
//! luminance reduction over a `(width, height)` work-grid, and read the
//! single-channel result back.
//!
//! # Architecture
//!
//! ```text
//! pipeline::to_grayscale
//!     ├── GpuContext   (adapter + device + in-order queue)
//!     ├── Program      (KernelSpec -> WGSL module + compute pipeline)
//!     ├── DeviceBuffer (read-only input / write-only output + transfers)
//!     └── dispatch     (bind slots, encode pass, submit, wait)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use luma_gpu::{GpuContext, pipeline};
//!
//! let ctx = GpuContext::new()?;
//! let gray = pipeline::to_grayscale(&ctx, &image)?;
//! ```
//!
//! All device resources are owned handles dropped in reverse acquisition
//! order on every exit path; a resource that failed to acquire never exists
//! as a value.

pub mod buffer;
pub mod context;
pub mod kernel;
pub mod pipeline;
mod shaders;

pub use buffer::{AccessMode, DeviceBuffer};
pub use context::GpuContext;
pub use kernel::{BindingRole, BindingSlot, KernelSpec, Program};

use thiserror::Error;

/// GPU operation errors.
#[derive(Error, Debug)]
pub enum GpuError {
    /// No adapter at all, or no GPU-class adapter.
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    /// Adapter found but device/queue creation failed.
    #[error("failed to create device: {0}")]
    DeviceCreation(String),

    /// Kernel source failed to compile.
    #[error("shader compilation failed:\n{log}")]
    ShaderCompilation {
        /// Full compiler diagnostic log.
        log: String,
    },

    /// Device could not satisfy a buffer allocation.
    #[error("failed to allocate device buffer: {0}")]
    BufferCreation(String),

    /// Transfer size does not match the buffer's allocated size.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Allocated byte length.
        expected: usize,
        /// Offered byte length.
        actual: usize,
    },

    /// Declared binding slots do not match the kernel's interface.
    #[error("kernel argument binding failed: {0}")]
    KernelArgument(String),

    /// Kernel submission was rejected by the device.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// Host/device copy failed.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// Zero-sized work-grid.
    #[error("invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),
}

/// Result type for GPU operations.
pub type GpuResult<T> = Result<T, GpuError>;
