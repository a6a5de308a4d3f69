//! Device-resident buffers and host/device transfers.
//!
//! Pixel bytes live in storage buffers as packed 32-bit words, so every
//! physical allocation is rounded up to 4-byte alignment while size checks
//! and transfer results use the logical byte length the caller asked for.
//! Buffers are created fresh per pipeline run, never resized, and released
//! by `Drop`.

use tracing::trace;

use crate::context::GpuContext;
use crate::{GpuError, GpuResult};

/// Access mode of a device buffer, fixed at allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Kernel reads, host writes (input pixels).
    ReadOnly,
    /// Kernel writes, host reads (output pixels).
    WriteOnly,
}

/// A device-resident storage buffer with a fixed logical byte length.
pub struct DeviceBuffer {
    pub(crate) raw: wgpu::Buffer,
    len: usize,
    access: AccessMode,
}

impl DeviceBuffer {
    /// Allocates `len` logical bytes on the device.
    ///
    /// Fails with [`GpuError::BufferCreation`] when the device cannot
    /// satisfy the request.
    pub fn allocate(ctx: &GpuContext, len: usize, access: AccessMode) -> GpuResult<Self> {
        let padded = len.div_ceil(4) * 4;
        let usage = match access {
            AccessMode::ReadOnly => wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            AccessMode::WriteOnly => {
                wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST
            }
        };

        ctx.device
            .push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let raw = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(match access {
                AccessMode::ReadOnly => "luma_input",
                AccessMode::WriteOnly => "luma_output",
            }),
            size: padded as u64,
            usage,
            mapped_at_creation: false,
        });
        if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
            return Err(GpuError::BufferCreation(err.to_string()));
        }

        trace!(len, padded, ?access, "allocated device buffer");
        Ok(Self { raw, len, access })
    }

    /// Logical byte length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical allocation size in bytes (4-byte aligned).
    pub fn size_bytes(&self) -> u64 {
        self.raw.size()
    }

    /// Access mode fixed at allocation.
    pub fn access(&self) -> AccessMode {
        self.access
    }

    /// Blocking host-to-device copy of exactly `self.len()` bytes.
    ///
    /// Fails with [`GpuError::SizeMismatch`] when the host slice length
    /// differs from the allocated logical length. Only input buffers are
    /// written from the host.
    pub fn upload(&self, ctx: &GpuContext, data: &[u8]) -> GpuResult<()> {
        debug_assert_eq!(self.access, AccessMode::ReadOnly);
        if data.len() != self.len {
            return Err(GpuError::SizeMismatch {
                expected: self.len,
                actual: data.len(),
            });
        }

        if data.len() % 4 == 0 {
            ctx.queue.write_buffer(&self.raw, 0, data);
        } else {
            let mut padded = data.to_vec();
            padded.resize(data.len().div_ceil(4) * 4, 0);
            ctx.queue.write_buffer(&self.raw, 0, &padded);
        }
        ctx.flush_and_wait();
        trace!(len = self.len, "uploaded to device");
        Ok(())
    }

    /// Blocking device-to-host copy, returning `self.len()` bytes.
    ///
    /// Copies through a staging buffer and maps it for reading; the queue
    /// is in-order, so the mapped data reflects all previously submitted
    /// kernel work. Map failures surface as [`GpuError::Transfer`].
    pub fn download(&self, ctx: &GpuContext) -> GpuResult<Vec<u8>> {
        let size = self.raw.size();

        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("luma_staging"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = ctx.device.create_command_encoder(&Default::default());
        encoder.copy_buffer_to_buffer(&self.raw, 0, &staging, 0, size);
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        ctx.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|_| GpuError::Transfer("map channel closed".into()))?
            .map_err(|e| GpuError::Transfer(format!("map failed: {e}")))?;

        let mapped = slice.get_mapped_range();
        let mut result = mapped.to_vec();
        drop(mapped);
        staging.unmap();

        result.truncate(self.len);
        trace!(len = self.len, "downloaded from device");
        Ok(result)
    }
}
