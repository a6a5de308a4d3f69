//! Kernel dispatch and the end-to-end grayscale pipeline.
//!
//! [`dispatch`] binds the kernel's slots in their declared order and encodes
//! one compute pass over the logical `(width, height)` work-grid: one
//! invocation per output pixel, 16x16 workgroups with an in-kernel bounds
//! guard. [`to_grayscale`] runs the whole flow: build program, allocate
//! buffers, upload, dispatch, download. All device resources are locals
//! dropped in reverse acquisition order on every exit path.

use bytemuck::{Pod, Zeroable};
use tracing::{debug, trace};

use luma_core::ImageBuffer;

use crate::buffer::{AccessMode, DeviceBuffer};
use crate::context::GpuContext;
use crate::kernel::{KernelSpec, Program};
use crate::{GpuError, GpuResult};

/// Workgroup edge length used by the built-in kernels.
pub const WORKGROUP_SIZE: u32 = 16;

/// Dimensions uniform handed to the kernel: width, height, channels.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct ParamsUniform {
    width: u32,
    height: u32,
    channels: u32,
    _pad: u32,
}

/// Workgroup counts covering the `(width, height)` grid.
pub fn workgroups_for(width: u32, height: u32) -> (u32, u32) {
    (
        width.div_ceil(WORKGROUP_SIZE),
        height.div_ceil(WORKGROUP_SIZE),
    )
}

/// Submits the kernel over a `(width, height)` work-grid and waits.
///
/// Argument binding follows the program's declared slot order: input
/// pixels, output pixels, params. The output words are zero-cleared in the
/// same submission, ahead of the compute pass on the in-order queue.
/// Validation faults raised while encoding or submitting surface as
/// [`GpuError::Dispatch`].
pub fn dispatch(
    ctx: &GpuContext,
    program: &Program,
    input: &DeviceBuffer,
    output: &DeviceBuffer,
    width: u32,
    height: u32,
    channels: u32,
) -> GpuResult<()> {
    if width == 0 || height == 0 {
        return Err(GpuError::InvalidDimensions(width, height));
    }
    let pixels = width as usize * height as usize;
    if input.len() != pixels * channels as usize {
        return Err(GpuError::SizeMismatch {
            expected: pixels * channels as usize,
            actual: input.len(),
        });
    }
    if output.len() != pixels {
        return Err(GpuError::SizeMismatch {
            expected: pixels,
            actual: output.len(),
        });
    }

    let params = ParamsUniform {
        width,
        height,
        channels,
        _pad: 0,
    };
    let params_buf = {
        use wgpu::util::DeviceExt;
        ctx.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("luma_params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            })
    };

    ctx.device
        .push_error_scope(wgpu::ErrorFilter::Validation);

    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(program.spec().name),
        layout: &program.layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: input.raw.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: output.raw.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: params_buf.as_entire_binding(),
            },
        ],
    });

    let (wg_x, wg_y) = workgroups_for(width, height);
    trace!(width, height, wg_x, wg_y, "dispatching kernel");

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("luma_dispatch"),
        });
    // Output bytes are ORed in per work-item; the words must start at zero.
    encoder.clear_buffer(&output.raw, 0, None);
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(program.spec().name),
            timestamp_writes: None,
        });
        pass.set_pipeline(&program.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(wg_x, wg_y, 1);
    }
    ctx.submit_and_wait(encoder);

    if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
        return Err(GpuError::Dispatch(err.to_string()));
    }
    Ok(())
}

/// Runs the full grayscale pipeline on a decoded color image.
///
/// Compiles the kernel matching the image's channel order, allocates the
/// input (`w*h*c` bytes) and output (`w*h` bytes) buffers, uploads,
/// dispatches one work-item per pixel, and downloads the result. Returns
/// exactly `width * height` gray bytes.
///
/// Callers hand in 3- or 4-channel data; that precondition is validated
/// upstream at decode time.
pub fn to_grayscale(ctx: &GpuContext, image: &ImageBuffer) -> GpuResult<Vec<u8>> {
    debug_assert!(image.channels >= 3);
    debug!(
        width = image.width,
        height = image.height,
        channels = image.channels,
        order = image.order.name(),
        "grayscale pipeline start"
    );

    let spec = KernelSpec::grayscale(image.order);
    let program = Program::build(ctx, &spec)?;

    let input = DeviceBuffer::allocate(ctx, image.byte_len(), AccessMode::ReadOnly)?;
    let output = DeviceBuffer::allocate(ctx, image.pixel_count(), AccessMode::WriteOnly)?;

    input.upload(ctx, &image.data)?;
    dispatch(
        ctx,
        &program,
        &input,
        &output,
        image.width,
        image.height,
        image.channels,
    )?;
    let gray = output.download(ctx)?;

    debug!(bytes = gray.len(), "grayscale pipeline done");
    Ok(gray)
}
