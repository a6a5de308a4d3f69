//! Pipeline tests for luma-gpu.
//!
//! Tests that need a device are gated on adapter availability, the same way
//! GPU-backend tests are gated elsewhere: machines without a usable GPU
//! skip the body and report availability instead.

use luma_core::{luminance_bt601_u8, ChannelOrder, ImageBuffer};
use luma_gpu::pipeline::{self, workgroups_for};
use luma_gpu::{AccessMode, DeviceBuffer, GpuContext, GpuError, KernelSpec, Program};

fn gpu() -> Option<GpuContext> {
    GpuContext::new().ok()
}

/// CPU rendition of the pipeline for byte-exact comparison.
fn reference_gray(image: &ImageBuffer) -> Vec<u8> {
    let c = image.channels as usize;
    image
        .data
        .chunks_exact(c)
        .map(|px| match image.order {
            ChannelOrder::Bgr => luminance_bt601_u8(px[2], px[1], px[0]),
            ChannelOrder::Rgb => luminance_bt601_u8(px[0], px[1], px[2]),
        })
        .collect()
}

/// A 4x3 BGR fixture with black, white, primaries and mixed values.
fn bgr_fixture() -> ImageBuffer {
    #[rustfmt::skip]
    let data = vec![
        0, 0, 0,       255, 255, 255,  255, 0, 0,     0, 255, 0,
        0, 0, 255,     12, 200, 34,    128, 128, 128, 10, 20, 30,
        200, 100, 50,  1, 2, 3,        254, 255, 255, 70, 60, 50,
    ];
    ImageBuffer::from_raw(4, 3, 3, ChannelOrder::Bgr, data).unwrap()
}

#[test]
fn test_adapter_probe() {
    println!("GPU available: {}", GpuContext::is_available());
}

#[test]
fn test_workgrid_shape() {
    // One work-item per pixel: a 1x1 image dispatches a (1, 1) grid.
    assert_eq!(workgroups_for(1, 1), (1, 1));
}

#[test]
fn test_grayscale_matches_cpu_reference() {
    let Some(ctx) = gpu() else { return };

    let image = bgr_fixture();
    let gray = pipeline::to_grayscale(&ctx, &image).unwrap();

    assert_eq!(gray.len(), image.pixel_count());
    assert_eq!(gray, reference_gray(&image));
}

#[test]
fn test_truncation_boundary_on_device() {
    let Some(ctx) = gpu() else { return };

    // One white pixel and one black pixel, BGR.
    let image =
        ImageBuffer::from_raw(2, 1, 3, ChannelOrder::Bgr, vec![255, 255, 255, 0, 0, 0]).unwrap();
    let gray = pipeline::to_grayscale(&ctx, &image).unwrap();

    assert_eq!(gray, vec![254, 0]);
}

#[test]
fn test_channel_order_selects_kernel() {
    let Some(ctx) = gpu() else { return };

    // Same bytes, different declared order: the weights land on different
    // channels and the grays must differ.
    let bytes = vec![12, 200, 34];
    let bgr = ImageBuffer::from_raw(1, 1, 3, ChannelOrder::Bgr, bytes.clone()).unwrap();
    let rgb = ImageBuffer::from_raw(1, 1, 3, ChannelOrder::Rgb, bytes).unwrap();

    let gray_bgr = pipeline::to_grayscale(&ctx, &bgr).unwrap();
    let gray_rgb = pipeline::to_grayscale(&ctx, &rgb).unwrap();

    assert_eq!(gray_bgr, vec![luminance_bt601_u8(34, 200, 12)]);
    assert_eq!(gray_rgb, vec![luminance_bt601_u8(12, 200, 34)]);
    assert_ne!(gray_bgr, gray_rgb);
}

#[test]
fn test_single_pixel_image() {
    let Some(ctx) = gpu() else { return };

    let image = ImageBuffer::from_raw(1, 1, 3, ChannelOrder::Bgr, vec![50, 100, 200]).unwrap();
    let gray = pipeline::to_grayscale(&ctx, &image).unwrap();

    assert_eq!(gray.len(), 1);
    assert_eq!(gray[0], luminance_bt601_u8(200, 100, 50));
}

#[test]
fn test_four_channel_input() {
    let Some(ctx) = gpu() else { return };

    // BGRA: alpha byte is ignored by the kernel.
    let image = ImageBuffer::from_raw(
        2,
        1,
        4,
        ChannelOrder::Bgr,
        vec![50, 100, 200, 255, 0, 0, 0, 7],
    )
    .unwrap();
    let gray = pipeline::to_grayscale(&ctx, &image).unwrap();

    assert_eq!(gray, vec![luminance_bt601_u8(200, 100, 50), 0]);
}

#[test]
fn test_pipeline_is_idempotent() {
    let Some(ctx) = gpu() else { return };

    let image = bgr_fixture();
    let first = pipeline::to_grayscale(&ctx, &image).unwrap();
    let second = pipeline::to_grayscale(&ctx, &image).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_odd_sized_image() {
    let Some(ctx) = gpu() else { return };

    // 3x3: neither dimension nor byte counts align to the packed words.
    let mut data = Vec::with_capacity(27);
    for i in 0..9u32 {
        data.extend_from_slice(&[(i * 7) as u8, (i * 11) as u8, (i * 13) as u8]);
    }
    let image = ImageBuffer::from_raw(3, 3, 3, ChannelOrder::Bgr, data).unwrap();
    let gray = pipeline::to_grayscale(&ctx, &image).unwrap();

    assert_eq!(gray.len(), 9);
    assert_eq!(gray, reference_gray(&image));
}

#[test]
fn test_upload_size_mismatch() {
    let Some(ctx) = gpu() else { return };

    let buf = DeviceBuffer::allocate(&ctx, 12, AccessMode::ReadOnly).unwrap();
    let err = buf.upload(&ctx, &[0u8; 10]).unwrap_err();

    assert!(matches!(
        err,
        GpuError::SizeMismatch {
            expected: 12,
            actual: 10
        }
    ));
}

#[test]
fn test_buffer_sizes() {
    let Some(ctx) = gpu() else { return };

    let input = DeviceBuffer::allocate(&ctx, 5 * 4 * 3, AccessMode::ReadOnly).unwrap();
    let output = DeviceBuffer::allocate(&ctx, 5 * 4, AccessMode::WriteOnly).unwrap();

    assert_eq!(input.len(), 60);
    assert_eq!(output.len(), 20);
    // Physical allocations stay 4-byte aligned.
    assert_eq!(input.size_bytes() % 4, 0);
    assert_eq!(output.size_bytes() % 4, 0);
}

#[test]
fn test_bad_kernel_source_surfaces_log() {
    let Some(ctx) = gpu() else { return };

    let spec = KernelSpec {
        name: "broken",
        entry_point: "to_gray",
        source: "fn to_gray( { this is not wgsl",
        bindings: luma_gpu::kernel::GRAYSCALE_BINDINGS,
    };
    let err = Program::build(&ctx, &spec)
        .err()
        .expect("broken source must fail to build");
    match err {
        GpuError::ShaderCompilation { log } => assert!(!log.trim().is_empty()),
        other => panic!("expected ShaderCompilation, got {other:?}"),
    }
}

#[test]
fn test_wrong_entry_point_is_argument_error() {
    let Some(ctx) = gpu() else { return };

    let mut spec = KernelSpec::grayscale(ChannelOrder::Bgr);
    spec.entry_point = "no_such_entry";
    let err = Program::build(&ctx, &spec)
        .err()
        .expect("missing entry point must fail to build");
    match err {
        GpuError::KernelArgument(_) => {}
        other => panic!("expected KernelArgument, got {other:?}"),
    }
}

#[test]
fn test_dispatch_rejects_undersized_output() {
    let Some(ctx) = gpu() else { return };

    let image = bgr_fixture();
    let program = Program::build(&ctx, &KernelSpec::grayscale(ChannelOrder::Bgr)).unwrap();
    let input = DeviceBuffer::allocate(&ctx, image.byte_len(), AccessMode::ReadOnly).unwrap();
    // One byte short of width * height.
    let output =
        DeviceBuffer::allocate(&ctx, image.pixel_count() - 1, AccessMode::WriteOnly).unwrap();

    input.upload(&ctx, &image.data).unwrap();
    let err = pipeline::dispatch(
        &ctx,
        &program,
        &input,
        &output,
        image.width,
        image.height,
        image.channels,
    )
    .unwrap_err();

    assert!(matches!(err, GpuError::SizeMismatch { .. }));
}
