//! WGSL kernel sources for the grayscale pipeline.
//!
//! Storage buffers have no 8-bit element type, so pixel bytes travel packed
//! in `u32` words: reads unpack with shifts, writes OR each gray byte into
//! a zero-cleared output word. One invocation maps to one output pixel over
//! a bounds-guarded `(width, height)` grid.

/// BGR/BGRA interleaved input to 8-bit luminance.
pub const GRAY_FROM_BGR: &str = r#"
struct Params {
    width: u32,
    height: u32,
    channels: u32,
    _pad: u32,
}

@group(0) @binding(0) var<storage, read> src: array<u32>;
@group(0) @binding(1) var<storage, read_write> dst: array<atomic<u32>>;
@group(0) @binding(2) var<uniform> params: Params;

fn byte_at(i: u32) -> f32 {
    return f32((src[i >> 2u] >> ((i & 3u) * 8u)) & 0xffu);
}

@compute @workgroup_size(16, 16)
fn to_gray(@builtin(global_invocation_id) id: vec3<u32>) {
    let x = id.x;
    let y = id.y;
    if x >= params.width || y >= params.height { return; }

    let idx = (y * params.width + x) * params.channels;
    let b = byte_at(idx);
    let g = byte_at(idx + 1u);
    let r = byte_at(idx + 2u);

    // Truncating cast; peak white lands on 254, not 255.
    let gray = min(u32(0.299 * r + 0.587 * g + 0.114 * b), 254u);

    let o = y * params.width + x;
    atomicOr(&dst[o >> 2u], gray << ((o & 3u) * 8u));
}
"#;

/// RGB/RGBA interleaved input to 8-bit luminance.
pub const GRAY_FROM_RGB: &str = r#"
struct Params {
    width: u32,
    height: u32,
    channels: u32,
    _pad: u32,
}

@group(0) @binding(0) var<storage, read> src: array<u32>;
@group(0) @binding(1) var<storage, read_write> dst: array<atomic<u32>>;
@group(0) @binding(2) var<uniform> params: Params;

fn byte_at(i: u32) -> f32 {
    return f32((src[i >> 2u] >> ((i & 3u) * 8u)) & 0xffu);
}

@compute @workgroup_size(16, 16)
fn to_gray(@builtin(global_invocation_id) id: vec3<u32>) {
    let x = id.x;
    let y = id.y;
    if x >= params.width || y >= params.height { return; }

    let idx = (y * params.width + x) * params.channels;
    let r = byte_at(idx);
    let g = byte_at(idx + 1u);
    let b = byte_at(idx + 2u);

    // Truncating cast; peak white lands on 254, not 255.
    let gray = min(u32(0.299 * r + 0.587 * g + 0.114 * b), 254u);

    let o = y * params.width + x;
    atomicOr(&dst[o >> 2u], gray << ((o & 3u) * 8u));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernels_use_bt601_weights() {
        for src in [GRAY_FROM_BGR, GRAY_FROM_RGB] {
            assert!(src.contains("0.299") && src.contains("0.587") && src.contains("0.114"));
        }
    }

    #[test]
    fn test_kernels_declare_entry_point() {
        assert!(GRAY_FROM_BGR.contains("fn to_gray"));
        assert!(GRAY_FROM_RGB.contains("fn to_gray"));
    }

    #[test]
    fn test_variants_differ_only_in_channel_order() {
        assert_ne!(GRAY_FROM_BGR, GRAY_FROM_RGB);
        assert!(GRAY_FROM_BGR.contains("let b = byte_at(idx);"));
        assert!(GRAY_FROM_RGB.contains("let r = byte_at(idx);"));
    }
}
