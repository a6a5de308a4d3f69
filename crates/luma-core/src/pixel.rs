//! Luminance coefficients and the canonical grayscale transform.
//!
//! The per-pixel transform used throughout luma-rs is the ITU-R BT.601
//! weighted sum `0.299*R + 0.587*G + 0.114*B` with a truncating cast to u8.
//! [`luminance_bt601_u8`] is the CPU reference the GPU kernel is held to:
//! strict f32 products and sums, truncation toward zero, and a peak-white
//! result of 254.

/// BT.601 luminance coefficient for the red channel.
pub const BT601_LUMA_R: f32 = 0.299;

/// BT.601 luminance coefficient for the green channel.
pub const BT601_LUMA_G: f32 = 0.587;

/// BT.601 luminance coefficient for the blue channel.
pub const BT601_LUMA_B: f32 = 0.114;

/// BT.601 luminance coefficients as an array [R, G, B].
///
/// # Example
///
/// ```
/// use luma_core::pixel::BT601_LUMA;
/// let rgb = [0.5, 0.3, 0.2];
/// let luma = rgb[0] * BT601_LUMA[0] + rgb[1] * BT601_LUMA[1] + rgb[2] * BT601_LUMA[2];
/// ```
pub const BT601_LUMA: [f32; 3] = [BT601_LUMA_R, BT601_LUMA_G, BT601_LUMA_B];

/// Calculates BT.601 luminance from normalized RGB values.
///
/// # Example
///
/// ```
/// use luma_core::pixel::luminance_bt601;
/// let luma = luminance_bt601([0.5, 0.3, 0.2]);
/// ```
#[inline]
pub fn luminance_bt601(rgb: [f32; 3]) -> f32 {
    rgb[0] * BT601_LUMA_R + rgb[1] * BT601_LUMA_G + rgb[2] * BT601_LUMA_B
}

/// Converts one 8-bit RGB pixel to its 8-bit gray value.
///
/// This is the canonical transform the GPU kernel reproduces: the weighted
/// sum is evaluated in f32 and truncated toward zero.
///
/// ```
/// use luma_core::luminance_bt601_u8;
/// assert_eq!(luminance_bt601_u8(0, 0, 0), 0);
/// assert_eq!(luminance_bt601_u8(255, 255, 255), 254);
/// ```
#[inline]
pub fn luminance_bt601_u8(r: u8, g: u8, b: u8) -> u8 {
    let acc = BT601_LUMA_R * r as f32 + BT601_LUMA_G * g as f32 + BT601_LUMA_B * b as f32;
    // Peak white truncates to 254, not 255: the weighted sum may only touch
    // 255.0 through f32 rounding, never exceed it.
    (acc as u8).min(254)
}
