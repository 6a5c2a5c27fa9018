//! Optional display-time sRGB encoding pass, gated behind
//! [`crate::image::DecodeOptions::apply_srgb_approximation`].
//!
//! The gamma value stored in a `gAMA` chunk is file-gamma × 100000; the
//! sRGB-equivalent value is 45455 (1/2.2 × 100000, rounded). A file tagged
//! with that value is already sRGB and gets no further correction here.

pub const SRGB_GAMMA: u32 = 45455;

fn encode_channel(v: u8) -> u8 {
    let linear = v as f64 / 255.0;
    let encoded = if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Applies the sRGB transfer function to every color channel in `pixels`,
/// leaving the alpha channel (if `bytes_per_pixel == 4`) untouched.
pub fn apply(pixels: &mut [u8], bytes_per_pixel: usize) {
    for pixel in pixels.chunks_exact_mut(bytes_per_pixel) {
        let color_channels = if bytes_per_pixel == 4 { 3 } else { bytes_per_pixel };
        for channel in pixel[..color_channels].iter_mut() {
            *channel = encode_channel(*channel);
        }
    }
}
