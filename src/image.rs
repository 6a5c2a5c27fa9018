//! The public result type and caller-facing decode configuration.

use crate::normalize::OutputFormat;

/// A fully decoded, normalized PNG image.
#[derive(Debug, Clone)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixel_format: OutputFormat,
    pub bytes_per_row: usize,
    /// Row-major, top-to-bottom, 8 bits per channel, non-premultiplied alpha.
    pub pixels: Vec<u8>,
    pub has_gama: bool,
    /// Gamma × 100000 as stored in the file; 0 if no `gAMA` chunk was present.
    pub gamma: u32,
}

/// Caller-controlled decode policy. Defaults to no sRGB approximation, since
/// that pass is a display-time policy the decoder should not impose silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub apply_srgb_approximation: bool,
}
