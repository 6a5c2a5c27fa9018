//! IHDR parsing and the (color_type, bit_depth) -> PixelFormat table.

use crate::error::{DecodeError, Result};

pub const IHDR_LEN: usize = 13;

/// The five pixel layouts defined by PNG color type + bit depth combinations.
///
/// Closed by design: every unfilter/normalize dispatch is a `match` on this
/// enum, never a trait object, because the PNG standard fixes the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    Rgb,
    Palette,
    GrayAlpha,
    Rgba,
}

impl PixelFormat {
    /// Number of samples that make up one pixel in this format.
    pub fn samples_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Gray | PixelFormat::Palette => 1,
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    fn from_color_type_and_depth(color_type: u8, bit_depth: u8) -> Option<PixelFormat> {
        use PixelFormat::*;
        match (color_type, bit_depth) {
            (0, 1 | 2 | 4 | 8 | 16) => Some(Gray),
            (2, 8 | 16) => Some(Rgb),
            (3, 1 | 2 | 4 | 8) => Some(Palette),
            (4, 8 | 16) => Some(GrayAlpha),
            (6, 8 | 16) => Some(Rgba),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterlaceMethod {
    None,
    Adam7,
}

#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub interlace: InterlaceMethod,
    pub pixel_format: PixelFormat,
}

/// Parses and validates a 13-byte IHDR payload.
pub fn parse_ihdr(data: &[u8]) -> Result<Header> {
    if data.len() != IHDR_LEN {
        return Err(DecodeError::InvalidIhdr("length != 13"));
    }

    let width = u32::from_be_bytes(data[0..4].try_into().unwrap());
    let height = u32::from_be_bytes(data[4..8].try_into().unwrap());
    let bit_depth = data[8];
    let color_type = data[9];
    let compression_method = data[10];
    let filter_method = data[11];
    let interlace_method = data[12];

    if width == 0 {
        return Err(DecodeError::InvalidIhdr("width == 0"));
    }
    if height == 0 {
        return Err(DecodeError::InvalidIhdr("height == 0"));
    }
    if compression_method != 0 {
        return Err(DecodeError::InvalidIhdr("compression_method != 0"));
    }
    if filter_method != 0 {
        return Err(DecodeError::InvalidIhdr("filter_method != 0"));
    }
    let interlace = match interlace_method {
        0 => InterlaceMethod::None,
        1 => InterlaceMethod::Adam7,
        _ => return Err(DecodeError::InvalidIhdr("interlace_method not in {0,1}")),
    };

    let pixel_format = PixelFormat::from_color_type_and_depth(color_type, bit_depth)
        .ok_or(DecodeError::InvalidColorDepth {
            color_type,
            bit_depth,
        })?;

    Ok(Header {
        width,
        height,
        bit_depth,
        color_type,
        interlace,
        pixel_format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ihdr_bytes(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
        let mut v = Vec::with_capacity(13);
        v.extend_from_slice(&width.to_be_bytes());
        v.extend_from_slice(&height.to_be_bytes());
        v.push(bit_depth);
        v.push(color_type);
        v.push(0); // compression
        v.push(0); // filter
        v.push(interlace);
        v
    }

    #[test]
    fn parses_valid_rgba_header() {
        let bytes = ihdr_bytes(4, 2, 8, 6, 0);
        let hdr = parse_ihdr(&bytes).unwrap();
        assert_eq!(hdr.width, 4);
        assert_eq!(hdr.height, 2);
        assert_eq!(hdr.pixel_format, PixelFormat::Rgba);
        assert_eq!(hdr.interlace, InterlaceMethod::None);
    }

    #[test]
    fn rejects_zero_width() {
        let bytes = ihdr_bytes(0, 2, 8, 6, 0);
        assert!(matches!(
            parse_ihdr(&bytes),
            Err(DecodeError::InvalidIhdr("width == 0"))
        ));
    }

    #[test]
    fn rejects_illegal_color_depth_pair() {
        let bytes = ihdr_bytes(1, 1, 3, 2, 0); // bit depth 3 is never legal
        assert!(matches!(
            parse_ihdr(&bytes),
            Err(DecodeError::InvalidColorDepth { .. })
        ));
    }

    #[test]
    fn rejects_palette_at_bit_depth_16() {
        let bytes = ihdr_bytes(1, 1, 16, 3, 0);
        assert!(matches!(
            parse_ihdr(&bytes),
            Err(DecodeError::InvalidColorDepth { .. })
        ));
    }

    #[test]
    fn legal_pairs_table() {
        let legal: &[(u8, u8)] = &[
            (0, 1),
            (0, 2),
            (0, 4),
            (0, 8),
            (0, 16),
            (2, 8),
            (2, 16),
            (3, 1),
            (3, 2),
            (3, 4),
            (3, 8),
            (4, 8),
            (4, 16),
            (6, 8),
            (6, 16),
        ];
        for &(color_type, bit_depth) in legal {
            let bytes = ihdr_bytes(1, 1, bit_depth, color_type, 0);
            assert!(
                parse_ihdr(&bytes).is_ok(),
                "expected ({color_type}, {bit_depth}) to be legal"
            );
        }
    }
}
