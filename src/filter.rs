//! Per-scanline filter reversal (PNG filter method 0: None/Sub/Up/Average/Paeth).
//!
//! Filtering operates on the filtered byte stream, one row at a time, where
//! `bpp` (bytes per complete pixel, minimum 1) is the distance back to the
//! "left" neighbor. Sub-byte-depth samples pack several samples per byte, so
//! for those `bpp` is always 1 — the filter treats the row as a byte stream,
//! not a sample stream.

use crate::error::{DecodeError, Result};
use crate::header::PixelFormat;

/// Bytes per complete pixel used as the "left"/"up-left" stride during
/// filtering. Always at least 1, and always 1 below 8-bit depth.
pub fn bytes_per_pixel(pixel_format: PixelFormat, bit_depth: u8) -> usize {
    if bit_depth < 8 {
        return 1;
    }
    let bytes_per_sample = if bit_depth == 16 { 2 } else { 1 };
    pixel_format.samples_per_pixel() as usize * bytes_per_sample
}

/// `ceil(width * samples_per_pixel * bit_depth / 8)`, the byte length of one
/// scanline's sample data, excluding the leading filter-type byte.
pub fn row_len(width: u32, pixel_format: PixelFormat, bit_depth: u8) -> usize {
    let bits = width as u64 * pixel_format.samples_per_pixel() as u64 * bit_depth as u64;
    ((bits + 7) / 8) as usize
}

fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let (a, b, c) = (a as i32, b as i32, c as i32);
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();
    if pa <= pb && pa <= pc {
        a as u8
    } else if pb <= pc {
        b as u8
    } else {
        c as u8
    }
}

/// Reverses filtering on a buffer of `height` rows, each `1 + row_len` bytes
/// (filter-type byte followed by sample bytes). Returns a buffer of
/// `height * row_len` bytes with the filter-type bytes stripped.
pub fn unfilter(filtered: &[u8], height: u32, row_len: usize, bpp: usize) -> Result<Vec<u8>> {
    let height = height as usize;
    let stride = row_len + 1;
    if filtered.len() < height * stride {
        return Err(DecodeError::TruncatedInput);
    }

    let mut raw = vec![0u8; height * row_len];
    for y in 0..height {
        let filter_type = filtered[y * stride];
        let src = &filtered[y * stride + 1..y * stride + 1 + row_len];
        let (above, current) = raw.split_at_mut(y * row_len);
        let current = &mut current[..row_len];
        let prior: &[u8] = if y == 0 { &[] } else { &above[(y - 1) * row_len..] };

        for x in 0..row_len {
            let left = if x >= bpp { current[x - bpp] } else { 0 };
            let up = if y == 0 { 0 } else { prior[x] };
            let up_left = if y == 0 || x < bpp {
                0
            } else {
                prior[x - bpp]
            };

            current[x] = match filter_type {
                0 => src[x],
                1 => src[x].wrapping_add(left),
                2 => src[x].wrapping_add(up),
                3 => {
                    let avg = ((left as u16 + up as u16) / 2) as u8;
                    src[x].wrapping_add(avg)
                }
                4 => src[x].wrapping_add(paeth_predictor(left, up, up_left)),
                other => return Err(DecodeError::BadFilterCode(other)),
            };
        }
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(filter_type: u8, samples: &[u8]) -> Vec<u8> {
        let mut v = vec![filter_type];
        v.extend_from_slice(samples);
        v
    }

    #[test]
    fn none_filter_passes_through() {
        let filtered = row(0, &[10, 20, 30]);
        let raw = unfilter(&filtered, 1, 3, 1).unwrap();
        assert_eq!(raw, vec![10, 20, 30]);
    }

    #[test]
    fn sub_filter_reconstructs_with_left_neighbor() {
        // raw = [10, 10, 10, 20, 20, 20]; bpp = 3 (RGB @ 8-bit)
        let mut filtered = row(1, &[10, 10, 10, 10, 10, 10]);
        filtered[1 + 3] = 20u8.wrapping_sub(10);
        filtered[1 + 4] = 20u8.wrapping_sub(10);
        filtered[1 + 5] = 20u8.wrapping_sub(10);
        let raw = unfilter(&filtered, 1, 6, 3).unwrap();
        assert_eq!(raw, vec![10, 10, 10, 20, 20, 20]);
    }

    #[test]
    fn up_filter_reconstructs_with_row_above() {
        let row0 = row(0, &[5, 6, 7]);
        let row1_raw = [9u8, 9, 9];
        let row1 = row(
            2,
            &[
                row1_raw[0].wrapping_sub(5),
                row1_raw[1].wrapping_sub(6),
                row1_raw[2].wrapping_sub(7),
            ],
        );
        let mut filtered = row0;
        filtered.extend(row1);
        let raw = unfilter(&filtered, 2, 3, 1).unwrap();
        assert_eq!(raw, vec![5, 6, 7, 9, 9, 9]);
    }

    #[test]
    fn paeth_reconstruction_two_by_two_rgb() {
        // Row 0: raw = (10,10,10, 20,20,20), filter None.
        let row0 = row(0, &[10, 10, 10, 20, 20, 20]);
        // Row 1 target raw = (30,30,30, 50,50,50), filter Paeth.
        // For the first pixel: left=0,up=10,up_left=0 -> predictor = up = 10.
        // filt = raw - predictor = 30 - 10 = 20, for each channel.
        // For the second pixel: left=30 (reconstructed), up=20, up_left=10.
        // p = 30+20-10=40; pa=|40-30|=10; pb=|40-20|=20; pc=|40-10|=30 -> predictor = left = 30.
        // filt = 50 - 30 = 20.
        let row1 = row(4, &[20, 20, 20, 20, 20, 20]);
        let mut filtered = row0;
        filtered.extend(row1);
        let raw = unfilter(&filtered, 2, 6, 3).unwrap();
        assert_eq!(raw, vec![10, 10, 10, 20, 20, 20, 30, 30, 30, 50, 50, 50]);
    }

    #[test]
    fn average_filter_floors_the_mean() {
        // Single-column image, bpp = 1. Row 0 raw = 10 (filter None).
        // Row 1 target raw = 11: left = 0 (first column), up = 10,
        // avg = floor((0 + 10) / 2) = 5, so filt = 11 - 5 = 6.
        let row0 = row(0, &[10]);
        let row1 = row(3, &[6]);
        let mut filtered = row0;
        filtered.extend(row1);
        let raw = unfilter(&filtered, 2, 1, 1).unwrap();
        assert_eq!(raw, vec![10, 11]);
    }

    #[test]
    fn unknown_filter_code_is_an_error() {
        let filtered = row(7, &[1, 2, 3]);
        assert!(matches!(
            unfilter(&filtered, 1, 3, 1),
            Err(DecodeError::BadFilterCode(7))
        ));
    }

    #[test]
    fn bytes_per_pixel_matches_expectations() {
        assert_eq!(bytes_per_pixel(PixelFormat::Rgb, 16), 6);
        assert_eq!(bytes_per_pixel(PixelFormat::Gray, 2), 1);
        assert_eq!(bytes_per_pixel(PixelFormat::GrayAlpha, 16), 4);
        assert_eq!(bytes_per_pixel(PixelFormat::Rgba, 8), 4);
    }

    #[test]
    fn row_len_rounds_up_for_sub_byte_depths() {
        assert_eq!(row_len(5, PixelFormat::Gray, 1), 1); // 5 bits -> 1 byte
        assert_eq!(row_len(9, PixelFormat::Gray, 1), 2); // 9 bits -> 2 bytes
        assert_eq!(row_len(4, PixelFormat::Palette, 4), 2); // 16 bits -> 2 bytes
    }
}
