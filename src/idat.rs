//! IDAT concatenation and zlib decompression.
//!
//! PNG's image data is split across one or more IDAT chunks purely for
//! transport convenience — chunk boundaries carry no meaning for the
//! compressed stream, so every IDAT payload is concatenated in file order
//! before being handed to the zlib decoder.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{DecodeError, Result};
use crate::filter::row_len;
use crate::header::{Header, InterlaceMethod};
use crate::interlace;

/// The filtered-buffer size a correctly-sized `Header` should decompress to.
pub fn expected_filtered_size(header: &Header) -> usize {
    match header.interlace {
        InterlaceMethod::None => {
            let row_len = row_len(header.width, header.pixel_format, header.bit_depth);
            header.height as usize * (row_len + 1)
        }
        InterlaceMethod::Adam7 => interlace::expected_filtered_size(
            header.width,
            header.height,
            header.pixel_format,
            header.bit_depth,
        ),
    }
}

/// Inflates the concatenated IDAT payload and validates its length against
/// what the header predicts.
pub fn decompress(compressed: &[u8], header: &Header) -> Result<Vec<u8>> {
    let expected = expected_filtered_size(header);
    let mut decoder = ZlibDecoder::new(compressed);
    let mut out = Vec::with_capacity(expected);
    decoder
        .read_to_end(&mut out)
        .map_err(|_| DecodeError::DecompressError)?;

    if out.len() != expected {
        return Err(DecodeError::SizeMismatch {
            expected,
            actual: out.len(),
        });
    }

    Ok(out)
}
