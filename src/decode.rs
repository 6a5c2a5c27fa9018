//! Top-level pipeline orchestration: signature check through normalized
//! pixel buffer, in the strict left-to-right stage order the format imposes.

use std::io::Read;

use crate::chunk::ChunkReader;
use crate::error::{DecodeError, Result};
use crate::header::{self, Header, InterlaceMethod};
use crate::idat;
use crate::image::{DecodeOptions, Image};
use crate::interlace;
use crate::metadata;
use crate::normalize;
use crate::srgb;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
/// Minimum byte length of any legal PNG: signature + IHDR (13-byte payload)
/// + IEND, with zero IDAT chunks required.
const MIN_PNG_LEN: usize = 45;

/// Decodes a complete in-memory PNG datastream with default options.
pub fn decode(data: &[u8]) -> Result<Image> {
    decode_with_options(data, DecodeOptions::default())
}

/// Reads `reader` fully into memory, then decodes it. Streaming decode of
/// partial rows is out of scope; the whole datastream must be buffered.
pub fn decode_reader<R: Read>(mut reader: R) -> Result<Image> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|_| DecodeError::TruncatedInput)?;
    decode(&data)
}

/// Decodes a complete in-memory PNG datastream with caller-specified options.
pub fn decode_with_options(data: &[u8], options: DecodeOptions) -> Result<Image> {
    if data.len() < MIN_PNG_LEN {
        return Err(DecodeError::TruncatedInput);
    }
    if data[0..8] != SIGNATURE {
        return Err(DecodeError::BadSignature);
    }

    let mut reader = ChunkReader::new(&data[8..]);
    let header = parse_leading_ihdr(&mut reader)?;
    let meta = metadata::assemble(&mut reader, &header)?;

    let filtered = idat::decompress(&meta.compressed, &header)?;

    let raw = match header.interlace {
        InterlaceMethod::None => {
            let row_len = crate::filter::row_len(header.width, header.pixel_format, header.bit_depth);
            let bpp = crate::filter::bytes_per_pixel(header.pixel_format, header.bit_depth);
            crate::filter::unfilter(&filtered, header.height, row_len, bpp)?
        }
        InterlaceMethod::Adam7 => interlace::deinterlace(
            &filtered,
            header.width,
            header.height,
            header.pixel_format,
            header.bit_depth,
        )?,
    };

    let (output_format, mut pixels) = normalize::normalize(
        &raw,
        header.width,
        header.height,
        header.pixel_format,
        header.bit_depth,
        meta.palette.as_deref(),
    )?;

    let gamma_has_effect = meta.has_gama && meta.gamma != srgb::SRGB_GAMMA;
    let is_palette = header.pixel_format == crate::header::PixelFormat::Palette;

    if options.apply_srgb_approximation && gamma_has_effect && !is_palette {
        srgb::apply(&mut pixels, output_format.bytes_per_pixel());
    } else if gamma_has_effect && is_palette {
        log::warn!("gAMA chunk present with no effect (sRGB approximation does not apply to indexed-color images)");
    } else if gamma_has_effect && !options.apply_srgb_approximation {
        log::warn!("gAMA chunk present with no effect (sRGB approximation not requested)");
    }

    let bytes_per_row = header.width as usize * output_format.bytes_per_pixel();

    Ok(Image {
        width: header.width,
        height: header.height,
        pixel_format: output_format,
        bytes_per_row,
        pixels,
        has_gama: meta.has_gama,
        gamma: meta.gamma,
    })
}

fn parse_leading_ihdr(reader: &mut ChunkReader<'_>) -> Result<Header> {
    let chunk = reader
        .next_chunk()
        .ok_or(DecodeError::TruncatedInput)??;
    if &chunk.chunk_type != b"IHDR" {
        return Err(DecodeError::InvalidIhdr("first chunk is not IHDR"));
    }
    header::parse_ihdr(chunk.data)
}
