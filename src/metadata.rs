//! Walks the chunk stream following IHDR and enforces PNG's ordering and
//! multiplicity rules while collecting the palette, gamma, and IDAT payload.
//!
//! `idat_started`/`idat_ended` are local to [`assemble`] — never module- or
//! process-level state — so that decoding two files concurrently on separate
//! threads can never cross-contaminate each other's bookkeeping.

use crate::chunk::ChunkReader;
use crate::error::{DecodeError, Result};
use crate::header::Header;
use crate::normalize::PaletteEntry;

#[derive(Debug)]
pub struct Metadata {
    pub palette: Option<Vec<PaletteEntry>>,
    pub has_gama: bool,
    pub gamma: u32,
    pub compressed: Vec<u8>,
}

/// Consumes every chunk after IHDR, returning the assembled palette/gamma and
/// the concatenated IDAT payload.
pub fn assemble(reader: &mut ChunkReader<'_>, header: &Header) -> Result<Metadata> {
    let mut idat_started = false;
    let mut idat_ended = false;
    let mut palette: Option<Vec<PaletteEntry>> = None;
    let mut has_gama = false;
    let mut gamma = 0u32;
    let mut compressed = Vec::new();
    let mut saw_iend = false;

    while let Some(chunk) = reader.next_chunk() {
        let chunk = chunk?;

        match &chunk.chunk_type {
            b"PLTE" => {
                if idat_started {
                    return Err(DecodeError::MisorderedChunk("PLTE after IDAT"));
                }
                if palette.is_some() {
                    return Err(DecodeError::MisorderedChunk("duplicate PLTE"));
                }
                if matches!(header.color_type, 0 | 4) {
                    return Err(DecodeError::MisorderedChunk(
                        "PLTE not allowed for grayscale color types",
                    ));
                }
                palette = Some(parse_plte(chunk.data, header.bit_depth)?);
            }
            b"gAMA" => {
                if has_gama {
                    return Err(DecodeError::MisorderedChunk("duplicate gAMA"));
                }
                if palette.is_some() {
                    return Err(DecodeError::MisorderedChunk("gAMA after PLTE"));
                }
                if idat_started {
                    return Err(DecodeError::MisorderedChunk("gAMA after IDAT"));
                }
                if chunk.data.len() != 4 {
                    return Err(DecodeError::MisorderedChunk("gAMA payload != 4 bytes"));
                }
                has_gama = true;
                gamma = u32::from_be_bytes(chunk.data.try_into().unwrap());
            }
            b"IDAT" => {
                if idat_ended {
                    return Err(DecodeError::NonContiguousIdat);
                }
                idat_started = true;
                compressed.extend_from_slice(chunk.data);
            }
            b"IEND" => {
                if !chunk.data.is_empty() {
                    log::warn!("IEND chunk has nonzero length; accepting anyway");
                }
                saw_iend = true;
            }
            other => {
                if idat_started {
                    idat_ended = true;
                }
                if !chunk.is_ancillary() {
                    return Err(DecodeError::UnknownCriticalChunk(*other));
                }
                // Recognized or unrecognized ancillary chunk: already CRC
                // validated by the chunk reader, nothing else to do with it.
            }
        }
    }

    if !saw_iend {
        return Err(DecodeError::TruncatedInput);
    }

    if header.color_type == 3 && palette.is_none() {
        return Err(DecodeError::MissingPalette);
    }

    Ok(Metadata {
        palette,
        has_gama,
        gamma,
        compressed,
    })
}

fn parse_plte(data: &[u8], bit_depth: u8) -> Result<Vec<PaletteEntry>> {
    if data.len() % 3 != 0 {
        return Err(DecodeError::MisorderedChunk("PLTE length not a multiple of 3"));
    }
    let entries: Vec<PaletteEntry> = data
        .chunks_exact(3)
        .map(|rgb| PaletteEntry {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        })
        .collect();

    let max_entries = 1usize << bit_depth;
    if entries.len() > max_entries {
        return Err(DecodeError::PaletteTooLarge);
    }

    Ok(entries)
}
