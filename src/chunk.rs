//! Streaming reader over a PNG's chunk sequence.
//!
//! A chunk on the wire is `length: u32be | type: [u8; 4] | data: [u8; length] |
//! crc: u32be`, where the CRC covers `type || data`. [`ChunkReader`] borrows
//! from the input slice rather than copying payloads up front; callers that
//! need to keep a payload around (IDAT) copy it out themselves.

use crate::crc;
use crate::error::{DecodeError, Result};

pub const MAX_CHUNK_LEN: u32 = 2_147_483_647; // 2^31 - 1

/// A single parsed chunk, borrowing its payload from the original buffer.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub chunk_type: [u8; 4],
    pub data: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// `true` if bit 5 of the first type byte is set, i.e. this chunk may be
    /// skipped by a compliant decoder that doesn't recognize it.
    pub fn is_ancillary(&self) -> bool {
        self.chunk_type[0] & 0x20 != 0
    }

    pub fn type_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.chunk_type)
    }
}

/// Iterator-like cursor over the chunk sequence following the 8-byte signature.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> ChunkReader<'a> {
    /// `data` must start at the first chunk (i.e. just past the signature).
    pub fn new(data: &'a [u8]) -> Self {
        ChunkReader {
            data,
            pos: 0,
            done: false,
        }
    }

    /// Parses and returns the next chunk, or `None` once IEND has been
    /// returned. Returns `Some(Err(_))` and poisons the reader on any
    /// malformed chunk.
    pub fn next_chunk(&mut self) -> Option<Result<Chunk<'a>>> {
        if self.done {
            return None;
        }
        Some(self.read_one())
    }

    fn read_one(&mut self) -> Result<Chunk<'a>> {
        let remaining = &self.data[self.pos..];
        if remaining.len() < 8 {
            self.done = true;
            return Err(DecodeError::TruncatedInput);
        }

        let length = u32::from_be_bytes(remaining[0..4].try_into().unwrap());
        if length > MAX_CHUNK_LEN {
            self.done = true;
            return Err(DecodeError::LengthTooLarge);
        }
        let length = length as usize;

        let type_start = 4;
        let data_start = type_start + 4;
        let data_end = data_start + length;
        let crc_end = data_end + 4;
        if remaining.len() < crc_end {
            self.done = true;
            return Err(DecodeError::TruncatedInput);
        }

        let chunk_type: [u8; 4] = remaining[type_start..data_start].try_into().unwrap();
        if !chunk_type.iter().all(|b| b.is_ascii_alphabetic()) {
            self.done = true;
            return Err(DecodeError::BadChunkType);
        }

        let payload = &remaining[data_start..data_end];
        let stored_crc = u32::from_be_bytes(remaining[data_end..crc_end].try_into().unwrap());
        let computed_crc = crc::compute(&remaining[type_start..data_end]);
        if computed_crc != stored_crc {
            self.done = true;
            return Err(DecodeError::CrcMismatch);
        }

        self.pos += crc_end;
        if &chunk_type == b"IEND" {
            self.done = true;
        }

        Ok(Chunk {
            chunk_type,
            data: payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chunk(type_bytes: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(type_bytes);
        out.extend_from_slice(payload);
        let crc = crc::compute(&out[4..]);
        out.extend_from_slice(&crc.to_be_bytes());
        out
    }

    #[test]
    fn reads_a_single_iend_chunk() {
        let bytes = make_chunk(b"IEND", &[]);
        let mut reader = ChunkReader::new(&bytes);
        let chunk = reader.next_chunk().unwrap().unwrap();
        assert_eq!(&chunk.chunk_type, b"IEND");
        assert!(chunk.data.is_empty());
        assert!(reader.next_chunk().is_none());
    }

    #[test]
    fn reads_multiple_chunks_in_order() {
        let mut bytes = make_chunk(b"IHDR", &[1, 2, 3]);
        bytes.extend(make_chunk(b"IDAT", &[9, 9]));
        bytes.extend(make_chunk(b"IEND", &[]));

        let mut reader = ChunkReader::new(&bytes);
        let c1 = reader.next_chunk().unwrap().unwrap();
        assert_eq!(&c1.chunk_type, b"IHDR");
        let c2 = reader.next_chunk().unwrap().unwrap();
        assert_eq!(&c2.chunk_type, b"IDAT");
        let c3 = reader.next_chunk().unwrap().unwrap();
        assert_eq!(&c3.chunk_type, b"IEND");
        assert!(reader.next_chunk().is_none());
    }

    #[test]
    fn detects_crc_mismatch() {
        let mut bytes = make_chunk(b"IEND", &[]);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let mut reader = ChunkReader::new(&bytes);
        assert!(matches!(
            reader.next_chunk().unwrap(),
            Err(DecodeError::CrcMismatch)
        ));
    }

    #[test]
    fn detects_truncated_chunk() {
        let bytes = make_chunk(b"IDAT", &[1, 2, 3, 4]);
        let truncated = &bytes[..bytes.len() - 2];
        let mut reader = ChunkReader::new(truncated);
        assert!(matches!(
            reader.next_chunk().unwrap(),
            Err(DecodeError::TruncatedInput)
        ));
    }

    #[test]
    fn detects_length_too_large() {
        let mut bytes = vec![0x80, 0x00, 0x00, 0x00]; // length = 2^31
        bytes.extend_from_slice(b"IDAT");
        let mut reader = ChunkReader::new(&bytes);
        assert!(matches!(
            reader.next_chunk().unwrap(),
            Err(DecodeError::LengthTooLarge)
        ));
    }

    #[test]
    fn ancillary_bit_detection() {
        let critical = Chunk {
            chunk_type: *b"IDAT",
            data: &[],
        };
        assert!(!critical.is_ancillary());
        let ancillary = Chunk {
            chunk_type: *b"tEXt",
            data: &[],
        };
        assert!(ancillary.is_ancillary());
    }
}
