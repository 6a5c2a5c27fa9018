#![allow(dead_code)]

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Everything that can go wrong while decoding a PNG datastream.
///
/// Every variant is produced at exactly one pipeline stage and is fatal: there is
/// no retry path and no partial `Image` is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes were available than the current field required.
    TruncatedInput,
    /// The first 8 bytes of the input did not match the PNG signature.
    BadSignature,
    /// A chunk declared a length greater than 2^31 - 1.
    LengthTooLarge,
    /// A chunk's stored CRC-32 did not match the computed one.
    CrcMismatch,
    /// A chunk type was not four ASCII letters.
    BadChunkType,
    /// A critical (non-ancillary) chunk type was not recognized.
    UnknownCriticalChunk([u8; 4]),
    /// An IHDR field was out of range, or the first chunk in the stream was
    /// not IHDR at all.
    InvalidIhdr(&'static str),
    /// The (color_type, bit_depth) pair is not one of the seven legal pairs.
    InvalidColorDepth { color_type: u8, bit_depth: u8 },
    /// An IDAT chunk appeared after the contiguous IDAT run had ended.
    NonContiguousIdat,
    /// Color type 3 (indexed) with no PLTE chunk present.
    MissingPalette,
    /// PLTE or gAMA appeared out of order, or duplicated.
    MisorderedChunk(&'static str),
    /// PLTE held more entries than `2^bit_depth` allows.
    PaletteTooLarge,
    /// The zlib/DEFLATE stream failed to decompress.
    DecompressError,
    /// Decompressed size did not match the size derived from the header.
    SizeMismatch { expected: usize, actual: usize },
    /// A scanline filter-type byte was not in 0..=4.
    BadFilterCode(u8),
    /// A palette index in the sample data exceeded the palette's length.
    PaletteIndexOutOfRange { index: usize, palette_len: usize },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::TruncatedInput => write!(f, "input ended before expected field"),
            DecodeError::BadSignature => write!(f, "not a PNG file: bad signature"),
            DecodeError::LengthTooLarge => write!(f, "chunk length exceeds 2^31 - 1"),
            DecodeError::CrcMismatch => write!(f, "chunk CRC-32 mismatch"),
            DecodeError::BadChunkType => write!(f, "chunk type is not four ASCII letters"),
            DecodeError::UnknownCriticalChunk(t) => write!(
                f,
                "unknown critical chunk type {:?}",
                String::from_utf8_lossy(t)
            ),
            DecodeError::InvalidIhdr(field) => write!(f, "invalid IHDR field: {field}"),
            DecodeError::InvalidColorDepth {
                color_type,
                bit_depth,
            } => write!(
                f,
                "color type {color_type} does not support bit depth {bit_depth}"
            ),
            DecodeError::NonContiguousIdat => write!(f, "IDAT chunks are not contiguous"),
            DecodeError::MissingPalette => write!(f, "color type 3 requires a PLTE chunk"),
            DecodeError::MisorderedChunk(reason) => write!(f, "misordered chunk: {reason}"),
            DecodeError::PaletteTooLarge => write!(f, "PLTE has more entries than bit depth allows"),
            DecodeError::DecompressError => write!(f, "zlib/DEFLATE decompression failed"),
            DecodeError::SizeMismatch { expected, actual } => write!(
                f,
                "decompressed size {actual} does not match expected size {expected}"
            ),
            DecodeError::BadFilterCode(code) => write!(f, "unsupported filter type code {code}"),
            DecodeError::PaletteIndexOutOfRange { index, palette_len } => write!(
                f,
                "palette index {index} out of range for palette of length {palette_len}"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}
