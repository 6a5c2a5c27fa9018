//! A PNG decoder: chunk parsing and CRC validation, IDAT concatenation and
//! zlib inflate, scanline unfiltering, Adam7 deinterlacing, and sample
//! normalization to a tight RGB/RGBA buffer.
//!
//! The single entry point is [`decode`]; [`decode_reader`] and
//! [`decode_with_options`] cover reading from a `Read` and opting into the
//! sRGB approximation pass, respectively.

mod chunk;
mod crc;
mod decode;
mod error;
mod filter;
mod header;
mod idat;
mod image;
mod interlace;
mod metadata;
mod normalize;
mod srgb;

pub use decode::{decode, decode_reader, decode_with_options};
pub use error::{DecodeError, Result};
pub use header::PixelFormat;
pub use image::{DecodeOptions, Image};
pub use normalize::OutputFormat;
