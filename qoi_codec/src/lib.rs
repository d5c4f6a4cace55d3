//! This crate implements a lossless encoder and decoder for the
//! [QOI image format](https://qoiformat.org).
//!
//! The two primary exports are the `encode` and `decode` functions, which
//! transcode between an in-memory [Image] and a complete QOI byte stream.
//! Both are pure, single pass transformations: all encoding state (the
//! previous pixel, the 64 slot pixel cache, and the pending run) lives for the
//! duration of one call, so calls are re-entrant and may run concurrently on
//! independent inputs.
//!
//! Thin wrappers read and write encoded images through `std::io::Read` and
//! `std::io::Write` (`decode_image`, `encode_image`) or directly from and to
//! files (`decode_file`, `encode_file`).
//!
//! To keep this crate simple, it does not support decoding other image
//! formats. To encode an image, it will first need to be decoded using another
//! method. From there, the decoded pixel data can then be encoded.
//!
//! # In-memory round trip example
//!
//! ```rust
//! use qoi_codec::{decode, encode, Channels, Colorspace, Image, ImageMeta};
//!
//! // A 2x1 image made up of an opaque black and an opaque white pixel.
//! let meta = ImageMeta {
//!   width: 2,
//!   height: 1,
//!   channels: Channels::Rgba,
//!   colorspace: Colorspace::Srgb,
//! };
//! let image = Image::new(meta, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
//!
//! let encoded = encode(&image).unwrap();
//! assert_eq!(&encoded[..4], b"qoif");
//!
//! let decoded = decode(&encoded).unwrap();
//! assert_eq!(decoded, image);
//! ```
//!
//! # Error handling example
//!
//! ```rust
//! use qoi_codec::{decode, Error, StructuralError};
//!
//! match decode(b"not a qoi image at all") {
//!   Err(Error::Structural(StructuralError::InvalidMagic(magic))) => {
//!     assert_eq!(&magic, b"not ");
//!   }
//!   other => panic!("unexpected result {:?}", other),
//! }
//! ```
//!

pub use crate::decode::{decode, decode_file, decode_header, decode_image};
pub use crate::encode::{encode, encode_file, encode_image, encode_pixels};
pub use crate::error::{Error, InvariantViolation, MetaError, StructuralError};
pub use crate::image::Image;
pub use crate::meta::{
  Channels,
  Colorspace,
  ImageMeta,
  QOI_BYTES_END,
  QOI_BYTES_MAGIC,
  QOI_CACHE_LEN,
  QOI_HEADER_LEN,
  QOI_MAX_RUN,
  QOI_PIXELS_MAX,
};

mod decode;
mod encode;
mod error;
mod image;
mod meta;
mod op;
mod pixel;
mod state;
