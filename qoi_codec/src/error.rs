use std::io;

use thiserror::Error;

/// The error type returned by every public function of this crate.
#[derive(Debug, Error)]
pub enum Error {
  /// The encoded stream is malformed, see [StructuralError].
  #[error("malformed QOI stream: {0}")]
  Structural(#[from] StructuralError),
  /// The raster handed to the encoder is inconsistent, see
  /// [InvariantViolation].
  #[error("invalid raster: {0}")]
  InvariantViolation(#[from] InvariantViolation),
  /// Any `std::io::Error` raised while reading an encoded image from a source
  /// or writing one to a destination. The core `encode` and `decode`
  /// functions never produce this.
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),
}

/// Raised while decoding, always before any pixel data is allocated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
  /// The stream cannot even hold a header and the end marker.
  #[error("stream of {len} bytes is shorter than a header and end marker")]
  TooShort { len: usize },
  /// The first four bytes are not `qoif`.
  #[error("bad magic {0:02x?}, expected `qoif`")]
  InvalidMagic([u8; 4]),
  /// The header declares metadata the format does not allow.
  #[error(transparent)]
  Meta(#[from] MetaError),
}

/// Raised while encoding or building an [Image](crate::Image), always before
/// any output is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
  /// The pixel buffer does not hold exactly `width * height * channels`
  /// bytes.
  #[error("pixel buffer holds {actual} bytes, expected {expected}")]
  PixelLength { expected: usize, actual: usize },
  /// The raster's metadata is out of range.
  #[error(transparent)]
  Meta(#[from] MetaError),
}

/// A single image metadata field is out of range. Shared by the decoder's
/// header checks and the encoder's raster checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetaError {
  #[error("invalid channel count {0}, expected 3 for RGB or 4 for RGBA")]
  InvalidChannels(u8),
  #[error("invalid image colorspace {0}, expected 0 for sRGB or 1 for linear")]
  InvalidColorspace(u8),
  #[error("invalid image dimensions {width}x{height}")]
  InvalidDimensions { width: u32, height: u32 },
  #[error("image of {width}x{height} exceeds the maximum pixel count")]
  TooManyPixels { width: u32, height: u32 },
}

impl Error {
  /// Returns the metadata error behind this error, whichever side raised it.
  pub fn meta(&self) -> Option<&MetaError> {
    match self {
      Error::Structural(StructuralError::Meta(meta)) => Some(meta),
      Error::InvariantViolation(InvariantViolation::Meta(meta)) => Some(meta),
      _ => None,
    }
  }
}

impl From<MetaError> for Error {
  fn from(meta: MetaError) -> Self {
    Error::InvariantViolation(InvariantViolation::Meta(meta))
  }
}
