use crate::error::InvariantViolation;
use crate::meta::{Channels, Colorspace, ImageMeta};

/// A decoded image: its `ImageMeta` data plus raw pixel data.
///
/// Pixel data is row-major, top to bottom, with components in R, G, B[, A]
/// order. An `Image` can only be constructed when the pixel data holds
/// exactly `width * height * channels` bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
  meta: ImageMeta,
  pixels: Vec<u8>,
}

impl Image {
  /// Creates an image from its metadata and raw pixel data.
  pub fn new(meta: ImageMeta, pixels: Vec<u8>) -> Result<Self, InvariantViolation> {
    meta.validate()?;

    let expected = meta.pixel_len();

    if pixels.len() != expected {
      return Err(InvariantViolation::PixelLength { expected, actual: pixels.len() });
    }

    Ok(Self { meta, pixels })
  }

  /// Creates an image from untyped metadata, such as values received over an
  /// FFI boundary or from another image library.
  pub fn from_raw(
    width: u32,
    height: u32,
    channels: u8,
    colorspace: u8,
    pixels: Vec<u8>,
  ) -> Result<Self, InvariantViolation> {
    let meta = ImageMeta {
      width,
      height,
      channels: Channels::try_from(channels)?,
      colorspace: Colorspace::try_from(colorspace)?,
    };

    Self::new(meta, pixels)
  }

  // Used by the decoder, which sizes `pixels` from a validated header.
  pub(crate) fn from_parts_unchecked(meta: ImageMeta, pixels: Vec<u8>) -> Self {
    debug_assert_eq!(pixels.len(), meta.pixel_len());
    Self { meta, pixels }
  }

  pub fn meta(&self) -> &ImageMeta {
    &self.meta
  }

  pub fn width(&self) -> u32 {
    self.meta.width
  }

  pub fn height(&self) -> u32 {
    self.meta.height
  }

  pub fn channels(&self) -> Channels {
    self.meta.channels
  }

  pub fn colorspace(&self) -> Colorspace {
    self.meta.colorspace
  }

  /// The image's raw pixel data.
  pub fn pixels(&self) -> &[u8] {
    &self.pixels
  }

  pub fn into_pixels(self) -> Vec<u8> {
    self.pixels
  }

  pub fn into_parts(self) -> (ImageMeta, Vec<u8>) {
    (self.meta, self.pixels)
  }
}
