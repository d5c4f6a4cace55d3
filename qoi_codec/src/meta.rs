use crate::error::{MetaError, StructuralError};

pub const QOI_BYTES_END: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];
pub const QOI_BYTES_MAGIC: &[u8; 4] = b"qoif";
pub const QOI_CACHE_LEN: usize = 64;
pub const QOI_HEADER_LEN: usize = 14;
pub const QOI_MAX_RUN: u8 = 62;

/// Upper bound on `width * height`. At 5 bytes per pixel worst case this
/// keeps an encoded stream below 2GB.
pub const QOI_PIXELS_MAX: u64 = 400_000_000;

/// Metadata describing an Image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImageMeta {
  /// The number of color channels the image's pixels contain, see
  /// [Channels].
  pub channels: Channels,
  /// The image's colorspace, see [Colorspace].
  pub colorspace: Colorspace,
  /// The image's height, must be greater than zero.
  pub height: u32,
  /// The image's width, must be greater than zero.
  pub width: u32,
}

impl ImageMeta {
  /// Checks the dimensions: both must be non-zero and their product must not
  /// exceed [QOI_PIXELS_MAX].
  pub fn validate(&self) -> Result<(), MetaError> {
    let (width, height) = (self.width, self.height);

    if width == 0 || height == 0 {
      return Err(MetaError::InvalidDimensions { width, height });
    }

    if width as u64 * height as u64 > QOI_PIXELS_MAX {
      return Err(MetaError::TooManyPixels { width, height });
    }

    Ok(())
  }

  /// Returns the total number of pixels that make up the image.
  pub fn num_pixels(&self) -> usize {
    self.width as usize * self.height as usize
  }

  /// Returns the length in bytes of the image's raw pixel data.
  pub fn pixel_len(&self) -> usize {
    self.num_pixels() * self.channels.count()
  }

  /// Serializes the metadata into the 14 byte QOI header.
  pub fn to_header_bytes(&self) -> [u8; QOI_HEADER_LEN] {
    let mut header = [0; QOI_HEADER_LEN];

    header[..4].copy_from_slice(QOI_BYTES_MAGIC);
    header[4..8].copy_from_slice(&self.width.to_be_bytes());
    header[8..12].copy_from_slice(&self.height.to_be_bytes());
    header[12] = self.channels as u8;
    header[13] = self.colorspace as u8;

    header
  }

  /// Parses and validates a QOI header from the start of `bytes`.
  pub fn from_header_bytes(bytes: &[u8]) -> Result<Self, StructuralError> {
    let header: &[u8; QOI_HEADER_LEN] = bytes
      .get(..QOI_HEADER_LEN)
      .and_then(|slice| slice.try_into().ok())
      .ok_or(StructuralError::TooShort { len: bytes.len() })?;

    let magic = [header[0], header[1], header[2], header[3]];

    if &magic != QOI_BYTES_MAGIC {
      return Err(StructuralError::InvalidMagic(magic));
    }

    let meta = ImageMeta {
      width: u32::from_be_bytes([header[4], header[5], header[6], header[7]]),
      height: u32::from_be_bytes([header[8], header[9], header[10], header[11]]),
      channels: Channels::try_from(header[12])?,
      colorspace: Colorspace::try_from(header[13])?,
    };

    meta.validate()?;

    Ok(meta)
  }
}

/// The channel layout of an image's raw pixel data. Color channels are
/// assumed to not be pre-multiplied with the alpha channel
/// ("un-premultiplied alpha").
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Channels {
  Rgb = 3,
  Rgba = 4,
}

impl Channels {
  /// Returns the number of bytes per pixel.
  pub fn count(self) -> usize {
    self as usize
  }
}

/// A `TryFrom` implementation for converting any `u8` into `Channels`. Only
/// `3` and `4` are valid.
impl TryFrom<u8> for Channels {
  type Error = MetaError;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    match byte {
      3 => Ok(Channels::Rgb),
      4 => Ok(Channels::Rgba),
      _ => Err(MetaError::InvalidChannels(byte)),
    }
  }
}

/// The colorspace an image's pixels were authored in. This is informative
/// only, the codec never transforms pixel values based on it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Colorspace {
  /// sRGB with linear alpha.
  Srgb = 0,
  /// All channels linear.
  Linear = 1,
}

/// A `TryFrom` implemenation for converting any `u8` into a `Colorspace`.
/// `1` maps to `Colorspace::Linear`, and `0` maps to `Colorspace::Srgb`. All
/// other `u8` values are invalid.
impl TryFrom<u8> for Colorspace {
  type Error = MetaError;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    match byte {
      0 => Ok(Colorspace::Srgb),
      1 => Ok(Colorspace::Linear),
      _ => Err(MetaError::InvalidColorspace(byte)),
    }
  }
}
