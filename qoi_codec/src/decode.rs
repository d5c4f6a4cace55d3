use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{Error, StructuralError};
use crate::image::Image;
use crate::meta::{ImageMeta, QOI_BYTES_END, QOI_HEADER_LEN};
use crate::op::Op;
use crate::pixel::{Pixel, PixelDiff};
use crate::state::State;

/// Decodes a complete QOI byte stream into an `Image`.
///
/// The header is fully validated before any pixel data is allocated. Decoding
/// stops as soon as `width * height` pixels have been produced, so trailing
/// bytes, including the end marker, are never inspected. If the ops run out
/// before that, the remaining pixels repeat the last decoded pixel.
pub fn decode(bytes: &[u8]) -> Result<Image, Error> {
  let meta = decode_header(bytes)?;
  let channels = meta.channels.count();
  let pixel_len = meta.pixel_len();
  let chunks_end = bytes.len() - QOI_BYTES_END.len();

  let mut pixels = Vec::with_capacity(pixel_len);
  let mut state = State::new();
  let mut pos = QOI_HEADER_LEN;

  while pixels.len() < pixel_len {
    let remaining = (pixel_len - pixels.len()) / channels;

    let op = match pos < chunks_end {
      true => Op::read_from(bytes, &mut pos),
      false => None,
    };

    let repeat = match op {
      Some(op) => decode_op(&mut state, op).min(remaining),
      None => {
        trace!(remaining, "QOI op stream exhausted, repeating last pixel");
        remaining
      }
    };

    let pixel = state.prev_pixel;
    let components = [pixel.r, pixel.g, pixel.b, pixel.a];

    for _ in 0..repeat {
      pixels.extend_from_slice(&components[..channels]);
    }
  }

  debug!(
    width = meta.width,
    height = meta.height,
    channels,
    bytes = bytes.len(),
    "decoded QOI image"
  );

  Ok(Image::from_parts_unchecked(meta, pixels))
}

/// Decodes only the header of a QOI byte stream, applying every structural
/// check `decode` applies before it allocates.
pub fn decode_header(bytes: &[u8]) -> Result<ImageMeta, StructuralError> {
  if bytes.len() < QOI_HEADER_LEN + QOI_BYTES_END.len() {
    return Err(StructuralError::TooShort { len: bytes.len() });
  }

  ImageMeta::from_header_bytes(bytes)
}

/// Reads a QOI byte stream from the provided `reader` to its end and decodes
/// it.
///
/// This function supports reading from in-memory structures or IO streams by
/// accepting a generic trait bound of `std::io::Read`.
pub fn decode_image<R: Read>(mut reader: R) -> Result<Image, Error> {
  let mut bytes = Vec::new();

  reader.read_to_end(&mut bytes)?;

  decode(&bytes)
}

/// Reads and decodes the QOI file at `path`.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Image, Error> {
  let bytes = fs::read(path)?;

  decode(&bytes)
}

// Applies a single decoded `op` to the decoding `state`, and returns how many
// times the resulting `state.prev_pixel` must be emitted. Runs leave the cache
// untouched, every other op caches its pixel.
fn decode_op(state: &mut State, op: Op) -> usize {
  let prev_pixel = state.prev_pixel;

  let pixel = match op {
    Op::Run(count) => {
      return count as usize;
    }
    Op::Index(index) => state.cache_get(index),
    Op::Diff(diff_r, diff_g, diff_b) => {
      Pixel::from_diff(PixelDiff::Small(diff_r, diff_g, diff_b), &prev_pixel)
    }
    Op::Luma(luma_g, luma_rg, luma_bg) => {
      Pixel::from_diff(PixelDiff::Luma(luma_g, luma_rg, luma_bg), &prev_pixel)
    }
    Op::Rgb(r, g, b) => Pixel { r, g, b, a: prev_pixel.a },
    Op::Rgba(r, g, b, a) => Pixel { r, g, b, a },
  };

  state.cache_insert(pixel);
  state.prev_pixel = pixel;

  1
}
