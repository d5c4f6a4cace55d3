use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, InvariantViolation};
use crate::image::Image;
use crate::meta::{ImageMeta, QOI_BYTES_END, QOI_HEADER_LEN, QOI_MAX_RUN};
use crate::op::Op;
use crate::pixel::Pixel;
use crate::state::State;

/// Encodes an `Image` into a complete QOI byte stream: header, ops, and end
/// marker.
pub fn encode(image: &Image) -> Result<Vec<u8>, Error> {
  encode_pixels(image.pixels(), image.meta())
}

/// Encodes raw pixel data described by `meta` into a complete QOI byte
/// stream.
///
/// Fails with [InvariantViolation] if `meta` is out of range or `pixels` does
/// not hold exactly `width * height * channels` bytes. Nothing is encoded in
/// that case.
pub fn encode_pixels(pixels: &[u8], meta: &ImageMeta) -> Result<Vec<u8>, Error> {
  meta.validate().map_err(InvariantViolation::from)?;

  let expected = meta.pixel_len();

  if pixels.len() != expected {
    return Err(InvariantViolation::PixelLength { expected, actual: pixels.len() }.into());
  }

  let channels = meta.channels.count();
  let mut dest = Vec::with_capacity(
    meta.num_pixels() * (channels + 1) + QOI_HEADER_LEN + QOI_BYTES_END.len(),
  );

  dest.extend_from_slice(&meta.to_header_bytes());

  let state = pixels.chunks_exact(channels).fold(State::new(), |mut state, chunk| {
    let pixel = Pixel::from_channels(chunk, state.prev_pixel.a);

    encode_pixel(&mut state, pixel, &mut dest);
    state.prev_pixel = pixel;
    state
  });

  if state.run_count > 0 {
    Op::Run(state.run_count).write_to(&mut dest);
  }

  dest.extend_from_slice(&QOI_BYTES_END);

  debug!(
    width = meta.width,
    height = meta.height,
    channels,
    bytes = dest.len(),
    "encoded QOI image"
  );

  Ok(dest)
}

/// Encodes an `Image` and writes the QOI byte stream to the provided
/// `writer`, which is flushed afterwards.
///
/// The image is fully encoded before the first write, so nothing is written
/// when encoding fails.
pub fn encode_image<W: Write>(image: &Image, mut writer: W) -> Result<(), Error> {
  let bytes = encode(image)?;

  writer.write_all(&bytes)?;
  writer.flush()?;

  Ok(())
}

/// Encodes an `Image` into a QOI file at `path`, creating or truncating it.
/// The file is left untouched when encoding fails.
pub fn encode_file<P: AsRef<Path>>(image: &Image, path: P) -> Result<(), Error> {
  let bytes = encode(image)?;
  let mut writer = BufWriter::new(File::create(path)?);

  writer.write_all(&bytes)?;
  writer.flush()?;

  Ok(())
}

// Encodes the provided pixel using the QOI op encoding scheme and provided
// `state`, appending any completed op to `dest`. Does not advance
// `state.prev_pixel`.
fn encode_pixel(state: &mut State, pixel: Pixel, dest: &mut Vec<u8>) {
  if pixel == state.prev_pixel {
    state.run_count += 1;

    if state.run_count == QOI_MAX_RUN {
      Op::Run(QOI_MAX_RUN).write_to(dest);
      state.run_count = 0;
    }

    return;
  }

  if state.run_count > 0 {
    Op::Run(state.run_count).write_to(dest);
    state.run_count = 0;
  }

  let op = if let Some(index) = state.cache_match_or_replace(pixel) {
    Op::Index(index)
  } else if let Some(diff) = pixel.diff(&state.prev_pixel) {
    Op::from_diff(diff)
  } else if pixel.a == state.prev_pixel.a {
    Op::Rgb(pixel.r, pixel.g, pixel.b)
  } else {
    Op::Rgba(pixel.r, pixel.g, pixel.b, pixel.a)
  };

  op.write_to(dest);
}
