use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use image::{DynamicImage, RgbImage, RgbaImage};
use qoi_codec::{decode_file, Channels, Image};
use tracing::info;

#[derive(Debug, Args)]
pub struct DecodeArgs {
  /// Source QOI file.
  pub input: PathBuf,
  /// Destination image, its format is chosen by the extension.
  pub output: PathBuf,
}

pub fn run(args: &DecodeArgs) -> anyhow::Result<()> {
  info!("Decoding {} to {}", args.input.display(), args.output.display());

  let image = decode_file(&args.input)
    .with_context(|| format!("Failed to load {}", args.input.display()))?;

  info!("Read image with size {} x {}", image.width(), image.height());

  to_dynamic_image(image)?
    .save(&args.output)
    .with_context(|| format!("Failed to write {}", args.output.display()))?;

  Ok(())
}

// Wraps decoded QOI pixel data in the `image` crate's buffer types.
fn to_dynamic_image(image: Image) -> anyhow::Result<DynamicImage> {
  let (meta, pixels) = image.into_parts();

  let dynamic = match meta.channels {
    Channels::Rgb => RgbImage::from_raw(meta.width, meta.height, pixels).map(DynamicImage::ImageRgb8),
    Channels::Rgba => {
      RgbaImage::from_raw(meta.width, meta.height, pixels).map(DynamicImage::ImageRgba8)
    }
  };

  dynamic.context("Decoded pixel data does not match the image's dimensions")
}

#[cfg(test)]
mod tests {
  use qoi_codec::encode_file;

  use super::*;
  use crate::commands::encode::{self, EncodeArgs};

  #[test]
  fn test_png_roundtrip_through_qoi() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let png = dir.path().join("source.png");
    let qoi = dir.path().join("image.qoi");
    let decoded_png = dir.path().join("decoded.png");

    let source = RgbaImage::from_fn(5, 4, |x, y| image::Rgba([x as u8 * 40, y as u8 * 60, 7, 200]));
    source.save(&png).expect("Failed to write png");

    encode::run(&EncodeArgs { input: png, output: qoi.clone(), linear: false, alpha: false })
      .expect("Failed to encode");
    run(&DecodeArgs { input: qoi, output: decoded_png.clone() }).expect("Failed to decode");

    let decoded = image::open(&decoded_png).expect("Failed to read png").into_rgba8();
    assert_eq!(decoded, source);
  }

  #[test]
  fn test_decoding_rgb_qoi_to_bmp() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let qoi = dir.path().join("image.qoi");
    let bmp = dir.path().join("image.bmp");

    let image = Image::from_raw(2, 1, 3, 0, vec![10, 20, 30, 40, 50, 60]).expect("Failed to build image");
    encode_file(&image, &qoi).expect("Failed to write qoi");

    run(&DecodeArgs { input: qoi, output: bmp.clone() }).expect("Failed to decode");

    let decoded = image::open(&bmp).expect("Failed to read bmp").into_rgb8();
    assert_eq!(decoded.into_raw(), vec![10, 20, 30, 40, 50, 60]);
  }
}
