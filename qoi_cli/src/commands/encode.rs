use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use image::DynamicImage;
use qoi_codec::{encode_file, Channels, Colorspace, Image, ImageMeta};
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct EncodeArgs {
  /// Source image, any format supported by the `image` crate.
  pub input: PathBuf,
  /// Destination QOI file.
  pub output: PathBuf,
  /// Mark the image's colorspace as linear instead of sRGB.
  #[arg(long)]
  pub linear: bool,
  /// Store an alpha channel even if the source has none.
  #[arg(long)]
  pub alpha: bool,
}

pub fn run(args: &EncodeArgs) -> anyhow::Result<()> {
  info!("Encoding {} to {}", args.input.display(), args.output.display());

  let source = image::open(&args.input)
    .with_context(|| format!("Failed to load {}", args.input.display()))?;
  let image = to_qoi_image(source, args)?;

  debug!(width = image.width(), height = image.height(), channels = ?image.channels());

  encode_file(&image, &args.output)
    .with_context(|| format!("Failed to write {}", args.output.display()))?;

  Ok(())
}

// Converts a decoded source image into the raw RGB or RGBA layout QOI takes.
fn to_qoi_image(source: DynamicImage, args: &EncodeArgs) -> anyhow::Result<Image> {
  let colorspace = match args.linear {
    true => Colorspace::Linear,
    false => Colorspace::Srgb,
  };

  let (width, height) = (source.width(), source.height());

  let (channels, pixels) = match args.alpha || source.color().has_alpha() {
    true => (Channels::Rgba, source.into_rgba8().into_raw()),
    false => (Channels::Rgb, source.into_rgb8().into_raw()),
  };

  let meta = ImageMeta { width, height, channels, colorspace };

  Ok(Image::new(meta, pixels)?)
}

#[cfg(test)]
mod tests {
  use image::{Rgb, RgbImage, Rgba, RgbaImage};

  use super::*;

  fn args(linear: bool, alpha: bool) -> EncodeArgs {
    EncodeArgs { input: PathBuf::new(), output: PathBuf::new(), linear, alpha }
  }

  #[test]
  fn test_rgb_source_stays_rgb() {
    let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 3, Rgb([1, 2, 3])));
    let image = to_qoi_image(source, &args(false, false)).expect("Failed to convert image");

    assert_eq!(image.channels(), Channels::Rgb);
    assert_eq!(image.colorspace(), Colorspace::Srgb);
    assert_eq!(image.pixels(), [1u8, 2, 3].repeat(6).as_slice());
  }

  #[test]
  fn test_forced_alpha() {
    let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([1, 2, 3])));
    let image = to_qoi_image(source, &args(true, true)).expect("Failed to convert image");

    assert_eq!(image.channels(), Channels::Rgba);
    assert_eq!(image.colorspace(), Colorspace::Linear);
    assert_eq!(image.pixels(), &[1, 2, 3, 255]);
  }

  #[test]
  fn test_rgba_source_keeps_alpha() {
    let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4])));
    let image = to_qoi_image(source, &args(false, false)).expect("Failed to convert image");

    assert_eq!(image.pixels(), &[1, 2, 3, 4]);
  }
}
