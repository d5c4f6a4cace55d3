use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use qoi_codec::{decode_header, ImageMeta};

#[derive(Debug, Args)]
pub struct InfoArgs {
  /// QOI file to inspect.
  pub input: PathBuf,
}

pub fn run(args: &InfoArgs) -> anyhow::Result<()> {
  let bytes = fs::read(&args.input)
    .with_context(|| format!("Failed to read {}", args.input.display()))?;
  let meta = decode_header(&bytes)
    .with_context(|| format!("Failed to parse {}", args.input.display()))?;

  println!("{}", describe(&meta, bytes.len()));

  Ok(())
}

// Formats the header fields and the encoded-to-raw size ratio.
fn describe(meta: &ImageMeta, encoded_len: usize) -> String {
  let ratio = encoded_len as f64 / meta.pixel_len() as f64;

  format!(
    "{}x{} {:?} {:?}, {} bytes ({:.1}% of raw)",
    meta.width,
    meta.height,
    meta.channels,
    meta.colorspace,
    encoded_len,
    ratio * 100.0
  )
}

#[cfg(test)]
mod tests {
  use qoi_codec::{Channels, Colorspace};

  use super::*;

  #[test]
  fn test_describe() {
    let meta = ImageMeta { width: 10, height: 10, channels: Channels::Rgba, colorspace: Colorspace::Srgb };

    assert_eq!(describe(&meta, 100), "10x10 Rgba Srgb, 100 bytes (25.0% of raw)");
  }
}
