//! Command line converter between QOI and the formats the `image` crate
//! reads and writes, such as PNG and BMP.
//!
//! # Commands
//!
//! ```sh
//! qoi encode photo.png photo.qoi
//! ```
//!
//! Loads `photo.png` and writes it as a QOI image. The image is stored as RGB
//! unless the source has an alpha channel or `--alpha` is given. `--linear`
//! marks the image's colorspace as linear instead of sRGB.
//!
//! ```sh
//! qoi decode photo.qoi photo.bmp
//! ```
//!
//! Decodes `photo.qoi` and saves it in the format implied by the output's
//! extension.
//!
//! ```sh
//! qoi info photo.qoi
//! ```
//!
//! Prints the QOI header and the compression ratio.
//!

use clap::Parser;

mod commands;

use commands::Command;

/// Convert images between QOI and PNG/BMP.
#[derive(Debug, Parser)]
#[command(name = "qoi", version, about)]
struct Cli {
  /// Log debug output.
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let subscriber = tracing_subscriber::fmt()
    .with_max_level(if cli.verbose {
      tracing::Level::DEBUG
    } else {
      tracing::Level::INFO
    })
    .with_target(false)
    .finish();
  let _ = tracing::subscriber::set_global_default(subscriber);

  commands::run(cli.command)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parsing_encode_command() {
    let cli = Cli::try_parse_from(["qoi", "encode", "in.png", "out.qoi", "--linear"])
      .expect("Failed to parse arguments");

    assert!(!cli.verbose);
    assert!(matches!(cli.command, Command::Encode(ref args) if args.linear && !args.alpha));
  }

  #[test]
  fn test_parsing_verbose_after_subcommand() {
    let cli = Cli::try_parse_from(["qoi", "info", "in.qoi", "-v"]).expect("Failed to parse arguments");

    assert!(cli.verbose);
    assert!(matches!(cli.command, Command::Info(_)));
  }

  #[test]
  fn test_parsing_missing_output() {
    assert!(Cli::try_parse_from(["qoi", "decode", "in.qoi"]).is_err());
  }
}
