use clap::Subcommand;

mod decode;
mod encode;
mod info;

pub use decode::DecodeArgs;
pub use encode::EncodeArgs;
pub use info::InfoArgs;

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Encode a PNG or BMP image as QOI.
  Encode(EncodeArgs),
  /// Decode a QOI image to PNG or BMP.
  Decode(DecodeArgs),
  /// Print a QOI image's header.
  Info(InfoArgs),
}

pub fn run(command: Command) -> anyhow::Result<()> {
  match command {
    Command::Encode(args) => encode::run(&args),
    Command::Decode(args) => decode::run(&args),
    Command::Info(args) => info::run(&args),
  }
}
