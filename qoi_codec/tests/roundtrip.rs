//! Property-based tests for the encoder and decoder.
//!
//! Uses proptest to verify round-trip identity over arbitrary rasters, and
//! that the decoder survives arbitrary op streams.

use proptest::prelude::*;
use qoi_codec::{decode, encode, Image, QOI_BYTES_END, QOI_HEADER_LEN};

// Random bytes rarely repeat, so half of the generated images draw their
// components from a tiny palette to exercise runs, the cache, and diffs.
fn image_strategy() -> impl Strategy<Value = Image> {
  (1u32..24, 1u32..24, prop_oneof![Just(3u8), Just(4u8)], 0u8..2, any::<bool>())
    .prop_flat_map(|(width, height, channels, colorspace, palette)| {
      let len = (width * height) as usize * channels as usize;
      let component = if palette {
        prop_oneof![Just(0u8), Just(1u8), Just(2u8), Just(128u8), Just(255u8)].boxed()
      } else {
        any::<u8>().boxed()
      };

      (
        Just(width),
        Just(height),
        Just(channels),
        Just(colorspace),
        prop::collection::vec(component, len),
      )
    })
    .prop_map(|(width, height, channels, colorspace, pixels)| {
      Image::from_raw(width, height, channels, colorspace, pixels).expect("Invalid generated image")
    })
}

fn header(width: u32, height: u32, channels: u8) -> Vec<u8> {
  let mut header = b"qoif".to_vec();

  header.extend_from_slice(&width.to_be_bytes());
  header.extend_from_slice(&height.to_be_bytes());
  header.extend_from_slice(&[channels, 0]);
  header
}

proptest! {
  /// Test that decoding an encoded image reproduces it exactly.
  #[test]
  fn roundtrip_identity(image in image_strategy()) {
    let encoded = encode(&image).unwrap();
    let decoded = decode(&encoded).unwrap();

    prop_assert_eq!(decoded, image);
  }

  /// Test that the encoded size never exceeds the worst case of one tag byte
  /// per pixel plus the raw components.
  #[test]
  fn encoded_size_is_bounded(image in image_strategy()) {
    let encoded = encode(&image).unwrap();
    let worst_case = image.pixels().len() + image.meta().num_pixels()
      + QOI_HEADER_LEN + QOI_BYTES_END.len();

    prop_assert!(encoded.len() <= worst_case);
    prop_assert!(encoded.ends_with(&QOI_BYTES_END));
  }

  /// Test that any op stream behind a valid header decodes to an image of the
  /// declared size.
  #[test]
  fn arbitrary_ops_decode_to_declared_size(
    width in 1u32..32,
    height in 1u32..32,
    channels in prop_oneof![Just(3u8), Just(4u8)],
    ops in prop::collection::vec(any::<u8>(), 0..512),
  ) {
    let mut source = header(width, height, channels);
    source.extend_from_slice(&ops);
    source.extend_from_slice(&QOI_BYTES_END);

    let image = decode(&source).unwrap();

    prop_assert_eq!(image.pixels().len(), (width * height) as usize * channels as usize);
  }

  /// Test that the decoder never panics on arbitrary input.
  #[test]
  fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
    let _ = decode(&bytes);
  }
}
