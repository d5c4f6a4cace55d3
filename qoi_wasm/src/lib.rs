//! A [WebAssembly](https://developer.mozilla.org/en-US/docs/WebAssembly)
//! wrapper of the `qoi_codec` crate. This makes it possible to use the crate on any
//! host system that supports WebAssembly such as a web browser or on systems
//! that have implemented [WASI](https://wasi.dev/).
//!
//! Passing and translating rich data types through the WASM FFI boundary isn't
//! supported as of writing this, so some manual setup and teardown steps need
//! to be done to copy the decoded and encoded image data to and from the WASM
//! instance. It's important that these steps are executed in the right order
//! since they involve manually allocating and deallocating raw memory.
//!
//! # JavaScript WebAssembly decode example
//!
//! ```js
//! let wasm = await WebAssembly.instantiateStreaming(fetch('./path-to-wasm.wasm'), {
//!   // "Extern" functions that must be imported into the WASM instance.
//!   env: {
//!     // Callback invoked by the WASM instance when decoding an image has
//!     // successfully completed.
//!     on_decode_complete: (pointer, width, height, channels, colorspace) => {
//!       // Address that points to the beginning of the decoded image data in
//!       // the WASM instance's memory.
//!       console.log(pointer);
//!
//!       // The image's dimensions.
//!       console.log(width, height);
//!
//!       // Number of pixel color channels and the image's colorspace.
//!       console.log(channels, colorspace);
//!
//!       // Copy the decoded pixel data out of the WASM instance's memory.
//!       let size = width * height * channels;
//!       let decodedImage = wasm.instance.exports.memory.slice(pointer, size);
//!
//!       // Deallocate the decoded pixel data WASM memory.
//!       wasm.instance.exports.qoi_dealloc(pointer, size);
//!     },
//!
//!     // Callback invoked by the WASM instance when an error occurs while
//!     // decoding an image.
//!     on_decode_error: (code) => {
//!       // Error code that maps to the type of error that occurred, see
//!       // `ErrorCode`.
//!       console.error(code);
//!     },
//!
//!     // Ignore these for this example.
//!     on_encode_complete: () => {},
//!     on_encode_error: () => {},
//!   },
//! });
//!
//! // An imaginary QOI image buffer.
//! let encodedImage = new ArrayBuffer(..);
//!
//! // Copy the QOI image buffer into the WASM instance's memory.
//! let size = encodedImage.byteLength;
//! let pointer = wasm.instance.exports.qoi_malloc(size);
//! let slice = new Uint8Array(wasm.instance.exports.memory, pointer, size);
//! slice.set(encodedImage);
//!
//! // Call the WASM instance's `qoi_image_decode` function with the image's
//! // pointer and size in memory.
//! wasm.instance.exports.qoi_image_decode(pointer, size);
//!
//! // Deallocate the memory used to copy the encoded image into the WASM
//! // instance.
//! wasm.instance.exports.qoi_dealloc(pointer, size);
//! ```
//!
//! # JavaScript WebAssembly encode example
//!
//! ```js
//! let wasm = await WebAssembly.instantiateStreaming(fetch('./path-to-wasm.wasm'), {
//!   env: {
//!    // Callback invoked by the WASM instance when encoding an image has
//!    // successfully completed.
//!    on_encode_complete: (pointer, size) => {
//!      // Address that points to the beginning of the encoded image data in
//!      // WASM instance's memory.
//!      console.log(pointer);
//!
//!      // Size of the encoded image in memory.
//!      console.log(size);
//!
//!      // Copy the encoded image data out of the WASM instance's memory.
//!      let encodedImage = wasm.instance.exports.memory.slice(pointer, size);
//!
//!      // Deallocate the encoded image data WASM memory.
//!      wasm.instance.exports.qoi_dealloc(pointer, size);
//!    },
//!
//!    on_encode_error: (code) => {
//!      // Error code that maps to the type of error that occurred.
//!      console.error(code);
//!    },
//!
//!    // Ignore these for this example.
//!    on_decode_complete: () => {},
//!    on_decode_error: () => {},
//!   },
//! });
//!
//! // An imaginary buffer of image pixel data to encode.
//! let decodedImage = new ArrayBuffer(..);
//!
//! // Copy the pixel data into the WASM instance's memory.
//! let size = decodedImage.byteLength;
//! let pointer = wasm.instance.exports.qoi_malloc(size);
//! let slice = new Uint8Array(wasm.instance.exports.memory, pointer, size);
//! slice.set(decodedImage);
//!
//! // Call the WASM instance's `qoi_image_encode` function with the pixel
//! // data's pointer and size in memory, as well as the image's width,
//! // height, channels, and colorspace.
//! let imageWidth = 100;
//! let imageHeight = 100;
//! let channels = 4; // Or 3 for RGB.
//! let colorspace = 0; // Or 1 for Linear.
//! wasm.instance.exports.qoi_image_encode(
//!   imageWidth,
//!   imageHeight,
//!   channels,
//!   colorspace,
//!   pointer,
//!   size,
//! );
//!
//! // Deallocate the memory used to copy the decoded pixel data into the WASM
//! // instance.
//! wasm.instance.exports.qoi_dealloc(pointer, size);
//! ```
//!

use qoi_codec::{decode, encode, Error, Image, InvariantViolation, MetaError, StructuralError};

/// Maps a `qoi_codec` error into an integer that can be trivially passed
/// through the WASM FFI boundary.
///
/// | code | error                              |
/// |------|------------------------------------|
/// | 1    | invalid colorspace                 |
/// | 2    | invalid (zero) dimensions          |
/// | 3    | invalid magic bytes                |
/// | 4    | invalid channel count              |
/// | 5    | I/O error                          |
/// | 6    | input too short for a header       |
/// | 7    | pixel data length mismatch         |
/// | 8    | image exceeds the pixel limit      |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
  pub code: u8,
}

impl From<&MetaError> for ErrorCode {
  fn from(error: &MetaError) -> Self {
    match error {
      MetaError::InvalidColorspace(_) => ErrorCode { code: 1 },
      MetaError::InvalidDimensions { .. } => ErrorCode { code: 2 },
      MetaError::InvalidChannels(_) => ErrorCode { code: 4 },
      MetaError::TooManyPixels { .. } => ErrorCode { code: 8 },
    }
  }
}

impl From<InvariantViolation> for ErrorCode {
  fn from(error: InvariantViolation) -> Self {
    match error {
      InvariantViolation::PixelLength { .. } => ErrorCode { code: 7 },
      InvariantViolation::Meta(ref e) => ErrorCode::from(e),
    }
  }
}

impl From<Error> for ErrorCode {
  fn from(error: Error) -> Self {
    match error {
      Error::Structural(StructuralError::TooShort { .. }) => ErrorCode { code: 6 },
      Error::Structural(StructuralError::InvalidMagic(_)) => ErrorCode { code: 3 },
      Error::Structural(StructuralError::Meta(ref e)) => ErrorCode::from(e),
      Error::InvariantViolation(e) => ErrorCode::from(e),
      Error::Io(_) => ErrorCode { code: 5 },
    }
  }
}

/// Builds an image from the untyped values received from the host and encodes
/// it.
pub fn encode_buffer(
  width: u32,
  height: u32,
  channels: u8,
  colorspace: u8,
  pixels: Vec<u8>,
) -> Result<Vec<u8>, ErrorCode> {
  let image = Image::from_raw(width, height, channels, colorspace, pixels)?;

  Ok(encode(&image)?)
}

/// Decodes a complete QOI image received from the host.
pub fn decode_buffer(bytes: &[u8]) -> Result<Image, ErrorCode> {
  Ok(decode(bytes)?)
}

// Hands ownership of `bytes` to the host, which frees it with `qoi_dealloc`
// using the returned length.
#[cfg(target_arch = "wasm32")]
fn into_raw_parts(bytes: Vec<u8>) -> (*mut u8, usize) {
  // A boxed slice's capacity always equals its length, which `qoi_dealloc`
  // relies on.
  let len = bytes.len();
  let ptr = Box::into_raw(bytes.into_boxed_slice()) as *mut u8;

  (ptr, len)
}

// External functions that are expected to be imported into the WASM instance
// from the host.
#[cfg(target_arch = "wasm32")]
extern "C" {
  fn on_decode_complete(buf_ptr: *mut u8, width: u32, height: u32, channels: u8, colorspace: u8);
  fn on_decode_error(err_code: u8);
  fn on_encode_complete(buf_ptr: *mut u8, size: usize);
  fn on_encode_error(err_code: u8);
}

/// Allocates a chunk of linear memory of the given `size`, intended to contain
/// byte (u8) values.
#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub extern "C" fn qoi_malloc(size: usize) -> *mut u8 {
  into_raw_parts(vec![0; size]).0
}

/// Deallocates the memory starting at `ptr` up to `size`.
///
/// # Safety
///
/// This is highly unsafe, due to unchecked variants. This function should only
/// be called once for each allocation created with `qoi_malloc` (or handed
/// out by a completion callback) using the same `size` and the returned `ptr`,
/// otherwise the WASM instance's memory will be corrupted.
#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub unsafe extern "C" fn qoi_dealloc(ptr: *mut u8, size: usize) {
  drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, size)));
}

/// Takes an image's metadata, the size of its pixel data in memory, and a
/// pointer to the data and encodes it as a QOI image.
///
/// Calls `on_encode_complete` with a pointer to the encoded image's data and
/// size.
///
/// Calls `on_encode_error` with an error code if an error occurs.
///
/// The source buffer is copied and stays owned by the host.
///
/// # Safety
///
/// `buf_ptr` must point to `buf_size` readable bytes, such as memory created
/// by calling `qoi_malloc`. Providing an invalid `buf_ptr` or `buf_size` will
/// likely crash the WASM instance.
#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub unsafe extern "C" fn qoi_image_encode(
  width: u32,
  height: u32,
  channels: u8,
  colorspace: u8,
  buf_ptr: *const u8,
  buf_size: usize,
) {
  let source = std::slice::from_raw_parts(buf_ptr, buf_size).to_vec();

  match encode_buffer(width, height, channels, colorspace, source) {
    Ok(dest) => {
      let (ptr, size) = into_raw_parts(dest);
      on_encode_complete(ptr, size);
    }
    Err(e) => on_encode_error(e.code),
  }
}

/// Takes a `buf_ptr` and `buf_size` to a chunk of memory that represents a QOI
/// encoded image and decodes it into raw pixel data.
///
/// Calls `on_decode_complete` with a `ptr` to the decoded pixel data and the
/// image's metadata. The memory size of the image can be derived by
/// multiplying the width * height * channels.
///
/// Calls `on_decode_error` with an error code if an error occurs.
///
/// # Safety
///
/// `buf_ptr` must point to `buf_size` readable bytes, such as memory created
/// by calling `qoi_malloc`. Providing an invalid `buf_ptr` or `buf_size` will
/// likely crash the WASM instance.
#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub unsafe extern "C" fn qoi_image_decode(buf_ptr: *const u8, buf_size: usize) {
  let source = std::slice::from_raw_parts(buf_ptr, buf_size);

  match decode_buffer(source) {
    Ok(image) => {
      let (meta, pixels) = image.into_parts();
      let (ptr, _) = into_raw_parts(pixels);

      on_decode_complete(
        ptr,
        meta.width,
        meta.height,
        meta.channels as u8,
        meta.colorspace as u8,
      );
    }
    Err(e) => on_decode_error(e.code),
  }
}

#[cfg(test)]
mod tests {
  use qoi_codec::{Channels, Colorspace, QOI_BYTES_END};

  use super::*;

  #[test]
  fn test_encode_then_decode_buffer() {
    let pixels = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 9, 9, 9];

    let encoded = encode_buffer(2, 2, 3, 1, pixels.clone()).expect("Failed to encode");
    let image = decode_buffer(&encoded).expect("Failed to decode");

    assert_eq!(image.channels(), Channels::Rgb);
    assert_eq!(image.colorspace(), Colorspace::Linear);
    assert_eq!(image.into_pixels(), pixels);
  }

  #[test]
  fn test_encode_error_codes() {
    assert_eq!(encode_buffer(1, 1, 4, 2, vec![0; 4]), Err(ErrorCode { code: 1 }));
    assert_eq!(encode_buffer(0, 1, 4, 0, vec![]), Err(ErrorCode { code: 2 }));
    assert_eq!(encode_buffer(1, 1, 5, 0, vec![0; 5]), Err(ErrorCode { code: 4 }));
    assert_eq!(encode_buffer(2, 1, 4, 0, vec![0; 4]), Err(ErrorCode { code: 7 }));
    assert_eq!(encode_buffer(20_001, 20_000, 3, 0, vec![]), Err(ErrorCode { code: 8 }));
  }

  #[test]
  fn test_decode_error_codes() {
    assert_eq!(decode_buffer(b"qoif").err(), Some(ErrorCode { code: 6 }));

    let mut stream = b"qoif\0\0\0\x01\0\0\0\x01\x03\x07".to_vec();
    stream.extend_from_slice(&QOI_BYTES_END);
    assert_eq!(decode_buffer(&stream).err(), Some(ErrorCode { code: 1 }));

    stream[12] = 2;
    stream[13] = 0;
    assert_eq!(decode_buffer(&stream).err(), Some(ErrorCode { code: 4 }));

    stream[..4].copy_from_slice(b"png ");
    assert_eq!(decode_buffer(&stream).err(), Some(ErrorCode { code: 3 }));
  }

  #[test]
  fn test_io_error_code() {
    let error = Error::from(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));

    assert_eq!(ErrorCode::from(error), ErrorCode { code: 5 });
  }
}
