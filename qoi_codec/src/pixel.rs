use crate::meta::QOI_CACHE_LEN;

// A difference between a pixel and its predecessor that fits one of the two
// delta encodings. Values are stored with their bias already applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelDiff {
  // `QOI_OP_DIFF`: red, green, and blue deltas in [-2, 1], each biased by +2.
  Small(u8, u8, u8),
  // `QOI_OP_LUMA`: green delta in [-32, 31] biased by +32, red and blue deltas
  // relative to the green delta in [-8, 7], each biased by +8.
  Luma(u8, u8, u8),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pixel {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

// Opaque black, the implicit pixel preceding the first pixel of every image.
impl Default for Pixel {
  fn default() -> Self {
    Self { r: 0, g: 0, b: 0, a: 255 }
  }
}

impl Pixel {
  // Fully transparent black, the initial value of every cache slot.
  pub const ZERO: Pixel = Pixel { r: 0, g: 0, b: 0, a: 0 };

  // Reads a pixel from a 3 or 4 byte chunk of raw pixel data. RGB chunks take
  // `alpha` as their alpha value.
  pub fn from_channels(chunk: &[u8], alpha: u8) -> Self {
    Self {
      r: chunk[0],
      g: chunk[1],
      b: chunk[2],
      a: chunk.get(3).copied().unwrap_or(alpha),
    }
  }

  // Attempts to produce a `PixelDiff` against the provided `prev` pixel,
  // preferring the 1 byte small diff over the 2 byte luma diff. Returns `None`
  // when the alpha values differ or no diff is within range.
  pub fn diff(&self, prev: &Pixel) -> Option<PixelDiff> {
    if self.a != prev.a {
      return None;
    }

    let diff_r = self.r.wrapping_sub(prev.r);
    let diff_g = self.g.wrapping_sub(prev.g);
    let diff_b = self.b.wrapping_sub(prev.b);

    let small_r = diff_r.wrapping_add(2);
    let small_g = diff_g.wrapping_add(2);
    let small_b = diff_b.wrapping_add(2);

    if small_r < 4 && small_g < 4 && small_b < 4 {
      return Some(PixelDiff::Small(small_r, small_g, small_b));
    }

    let luma_g = diff_g.wrapping_add(32);
    let luma_rg = diff_r.wrapping_sub(diff_g).wrapping_add(8);
    let luma_bg = diff_b.wrapping_sub(diff_g).wrapping_add(8);

    if luma_g < 64 && luma_rg < 16 && luma_bg < 16 {
      return Some(PixelDiff::Luma(luma_g, luma_rg, luma_bg));
    }

    None
  }

  // Recreates a `Pixel` from the provided `diff` against `prev`. Alpha is
  // always carried over.
  pub fn from_diff(diff: PixelDiff, prev: &Pixel) -> Self {
    let (diff_r, diff_g, diff_b) = match diff {
      PixelDiff::Small(small_r, small_g, small_b) => (
        small_r.wrapping_sub(2),
        small_g.wrapping_sub(2),
        small_b.wrapping_sub(2),
      ),
      PixelDiff::Luma(luma_g, luma_rg, luma_bg) => {
        let diff_g = luma_g.wrapping_sub(32);

        (
          luma_rg.wrapping_sub(8).wrapping_add(diff_g),
          diff_g,
          luma_bg.wrapping_sub(8).wrapping_add(diff_g),
        )
      }
    };

    Self {
      r: prev.r.wrapping_add(diff_r),
      g: prev.g.wrapping_add(diff_g),
      b: prev.b.wrapping_add(diff_b),
      a: prev.a,
    }
  }

  // QOI color hash function, not implemented via the `Hash` trait to keep
  // things simple.
  pub fn qoi_hash(&self) -> usize {
    let r = self.r as usize;
    let g = self.g as usize;
    let b = self.b as usize;
    let a = self.a as usize;

    r * 3 + g * 5 + b * 7 + a * 11
  }

  // The pixel cache slot for this pixel. Equal to the 8-bit wrapping hash
  // modulo 64, since 64 divides 256.
  pub fn cache_index(&self) -> usize {
    self.qoi_hash() % QOI_CACHE_LEN
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rgb(r: u8, g: u8, b: u8) -> Pixel {
    Pixel { r, g, b, a: 255 }
  }

  #[test]
  fn test_small_diff_bounds() {
    let prev = rgb(100, 100, 100);

    assert_eq!(rgb(101, 98, 101).diff(&prev), Some(PixelDiff::Small(3, 0, 3)));
    assert_eq!(rgb(98, 101, 98).diff(&prev), Some(PixelDiff::Small(0, 3, 0)));
    assert_eq!(rgb(102, 100, 100).diff(&prev), Some(PixelDiff::Luma(32, 10, 8)));
  }

  #[test]
  fn test_small_diff_wraps() {
    assert_eq!(rgb(0, 255, 1).diff(&rgb(255, 0, 0)), Some(PixelDiff::Small(3, 1, 3)));
  }

  #[test]
  fn test_luma_diff_bounds() {
    let prev = rgb(100, 100, 100);

    // dg = +31, dr - dg = +7, db - dg = -8
    assert_eq!(rgb(138, 131, 123).diff(&prev), Some(PixelDiff::Luma(63, 15, 0)));
    // dg = -32, dr - dg = -8, db - dg = +7
    assert_eq!(rgb(60, 68, 75).diff(&prev), Some(PixelDiff::Luma(0, 0, 15)));
    // dg = +32
    assert_eq!(rgb(132, 132, 132).diff(&prev), None);
    // dr - dg = +8
    assert_eq!(rgb(110, 102, 102).diff(&prev), None);
  }

  #[test]
  fn test_alpha_change_has_no_diff() {
    let prev = rgb(1, 2, 3);
    let pixel = Pixel { a: 254, ..prev };

    assert_eq!(pixel.diff(&prev), None);
  }

  #[test]
  fn test_from_diff_inverts_diff() {
    let prev = rgb(250, 3, 128);

    for pixel in [rgb(251, 1, 129), rgb(4, 10, 140), rgb(240, 250, 120)] {
      let diff = pixel.diff(&prev).expect("Expected a diff");
      assert_eq!(Pixel::from_diff(diff, &prev), pixel);
    }
  }

  #[test]
  fn test_hash() {
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };

    assert_eq!(pixel.qoi_hash(), 2678);
    assert_eq!(pixel.cache_index(), 54);
    assert_eq!(Pixel::default().cache_index(), 53);
    assert_eq!(Pixel::ZERO.cache_index(), 0);
  }

  #[test]
  fn test_from_channels() {
    assert_eq!(Pixel::from_channels(&[1, 2, 3], 9), Pixel { r: 1, g: 2, b: 3, a: 9 });
    assert_eq!(Pixel::from_channels(&[1, 2, 3, 4], 9), Pixel { r: 1, g: 2, b: 3, a: 4 });
  }
}
