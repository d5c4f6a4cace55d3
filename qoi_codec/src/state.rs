use crate::meta::QOI_CACHE_LEN;
use crate::pixel::Pixel;

// The accumulator threaded through a single encode or decode pass. A fresh
// `State` is created for every call and dropped at its end.
pub struct State {
  // Previously seen pixels, indexed by `Pixel::cache_index`. Collisions
  // overwrite.
  pub cache: [Pixel; QOI_CACHE_LEN],
  // The previously decoded/encoded pixel.
  pub prev_pixel: Pixel,
  // Length of the pending run (Op::Run), encoder only.
  pub run_count: u8,
}

impl State {
  pub fn new() -> Self {
    Self {
      cache: [Pixel::ZERO; QOI_CACHE_LEN],
      prev_pixel: Pixel::default(),
      run_count: 0,
    }
  }

  // Inserts the given pixel into the cache. Overwrites any pixel that was
  // previously cached at the computed index.
  pub fn cache_insert(&mut self, pixel: Pixel) {
    self.cache[pixel.cache_index()] = pixel;
  }

  // Returns the pixel cached at `index`, which is masked to the cache size.
  pub fn cache_get(&self, index: u8) -> Pixel {
    self.cache[index as usize % QOI_CACHE_LEN]
  }

  // Checks if the given pixel matches the cached pixel at the computed index
  // and returns the index. If there is no match, the given pixel is inserted,
  // overwriting the pixel that was previously cached, and the index is not
  // returned.
  pub fn cache_match_or_replace(&mut self, pixel: Pixel) -> Option<u8> {
    let index = pixel.cache_index();

    if self.cache[index] == pixel {
      return Some(index as u8);
    }

    self.cache[index] = pixel;

    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_state() {
    let state = State::new();

    assert!(state.cache.iter().all(|pixel| *pixel == Pixel::ZERO));
    assert_eq!(state.prev_pixel, Pixel { r: 0, g: 0, b: 0, a: 255 });
    assert_eq!(state.run_count, 0);
  }

  #[test]
  fn test_cache_match_or_replace() {
    let mut state = State::new();
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };

    assert_eq!(state.cache_match_or_replace(pixel), None);
    assert_eq!(state.cache_get(54), pixel);
    assert_eq!(state.cache_match_or_replace(pixel), Some(54));
  }

  #[test]
  fn test_cache_collision_overwrites() {
    let mut state = State::new();
    // Both land in slot 3: 1 * 3 = 3 and 65 * 3 = 195 = 3 * 64 + 3.
    let first = Pixel { r: 1, g: 0, b: 0, a: 0 };
    let second = Pixel { r: 65, g: 0, b: 0, a: 0 };

    assert_eq!(first.cache_index(), second.cache_index());

    state.cache_insert(first);
    assert_eq!(state.cache_match_or_replace(second), None);
    assert_eq!(state.cache_get(3), second);
    assert_eq!(state.cache_match_or_replace(first), None);
  }
}
