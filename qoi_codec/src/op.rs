use crate::pixel::PixelDiff;

// An enumeration of each possible QOI encoding "chunk", or Op.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
  // `QOI_OP_INDEX`, index into the state's pixel cache.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 0 0 |      index       |
  //
  Index(u8),

  // `QOI_OP_DIFF`, contains the red, green, and blue difference from the
  // previous pixel with a bias of +2.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 0 1 |  dr |  dg |  db  |
  //
  Diff(u8, u8, u8),

  // `QOI_OP_LUMA`, contains the green difference from the previous pixel with
  // a bias of +32, and the red-green and blue-green differences with a bias
  // of +8.
  //
  // | 7 6   5  4  3  2  1  0 | 7  6  5  4   3  2  1  0 |
  // |------------------------|-------------------------|
  // | 1 0 |       dg         |   dr - dg  |   db - dg  |
  //
  Luma(u8, u8, u8),

  // `QOI_OP_RGB`, contains the red, green, and blue values of a pixel.
  //
  // | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 |
  // |------------------------|------|------|------|
  // | 1  1  1  1  1  1  1  0 |   r  |   g  |   b  |
  //
  Rgb(u8, u8, u8),

  // `QOI_OP_RGBA`, contains the red, green, blue, and alpha values of a pixel.
  //
  // | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 | 7..0 |
  // |------------------------|------|------|------|------|
  // | 1  1  1  1  1  1  1  1 |   r  |   g  |   b  |   a  |
  //
  Rgba(u8, u8, u8, u8),

  // `QOI_OP_RUN`, contains the length of the run, 1 to 62, stored with a bias
  // of -1. Lengths 63 and 64 would collide with the RGB and RGBA tags.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 1 1 |      run         |
  Run(u8),
}

impl Op {
  const MASK_2: u8 = 0x03;
  const MASK_4: u8 = 0x0f;
  const MASK_6: u8 = 0x3f;
  const MASK_TAG: u8 = 0xc0;

  const TAG_DIFF: u8 = 0x40;
  const TAG_INDEX: u8 = 0x00;
  const TAG_LUMA: u8 = 0x80;
  const TAG_RGB: u8 = 0xfe;
  const TAG_RGBA: u8 = 0xff;
  const TAG_RUN: u8 = 0xc0;

  // Returns the Op carrying the given pixel diff.
  pub fn from_diff(diff: PixelDiff) -> Self {
    match diff {
      PixelDiff::Small(diff_r, diff_g, diff_b) => Op::Diff(diff_r, diff_g, diff_b),
      PixelDiff::Luma(luma_g, luma_rg, luma_bg) => Op::Luma(luma_g, luma_rg, luma_bg),
    }
  }

  // Encodes the `Op` and appends its bytes to `out`.
  pub fn write_to(self, out: &mut Vec<u8>) {
    match self {
      Op::Index(index) => {
        out.push(Op::TAG_INDEX | (index & Op::MASK_6));
      }
      Op::Diff(diff_r, diff_g, diff_b) => {
        out.push(Op::TAG_DIFF | (diff_r << 4) | (diff_g << 2) | diff_b);
      }
      Op::Luma(luma_g, luma_rg, luma_bg) => {
        out.extend_from_slice(&[Op::TAG_LUMA | luma_g, (luma_rg << 4) | luma_bg]);
      }
      Op::Rgb(r, g, b) => {
        out.extend_from_slice(&[Op::TAG_RGB, r, g, b]);
      }
      Op::Rgba(r, g, b, a) => {
        out.extend_from_slice(&[Op::TAG_RGBA, r, g, b, a]);
      }
      Op::Run(run_count) => {
        out.push(Op::TAG_RUN | (run_count - 1));
      }
    }
  }

  // Decodes the `Op` starting at `bytes[*pos]` and advances `pos` past it.
  // Returns `None`, leaving `pos` untouched, when the Op or its payload does
  // not fit in `bytes`.
  pub fn read_from(bytes: &[u8], pos: &mut usize) -> Option<Self> {
    let start = *pos;
    let byte = *bytes.get(start)?;

    let (op, len) = match byte {
      Op::TAG_RGB => {
        let payload = bytes.get(start + 1..start + 4)?;
        (Op::Rgb(payload[0], payload[1], payload[2]), 4)
      }
      Op::TAG_RGBA => {
        let payload = bytes.get(start + 1..start + 5)?;
        (Op::Rgba(payload[0], payload[1], payload[2], payload[3]), 5)
      }
      _ => match byte & Op::MASK_TAG {
        Op::TAG_INDEX => (Op::Index(byte & Op::MASK_6), 1),
        Op::TAG_DIFF => (
          Op::Diff(
            byte >> 4 & Op::MASK_2,
            byte >> 2 & Op::MASK_2,
            byte & Op::MASK_2,
          ),
          1,
        ),
        Op::TAG_LUMA => {
          let next_byte = *bytes.get(start + 1)?;
          (
            Op::Luma(
              byte & Op::MASK_6,
              next_byte >> 4 & Op::MASK_4,
              next_byte & Op::MASK_4,
            ),
            2,
          )
        }
        _ => (Op::Run((byte & Op::MASK_6) + 1), 1),
      },
    };

    *pos = start + len;

    Some(op)
  }
}
