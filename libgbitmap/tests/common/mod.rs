#![allow(dead_code)]

/// 2x2 text bitmap, top row `0 1`
pub const PBM_TEXT_2X2: &[u8] = b"P1\n2 2\n0 1\n1 0";
/// 4x1 run-length bitmap, two white then two black pixels
pub const RLE_4X1: &[u8] = b"R4\n4 1\n\x02\x02";
/// 4x1 run-length bitmap whose second run overflows the row
pub const RLE_LOST_SYNC: &[u8] = b"R4\n4 1\n\x03\x02";

/// 5x3 gray ramp with comments and uneven spacing, maxval 4
pub const PGM_TEXT_5X3: &[u8] = b"P2
# five levels
5 3
4
0 1 2 3 4
4   3 2 1 0
# flat gray row
2 2 2 2 2
";

/// 3x2 raw 16-bit gray bitmap
pub const PGM_RAW_WIDE_3X2: &[u8] = b"P5 3 2 65535\n\x00\x00\x80\x00\xff\xff\xff\xff\x80\x00\x00\x00";

/// A bilevel `rows` by `cols` diagonal stripe pattern in `P1` form, top row first
pub fn stripes(rows: u16, cols: u16) -> Vec<u8> {
    let mut out = format!("P1\n{cols} {rows}\n").into_bytes();
    for r in 0..rows {
        for c in 0..cols {
            out.push(if (r / 3 + c / 5) % 2 == 0 { b'0' } else { b'1' });
            out.push(b' ');
        }
        out.push(b'\n');
    }
    out
}
