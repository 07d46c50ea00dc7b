//! RGBA → 8-bit luma conversion.
//!
//! Uses the integer approximation of the BT.601 weights
//! `0.299, 0.587, 0.114` scaled by `2^14`, with `+2^13` for rounding. The
//! weights sum to exactly `2^14`, so the result never exceeds 255.
use crate::image::ImageRgba;

const WEIGHT_R: u32 = 4899;
const WEIGHT_G: u32 = 9617;
const WEIGHT_B: u32 = 1868;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * WEIGHT_R + g as u32 * WEIGHT_G + b as u32 * WEIGHT_B + ROUND) >> SHIFT) as u8
}

/// Convert an RGBA view to a tightly packed grayscale buffer. Alpha is ignored.
pub fn to_grayscale(rgba: ImageRgba<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.w * rgba.h);
    to_grayscale_into(rgba, &mut out);
    out
}

/// Same as [`to_grayscale`], writing into `dst` (resized to `w * h`).
pub fn to_grayscale_into(rgba: ImageRgba<'_>, dst: &mut Vec<u8>) {
    dst.clear();
    dst.reserve(rgba.w * rgba.h);
    for y in 0..rgba.h {
        dst.extend(
            rgba.row(y)
                .chunks_exact(4)
                .map(|px| luma(px[0], px[1], px[2])),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_primaries_follow_fixed_point_weights() {
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0), 0);
    }

    #[test]
    fn grayscale_respects_row_stride() {
        // 2x2 image with 4 bytes of padding per row.
        let data = [
            255, 0, 0, 255, 0, 255, 0, 255, 9, 9, 9, 9, //
            0, 0, 255, 255, 255, 255, 255, 0, 9, 9, 9, 9,
        ];
        let view = ImageRgba {
            w: 2,
            h: 2,
            stride: 12,
            data: &data,
        };
        assert_eq!(to_grayscale(view), vec![76, 150, 29, 255]);
    }
}
