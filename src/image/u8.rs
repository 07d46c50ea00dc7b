//! Single-channel 8-bit input, the form the cascade scans.
use crate::error::{Error, Result};
use crate::image::traits::ImageView;

/// Borrowed grayscale image.
///
/// Rows may be padded: pixel `(x, y)` lives at `data[y * stride + x]`, and
/// only the first `w` bytes of each row are visible.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    /// Bytes between the starts of consecutive rows (`>= w`).
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Wrap a tightly packed buffer of at least `w * h` bytes.
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Result<Self> {
        Self::strided(w, h, w, data)
    }

    /// Wrap a buffer whose rows are `stride` bytes apart.
    ///
    /// The last row only needs its `w` visible bytes, so a sub-rectangle of
    /// a larger frame can be viewed without copying.
    pub fn strided(w: usize, h: usize, stride: usize, data: &'a [u8]) -> Result<Self> {
        if stride < w {
            return Err(Error::InvalidParameter(format!(
                "gray stride {stride} is shorter than width {w}"
            )));
        }
        let needed = if h == 0 { 0 } else { (h - 1) * stride + w };
        if data.len() < needed {
            return Err(Error::InvalidParameter(format!(
                "gray buffer holds {} bytes, {w}x{h} with stride {stride} needs {needed}",
                data.len()
            )));
        }
        Ok(Self { w, h, stride, data })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}

impl ImageView for ImageU8<'_> {
    type Pixel = u8;

    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..][..self.w]
    }

    fn as_slice(&self) -> Option<&[u8]> {
        if self.stride == self.w {
            Some(&self.data[..self.w * self.h])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_view_needs_only_visible_bytes_of_last_row() {
        // 3x2 window of a 5-wide frame: 5 + 3 bytes suffice.
        let frame = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let view = ImageU8::strided(3, 2, 5, &frame).unwrap();
        assert_eq!(view.row(1), &[5, 6, 7]);
        assert!(ImageU8::strided(3, 2, 5, &frame[..7]).is_err());
        assert!(ImageU8::strided(4, 1, 3, &frame).is_err());
        assert!(ImageU8::packed(0, 0, &[]).is_ok());
    }
}
