//! Interleaved 8-bit RGBA input as produced by image decoders and canvases.
use crate::error::{Error, Result};

/// Borrowed RGBA image; `stride` counts bytes between rows (at least `4 * w`).
#[derive(Clone, Copy, Debug)]
pub struct ImageRgba<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageRgba<'a> {
    /// Wrap a tightly packed RGBA buffer of `w * h * 4` bytes.
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Result<Self> {
        if data.len() < w * h * 4 {
            return Err(Error::InvalidParameter(format!(
                "rgba buffer holds {} bytes, {w}x{h} needs {}",
                data.len(),
                w * h * 4
            )));
        }
        Ok(Self {
            w,
            h,
            stride: w * 4,
            data,
        })
    }

    /// Interleaved bytes of row `y` (`4 * w` long).
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * 4]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 4] {
        let i = y * self.stride + x * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// Owned, tightly packed RGBA buffer.
#[derive(Clone, Debug, Default)]
pub struct RgbaImageBuf {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaImageBuf {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * 4);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_view(&self) -> ImageRgba<'_> {
        ImageRgba {
            w: self.width,
            h: self.height,
            stride: self.width * 4,
            data: &self.data,
        }
    }
}
