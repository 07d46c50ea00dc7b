//! Summed-area tables (integral images) for O(1) rectangle queries.
//!
//! Three flavours are built from a `w × h` source:
//!
//! - **sum**: `I(y, x) = Σ src[0..y) × [0..x)`;
//! - **squared sum**: same recurrence on squared pixels, used for window
//!   variance;
//! - **tilted sum**: 45°-rotated table for tilted Haar features, built with a
//!   forward diagonal accumulation followed by a backward column correction.
//!   For `x >= 1` a cell holds `Σ src[j][i]` over `j < y`,
//!   `|i - x + 1| <= y - j - 1`, the triangle opening upwards from the cell.
//!   Column 0 is never corrected and stays zero, so a tilted query whose
//!   left corner `x - h` lands on column 0 omits that triangle.
//!
//! Layout
//! - Every table is `(w + 1) × (h + 1)` cells, row-major with
//!   `stride = w + 1`; row 0 and column 0 are zero.
//! - Cells are `u64`. Accumulation is checked and fails with an
//!   [`OverflowError`] instead of wrapping, so even `u32` sources (edge
//!   magnitudes) cannot silently corrupt a scan.
//!
//! Rectangle queries take the top-left corner inclusive and the extent; the
//! four-corner formula reads `(x, y)`, `(x + w, y)`, `(x, y + h)` and
//! `(x + w, y + h)`.
use crate::error::{Error, OverflowError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Sum,
    Squared,
    Tilted,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Kind::Sum => "sum",
            Kind::Squared => "squared-sum",
            Kind::Tilted => "tilted-sum",
        }
    }
}

/// Padded summed-area table of a `width × height` source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    data: Vec<u64>,
}

impl IntegralImage {
    /// Empty table; fill it with one of the `*_into` builders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard summed-area table.
    pub fn sum<P: Copy + Into<u64>>(src: &[P], w: usize, h: usize) -> Result<Self> {
        let mut out = Self::new();
        out.build_sum_into(src, w, h)?;
        Ok(out)
    }

    /// Summed-area table of squared pixel values.
    pub fn squared_sum<P: Copy + Into<u64>>(src: &[P], w: usize, h: usize) -> Result<Self> {
        let mut out = Self::new();
        out.build_squared_sum_into(src, w, h)?;
        Ok(out)
    }

    /// 45°-rotated summed-area table.
    pub fn tilted_sum<P: Copy + Into<u64>>(src: &[P], w: usize, h: usize) -> Result<Self> {
        let mut out = Self::new();
        out.build_tilted_sum_into(src, w, h)?;
        Ok(out)
    }

    pub fn build_sum_into<P: Copy + Into<u64>>(
        &mut self,
        src: &[P],
        w: usize,
        h: usize,
    ) -> Result<()> {
        self.build_upright(src, w, h, Kind::Sum)
    }

    pub fn build_squared_sum_into<P: Copy + Into<u64>>(
        &mut self,
        src: &[P],
        w: usize,
        h: usize,
    ) -> Result<()> {
        self.build_upright(src, w, h, Kind::Squared)
    }

    pub fn build_tilted_sum_into<P: Copy + Into<u64>>(
        &mut self,
        src: &[P],
        w: usize,
        h: usize,
    ) -> Result<()> {
        self.reset(src.len(), w, h)?;
        let stride = self.stride();
        let data = &mut self.data;
        let overflow = |x: usize, y: usize| OverflowError {
            kind: Kind::Tilted.label(),
            x,
            y,
        };

        // Forward pass: each cell accumulates its pixel plus the cell up-left.
        for y in 0..h {
            let base = y * stride;
            for x in 0..w {
                let px: u64 = src[y * w + x].into();
                data[base + stride + x + 1] = px
                    .checked_add(data[base + x])
                    .ok_or_else(|| overflow(x, y))?;
            }
            let last = base + w;
            data[last + stride] = data[last + stride]
                .checked_add(data[last])
                .ok_or_else(|| overflow(w, y))?;
        }

        // Backward pass: fold in the two cells above, right column first.
        for x in (1..w).rev() {
            for y in (1..=h).rev() {
                let above = (y - 1) * stride + x;
                let add = data[above]
                    .checked_add(data[above + 1])
                    .and_then(|v| v.checked_add(data[above + stride]))
                    .ok_or_else(|| overflow(x, y))?;
                data[above + stride] = add;
            }
        }
        Ok(())
    }

    fn build_upright<P: Copy + Into<u64>>(
        &mut self,
        src: &[P],
        w: usize,
        h: usize,
        kind: Kind,
    ) -> Result<()> {
        self.reset(src.len(), w, h)?;
        let stride = self.stride();
        for y in 0..h {
            let row = &src[y * w..(y + 1) * w];
            let mut row_sum = 0u64;
            for (x, &px) in row.iter().enumerate() {
                let overflow = || OverflowError {
                    kind: kind.label(),
                    x,
                    y,
                };
                let px: u64 = px.into();
                let value = match kind {
                    Kind::Squared => px.checked_mul(px).ok_or_else(overflow)?,
                    _ => px,
                };
                row_sum = row_sum.checked_add(value).ok_or_else(overflow)?;
                let idx = (y + 1) * stride + x + 1;
                self.data[idx] = row_sum
                    .checked_add(self.data[idx - stride])
                    .ok_or_else(overflow)?;
            }
        }
        Ok(())
    }

    fn reset(&mut self, src_len: usize, w: usize, h: usize) -> Result<()> {
        if src_len < w * h {
            return Err(Error::InvalidParameter(format!(
                "integral source holds {src_len} pixels, {w}x{h} needs {}",
                w * h
            )));
        }
        self.width = w;
        self.height = h;
        self.data.clear();
        self.data.resize((w + 1) * (h + 1), 0);
        Ok(())
    }

    /// Width of the source image (the table is one cell wider).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the source image (the table is one cell taller).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells between consecutive table rows (`width + 1`).
    #[inline]
    pub fn stride(&self) -> usize {
        self.width + 1
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    /// Raw cell at table coordinates `(x, y)`, `x <= width`, `y <= height`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u64 {
        self.data[y * self.stride() + x]
    }

    /// Sum over `[x, x + w) × [y, y + h)` of an upright table.
    #[inline]
    pub fn rect_sum(&self, x: usize, y: usize, w: usize, h: usize) -> u64 {
        let s = self.stride();
        let i0 = y * s + x;
        corner_sum(&self.data, i0, i0 + w, i0 + h * s, i0 + w + h * s) as u64
    }
}

/// Four-corner combination `a - b - c + d` read at linear offsets.
///
/// Evaluated modulo 2^64 and reinterpreted as signed: the exact result of a
/// valid upright query is non-negative, tilted queries may legitimately
/// produce any value representable in `i64`.
#[inline(always)]
pub(crate) fn corner_sum(data: &[u64], a: usize, b: usize, c: usize, d: usize) -> i64 {
    data[a]
        .wrapping_sub(data[b])
        .wrapping_sub(data[c])
        .wrapping_add(data[d]) as i64
}
