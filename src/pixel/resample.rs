//! Geometric resampling of intensity buffers.
//!
//! - `decimate`: nearest-neighbour reduction by a real factor `>= 1`, no
//!   interpolation (columns first, then rows).
//! - `mirror_horizontal`: reverse each row.
//! - `resize_gray_into` / `resize_rgba`: normalise an input of arbitrary size
//!   to the detector canvas with a triangle (bilinear) filter.
use crate::error::{Error, Result};
use crate::image::{ImageRgba, ImageU8, ImageView};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Rgba};

/// Output dimensions of [`decimate`] for a `w × h` source.
#[inline]
pub fn decimated_size(w: usize, h: usize, factor: f64) -> (usize, usize) {
    ((w as f64 / factor) as usize, (h as f64 / factor) as usize)
}

/// Reduce `src` (`w × h`, stride `w`) by `factor` with nearest-neighbour
/// sampling. Returns the buffer and its dimensions
/// `floor(w / factor) × floor(h / factor)`.
pub fn decimate(src: &[u8], w: usize, h: usize, factor: f64) -> Result<(Vec<u8>, usize, usize)> {
    let mut dst = Vec::new();
    let (dw, dh) = decimate_into(src, w, h, factor, &mut dst)?;
    Ok((dst, dw, dh))
}

/// Same as [`decimate`], writing into a reusable buffer.
pub fn decimate_into(
    src: &[u8],
    w: usize,
    h: usize,
    factor: f64,
    dst: &mut Vec<u8>,
) -> Result<(usize, usize)> {
    if !factor.is_finite() || factor < 1.0 {
        return Err(Error::InvalidParameter(format!(
            "decimation factor must be >= 1, got {factor}"
        )));
    }
    check_len(src, w, h)?;
    let (dw, dh) = decimated_size(w, h, factor);
    dst.clear();
    if factor == 1.0 {
        dst.extend_from_slice(&src[..w * h]);
        return Ok((w, h));
    }
    dst.reserve(dw * dh);

    let columns: Vec<usize> = (0..dw)
        .map(|x| ((x as f64 * factor) as usize).min(w - 1))
        .collect();
    for y in 0..dh {
        let sy = ((y as f64 * factor) as usize).min(h - 1);
        let src_row = &src[sy * w..(sy + 1) * w];
        dst.extend(columns.iter().map(|&sx| src_row[sx]));
    }
    Ok((dw, dh))
}

/// Mirror every row of a `w × h` buffer left ↔ right.
pub fn mirror_horizontal(src: &[u8], w: usize, h: usize) -> Result<Vec<u8>> {
    check_len(src, w, h)?;
    let mut out = src[..w * h].to_vec();
    mirror_horizontal_in_place(&mut out, w);
    Ok(out)
}

/// In-place variant of [`mirror_horizontal`]; `buf.len()` must be a multiple of `w`.
pub fn mirror_horizontal_in_place(buf: &mut [u8], w: usize) {
    if w == 0 {
        return;
    }
    for row in buf.chunks_exact_mut(w) {
        row.reverse();
    }
}

/// Resize a grayscale view to `dst_w × dst_h` into `dst` (packed).
///
/// Copies rows unchanged when the size already matches.
pub fn resize_gray_into(src: ImageU8<'_>, dst_w: usize, dst_h: usize, dst: &mut Vec<u8>) -> Result<()> {
    if src.w == dst_w && src.h == dst_h {
        src.copy_packed_into(dst);
        return Ok(());
    }
    check_nonempty(src.w, src.h)?;
    let mut packed = Vec::new();
    src.copy_packed_into(&mut packed);
    let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(src.w as u32, src.h as u32, packed).ok_or_else(|| {
            Error::InvalidParameter("gray buffer does not match its dimensions".to_string())
        })?;
    let resized = imageops::resize(&buffer, dst_w as u32, dst_h as u32, FilterType::Triangle);
    dst.clear();
    dst.extend_from_slice(resized.as_raw());
    Ok(())
}

/// Resize an RGBA view to `dst_w × dst_h`, returning packed RGBA bytes.
pub fn resize_rgba(src: ImageRgba<'_>, dst_w: usize, dst_h: usize) -> Result<Vec<u8>> {
    check_nonempty(src.w, src.h)?;
    let mut packed = Vec::with_capacity(src.w * src.h * 4);
    for y in 0..src.h {
        packed.extend_from_slice(src.row(y));
    }
    if src.w == dst_w && src.h == dst_h {
        return Ok(packed);
    }
    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(src.w as u32, src.h as u32, packed).ok_or_else(|| {
            Error::InvalidParameter("rgba buffer does not match its dimensions".to_string())
        })?;
    let resized = imageops::resize(&buffer, dst_w as u32, dst_h as u32, FilterType::Triangle);
    Ok(resized.into_raw())
}

fn check_len(src: &[u8], w: usize, h: usize) -> Result<()> {
    if src.len() < w * h {
        return Err(Error::InvalidParameter(format!(
            "buffer holds {} pixels, {w}x{h} needs {}",
            src.len(),
            w * h
        )));
    }
    Ok(())
}

fn check_nonempty(w: usize, h: usize) -> Result<()> {
    if w == 0 || h == 0 {
        return Err(Error::InvalidParameter(format!(
            "cannot resize an empty {w}x{h} image"
        )));
    }
    Ok(())
}
