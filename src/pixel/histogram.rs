//! Sampled histogram equalisation for 8-bit intensities.
//!
//! The histogram is built from every `step`-th pixel; its cumulative sum is
//! scaled by `255 · step / len` and truncated to form the lookup table, so the
//! brightest occupied bin maps to (approximately) 255.

const DEFAULT_STEP: usize = 5;

/// Equalise `src`, returning a new buffer. `step == 0` selects the default of 5.
pub fn equalize_histogram(src: &[u8], step: usize) -> Vec<u8> {
    let mut out = src.to_vec();
    equalize_histogram_in_place(&mut out, step);
    out
}

/// In-place variant of [`equalize_histogram`].
pub fn equalize_histogram_in_place(buf: &mut [u8], step: usize) {
    if buf.is_empty() {
        return;
    }
    let step = if step == 0 { DEFAULT_STEP } else { step };
    let lut = equalization_lut(buf, step);
    for px in buf.iter_mut() {
        *px = lut[*px as usize];
    }
}

fn equalization_lut(src: &[u8], step: usize) -> [u8; 256] {
    let mut hist = [0u64; 256];
    for &px in src.iter().step_by(step) {
        hist[px as usize] += 1;
    }

    let scale = 255.0 * step as f64;
    let len = src.len() as f64;
    let mut lut = [0u8; 256];
    let mut cumulative = 0u64;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        cumulative += count;
        *entry = (cumulative as f64 * scale / len).min(255.0) as u8;
    }
    lut
}
