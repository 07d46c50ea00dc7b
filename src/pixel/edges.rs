//! Edge magnitude for the edge-density pre-filter.
//!
//! - Smooths with a separable 5-tap Gaussian (σ ≈ √2), truncating the
//!   intermediate results to integers after each pass.
//! - Convolves the smoothed image with the 3×3 Sobel pair and stores
//!   `|gx| + |gy|` (L1 magnitude, no square root).
//! - A border of two pixels is left at zero on every side; images narrower or
//!   shorter than five pixels produce an all-zero result.
//!
//! Complexity: O(W·H) with three passes over two scratch planes held in an
//! [`EdgeScratch`].

type Kernel3 = [[i64; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

const GAUSSIAN_5TAP: [f64; 5] = [0.1117, 0.2365, 0.3036, 0.2365, 0.1117];

const BORDER: usize = 2;

/// Intermediate planes of the separable blur, kept between calls.
#[derive(Clone, Debug, Default)]
pub struct EdgeScratch {
    horiz: Vec<u32>,
    smooth: Vec<u32>,
}

impl EdgeScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Gaussian-smoothed Sobel L1 magnitude of a `w × h` intensity buffer.
pub fn edge_magnitude(src: &[u8], w: usize, h: usize) -> Vec<u32> {
    let mut out = Vec::new();
    edge_magnitude_into(src, w, h, &mut out, &mut EdgeScratch::new());
    out
}

/// Same as [`edge_magnitude`], writing into reusable buffers.
pub fn edge_magnitude_into(
    src: &[u8],
    w: usize,
    h: usize,
    dst: &mut Vec<u32>,
    scratch: &mut EdgeScratch,
) {
    let len = w * h;
    dst.clear();
    dst.resize(len, 0);
    if w <= 2 * BORDER || h <= 2 * BORDER || src.len() < len {
        return;
    }
    let EdgeScratch { horiz, smooth } = scratch;
    horiz.clear();
    horiz.resize(len, 0);
    smooth.clear();
    smooth.resize(len, 0);

    // Horizontal pass; columns inside the border stay zero.
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        let out = &mut horiz[y * w..(y + 1) * w];
        for x in BORDER..w - BORDER {
            let acc: f64 = GAUSSIAN_5TAP
                .iter()
                .enumerate()
                .map(|(k, &tap)| tap * row[x + k - BORDER] as f64)
                .sum();
            out[x] = acc as u32;
        }
    }

    // Vertical pass; rows inside the border stay zero.
    for y in BORDER..h - BORDER {
        for x in 0..w {
            let acc: f64 = GAUSSIAN_5TAP
                .iter()
                .enumerate()
                .map(|(k, &tap)| tap * horiz[(y + k - BORDER) * w + x] as f64)
                .sum();
            smooth[y * w + x] = acc as u32;
        }
    }

    for y in BORDER..h - BORDER {
        let rows = [
            &smooth[(y - 1) * w..y * w],
            &smooth[y * w..(y + 1) * w],
            &smooth[(y + 1) * w..(y + 2) * w],
        ];
        let out = &mut dst[y * w..(y + 1) * w];
        for x in BORDER..w - BORDER {
            let mut sum_x = 0i64;
            let mut sum_y = 0i64;
            for (ky, row) in rows.iter().enumerate() {
                for kx in 0..3 {
                    let v = row[x + kx - 1] as i64;
                    sum_x += SOBEL_KERNEL_X[ky][kx] * v;
                    sum_y += SOBEL_KERNEL_Y[ky][kx] * v;
                }
            }
            out[x] = (sum_x.unsigned_abs() + sum_y.unsigned_abs()) as u32;
        }
    }
}
