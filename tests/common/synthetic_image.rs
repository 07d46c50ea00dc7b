/// Uniform image.
pub fn flat_u8(width: usize, height: usize, value: u8) -> Vec<u8> {
    vec![value; width * height]
}

/// Dark background with one bright `size × size` square at `(x0, y0)`.
pub fn square_u8(width: usize, height: usize, x0: usize, y0: usize, size: usize) -> Vec<u8> {
    assert!(x0 + size <= width && y0 + size <= height, "square must fit");
    let mut img = vec![0u8; width * height];
    for y in y0..y0 + size {
        img[y * width + x0..y * width + x0 + size].fill(255);
    }
    img
}

/// Deterministic pseudo-random intensities (64-bit LCG).
pub fn lcg_u8(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..width * height)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

/// Expand grayscale to opaque RGBA.
pub fn gray_to_rgba(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&g| [g, g, g, 255]).collect()
}
