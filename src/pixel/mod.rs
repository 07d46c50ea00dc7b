//! Pixel-level transforms over flat, row-major intensity buffers.
//!
//! - Fixed-point RGBA → grayscale conversion (BT.601 weights scaled by 2^14).
//! - Nearest-neighbour decimation for the scale pyramid, horizontal mirroring
//!   and canvas normalisation of arbitrary-size inputs.
//! - Gaussian-smoothed Sobel edge magnitude used by the optional edge-density
//!   pre-filter.
//! - Sampled histogram equalisation.
//!
//! All functions are pure; the `_into` variants reuse caller-owned buffers so
//! the detector can keep its scratch allocations across frames.

pub mod color;
pub mod edges;
pub mod histogram;
pub mod resample;

pub use color::{luma, to_grayscale, to_grayscale_into};
pub use edges::{edge_magnitude, edge_magnitude_into, EdgeScratch};
pub use histogram::{equalize_histogram, equalize_histogram_in_place};
pub use resample::{
    decimate, decimate_into, mirror_horizontal, mirror_horizontal_in_place, resize_gray_into,
    resize_rgba,
};
