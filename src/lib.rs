#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod cascade;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod grouping;
pub mod image;
pub mod types;

// Building blocks, public for tooling and cross-checks.
pub mod config;
pub mod integral;
pub mod pixel;

// --- High-level re-exports -------------------------------------------------

pub use crate::cascade::{CascadeDescriptor, CompiledCascade};
pub use crate::detector::{detect_objects, Detector, DetectorParams};
pub use crate::error::{DescriptorFormatError, Error, OverflowError, Result};
pub use crate::grouping::{group_rectangles, GroupingOptions, GroupingStrategy};
pub use crate::types::{DetectionCandidate, Rectangle};

pub use crate::diagnostics::DetectionReport;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use cascade_detector::prelude::*;
///
/// # fn main() -> cascade_detector::Result<()> {
/// let cascade = CascadeDescriptor::from_flat(&[
///     4.0, 4.0, // window
///     0.0, 1.0, // stage: threshold, trees
///     0.0, 1.0, 0.0, 0.0, 4.0, 2.0, 1.0, // upright tree, one feature
///     0.5, -1.0, 1.0, // node threshold, leaves
/// ])?;
/// let (w, h) = (64usize, 48usize);
/// let gray = vec![0u8; w * h];
/// let mut det = Detector::new(w, h, DetectorParams::default(), &cascade)?;
/// let found = det.detect_gray(ImageU8::packed(w, h, &gray)?)?;
/// println!("found {} rectangles", found.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageRgba, ImageU8};
    pub use crate::{CascadeDescriptor, Detector, DetectorParams, Rectangle};
}
