//! Multi-scale cascade detector.
//!
//! Overview
//! - A scale schedule shrinks the canvas by `scale_factor` per level until
//!   the cascade window no longer fits; one compiled cascade per level is
//!   built when the detector is created.
//! - Each call grayscales the input once, optionally equalises it, then per
//!   level decimates, builds the integral tables and scans.
//! - Accepted windows are mapped back to canvas coordinates and grouped.
//!
//! Modules
//! - [`params`] - configuration of the search and the post-processing.
//! - `pipeline` - the [`Detector`] itself.
//! - `scaling` - the scale schedule and level-to-canvas mapping.
//! - `workspace` - scratch buffers reused across calls.

pub mod params;
mod pipeline;
mod scaling;
mod workspace;

pub use params::DetectorParams;
pub use pipeline::Detector;
pub use scaling::{plan_scales, scale_count, LevelScaling, ScaleLevel};

use crate::cascade::CascadeDescriptor;
use crate::error::Result;
use crate::image::ImageRgba;
use crate::types::Rectangle;

/// One-shot detection with the usual face-detection settings.
///
/// Sizes a detector to the image, scans every third position at scale step
/// 1.2, groups with a threshold of 1 and keeps rectangles backed by more than
/// one raw detection.
pub fn detect_objects(image: ImageRgba<'_>, descriptor: &CascadeDescriptor) -> Result<Vec<Rectangle>> {
    let params = DetectorParams {
        scale_factor: 1.2,
        group_threshold: 1,
        step: 3,
        min_confidence: 2,
        ..Default::default()
    };
    Detector::new(image.w, image.h, params, descriptor)?.detect(image)
}
