//! Parameter types configuring the detector.
//!
//! Defaults reproduce the classic sliding-window setup: scale step 1.2,
//! every window position scanned, rectangles grouped with at least one
//! neighbour. The edge pre-filter and histogram equalisation are off unless
//! configured.

use crate::cascade::EdgeBand;
use crate::error::{Error, Result};
use crate::grouping::GroupingOptions;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Ratio between consecutive scales (> 1).
    pub scale_factor: f64,
    /// Build the tilted table and evaluate tilted trees. `None` enables it
    /// exactly when the cascade contains tilted trees.
    pub tilted: Option<bool>,
    /// Minimum class size for grouping; 0 returns raw detections.
    pub group_threshold: usize,
    /// Window stride in pixels at every scale (>= 1).
    pub step: usize,
    /// Grouped rectangles with fewer neighbours are dropped.
    pub min_confidence: u32,
    /// Enables the edge-density gate.
    pub edge_prefilter: Option<EdgeBand>,
    /// Equalise the canvas histogram with this sampling step before scanning.
    pub equalize: Option<usize>,
    pub grouping: GroupingOptions,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.2,
            tilted: None,
            group_threshold: 1,
            step: 1,
            min_confidence: 0,
            edge_prefilter: None,
            equalize: None,
            grouping: GroupingOptions::default(),
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> Result<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(Error::InvalidParameter(format!(
                "scale factor must be > 1, got {}",
                self.scale_factor
            )));
        }
        if self.step == 0 {
            return Err(Error::InvalidParameter("step must be >= 1".to_string()));
        }
        if let Some(band) = &self.edge_prefilter {
            if !(band.min <= band.max) {
                return Err(Error::InvalidParameter(format!(
                    "edge band [{}, {}] is empty",
                    band.min, band.max
                )));
            }
        }
        if !self.grouping.confluence.is_finite() || self.grouping.confluence < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "grouping confluence must be >= 0, got {}",
                self.grouping.confluence
            )));
        }
        Ok(())
    }
}
