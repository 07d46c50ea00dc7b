//! Resolution-independent cascade model.
//!
//! The model is a stage → tree → feature hierarchy. It is read from the dense
//! positional float encoding used by trained classifier blobs:
//!
//! ```text
//! winW, winH,
//! repeat per stage:  stageThreshold, nTrees,
//!   repeat per tree: tilted, nFeatures,
//!     repeat per feature: x, y, w, h, weight
//!   nodeThreshold, leftValue, rightValue
//! ```
//!
//! Parsing walks a bounds-checked cursor and never reads past the buffer;
//! counts must be non-negative integers and the stream must end exactly after
//! the last stage. [`CascadeDescriptor::to_flat`] is the inverse.
use crate::error::DescriptorFormatError;
use serde::{Deserialize, Serialize};

/// One weighted rectangle of a Haar-like feature, in window coordinates.
///
/// For tilted trees `(x, y)` is the top corner of a 45° rectangle whose sides
/// run `width` pixels down-right and `height` pixels down-left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub weight: f32,
}

/// A weak classifier: weighted rectangle sum compared against a node threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeTree {
    #[serde(default)]
    pub tilted: bool,
    pub features: Vec<FeatureRect>,
    /// Node threshold, relative to the window's standard deviation.
    pub threshold: f32,
    /// Contribution when the normalised feature response is at or below the threshold.
    pub left: f32,
    /// Contribution when the normalised feature response exceeds the threshold.
    pub right: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeStage {
    /// A window is rejected when its summed tree contributions fall below this.
    pub threshold: f32,
    pub trees: Vec<CascadeTree>,
}

/// Trained cascade, independent of any target image size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeDescriptor {
    pub window_width: u32,
    pub window_height: u32,
    pub stages: Vec<CascadeStage>,
}

const FEATURE_LEN: usize = 5;

struct Cursor<'a> {
    data: &'a [f32],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [f32]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn value(&mut self, what: &str) -> Result<f32, DescriptorFormatError> {
        let v = *self.data.get(self.pos).ok_or_else(|| {
            DescriptorFormatError::new(self.pos, format!("truncated while reading {what}"))
        })?;
        if !v.is_finite() {
            return Err(DescriptorFormatError::new(
                self.pos,
                format!("{what} is not finite ({v})"),
            ));
        }
        self.pos += 1;
        Ok(v)
    }

    fn count(&mut self, what: &str) -> Result<u32, DescriptorFormatError> {
        let at = self.pos;
        let v = self.value(what)?;
        if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f32 {
            return Err(DescriptorFormatError::new(
                at,
                format!("{what} must be a non-negative integer, got {v}"),
            ));
        }
        Ok(v as u32)
    }

    /// Check that `n` records of `min_len` elements each can still fit.
    fn expect_records(&self, n: u32, min_len: usize, what: &str) -> Result<(), DescriptorFormatError> {
        let needed = (n as usize).saturating_mul(min_len);
        if needed > self.remaining() {
            return Err(DescriptorFormatError::new(
                self.pos,
                format!(
                    "declares {n} {what} but only {} elements remain",
                    self.remaining()
                ),
            ));
        }
        Ok(())
    }
}

impl CascadeDescriptor {
    /// Parse the dense positional encoding.
    pub fn from_flat(data: &[f32]) -> Result<Self, DescriptorFormatError> {
        let mut cur = Cursor::new(data);
        let window_width = cur.count("window width")?;
        let window_height = cur.count("window height")?;

        let mut stages = Vec::new();
        while cur.remaining() > 0 {
            let threshold = cur.value("stage threshold")?;
            let n_trees = cur.count("tree count")?;
            // tilted, count, one feature, node threshold, two leaves
            cur.expect_records(n_trees, 2 + FEATURE_LEN + 3, "trees")?;
            let mut trees = Vec::with_capacity(n_trees as usize);
            for _ in 0..n_trees {
                let tilted = cur.value("tilted flag")? != 0.0;
                let n_features = cur.count("feature count")?;
                cur.expect_records(n_features, FEATURE_LEN, "features")?;
                let mut features = Vec::with_capacity(n_features as usize);
                for _ in 0..n_features {
                    features.push(FeatureRect {
                        x: cur.count("feature x")?,
                        y: cur.count("feature y")?,
                        width: cur.count("feature width")?,
                        height: cur.count("feature height")?,
                        weight: cur.value("feature weight")?,
                    });
                }
                trees.push(CascadeTree {
                    tilted,
                    features,
                    threshold: cur.value("node threshold")?,
                    left: cur.value("left leaf")?,
                    right: cur.value("right leaf")?,
                });
            }
            stages.push(CascadeStage { threshold, trees });
        }

        let descriptor = Self {
            window_width,
            window_height,
            stages,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Parse the dense encoding stored as little-endian `f32` values.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, DescriptorFormatError> {
        if bytes.len() % 4 != 0 {
            return Err(DescriptorFormatError::new(
                bytes.len() / 4,
                format!("byte length {} is not a multiple of 4", bytes.len()),
            ));
        }
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::from_flat(&values)
    }

    /// Flatten back into the dense positional encoding.
    pub fn to_flat(&self) -> Vec<f32> {
        let mut out = vec![self.window_width as f32, self.window_height as f32];
        for stage in &self.stages {
            out.push(stage.threshold);
            out.push(stage.trees.len() as f32);
            for tree in &stage.trees {
                out.push(if tree.tilted { 1.0 } else { 0.0 });
                out.push(tree.features.len() as f32);
                for f in &tree.features {
                    out.extend_from_slice(&[
                        f.x as f32,
                        f.y as f32,
                        f.width as f32,
                        f.height as f32,
                        f.weight,
                    ]);
                }
                out.extend_from_slice(&[tree.threshold, tree.left, tree.right]);
            }
        }
        out
    }

    /// Structural and geometric checks; every feature corner must fall inside
    /// the reference window so compiled offsets stay in bounds.
    pub fn validate(&self) -> Result<(), DescriptorFormatError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(DescriptorFormatError::new(
                0,
                format!(
                    "window must be non-empty, got {}x{}",
                    self.window_width, self.window_height
                ),
            ));
        }
        if self.stages.is_empty() {
            return Err(DescriptorFormatError::new(2, "cascade has no stages"));
        }
        let (ww, wh) = (self.window_width as u64, self.window_height as u64);
        for (si, stage) in self.stages.iter().enumerate() {
            for (ti, tree) in stage.trees.iter().enumerate() {
                if tree.features.is_empty() {
                    return Err(DescriptorFormatError::new(
                        0,
                        format!("stage {si} tree {ti} has no features"),
                    ));
                }
                if tree.threshold == 0.0 {
                    return Err(DescriptorFormatError::new(
                        0,
                        format!("stage {si} tree {ti} has a zero node threshold"),
                    ));
                }
                for (fi, f) in tree.features.iter().enumerate() {
                    let (x, y, w, h) = (f.x as u64, f.y as u64, f.width as u64, f.height as u64);
                    let inside = if tree.tilted {
                        x >= h && x + w <= ww && y + w + h <= wh
                    } else {
                        x + w <= ww && y + h <= wh
                    };
                    if !inside {
                        return Err(DescriptorFormatError::new(
                            0,
                            format!(
                                "stage {si} tree {ti} feature {fi} ({x},{y},{w},{h}) leaves the {ww}x{wh} window"
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn has_tilted(&self) -> bool {
        self.stages
            .iter()
            .any(|s| s.trees.iter().any(|t| t.tilted))
    }

    pub fn tree_count(&self) -> usize {
        self.stages.iter().map(|s| s.trees.len()).sum()
    }

    /// Left/right mirrored copy of the cascade.
    ///
    /// Upright rectangles map `x → W − x − w`; tilted rectangles map the top
    /// corner `x → W − x` and swap their two side lengths.
    pub fn mirrored(&self) -> Self {
        let ww = self.window_width;
        let mut out = self.clone();
        for tree in out.stages.iter_mut().flat_map(|s| s.trees.iter_mut()) {
            let tilted = tree.tilted;
            for f in &mut tree.features {
                if tilted {
                    f.x = ww.saturating_sub(f.x);
                    std::mem::swap(&mut f.width, &mut f.height);
                } else {
                    f.x = ww.saturating_sub(f.x + f.width);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_flat() -> Vec<f32> {
        vec![
            4.0, 4.0, // window
            0.5, 2.0, // stage 0: threshold, trees
            0.0, 2.0, 0.0, 0.0, 4.0, 2.0, -1.0, 0.0, 2.0, 4.0, 2.0, 2.0, 0.1, -1.0, 1.0, //
            1.0, 1.0, 2.0, 0.0, 2.0, 1.0, 1.5, 0.2, 0.3, 0.7, //
            -1.0, 1.0, // stage 1
            0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 1.0, -0.25, 2.0, -2.0,
        ]
    }

    #[test]
    fn parses_nested_records() {
        let d = CascadeDescriptor::from_flat(&sample_flat()).unwrap();
        assert_eq!((d.window_width, d.window_height), (4, 4));
        assert_eq!(d.stages.len(), 2);
        assert_eq!(d.stages[0].trees.len(), 2);
        let t = &d.stages[0].trees[0];
        assert!(!t.tilted);
        assert_eq!(t.features.len(), 2);
        assert_eq!(
            t.features[1],
            FeatureRect {
                x: 0,
                y: 2,
                width: 4,
                height: 2,
                weight: 2.0
            }
        );
        assert_eq!((t.threshold, t.left, t.right), (0.1, -1.0, 1.0));
        assert!(d.stages[0].trees[1].tilted);
        assert!(d.has_tilted());
        assert_eq!(d.tree_count(), 3);
    }

    #[test]
    fn flat_encoding_round_trips() {
        let flat = sample_flat();
        let d = CascadeDescriptor::from_flat(&flat).unwrap();
        assert_eq!(d.to_flat(), flat);
        let bytes: Vec<u8> = flat.iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(CascadeDescriptor::from_le_bytes(&bytes).unwrap(), d);
    }

    #[test]
    fn truncated_blob_is_rejected_without_overread() {
        let flat = sample_flat();
        for len in 3..flat.len() {
            if len == 29 {
                // Stage boundary: a valid one-stage cascade.
                continue;
            }
            let err = CascadeDescriptor::from_flat(&flat[..len]).unwrap_err();
            assert!(err.offset <= len, "offset {} past len {len}", err.offset);
        }
    }

    #[test]
    fn inflated_counts_are_rejected() {
        let mut flat = sample_flat();
        flat[3] = 1_000_000.0;
        let err = CascadeDescriptor::from_flat(&flat).unwrap_err();
        assert_eq!(err.offset, 4);
        assert!(err.message.contains("1000000 trees"));
    }

    #[test]
    fn fractional_and_negative_counts_are_rejected() {
        let mut flat = sample_flat();
        flat[5] = 1.5;
        assert_eq!(CascadeDescriptor::from_flat(&flat).unwrap_err().offset, 5);
        flat[5] = -2.0;
        assert_eq!(CascadeDescriptor::from_flat(&flat).unwrap_err().offset, 5);
    }

    #[test]
    fn odd_byte_length_is_rejected() {
        assert!(CascadeDescriptor::from_le_bytes(&[0, 0, 128]).is_err());
    }

    #[test]
    fn window_only_blob_has_no_stages() {
        let err = CascadeDescriptor::from_flat(&[24.0, 24.0]).unwrap_err();
        assert!(err.message.contains("no stages"));
    }

    #[test]
    fn features_outside_window_are_rejected() {
        let mut flat = sample_flat();
        // Shift the stage 1 feature past the right edge.
        let idx = flat.len() - 8;
        flat[idx] = 4.0;
        let err = CascadeDescriptor::from_flat(&flat).unwrap_err();
        assert!(err.message.contains("leaves"));
    }

    #[test]
    fn mirroring_twice_restores_the_cascade() {
        let d = CascadeDescriptor::from_flat(&sample_flat()).unwrap();
        let m = d.mirrored();
        assert_eq!(m.stages[0].trees[0].features[0].x, 0);
        assert_eq!(m.stages[1].trees[0].features[0].x, 1);
        let tilted = m.stages[0].trees[1].features[0];
        assert_eq!((tilted.x, tilted.width, tilted.height), (2, 1, 2));
        m.validate().unwrap();
        assert_eq!(m.mirrored(), d);
    }

    #[test]
    fn json_model_deserializes() {
        let json = r#"{
            "window_width": 2, "window_height": 2,
            "stages": [{ "threshold": 0.0, "trees": [{
                "features": [{ "x": 0, "y": 0, "width": 2, "height": 2, "weight": 1.0 }],
                "threshold": 1.0, "left": -1.0, "right": 1.0
            }]}]
        }"#;
        let d: CascadeDescriptor = serde_json::from_str(json).unwrap();
        assert!(!d.stages[0].trees[0].tilted);
        d.validate().unwrap();
    }
}
