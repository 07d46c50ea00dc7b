//! Cascade specialised to one integral-image stride.
//!
//! Compilation flattens the descriptor into three linear arrays (stages,
//! trees, features) that the scan walks front to back, and bakes every
//! feature rectangle into absolute offsets for `stride = target_width + 1`:
//!
//! - upright: `offset = x + y·S`, `dx = w`, `dy = h·S`;
//! - tilted: `offset = x + y·S`, `dx = w·(S + 1)`, `dy = h·(S − 1)`;
//!
//! so a feature's four corners are `o`, `o + dx`, `o + dy`, `o + dx + dy`
//! relative to the window's top-left cell. Feature weights are divided by the
//! tree's node threshold, which turns the comparison `sum < t·σ` into
//! `sum / t > σ`; for negative thresholds the leaves are swapped to keep the
//! same orientation.
//!
//! A compiled cascade is only valid for the stride it was built for; the
//! evaluator checks this before every scan.
use super::descriptor::CascadeDescriptor;
use crate::error::Result;
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompiledFeature {
    pub offset: usize,
    pub dx: usize,
    pub dy: usize,
    /// Feature weight divided by the owning tree's node threshold.
    pub weight: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompiledTree {
    pub tilted: bool,
    pub first_feature: usize,
    pub end_feature: usize,
    /// Leaf taken when the normalised response does not exceed σ.
    pub below: f32,
    /// Leaf taken when the normalised response exceeds σ.
    pub above: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompiledStage {
    pub threshold: f32,
    pub first_tree: usize,
    pub end_tree: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledCascade {
    window_width: usize,
    window_height: usize,
    target_width: usize,
    target_height: usize,
    has_tilted: bool,
    pub(crate) stages: Vec<CompiledStage>,
    pub(crate) trees: Vec<CompiledTree>,
    pub(crate) features: Vec<CompiledFeature>,
}

impl CompiledCascade {
    /// Specialise `descriptor` for integral images of a `target_width ×
    /// target_height` source.
    pub fn compile(
        descriptor: &CascadeDescriptor,
        target_width: usize,
        target_height: usize,
    ) -> Result<Self> {
        descriptor.validate()?;
        let stride = target_width + 1;

        let mut stages = Vec::with_capacity(descriptor.stages.len());
        let mut trees = Vec::with_capacity(descriptor.tree_count());
        let mut features = Vec::new();
        for stage in &descriptor.stages {
            let first_tree = trees.len();
            for tree in &stage.trees {
                let first_feature = features.len();
                let threshold = tree.threshold;
                for f in &tree.features {
                    let (x, y) = (f.x as usize, f.y as usize);
                    let (w, h) = (f.width as usize, f.height as usize);
                    let (dx, dy) = if tree.tilted {
                        (w * (stride + 1), h * (stride - 1))
                    } else {
                        (w, h * stride)
                    };
                    features.push(CompiledFeature {
                        offset: x + y * stride,
                        dx,
                        dy,
                        weight: (f.weight as f64 / threshold as f64) as f32,
                    });
                }
                let (below, above) = if threshold < 0.0 {
                    (tree.right, tree.left)
                } else {
                    (tree.left, tree.right)
                };
                trees.push(CompiledTree {
                    tilted: tree.tilted,
                    first_feature,
                    end_feature: features.len(),
                    below,
                    above,
                });
            }
            stages.push(CompiledStage {
                threshold: stage.threshold,
                first_tree,
                end_tree: trees.len(),
            });
        }

        debug!(
            "compiled {}x{} cascade for {}x{}: {} stages, {} trees, {} features",
            descriptor.window_width,
            descriptor.window_height,
            target_width,
            target_height,
            stages.len(),
            trees.len(),
            features.len()
        );

        Ok(Self {
            window_width: descriptor.window_width as usize,
            window_height: descriptor.window_height as usize,
            target_width,
            target_height,
            has_tilted: descriptor.has_tilted(),
            stages,
            trees,
            features,
        })
    }

    /// Compile the left/right mirrored variant of `descriptor`.
    pub fn compile_mirrored(
        descriptor: &CascadeDescriptor,
        target_width: usize,
        target_height: usize,
    ) -> Result<Self> {
        Self::compile(&descriptor.mirrored(), target_width, target_height)
    }

    pub fn window_width(&self) -> usize {
        self.window_width
    }

    pub fn window_height(&self) -> usize {
        self.window_height
    }

    pub fn target_width(&self) -> usize {
        self.target_width
    }

    pub fn target_height(&self) -> usize {
        self.target_height
    }

    /// Integral-image stride the offsets were baked for.
    pub fn stride(&self) -> usize {
        self.target_width + 1
    }

    pub fn has_tilted(&self) -> bool {
        self.has_tilted
    }

    pub fn stages(&self) -> &[CompiledStage] {
        &self.stages
    }

    pub fn trees(&self) -> &[CompiledTree] {
        &self.trees
    }

    pub fn features(&self) -> &[CompiledFeature] {
        &self.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::descriptor::{CascadeStage, CascadeTree, FeatureRect};

    fn descriptor() -> CascadeDescriptor {
        CascadeDescriptor {
            window_width: 6,
            window_height: 6,
            stages: vec![CascadeStage {
                threshold: 0.0,
                trees: vec![
                    CascadeTree {
                        tilted: false,
                        features: vec![FeatureRect {
                            x: 1,
                            y: 2,
                            width: 3,
                            height: 4,
                            weight: 2.0,
                        }],
                        threshold: 0.5,
                        left: -1.0,
                        right: 1.0,
                    },
                    CascadeTree {
                        tilted: true,
                        features: vec![FeatureRect {
                            x: 2,
                            y: 1,
                            width: 3,
                            height: 2,
                            weight: 1.0,
                        }],
                        threshold: -0.25,
                        left: -1.0,
                        right: 1.0,
                    },
                ],
            }],
        }
    }

    #[test]
    fn offsets_follow_target_stride() {
        let c = CompiledCascade::compile(&descriptor(), 10, 8).unwrap();
        assert_eq!(c.stride(), 11);
        let up = c.features()[0];
        assert_eq!((up.offset, up.dx, up.dy), (1 + 2 * 11, 3, 4 * 11));
        assert_eq!(up.weight, 4.0);
        let tilted = c.features()[1];
        assert_eq!((tilted.offset, tilted.dx, tilted.dy), (2 + 11, 3 * 12, 2 * 10));
        assert_eq!(tilted.weight, -4.0);
        assert!(c.has_tilted());
    }

    #[test]
    fn negative_threshold_swaps_leaves() {
        let c = CompiledCascade::compile(&descriptor(), 10, 8).unwrap();
        assert_eq!((c.trees()[0].below, c.trees()[0].above), (-1.0, 1.0));
        assert_eq!((c.trees()[1].below, c.trees()[1].above), (1.0, -1.0));
    }

    #[test]
    fn recompiling_for_another_size_changes_offsets() {
        let a = CompiledCascade::compile(&descriptor(), 10, 8).unwrap();
        let b = CompiledCascade::compile(&descriptor(), 20, 8).unwrap();
        assert_ne!(a.features()[0].offset, b.features()[0].offset);
        assert_eq!(a.trees(), b.trees());
    }

    #[test]
    fn mirrored_compile_moves_upright_features() {
        let c = CompiledCascade::compile_mirrored(&descriptor(), 10, 8).unwrap();
        // x = 6 - 1 - 3 = 2
        assert_eq!(c.features()[0].offset, 2 + 2 * 11);
    }

    #[test]
    fn invalid_descriptor_fails_compilation() {
        let mut d = descriptor();
        d.stages[0].trees[0].features[0].width = 9;
        assert!(matches!(
            CompiledCascade::compile(&d, 10, 8),
            Err(crate::error::Error::DescriptorFormat(_))
        ));
    }
}
