use cascade_detector::cascade::{CascadeDescriptor, CascadeStage, CascadeTree, FeatureRect};

fn rect(x: u32, y: u32, width: u32, height: u32, weight: f32) -> FeatureRect {
    FeatureRect {
        x,
        y,
        width,
        height,
        weight,
    }
}

/// 8x8 window accepting a bright 4x4 blob centred in the window.
///
/// The single tree compares `4·centre − window` against the window's
/// normalisation value; on a 0/255 image a centred blob passes together with
/// its four one-pixel shifts.
pub fn centre_blob() -> CascadeDescriptor {
    CascadeDescriptor {
        window_width: 8,
        window_height: 8,
        stages: vec![CascadeStage {
            threshold: 0.0,
            trees: vec![CascadeTree {
                tilted: false,
                features: vec![rect(0, 0, 8, 8, -1.0), rect(2, 2, 4, 4, 4.0)],
                threshold: 1.0,
                left: -1.0,
                right: 1.0,
            }],
        }],
    }
}

/// Two stages over an 8x8 window mixing upright and tilted trees, with
/// negative node thresholds.
pub fn mixed_two_stage() -> CascadeDescriptor {
    CascadeDescriptor {
        window_width: 8,
        window_height: 8,
        stages: vec![
            CascadeStage {
                threshold: -0.5,
                trees: vec![
                    CascadeTree {
                        tilted: false,
                        features: vec![rect(0, 0, 8, 4, -1.0), rect(0, 4, 8, 4, 1.0)],
                        threshold: 0.02,
                        left: -0.6,
                        right: 0.7,
                    },
                    CascadeTree {
                        tilted: false,
                        features: vec![rect(1, 1, 3, 6, 1.0), rect(4, 1, 3, 6, -1.0)],
                        threshold: -0.01,
                        left: 0.4,
                        right: -0.3,
                    },
                ],
            },
            CascadeStage {
                threshold: 0.1,
                trees: vec![
                    CascadeTree {
                        tilted: true,
                        features: vec![rect(4, 0, 3, 2, 1.0), rect(3, 2, 2, 3, -0.5)],
                        threshold: 0.03,
                        left: -0.8,
                        right: 0.9,
                    },
                    CascadeTree {
                        tilted: true,
                        features: vec![rect(2, 1, 4, 2, -1.0)],
                        threshold: -0.05,
                        left: 0.5,
                        right: -0.5,
                    },
                    CascadeTree {
                        tilted: false,
                        features: vec![rect(2, 2, 4, 4, 2.0), rect(0, 0, 8, 8, -0.5)],
                        threshold: 0.01,
                        left: -0.2,
                        right: 0.3,
                    },
                ],
            },
        ],
    }
}
