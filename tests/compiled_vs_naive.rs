mod common;

use cascade_detector::cascade::{
    evaluate_window, scan, CascadeDescriptor, CascadeTree, CompiledCascade, ScanInput,
};
use cascade_detector::integral::IntegralImage;
use cascade_detector::pixel::mirror_horizontal;
use cascade_detector::DetectionCandidate;
use common::cascades::{centre_blob, mixed_two_stage};
use common::pixel_sums::Pixels;
use common::synthetic_image::lcg_u8;

struct Tables {
    sum: IntegralImage,
    squared: IntegralImage,
    tilted: IntegralImage,
}

impl Tables {
    fn new(img: &[u8], w: usize, h: usize) -> Self {
        Self {
            sum: IntegralImage::sum(img, w, h).unwrap(),
            squared: IntegralImage::squared_sum(img, w, h).unwrap(),
            tilted: IntegralImage::tilted_sum(img, w, h).unwrap(),
        }
    }

    fn input(&self) -> ScanInput<'_> {
        ScanInput::new(&self.sum, &self.squared).with_tilted(Some(&self.tilted))
    }
}

fn naive_tree(pixels: Pixels<'_>, tree: &CascadeTree, wx: usize, wy: usize, std: f64) -> f64 {
    let mut response = 0.0f64;
    for f in &tree.features {
        let (x, y) = (wx + f.x as usize, wy + f.y as usize);
        let (w, h) = (f.width as usize, f.height as usize);
        let area = if tree.tilted {
            pixels.rotated_zero_column(x, y, w, h)
        } else {
            pixels.upright(x, y, w, h) as i64
        };
        let weight = (f.weight as f64 / tree.threshold as f64) as f32;
        response += weight as f64 * area as f64;
    }
    let (below, above) = if tree.threshold < 0.0 {
        (tree.right, tree.left)
    } else {
        (tree.left, tree.right)
    };
    if response > std {
        above as f64
    } else {
        below as f64
    }
}

/// Stage sums of every evaluated stage, computed from the descriptor and the
/// raw pixels.
fn naive_window(pixels: Pixels<'_>, d: &CascadeDescriptor, wx: usize, wy: usize) -> Vec<f64> {
    let (ww, wh) = (d.window_width as usize, d.window_height as usize);
    let area = (ww * wh) as f64;
    let sum = pixels.upright(wx, wy, ww, wh) as f64;
    let squared = pixels.upright_squared(wx, wy, ww, wh) as f64;
    let variance = squared * area - sum * sum;
    let std = if variance > 1.0 { variance.sqrt() } else { 1.0 };

    let mut sums = Vec::new();
    for stage in &d.stages {
        let total: f64 = stage
            .trees
            .iter()
            .map(|tree| naive_tree(pixels, tree, wx, wy, std))
            .sum();
        sums.push(total);
        if total < stage.threshold as f64 {
            break;
        }
    }
    sums
}

#[test]
fn compiled_cascade_matches_descriptor_evaluation() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (23usize, 19usize);
    let descriptor = mixed_two_stage();
    let compiled = CompiledCascade::compile(&descriptor, w, h).unwrap();

    for seed in [1u64, 7, 42] {
        let img = lcg_u8(w, h, seed);
        let tables = Tables::new(&img, w, h);
        let input = tables.input();
        let pixels = Pixels {
            data: &img,
            width: w,
            height: h,
        };

        let mut expected = Vec::new();
        for x in 0..=w - 8 {
            for y in 0..=h - 8 {
                let naive = naive_window(pixels, &descriptor, x, y);
                let outcome = evaluate_window(&input, &compiled, x, y).unwrap();
                assert_eq!(outcome.stage_sums, naive, "window ({x}, {y}) seed {seed}");
                let accepted = naive.len() == descriptor.stages.len()
                    && naive[naive.len() - 1] >= descriptor.stages[naive.len() - 1].threshold as f64;
                assert_eq!(outcome.accepted, accepted);
                if accepted {
                    expected.push(DetectionCandidate {
                        x,
                        y,
                        width: 8,
                        height: 8,
                    });
                }
            }
        }
        assert_eq!(scan(&input, 1, &compiled).unwrap(), expected, "seed {seed}");
    }
}

#[test]
fn stepped_scan_is_a_subset_of_full_scan() {
    let (w, h) = (30usize, 26usize);
    let img = lcg_u8(w, h, 99);
    let tables = Tables::new(&img, w, h);
    let compiled = CompiledCascade::compile(&mixed_two_stage(), w, h).unwrap();
    let full = scan(&tables.input(), 1, &compiled).unwrap();
    let stepped = scan(&tables.input(), 3, &compiled).unwrap();
    let expected: Vec<_> = full
        .into_iter()
        .filter(|c| c.x % 3 == 0 && c.y % 3 == 0)
        .collect();
    assert_eq!(stepped, expected);
}

#[test]
fn mirrored_cascade_on_mirrored_image_mirrors_detections() {
    let (w, h) = (24usize, 16usize);
    let mut img = vec![0u8; w * h];
    // Blob at (4, 5) so the unmirrored scan has hits near the left border.
    for y in 5..9 {
        img[y * w + 4..y * w + 8].fill(255);
    }
    let mirrored = mirror_horizontal(&img, w, h).unwrap();

    let descriptor = centre_blob();
    let plain = CompiledCascade::compile(&descriptor, w, h).unwrap();
    let flipped = CompiledCascade::compile_mirrored(&descriptor, w, h).unwrap();

    let a = Tables::new(&img, w, h);
    let b = Tables::new(&mirrored, w, h);
    let found = scan(&a.input(), 1, &plain).unwrap();
    let found_mirrored = scan(&b.input(), 1, &flipped).unwrap();
    assert!(!found.is_empty());

    let mut expected: Vec<_> = found
        .iter()
        .map(|c| DetectionCandidate {
            x: w - c.x - c.width,
            ..*c
        })
        .collect();
    let mut actual = found_mirrored.clone();
    expected.sort_by_key(|c| (c.x, c.y));
    actual.sort_by_key(|c| (c.x, c.y));
    assert_eq!(actual, expected);
}
