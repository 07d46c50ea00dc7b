//! Sliding-window evaluation of a compiled cascade.
//!
//! For every window position (x outer, y inner, both advancing by `step`):
//!
//! 1. optional edge-density gate: the mean edge magnitude inside the window
//!    must lie in [`EdgeBand`], otherwise the window is skipped;
//! 2. normalisation: `σ' = sqrt(Σx²·A − (Σx)²)` from the sum and squared-sum
//!    tables (this is `A·σ`), clamped to at least 1 for flat windows;
//! 3. stages in order: each tree sums its weighted rectangle responses and
//!    contributes its `above` leaf when the result exceeds `σ'`, its `below`
//!    leaf otherwise; a stage whose total falls below its threshold rejects
//!    the window and no later stage is evaluated.
//!
//! Windows that pass every stage become [`DetectionCandidate`]s.
use super::compiled::{CompiledCascade, CompiledStage};
use crate::error::{Error, Result};
use crate::integral::{corner_sum, IntegralImage};
use crate::types::DetectionCandidate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Accepted range of mean edge magnitude per window (inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeBand {
    pub min: f64,
    pub max: f64,
}

impl Default for EdgeBand {
    fn default() -> Self {
        Self {
            min: 60.0,
            max: 200.0,
        }
    }
}

impl EdgeBand {
    #[inline]
    pub fn contains(&self, density: f64) -> bool {
        density >= self.min && density <= self.max
    }
}

/// Integral tables of one scanned image.
#[derive(Clone, Copy, Debug)]
pub struct ScanInput<'a> {
    pub sum: &'a IntegralImage,
    pub squared: &'a IntegralImage,
    /// Required when the cascade contains tilted trees.
    pub tilted: Option<&'a IntegralImage>,
    /// Sum table of the edge-magnitude image, enabling the density gate.
    pub edges: Option<(&'a IntegralImage, EdgeBand)>,
}

impl<'a> ScanInput<'a> {
    pub fn new(sum: &'a IntegralImage, squared: &'a IntegralImage) -> Self {
        Self {
            sum,
            squared,
            tilted: None,
            edges: None,
        }
    }

    pub fn with_tilted(mut self, tilted: Option<&'a IntegralImage>) -> Self {
        self.tilted = tilted;
        self
    }

    pub fn with_edges(mut self, edges: Option<(&'a IntegralImage, EdgeBand)>) -> Self {
        self.edges = edges;
        self
    }

    /// Width of the scanned image.
    pub fn width(&self) -> usize {
        self.sum.width()
    }

    /// Height of the scanned image.
    pub fn height(&self) -> usize {
        self.sum.height()
    }

    fn check(&self, cascade: &CompiledCascade) -> Result<()> {
        let dims = (self.sum.width(), self.sum.height());
        let same = |t: &IntegralImage| (t.width(), t.height()) == dims;
        if !same(self.squared) {
            return Err(Error::InvalidParameter(format!(
                "squared-sum table is {}x{}, sum table is {}x{}",
                self.squared.width(),
                self.squared.height(),
                dims.0,
                dims.1
            )));
        }
        if cascade.stride() != self.sum.stride() {
            return Err(Error::InvalidParameter(format!(
                "cascade compiled for stride {} but integral images have stride {}",
                cascade.stride(),
                self.sum.stride()
            )));
        }
        match self.tilted {
            Some(t) if !same(t) => {
                return Err(Error::InvalidParameter(
                    "tilted table does not match the sum table".to_string(),
                ))
            }
            None if cascade.has_tilted() => {
                return Err(Error::InvalidParameter(
                    "cascade has tilted features but no tilted table was supplied".to_string(),
                ))
            }
            _ => {}
        }
        if let Some((edges, _)) = self.edges {
            if !same(edges) {
                return Err(Error::InvalidParameter(
                    "edge table does not match the sum table".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Counters collected during one scan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub windows: usize,
    pub edge_rejected: usize,
    /// `stage_rejections[i]` windows were rejected by stage `i`.
    pub stage_rejections: Vec<usize>,
    pub accepted: usize,
}

/// Per-window evaluation trace.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowOutcome {
    pub accepted: bool,
    pub stages_passed: usize,
    /// Normalisation value the trees were compared against.
    pub std: f64,
    /// Totals of every evaluated stage, including the rejecting one.
    pub stage_sums: Vec<f64>,
}

/// Scan all windows of `input` with `cascade`.
pub fn scan(
    input: &ScanInput<'_>,
    step: usize,
    cascade: &CompiledCascade,
) -> Result<Vec<DetectionCandidate>> {
    scan_with_stats(input, step, cascade).map(|(candidates, _)| candidates)
}

/// Same as [`scan`], also returning rejection counters.
pub fn scan_with_stats(
    input: &ScanInput<'_>,
    step: usize,
    cascade: &CompiledCascade,
) -> Result<(Vec<DetectionCandidate>, ScanStats)> {
    if step == 0 {
        return Err(Error::InvalidParameter("scan step must be >= 1".to_string()));
    }
    input.check(cascade)?;

    let mut stats = ScanStats {
        stage_rejections: vec![0; cascade.stages().len()],
        ..Default::default()
    };
    let mut candidates = Vec::new();
    let (width, height) = (input.width(), input.height());
    let (ww, wh) = (cascade.window_width(), cascade.window_height());
    if ww > width || wh > height {
        return Ok((candidates, stats));
    }

    let stride = input.sum.stride();
    let window = Window::new(ww, wh, stride);
    for x in (0..=width - ww).step_by(step) {
        for y in (0..=height - wh).step_by(step) {
            stats.windows += 1;
            let base = y * stride + x;
            if let Some((edges, band)) = input.edges {
                if !band.contains(window.mean(edges.as_slice(), base)) {
                    stats.edge_rejected += 1;
                    continue;
                }
            }
            let std = window.std(input, base);
            match first_rejecting_stage(input, cascade, base, std) {
                Some(stage) => stats.stage_rejections[stage] += 1,
                None => {
                    stats.accepted += 1;
                    candidates.push(DetectionCandidate {
                        x,
                        y,
                        width: ww,
                        height: wh,
                    });
                }
            }
        }
    }

    debug!(
        "scanned {}x{} step {}: {} windows, {} edge-gated, {} accepted",
        width, height, step, stats.windows, stats.edge_rejected, stats.accepted
    );
    Ok((candidates, stats))
}

/// Evaluate the single window whose top-left corner is `(x, y)`.
///
/// The edge gate is not applied.
pub fn evaluate_window(
    input: &ScanInput<'_>,
    cascade: &CompiledCascade,
    x: usize,
    y: usize,
) -> Result<WindowOutcome> {
    input.check(cascade)?;
    let (ww, wh) = (cascade.window_width(), cascade.window_height());
    if x + ww > input.width() || y + wh > input.height() {
        return Err(Error::InvalidParameter(format!(
            "window at ({x}, {y}) exceeds the {}x{} image",
            input.width(),
            input.height()
        )));
    }
    let stride = input.sum.stride();
    let base = y * stride + x;
    let std = Window::new(ww, wh, stride).std(input, base);

    let mut stage_sums = Vec::with_capacity(cascade.stages().len());
    for stage in cascade.stages() {
        let total = stage_sum(input, cascade, stage, base, std);
        stage_sums.push(total);
        if total < stage.threshold as f64 {
            return Ok(WindowOutcome {
                accepted: false,
                stages_passed: stage_sums.len() - 1,
                std,
                stage_sums,
            });
        }
    }
    Ok(WindowOutcome {
        accepted: true,
        stages_passed: stage_sums.len(),
        std,
        stage_sums,
    })
}

/// Corner offsets of the scan window relative to its top-left cell.
struct Window {
    right: usize,
    bottom: usize,
    area: f64,
}

impl Window {
    fn new(ww: usize, wh: usize, stride: usize) -> Self {
        Self {
            right: ww,
            bottom: wh * stride,
            area: (ww * wh) as f64,
        }
    }

    #[inline]
    fn total(&self, table: &[u64], base: usize) -> f64 {
        corner_sum(
            table,
            base,
            base + self.right,
            base + self.bottom,
            base + self.right + self.bottom,
        ) as f64
    }

    #[inline]
    fn mean(&self, table: &[u64], base: usize) -> f64 {
        self.total(table, base) / self.area
    }

    #[inline]
    fn std(&self, input: &ScanInput<'_>, base: usize) -> f64 {
        let sum = self.total(input.sum.as_slice(), base);
        let squared = self.total(input.squared.as_slice(), base);
        let variance = squared * self.area - sum * sum;
        if variance > 1.0 {
            variance.sqrt()
        } else {
            1.0
        }
    }
}

#[inline]
fn first_rejecting_stage(
    input: &ScanInput<'_>,
    cascade: &CompiledCascade,
    base: usize,
    std: f64,
) -> Option<usize> {
    cascade
        .stages()
        .iter()
        .position(|stage| stage_sum(input, cascade, stage, base, std) < stage.threshold as f64)
}

#[inline]
fn stage_sum(
    input: &ScanInput<'_>,
    cascade: &CompiledCascade,
    stage: &CompiledStage,
    base: usize,
    std: f64,
) -> f64 {
    let sum = input.sum.as_slice();
    let tilted = input.tilted.map_or(&[][..], |t| t.as_slice());
    let mut total = 0.0f64;
    for tree in &cascade.trees[stage.first_tree..stage.end_tree] {
        let table = if tree.tilted { tilted } else { sum };
        let mut response = 0.0f64;
        for f in &cascade.features[tree.first_feature..tree.end_feature] {
            let a = base + f.offset;
            response += f.weight as f64 * corner_sum(table, a, a + f.dx, a + f.dy, a + f.dx + f.dy) as f64;
        }
        let leaf = if response > std { tree.above } else { tree.below };
        total += leaf as f64;
    }
    total
}
