//! Multi-scale detection pipeline.
//!
//! The [`Detector`] is sized once for a canvas and a cascade: it plans the
//! scale schedule and compiles one cascade per scale up front. Each call then
//! normalises the input to the canvas, converts it to grayscale, and for every
//! scale decimates the canvas, builds the integral tables, scans, and maps the
//! accepted windows back to canvas coordinates. Raw detections are grouped
//! when `group_threshold > 0`.
//!
//! Typical usage:
//! ```no_run
//! use cascade_detector::{CascadeDescriptor, Detector, DetectorParams};
//! use cascade_detector::image::ImageRgba;
//!
//! # fn example(cascade: &CascadeDescriptor, rgba: ImageRgba) -> cascade_detector::Result<()> {
//! let mut detector = Detector::new(rgba.w, rgba.h, DetectorParams::default(), cascade)?;
//! for r in detector.detect(rgba)? {
//!     println!("{:.0},{:.0} {:.0}x{:.0} ({} neighbors)", r.x, r.y, r.width, r.height, r.neighbors);
//! }
//! # Ok(())
//! # }
//! ```
use super::params::DetectorParams;
use super::scaling::{plan_scales, ScaleLevel};
use super::workspace::ScanWorkspace;
use crate::cascade::{scan_with_stats, CascadeDescriptor, CompiledCascade};
use crate::diagnostics::{elapsed_ms, DetectionReport, ScaleReport, TimingBreakdown};
use crate::error::{Error, Result};
use crate::grouping::group_rectangles;
use crate::image::{ImageRgba, ImageU8};
use crate::pixel::{equalize_histogram_in_place, resize_gray_into, resize_rgba, to_grayscale_into};
use crate::types::Rectangle;
use log::debug;
use std::time::Instant;

/// Cascade detector bound to one canvas size.
///
/// Holds mutable scratch buffers, hence `&mut self` on every detection call.
pub struct Detector {
    width: usize,
    height: usize,
    params: DetectorParams,
    tilted: bool,
    levels: Vec<ScaleLevel>,
    cascades: Vec<CompiledCascade>,
    workspace: ScanWorkspace,
}

impl Detector {
    /// Create a detector for a `width × height` canvas.
    pub fn new(
        width: usize,
        height: usize,
        params: DetectorParams,
        descriptor: &CascadeDescriptor,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidParameter(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        params.validate()?;
        descriptor.validate()?;

        let tilted = params.tilted.unwrap_or_else(|| descriptor.has_tilted());
        if !tilted && descriptor.has_tilted() {
            return Err(Error::InvalidParameter(
                "tilted evaluation disabled but the cascade has tilted trees".to_string(),
            ));
        }

        let levels = plan_scales(
            width,
            height,
            descriptor.window_width as usize,
            descriptor.window_height as usize,
            params.scale_factor,
        );
        let cascades = levels
            .iter()
            .map(|level| CompiledCascade::compile(descriptor, level.width, level.height))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Detector::new canvas={}x{} window={}x{} scales={} tilted={} edge_prefilter={}",
            width,
            height,
            descriptor.window_width,
            descriptor.window_height,
            levels.len(),
            tilted,
            params.edge_prefilter.is_some()
        );

        Ok(Self {
            width,
            height,
            params,
            tilted,
            levels,
            cascades,
            workspace: ScanWorkspace::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Scale schedule, largest level first.
    pub fn levels(&self) -> &[ScaleLevel] {
        &self.levels
    }

    /// Detect objects in an RGBA image with the grouping threshold and step
    /// from [`DetectorParams`].
    pub fn detect(&mut self, image: ImageRgba<'_>) -> Result<Vec<Rectangle>> {
        self.detect_with(image, self.params.group_threshold, self.params.step)
    }

    /// Detect objects in a grayscale image with the configured threshold and
    /// step.
    pub fn detect_gray(&mut self, gray: ImageU8<'_>) -> Result<Vec<Rectangle>> {
        self.detect_gray_with(gray, self.params.group_threshold, self.params.step)
    }

    /// Detect with a per-call grouping threshold and window step.
    ///
    /// `group_threshold == 0` returns the raw detections. The compiled
    /// cascades are reused, so switching between calls costs nothing.
    pub fn detect_with(
        &mut self,
        image: ImageRgba<'_>,
        group_threshold: usize,
        step: usize,
    ) -> Result<Vec<Rectangle>> {
        let start = Instant::now();
        let timing = self.load_rgba(image)?;
        self.run(start, timing, group_threshold, step)
            .map(|report| report.rectangles)
    }

    /// Grayscale counterpart of [`Detector::detect_with`].
    pub fn detect_gray_with(
        &mut self,
        gray: ImageU8<'_>,
        group_threshold: usize,
        step: usize,
    ) -> Result<Vec<Rectangle>> {
        let start = Instant::now();
        let timing = self.load_gray(gray)?;
        self.run(start, timing, group_threshold, step)
            .map(|report| report.rectangles)
    }

    /// Same as [`Detector::detect`], returning timings and per-scale counters.
    pub fn detect_with_diagnostics(&mut self, image: ImageRgba<'_>) -> Result<DetectionReport> {
        let start = Instant::now();
        let timing = self.load_rgba(image)?;
        self.run(start, timing, self.params.group_threshold, self.params.step)
    }

    /// Same as [`Detector::detect_gray`], returning timings and per-scale
    /// counters.
    pub fn detect_gray_with_diagnostics(&mut self, gray: ImageU8<'_>) -> Result<DetectionReport> {
        let start = Instant::now();
        let timing = self.load_gray(gray)?;
        self.run(start, timing, self.params.group_threshold, self.params.step)
    }

    fn load_rgba(&mut self, image: ImageRgba<'_>) -> Result<TimingBreakdown> {
        let mut timing = TimingBreakdown::default();
        let canvas_start = Instant::now();
        if image.w == self.width && image.h == self.height {
            to_grayscale_into(image, &mut self.workspace.gray);
        } else {
            let resized = resize_rgba(image, self.width, self.height)?;
            let view = ImageRgba::packed(self.width, self.height, &resized)?;
            to_grayscale_into(view, &mut self.workspace.gray);
        }
        timing.push("canvas", elapsed_ms(canvas_start));
        Ok(timing)
    }

    fn load_gray(&mut self, gray: ImageU8<'_>) -> Result<TimingBreakdown> {
        let mut timing = TimingBreakdown::default();
        let canvas_start = Instant::now();
        resize_gray_into(gray, self.width, self.height, &mut self.workspace.gray)?;
        timing.push("canvas", elapsed_ms(canvas_start));
        Ok(timing)
    }

    fn run(
        &mut self,
        start: Instant,
        mut timing: TimingBreakdown,
        group_threshold: usize,
        step: usize,
    ) -> Result<DetectionReport> {
        if step == 0 {
            return Err(Error::InvalidParameter("step must be >= 1".to_string()));
        }
        self.workspace.set_canvas(self.width, self.height);
        if let Some(step) = self.params.equalize {
            let gray = &mut self.workspace.gray;
            timing.measure("equalize", || equalize_histogram_in_place(gray, step));
        }

        let edge_band = self.params.edge_prefilter;
        let scan_start = Instant::now();
        let mut raw = Vec::new();
        let mut scales = Vec::with_capacity(self.levels.len());
        for (level, cascade) in self.levels.iter().zip(&self.cascades) {
            let level_start = Instant::now();
            self.workspace
                .prepare_level(level, self.tilted, edge_band.is_some())?;
            let input = self.workspace.scan_input(self.tilted, edge_band);
            let (found, stats) = scan_with_stats(&input, step, cascade)?;
            let (sx, sy) = (level.scaling.scale_x_to_full, level.scaling.scale_y_to_full);
            raw.extend(found.iter().map(|c| c.to_rectangle(sx, sy)));
            scales.push(ScaleReport {
                index: level.index,
                scale: level.scale,
                width: level.width,
                height: level.height,
                stats,
                elapsed_ms: elapsed_ms(level_start),
            });
        }
        timing.push("scan", elapsed_ms(scan_start));

        let raw_detections = raw.len();
        let rectangles = if group_threshold > 0 {
            let min_confidence = self.params.min_confidence;
            let grouped = timing.measure("group", || {
                group_rectangles(&raw, group_threshold, &self.params.grouping)
            });
            grouped
                .into_iter()
                .filter(|r| r.neighbors >= min_confidence)
                .collect()
        } else {
            raw
        };

        timing.total_ms = elapsed_ms(start);
        debug!(
            "Detector::detect canvas={}x{} scales={} raw={} out={} total_ms={:.3}",
            self.width,
            self.height,
            scales.len(),
            raw_detections,
            rectangles.len(),
            timing.total_ms
        );
        Ok(DetectionReport {
            rectangles,
            raw_detections,
            timing,
            scales,
        })
    }
}
