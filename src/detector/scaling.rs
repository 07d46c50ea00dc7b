//! Scale schedule of the sliding-window search.
//!
//! The cascade window keeps its size; the image shrinks instead. Scale `i`
//! divides the canvas by `factor^i` (accumulated by repeated multiplication)
//! and the number of scales is
//! `floor(ln(min(W / winW, H / winH)) / ln(factor))`.

/// Per-level factors mapping level pixels back to the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelScaling {
    pub scale_x_to_full: f32,
    pub scale_y_to_full: f32,
}

impl LevelScaling {
    pub fn from_dimensions(
        level_width: usize,
        level_height: usize,
        full_width: usize,
        full_height: usize,
    ) -> Self {
        let ratio = |full: usize, level: usize| {
            if level > 0 {
                full as f32 / level as f32
            } else {
                1.0
            }
        };
        Self {
            scale_x_to_full: ratio(full_width, level_width),
            scale_y_to_full: ratio(full_height, level_height),
        }
    }
}

/// One entry of the scale schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLevel {
    pub index: usize,
    /// Canvas-to-level reduction factor (1 at the first level).
    pub scale: f64,
    pub width: usize,
    pub height: usize,
    pub scaling: LevelScaling,
}

/// Number of scales for a `width × height` canvas.
pub fn scale_count(
    width: usize,
    height: usize,
    window_width: usize,
    window_height: usize,
    factor: f64,
) -> usize {
    if window_width == 0 || window_height == 0 || factor <= 1.0 {
        return 0;
    }
    let fit = (width as f64 / window_width as f64).min(height as f64 / window_height as f64);
    if fit <= 1.0 {
        return 0;
    }
    (fit.ln() / factor.ln()).floor() as usize
}

/// Build the scale schedule, largest level first.
pub fn plan_scales(
    width: usize,
    height: usize,
    window_width: usize,
    window_height: usize,
    factor: f64,
) -> Vec<ScaleLevel> {
    let count = scale_count(width, height, window_width, window_height, factor);
    let mut levels = Vec::with_capacity(count);
    let mut scale = 1.0f64;
    for index in 0..count {
        let level_width = (width as f64 / scale) as usize;
        let level_height = (height as f64 / scale) as usize;
        levels.push(ScaleLevel {
            index,
            scale,
            width: level_width,
            height: level_height,
            scaling: LevelScaling::from_dimensions(level_width, level_height, width, height),
        });
        scale *= factor;
    }
    levels
}
