use serde::{Deserialize, Serialize};

/// Detection rectangle in canvas pixel coordinates.
///
/// `neighbors` is the size of the cluster that produced the rectangle; raw,
/// ungrouped detections carry 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub neighbors: u32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            neighbors: 0,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Accepted window at the scanned scale, in that scale's pixel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DetectionCandidate {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl DetectionCandidate {
    /// Map to canvas coordinates with per-axis factors.
    pub fn to_rectangle(&self, scale_x: f32, scale_y: f32) -> Rectangle {
        Rectangle::new(
            self.x as f32 * scale_x,
            self.y as f32 * scale_y,
            self.width as f32 * scale_x,
            self.height as f32 * scale_y,
        )
    }
}
