//! Per-detector scratch buffers.
//!
//! The detector reuses the canvas, the decimated level and every integral
//! table across frames and scales; buffers only grow when a larger size is
//! requested.
use super::scaling::ScaleLevel;
use crate::cascade::{EdgeBand, ScanInput};
use crate::error::Result;
use crate::integral::IntegralImage;
use crate::pixel::{decimate_into, edge_magnitude_into, EdgeScratch};

/// Reusable buffers for one detector instance.
#[derive(Debug, Default)]
pub struct ScanWorkspace {
    /// Grayscale canvas at full detector resolution.
    pub(crate) gray: Vec<u8>,
    canvas_width: usize,
    canvas_height: usize,
    scaled: Vec<u8>,
    edges: Vec<u32>,
    edge_scratch: EdgeScratch,
    sum: IntegralImage,
    squared: IntegralImage,
    tilted: IntegralImage,
    edge_sum: IntegralImage,
}

impl ScanWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the dimensions of the canvas currently held in `gray`.
    pub(crate) fn set_canvas(&mut self, width: usize, height: usize) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Build the integral tables of `level` from the canvas.
    pub(crate) fn prepare_level(
        &mut self,
        level: &ScaleLevel,
        tilted: bool,
        edges: bool,
    ) -> Result<()> {
        let (w, h) = (level.width, level.height);
        let src: &[u8] = if level.index == 0 {
            &self.gray
        } else {
            decimate_into(
                &self.gray,
                self.canvas_width,
                self.canvas_height,
                level.scale,
                &mut self.scaled,
            )?;
            &self.scaled
        };
        self.sum.build_sum_into(src, w, h)?;
        self.squared.build_squared_sum_into(src, w, h)?;
        if tilted {
            self.tilted.build_tilted_sum_into(src, w, h)?;
        }
        if edges {
            edge_magnitude_into(src, w, h, &mut self.edges, &mut self.edge_scratch);
            self.edge_sum.build_sum_into(&self.edges, w, h)?;
        }
        Ok(())
    }

    /// Tables of the most recently prepared level.
    pub(crate) fn scan_input(&self, tilted: bool, edges: Option<EdgeBand>) -> ScanInput<'_> {
        ScanInput::new(&self.sum, &self.squared)
            .with_tilted(tilted.then_some(&self.tilted))
            .with_edges(edges.map(|band| (&self.edge_sum, band)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::scaling::plan_scales;
    use crate::pixel::{decimate, edge_magnitude};

    #[test]
    fn edge_tables_follow_each_prepared_level() {
        let (w, h) = (24usize, 18usize);
        let gray: Vec<u8> = (0..w * h).map(|i| ((i * 29) % 251) as u8).collect();
        let levels = plan_scales(w, h, 6, 6, 1.5);
        assert!(levels.len() >= 2);

        let mut ws = ScanWorkspace::new();
        ws.gray = gray.clone();
        ws.set_canvas(w, h);
        for level in levels.iter().chain(levels.iter()) {
            ws.prepare_level(level, false, true).unwrap();
            let expected = if level.index == 0 {
                edge_magnitude(&gray, w, h)
            } else {
                let (scaled, sw, sh) = decimate(&gray, w, h, level.scale).unwrap();
                assert_eq!((sw, sh), (level.width, level.height));
                edge_magnitude(&scaled, sw, sh)
            };
            assert_eq!(ws.edges, expected, "level {}", level.index);
        }
    }
}
