//! Rectangle sums computed directly from pixels, without integral tables.

/// Gray image borrowed with its dimensions.
#[derive(Clone, Copy)]
pub struct Pixels<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
}

impl Pixels<'_> {
    fn px(&self, x: usize, y: usize) -> u64 {
        self.data[y * self.width + x] as u64
    }

    /// Sum over `[x, x + w) × [y, y + h)`.
    pub fn upright(&self, x: usize, y: usize, w: usize, h: usize) -> u64 {
        (y..y + h)
            .flat_map(|yy| (x..x + w).map(move |xx| (xx, yy)))
            .map(|(xx, yy)| self.px(xx, yy))
            .sum()
    }

    /// Sum of squared pixels over `[x, x + w) × [y, y + h)`.
    pub fn upright_squared(&self, x: usize, y: usize, w: usize, h: usize) -> u64 {
        (y..y + h)
            .flat_map(|yy| (x..x + w).map(move |xx| (xx, yy)))
            .map(|(xx, yy)| self.px(xx, yy).pow(2))
            .sum()
    }

    /// Upward triangle ending at table cell `(cx, cy)`: pixels `(i, j)` with
    /// `j < cy` and `|i - cx + 1| <= cy - j - 1`.
    pub fn triangle(&self, cx: usize, cy: usize) -> u64 {
        let mut total = 0;
        for j in 0..cy {
            for i in 0..self.width {
                if (i as i64 - cx as i64 + 1).abs() <= (cy - j) as i64 - 1 {
                    total += self.px(i, j);
                }
            }
        }
        total
    }

    /// 45° rectangle anchored at table point `(x, y)`, extending `w` along
    /// the down-right diagonal and `h` along the down-left one.
    pub fn rotated(&self, x: usize, y: usize, w: usize, h: usize) -> i64 {
        let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
        let mut total = 0i64;
        for py in 0..self.height as i64 {
            for px in 0..self.width as i64 {
                let along = px + py + 1 - x - y;
                let across = (py - y) - (px - x);
                if (0..2 * w).contains(&along) && across > 0 && across <= 2 * h {
                    total += self.px(px as usize, py as usize) as i64;
                }
            }
        }
        total
    }

    /// Rotated rectangle as read from a tilted table whose column 0 is zero:
    /// a left corner on that column adds back the triangle it should cancel.
    pub fn rotated_zero_column(&self, x: usize, y: usize, w: usize, h: usize) -> i64 {
        let base = self.rotated(x, y, w, h);
        if x == h {
            base + self.triangle(0, y + h) as i64
        } else {
            base
        }
    }
}
