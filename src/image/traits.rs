//! Row access shared by borrowed image views.

/// A 2-D view made of equally long rows, possibly padded in memory.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Elements between the starts of consecutive rows.
    fn stride(&self) -> usize;

    /// Visible pixels of row `y`, `width()` long.
    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows {
            view: self,
            next: 0,
        }
    }

    /// The whole image as one slice when rows carry no padding.
    fn as_slice(&self) -> Option<&[Self::Pixel]> {
        None
    }

    /// Replace `dst` with the visible pixels, rows back to back.
    fn copy_packed_into(&self, dst: &mut Vec<Self::Pixel>)
    where
        Self: Sized,
    {
        dst.clear();
        match self.as_slice() {
            Some(slice) => dst.extend_from_slice(slice),
            None => {
                dst.reserve(self.width() * self.height());
                self.rows().for_each(|row| dst.extend_from_slice(row));
            }
        }
    }
}

/// Top-to-bottom iterator over the rows of an [`ImageView`].
pub struct Rows<'a, V: ImageView> {
    view: &'a V,
    next: usize,
}

impl<'a, V: ImageView> Iterator for Rows<'a, V> {
    type Item = &'a [V::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.view.height() {
            return None;
        }
        let view: &'a V = self.view;
        let row = view.row(self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.view.height().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<V: ImageView> ExactSizeIterator for Rows<'_, V> {}
