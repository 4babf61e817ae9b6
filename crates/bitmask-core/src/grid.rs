use crate::error::BitGridError;
use crate::geom::{GridSize, Point, Rect};
use crate::overlap::{self, OverlapWindow};
use crate::row::{words_for, BitRow, CombineOp};

/// A dense 2D boolean grid, one bit per pixel, stored as one [`BitRow`] per scanline.
///
/// The grid is conceptually infinite and false outside its bounds: reads out of
/// range return false and writes out of range are ignored.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitGrid {
    size: GridSize,
    rows: Vec<BitRow>,
}

impl BitGrid {
    /// Create a cleared grid.
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the grid in pixels.
    /// * `height` - The height of the grid in pixels.
    ///
    /// # Errors
    ///
    /// [`BitGridError::InvalidDimension`] if either dimension is negative or the
    /// storage would not be addressable. Zero is allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitmask_core::BitGrid;
    ///
    /// let grid = BitGrid::new(10, 20).unwrap();
    ///
    /// assert_eq!(grid.width(), 10);
    /// assert_eq!(grid.height(), 20);
    /// assert_eq!(grid.count(), 0);
    /// assert!(BitGrid::new(-1, 4).is_err());
    /// ```
    pub fn new(width: i32, height: i32) -> Result<Self, BitGridError> {
        if width < 0 || height < 0 {
            return Err(BitGridError::InvalidDimension(width, height));
        }
        let size = GridSize {
            width: width as usize,
            height: height as usize,
        };
        words_for(size.width)
            .checked_mul(size.height)
            .ok_or(BitGridError::InvalidDimension(width, height))?;

        Ok(Self::from_size(size))
    }

    /// Create a cleared grid of a known size.
    pub fn from_size(size: GridSize) -> Self {
        Self {
            size,
            rows: vec![BitRow::new(size.width); size.height],
        }
    }

    /// Create a grid from a per-pixel predicate.
    ///
    /// The predicate is called once per position in row-major order and decides
    /// whether that pixel is set, e.g. "is this pixel opaque".
    ///
    /// # Examples
    ///
    /// ```
    /// use bitmask_core::BitGrid;
    ///
    /// let grid = BitGrid::from_fn(4, 4, |x, y| x == y).unwrap();
    /// assert_eq!(grid.count(), 4);
    /// assert!(grid.get(2, 2));
    /// ```
    pub fn from_fn<F>(width: i32, height: i32, mut is_set: F) -> Result<Self, BitGridError>
    where
        F: FnMut(i32, i32) -> bool,
    {
        let mut grid = Self::new(width, height)?;
        for (y, row) in grid.rows.iter_mut().enumerate() {
            for x in 0..row.width() {
                if is_set(x as i32, y as i32) {
                    row.set(x, true);
                }
            }
        }
        Ok(grid)
    }

    /// Create a grid from row-major bytes, any non-zero byte is a set pixel.
    ///
    /// # Errors
    ///
    /// [`BitGridError::InvalidDataLength`] if `data` does not hold exactly
    /// `width * height` bytes.
    pub fn from_slice(width: i32, height: i32, data: &[u8]) -> Result<Self, BitGridError> {
        let mut grid = Self::new(width, height)?;
        if data.len() != grid.size.area() {
            return Err(BitGridError::InvalidDataLength(data.len(), grid.size.area()));
        }
        if grid.size.width == 0 {
            return Ok(grid);
        }
        for (row, chunk) in grid.rows.iter_mut().zip(data.chunks_exact(grid.size.width)) {
            for (x, &v) in chunk.iter().enumerate() {
                row.set(x, v != 0);
            }
        }
        Ok(grid)
    }

    /// The size of the grid in pixels.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Width of the grid in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Height of the grid in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Scanline `y`.
    ///
    /// # Panics
    ///
    /// If `y` is not less than the grid height.
    pub fn row(&self, y: usize) -> &BitRow {
        &self.rows[y]
    }

    /// All scanlines, top to bottom.
    pub fn rows(&self) -> &[BitRow] {
        &self.rows
    }

    /// Read the bit at `(x, y)`, false when out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.rows
            .get(y as usize)
            .is_some_and(|row| row.get(x as usize))
    }

    /// Write the bit at `(x, y)`, ignored when out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(row) = self.rows.get_mut(y as usize) {
            row.set(x as usize, value);
        }
    }

    /// Set every bit.
    pub fn fill(&mut self) {
        self.rows.iter_mut().for_each(BitRow::fill);
    }

    /// Clear every bit.
    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(BitRow::clear);
    }

    /// Flip every bit.
    pub fn invert(&mut self) {
        self.rows.iter_mut().for_each(BitRow::invert);
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.rows.iter().map(BitRow::count).sum()
    }

    /// Returns true if no bit is set.
    pub fn is_clear(&self) -> bool {
        self.rows.iter().all(BitRow::is_clear)
    }

    /// The first set position in row-major order.
    pub fn first_one(&self) -> Option<Point> {
        self.rows.iter().enumerate().find_map(|(y, row)| {
            row.first_one()
                .map(|x| Point::new(x as i32, y as i32))
        })
    }

    /// Set positions in row-major order.
    pub fn iter_ones(&self) -> impl Iterator<Item = Point> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter_ones()
                .map(move |x| Point::new(x as i32, y as i32))
        })
    }

    /// The smallest rectangle holding every set bit, `None` if the grid is clear.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        for (y, row) in self.rows.iter().enumerate() {
            let (Some(first), Some(last)) = (row.first_one(), row.last_one()) else {
                continue;
            };
            let left = Point::new(first as i32, y as i32);
            let right = Point::new(last as i32, y as i32);
            match rect.as_mut() {
                Some(r) => {
                    r.include(left);
                    r.include(right);
                }
                None => {
                    let mut r = Rect::from_point(left);
                    r.include(right);
                    rect = Some(r);
                }
            }
        }
        rect
    }

    /// Combine `other` into this grid in place.
    ///
    /// For every position `(x, y)` of this grid, `op` is applied between the bit
    /// here and `other.get(x - offset_x, y - offset_y)`. Positions of `other`
    /// outside its bounds read as false, so with [`CombineOp::And`] everything
    /// outside the overlapping window is cleared while the other operations
    /// leave it untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitmask_core::{BitGrid, CombineOp};
    ///
    /// let mut a = BitGrid::new(4, 4).unwrap();
    /// let mut b = BitGrid::new(2, 2).unwrap();
    /// b.fill();
    ///
    /// a.combine(&b, CombineOp::Or, 3, 3);
    /// assert_eq!(a.count(), 1);
    /// assert!(a.get(3, 3));
    /// ```
    pub fn combine(&mut self, other: &BitGrid, op: CombineOp, offset_x: i32, offset_y: i32) {
        let Some(window) = OverlapWindow::new(self.size, other.size, offset_x, offset_y) else {
            log::trace!("combine {op:?}: ({offset_x}, {offset_y}) leaves no overlap");
            if op == CombineOp::And {
                self.clear();
            }
            return;
        };

        for (y, row) in self.rows.iter_mut().enumerate() {
            if !window.rows.contains(&y) {
                if op == CombineOp::And {
                    row.clear();
                }
                continue;
            }
            let src = &other.rows[window.other_row(y)];
            if op == CombineOp::And {
                row.combine(src, op, window.dx);
            } else {
                row.combine_span(src, op, window.dx, window.cols.clone());
            }
        }
    }

    /// Combine `other` into this grid, touching only the overlapping window.
    ///
    /// Unlike [`BitGrid::combine`], [`CombineOp::And`] leaves positions with no
    /// counterpart in `other` as they are.
    pub fn combine_window(&mut self, other: &BitGrid, op: CombineOp, offset_x: i32, offset_y: i32) {
        let Some(window) = OverlapWindow::new(self.size, other.size, offset_x, offset_y) else {
            return;
        };
        for y in window.rows.clone() {
            let src = &other.rows[window.other_row(y)];
            self.rows[y].combine_span(src, op, window.dx, window.cols.clone());
        }
    }

    /// Set every position that is set in `other` placed at the offset.
    pub fn draw(&mut self, other: &BitGrid, offset_x: i32, offset_y: i32) {
        self.combine(other, CombineOp::Or, offset_x, offset_y);
    }

    /// Clear every position that is set in `other` placed at the offset.
    pub fn erase(&mut self, other: &BitGrid, offset_x: i32, offset_y: i32) {
        self.combine(other, CombineOp::Diff, offset_x, offset_y);
    }

    /// Number of positions set in both grids, see [`overlap::overlap_area`].
    pub fn overlap_area(&self, other: &BitGrid, offset_x: i32, offset_y: i32) -> usize {
        overlap::overlap_area(self, other, offset_x, offset_y)
    }

    /// Returns true if both grids share a set position, see [`overlap::overlap_exists`].
    pub fn overlap_exists(&self, other: &BitGrid, offset_x: i32, offset_y: i32) -> bool {
        overlap::overlap_exists(self, other, offset_x, offset_y)
    }

    /// First shared set position, see [`overlap::first_overlap_point`].
    pub fn first_overlap_point(
        &self,
        other: &BitGrid,
        offset_x: i32,
        offset_y: i32,
    ) -> Option<Point> {
        overlap::first_overlap_point(self, other, offset_x, offset_y)
    }

    /// Grid of shared set positions, see [`overlap::overlap_mask`].
    pub fn overlap_mask(&self, other: &BitGrid, offset_x: i32, offset_y: i32) -> BitGrid {
        overlap::overlap_mask(self, other, offset_x, offset_y)
    }
}

impl std::fmt::Debug for BitGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "BitGrid {}x{}", self.size.width, self.size.height)?;
        std::fmt::Display::fmt(self, f)
    }
}

/// Renders set bits as `#` and clear bits as `.`, one line per row.
impl std::fmt::Display for BitGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in &self.rows {
            for x in 0..row.width() {
                f.write_str(if row.get(x) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid() -> Result<(), BitGridError> {
        let grid = BitGrid::new(0, 0)?;
        assert_eq!(grid.count(), 0);
        assert_eq!(grid.size().area(), 0);

        assert_eq!(
            BitGrid::new(-1, 2),
            Err(BitGridError::InvalidDimension(-1, 2))
        );
        assert_eq!(
            BitGrid::new(3, -7),
            Err(BitGridError::InvalidDimension(3, -7))
        );
        Ok(())
    }

    #[test]
    fn test_get_set_out_of_range() -> Result<(), BitGridError> {
        let mut grid = BitGrid::new(3, 2)?;
        grid.set(-1, 0, true);
        grid.set(3, 0, true);
        grid.set(0, 2, true);
        assert_eq!(grid.count(), 0);

        grid.set(2, 1, true);
        assert!(grid.get(2, 1));
        assert!(!grid.get(-1, 1));
        assert!(!grid.get(2, 2));

        grid.set(2, 1, false);
        assert!(grid.is_clear());
        Ok(())
    }

    #[test]
    fn test_fill_clear_count() -> Result<(), BitGridError> {
        let mut grid = BitGrid::new(65, 3)?;
        grid.fill();
        assert_eq!(grid.count(), 65 * 3);
        grid.invert();
        assert_eq!(grid.count(), 0);
        grid.fill();
        grid.clear();
        assert_eq!(grid.count(), 0);
        Ok(())
    }

    #[test]
    fn test_from_slice() -> Result<(), BitGridError> {
        #[rustfmt::skip]
        let grid = BitGrid::from_slice(
            3,
            2,
            &[
                0, 1, 0, //
                1, 0, 9, //
            ],
        )?;
        assert_eq!(
            grid.iter_ones().collect::<Vec<_>>(),
            vec![Point::new(1, 0), Point::new(0, 1), Point::new(2, 1)]
        );
        assert_eq!(grid.first_one(), Some(Point::new(1, 0)));
        assert_eq!(
            BitGrid::from_slice(3, 2, &[0; 5]),
            Err(BitGridError::InvalidDataLength(5, 6))
        );
        Ok(())
    }

    #[test]
    fn test_bounding_rect() -> Result<(), BitGridError> {
        let mut grid = BitGrid::new(10, 10)?;
        assert_eq!(grid.bounding_rect(), None);
        grid.set(4, 2, true);
        grid.set(1, 6, true);
        grid.set(7, 5, true);
        assert_eq!(grid.bounding_rect(), Some(Rect::new(1, 2, 7, 5)));
        Ok(())
    }

    #[test]
    fn test_combine_and_clears_outside_window() -> Result<(), BitGridError> {
        let mut a = BitGrid::new(4, 4)?;
        let mut b = BitGrid::new(2, 2)?;
        a.fill();
        b.fill();

        let mut windowed = a.clone();
        windowed.combine_window(&b, CombineOp::And, 1, 1);
        assert_eq!(windowed.count(), 16);

        a.combine(&b, CombineOp::And, 1, 1);
        assert_eq!(a.count(), 4);
        assert!(a.get(1, 1) && a.get(2, 2));

        a.combine(&b, CombineOp::And, 10, 10);
        assert!(a.is_clear());
        Ok(())
    }

    #[test]
    fn test_draw_erase_xor() -> Result<(), BitGridError> {
        let mut a = BitGrid::new(5, 5)?;
        let mut b = BitGrid::new(3, 3)?;
        b.fill();

        a.draw(&b, -1, -1);
        assert_eq!(a.count(), 4);
        a.combine(&b, CombineOp::Xor, 0, 0);
        assert_eq!(a.count(), 5);
        a.erase(&b, 2, 2);
        assert_eq!(a.count(), 4);
        assert!(!a.get(2, 2));
        Ok(())
    }

    #[test]
    fn test_display() -> Result<(), BitGridError> {
        let grid = BitGrid::from_fn(3, 2, |x, y| x == y)?;
        assert_eq!(grid.to_string(), "#..\n.#.\n");
        Ok(())
    }
}
