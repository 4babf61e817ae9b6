//! Offset-aware intersection queries between two grids.
//!
//! Every query places `other` with its origin at `(offset_x, offset_y)` in the
//! coordinate space of `this`, so position `(x, y)` of `this` meets position
//! `(x - offset_x, y - offset_y)` of `other`. The scan is clipped to the
//! window where both grids are addressable before any word is read.

use std::ops::Range;

use crate::geom::{GridSize, Point};
use crate::grid::BitGrid;
use crate::row::CombineOp;

/// The rows and columns of `this` that have a counterpart in `other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapWindow {
    /// Rows of `this` inside the window.
    pub rows: Range<usize>,
    /// Columns of `this` inside the window.
    pub cols: Range<usize>,
    /// Horizontal offset of `other`.
    pub dx: isize,
    /// Vertical offset of `other`.
    pub dy: isize,
}

impl OverlapWindow {
    /// Clip `other` placed at `(offset_x, offset_y)` against `this`.
    ///
    /// Returns `None` when the grids do not share a single position.
    pub fn new(this: GridSize, other: GridSize, offset_x: i32, offset_y: i32) -> Option<Self> {
        let cols = clip_axis(this.width, other.width, offset_x)?;
        let rows = clip_axis(this.height, other.height, offset_y)?;
        Some(Self {
            rows,
            cols,
            dx: offset_x as isize,
            dy: offset_y as isize,
        })
    }

    /// Row of `other` matching row `y` of `this`.
    #[inline]
    pub fn other_row(&self, y: usize) -> usize {
        (y as isize - self.dy) as usize
    }
}

/// Clip `[offset, offset + other_len)` against `[0, this_len)`.
fn clip_axis(this_len: usize, other_len: usize, offset: i32) -> Option<Range<usize>> {
    let offset = offset as i64;
    let lo = offset.max(0);
    let hi = (offset + other_len as i64).min(this_len as i64);
    (lo < hi).then(|| lo as usize..hi as usize)
}

/// Number of positions set in both grids under the given offset.
///
/// # Examples
///
/// ```
/// use bitmask_core::{overlap, BitGrid};
///
/// let mut a = BitGrid::new(2, 2).unwrap();
/// let mut b = BitGrid::new(2, 2).unwrap();
/// a.fill();
/// b.fill();
///
/// assert_eq!(overlap::overlap_area(&a, &b, 0, 0), 4);
/// assert_eq!(overlap::overlap_area(&a, &b, 1, 1), 1);
/// ```
pub fn overlap_area(this: &BitGrid, other: &BitGrid, offset_x: i32, offset_y: i32) -> usize {
    let Some(window) = OverlapWindow::new(this.size(), other.size(), offset_x, offset_y) else {
        return 0;
    };
    window
        .rows
        .clone()
        .map(|y| {
            this.row(y)
                .overlap_count(other.row(window.other_row(y)), window.dx, window.cols.clone())
        })
        .sum()
}

/// Returns true if any position is set in both grids under the given offset.
///
/// Stops at the first shared bit in row-major order.
pub fn overlap_exists(this: &BitGrid, other: &BitGrid, offset_x: i32, offset_y: i32) -> bool {
    first_overlap_point(this, other, offset_x, offset_y).is_some()
}

/// First position, in row-major order and in the coordinates of `this`, set
/// in both grids under the given offset.
pub fn first_overlap_point(
    this: &BitGrid,
    other: &BitGrid,
    offset_x: i32,
    offset_y: i32,
) -> Option<Point> {
    let window = OverlapWindow::new(this.size(), other.size(), offset_x, offset_y)?;
    window.rows.clone().find_map(|y| {
        this.row(y)
            .first_overlap(other.row(window.other_row(y)), window.dx, window.cols.clone())
            .map(|x| Point::new(x as i32, y as i32))
    })
}

/// A grid the size of `this` holding the positions set in both grids.
///
/// Neither input is modified.
pub fn overlap_mask(this: &BitGrid, other: &BitGrid, offset_x: i32, offset_y: i32) -> BitGrid {
    let mut mask = this.clone();
    mask.combine(other, CombineOp::And, offset_x, offset_y);
    mask
}
