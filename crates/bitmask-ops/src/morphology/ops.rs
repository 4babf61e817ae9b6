use bitmask_core::{BitGrid, CombineOp, GridSize};

use super::border::BorderMode;
use super::kernel::Kernel;

/// The 8-neighbourhood of a pixel.
const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Dilate a grid with the 3x3 neighbourhood.
///
/// A bit is set in the result if it or any of its 8 neighbours is set in `src`.
///
/// # Examples
///
/// ```
/// use bitmask_core::BitGrid;
/// use bitmask_ops::morphology::dilate;
///
/// let mut grid = BitGrid::new(5, 5).unwrap();
/// grid.set(2, 2, true);
///
/// assert_eq!(dilate(&grid).count(), 9);
/// ```
pub fn dilate(src: &BitGrid) -> BitGrid {
    let mut dst = src.clone();
    for (dx, dy) in NEIGHBOURS {
        dst.combine(src, CombineOp::Or, dx, dy);
    }
    dst
}

/// Erode a grid with the 3x3 neighbourhood.
///
/// A bit is set in the result only if it and all of its 8 neighbours are set in
/// `src`. Neighbours outside the grid count as unset.
pub fn erode(src: &BitGrid) -> BitGrid {
    let mut dst = src.clone();
    for (dx, dy) in NEIGHBOURS {
        dst.combine(src, CombineOp::And, dx, dy);
    }
    dst
}

/// Dilate a grid with a [`Kernel`].
///
/// A bit at `p` is set in the result if `src` is set at `p + offset` for any
/// active kernel offset relative to the anchor.
pub fn dilate_with_kernel(src: &BitGrid, kernel: &Kernel) -> BitGrid {
    log::debug!(
        "dilate {}x{} grid with {}x{} kernel",
        src.width(),
        src.height(),
        kernel.mask().width(),
        kernel.mask().height()
    );
    let mut dst = BitGrid::from_size(src.size());
    for offset in kernel.offsets() {
        dst.combine(src, CombineOp::Or, -offset.x, -offset.y);
    }
    dst
}

/// Erode a grid with a [`Kernel`], treating out-of-range positions as unset.
pub fn erode_with_kernel(src: &BitGrid, kernel: &Kernel) -> BitGrid {
    erode_with_kernel_border(src, kernel, BorderMode::Clear)
}

/// Erode a grid with a [`Kernel`] and a configurable [`BorderMode`].
///
/// A bit at `p` is set in the result if `src` is set at `p + offset` for every
/// active kernel offset relative to the anchor.
pub fn erode_with_kernel_border(src: &BitGrid, kernel: &Kernel, border: BorderMode) -> BitGrid {
    log::debug!(
        "erode {}x{} grid with {}x{} kernel ({:?})",
        src.width(),
        src.height(),
        kernel.mask().width(),
        kernel.mask().height(),
        border
    );
    let mut dst = BitGrid::from_size(src.size());
    dst.fill();
    for offset in kernel.offsets() {
        match border {
            BorderMode::Clear => dst.combine(src, CombineOp::And, -offset.x, -offset.y),
            BorderMode::Ignore => dst.combine_window(src, CombineOp::And, -offset.x, -offset.y),
        }
    }
    dst
}

/// Opening: erosion followed by dilation.
///
/// Removes regions smaller than the kernel and smooths boundaries.
pub fn open(src: &BitGrid, kernel: &Kernel, border: BorderMode) -> BitGrid {
    let eroded = erode_with_kernel_border(src, kernel, border);
    dilate_with_kernel(&eroded, kernel)
}

/// Closing: dilation followed by erosion.
///
/// Fills holes smaller than the kernel and joins nearby regions.
pub fn close(src: &BitGrid, kernel: &Kernel, border: BorderMode) -> BitGrid {
    let dilated = dilate_with_kernel(src, kernel);
    erode_with_kernel_border(&dilated, kernel, border)
}

/// Per-position overlap counts produced by [`convolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountGrid {
    size: GridSize,
    counts: Vec<u32>,
}

impl CountGrid {
    /// Size of the grid.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Count at `(x, y)`, `0` when out of range.
    pub fn get(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 || x as usize >= self.size.width || y as usize >= self.size.height {
            return 0;
        }
        self.counts[y as usize * self.size.width + x as usize]
    }

    /// Row-major counts.
    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    /// Largest count, `0` for an empty grid.
    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Grid of the positions whose count is at least `min`.
    pub fn threshold(&self, min: u32) -> BitGrid {
        let mut dst = BitGrid::from_size(self.size);
        if self.size.width == 0 {
            return dst;
        }
        for (y, row) in self.counts.chunks_exact(self.size.width).enumerate() {
            for (x, &count) in row.iter().enumerate() {
                if count >= min {
                    dst.set(x as i32, y as i32, true);
                }
            }
        }
        dst
    }
}

/// Count, for every position of `src`, how many set bits of `kernel` land on
/// set bits of `src`.
///
/// The kernel is placed with its position `(offset_x, offset_y)` over the
/// position being computed, so the count at `(x, y)` is
/// `src.overlap_area(kernel, x - offset_x, y - offset_y)`. Kernel bits falling
/// outside `src` contribute nothing.
///
/// Dilation with a kernel is `count > 0` and erosion with
/// [`BorderMode::Clear`] is `count == kernel.count()`.
///
/// # Examples
///
/// ```
/// use bitmask_core::BitGrid;
/// use bitmask_ops::morphology::convolve;
///
/// let mut src = BitGrid::new(3, 1).unwrap();
/// src.fill();
/// let mut kernel = BitGrid::new(3, 1).unwrap();
/// kernel.fill();
///
/// let counts = convolve(&src, &kernel, 1, 0);
/// assert_eq!(counts.as_slice(), &[2, 3, 2]);
/// ```
pub fn convolve(src: &BitGrid, kernel: &BitGrid, offset_x: i32, offset_y: i32) -> CountGrid {
    let size = src.size();
    let mut counts = Vec::with_capacity(size.area());
    for y in 0..size.height as i32 {
        for x in 0..size.width as i32 {
            let count = src.overlap_area(kernel, x - offset_x, y - offset_y);
            counts.push(count as u32);
        }
    }
    log::trace!(
        "convolved {}x{} grid with {}x{} kernel",
        size.width,
        size.height,
        kernel.width(),
        kernel.height()
    );
    CountGrid { size, counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpsError;
    use crate::morphology::KernelShape;
    use bitmask_core::{BitGridError, Point};

    fn plus_grid() -> Result<BitGrid, BitGridError> {
        #[rustfmt::skip]
        let grid = BitGrid::from_slice(
            5,
            5,
            &[
                0, 0, 0, 0, 0, //
                0, 0, 1, 0, 0, //
                0, 1, 1, 1, 0, //
                0, 0, 1, 0, 0, //
                0, 0, 0, 0, 0, //
            ],
        )?;
        Ok(grid)
    }

    #[test]
    fn test_dilate_3x3() -> Result<(), BitGridError> {
        let dilated = dilate(&plus_grid()?);
        #[rustfmt::skip]
        let expected = BitGrid::from_slice(
            5,
            5,
            &[
                0, 1, 1, 1, 0, //
                1, 1, 1, 1, 1, //
                1, 1, 1, 1, 1, //
                1, 1, 1, 1, 1, //
                0, 1, 1, 1, 0, //
            ],
        )?;
        assert_eq!(dilated, expected);
        Ok(())
    }

    #[test]
    fn test_erode_3x3() -> Result<(), BitGridError> {
        let mut grid = BitGrid::new(4, 4)?;
        grid.fill();
        let eroded = erode(&grid);
        assert_eq!(eroded.count(), 4);
        assert!(eroded.get(1, 1) && eroded.get(2, 2));

        assert!(erode(&plus_grid()?).is_clear());
        Ok(())
    }

    #[test]
    fn test_erode_border_modes() -> Result<(), OpsError> {
        let mut grid = BitGrid::new(3, 3)?;
        grid.fill();
        let kernel = Kernel::new(KernelShape::Box { size: 3 })?;

        let cleared = erode_with_kernel_border(&grid, &kernel, BorderMode::Clear);
        assert_eq!(cleared.count(), 1);
        assert_eq!(cleared, erode(&grid));

        let ignored = erode_with_kernel_border(&grid, &kernel, BorderMode::Ignore);
        assert_eq!(ignored, grid);
        Ok(())
    }

    #[test]
    fn test_kernel_matches_fixed_neighbourhood() -> Result<(), OpsError> {
        let grid = plus_grid()?;
        let kernel = Kernel::new(KernelShape::Box { size: 3 })?;
        assert_eq!(dilate_with_kernel(&grid, &kernel), dilate(&grid));
        assert_eq!(erode_with_kernel(&grid, &kernel), erode(&grid));
        Ok(())
    }

    #[test]
    fn test_cross_kernel_dilation() -> Result<(), OpsError> {
        let mut grid = BitGrid::new(5, 5)?;
        grid.set(2, 2, true);
        let kernel = Kernel::new(KernelShape::Cross { size: 3 })?;
        assert_eq!(dilate_with_kernel(&grid, &kernel), plus_grid()?);
        Ok(())
    }

    #[test]
    fn test_asymmetric_anchor() -> Result<(), OpsError> {
        let mut grid = BitGrid::new(4, 1)?;
        grid.set(2, 0, true);
        let mut mask = BitGrid::new(2, 1)?;
        mask.fill();
        // offsets 0 and +1: p is set if src(p) or src(p + 1)
        let kernel = Kernel::from_mask(mask, Point::new(0, 0))?;
        let dilated = dilate_with_kernel(&grid, &kernel);
        assert_eq!(
            dilated.iter_ones().collect::<Vec<_>>(),
            vec![Point::new(1, 0), Point::new(2, 0)]
        );
        Ok(())
    }

    #[test]
    fn test_open_removes_specks() -> Result<(), OpsError> {
        let mut grid = BitGrid::new(8, 8)?;
        for y in 1..6 {
            for x in 1..6 {
                grid.set(x, y, true);
            }
        }
        grid.set(7, 7, true);
        let kernel = Kernel::new(KernelShape::Box { size: 3 })?;
        let opened = open(&grid, &kernel, BorderMode::Clear);
        assert!(!opened.get(7, 7));
        assert_eq!(opened.count(), 25);
        Ok(())
    }

    #[test]
    fn test_close_fills_hole() -> Result<(), OpsError> {
        let mut grid = BitGrid::new(7, 7)?;
        for y in 1..6 {
            for x in 1..6 {
                grid.set(x, y, true);
            }
        }
        grid.set(3, 3, false);
        let kernel = Kernel::new(KernelShape::Box { size: 3 })?;
        let closed = close(&grid, &kernel, BorderMode::Clear);
        assert!(closed.get(3, 3));
        assert_eq!(closed.count(), 25);
        Ok(())
    }

    #[test]
    fn test_convolve_counts() -> Result<(), OpsError> {
        let grid = plus_grid()?;
        let kernel = Kernel::new(KernelShape::Box { size: 3 })?;
        let counts = convolve(&grid, kernel.mask(), 1, 1);
        assert_eq!(counts.get(2, 2), 5);
        assert_eq!(counts.get(0, 0), 0);
        assert_eq!(counts.get(1, 0), 1);
        assert_eq!(counts.get(1, 1), 3);
        assert_eq!(counts.get(-1, 0), 0);
        assert_eq!(counts.max(), 5);
        assert_eq!(counts.threshold(1), dilate(&grid));
        assert_eq!(counts.threshold(9), erode(&grid));
        Ok(())
    }
}
