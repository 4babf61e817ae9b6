use bitmask_core::{BitGrid, Point};

use crate::error::OpsError;

/// Shape of a generated structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// A filled `size x size` square.
    Box {
        /// Side length.
        size: usize,
    },
    /// The centre row and centre column of a `size x size` square.
    Cross {
        /// Side length.
        size: usize,
    },
    /// The ellipse inscribed in a `width x height` rectangle.
    Ellipse {
        /// Horizontal extent.
        width: usize,
        /// Vertical extent.
        height: usize,
    },
}

/// A structuring element: a mask of active positions and the anchor that is
/// placed over the pixel being computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    mask: BitGrid,
    anchor: Point,
}

impl Kernel {
    /// Generate a kernel of the given shape anchored at its centre.
    ///
    /// The anchor is `(width / 2, height / 2)`. Ellipses are measured from the
    /// true centre `((width - 1) / 2, (height - 1) / 2)`, so even extents stay
    /// symmetric.
    ///
    /// # Errors
    ///
    /// [`OpsError::EmptyKernel`] if any extent is zero or does not fit a grid
    /// dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitmask_core::Point;
    /// use bitmask_ops::morphology::{Kernel, KernelShape};
    ///
    /// let kernel = Kernel::new(KernelShape::Cross { size: 3 }).unwrap();
    /// assert_eq!(kernel.mask().count(), 5);
    /// assert_eq!(kernel.anchor(), Point::new(1, 1));
    /// ```
    pub fn new(shape: KernelShape) -> Result<Self, OpsError> {
        let (width, height) = match shape {
            KernelShape::Box { size } | KernelShape::Cross { size } => (size, size),
            KernelShape::Ellipse { width, height } => (width, height),
        };
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(OpsError::EmptyKernel);
        };
        if w == 0 || h == 0 {
            return Err(OpsError::EmptyKernel);
        }

        let (cx, cy) = (w / 2, h / 2);
        let (ex, ey) = ((w - 1) as f64 / 2.0, (h - 1) as f64 / 2.0);
        let mask = BitGrid::from_fn(w, h, |x, y| match shape {
            KernelShape::Box { .. } => true,
            KernelShape::Cross { .. } => y == cy || x == cx,
            KernelShape::Ellipse { .. } => {
                let dy = (y as f64 - ey) / (h as f64 / 2.0);
                let dx = (x as f64 - ex) / (w as f64 / 2.0);
                dx * dx + dy * dy <= 1.0
            }
        })?;

        Ok(Self {
            mask,
            anchor: Point::new(cx, cy),
        })
    }

    /// Use an arbitrary mask as a kernel.
    ///
    /// # Errors
    ///
    /// [`OpsError::EmptyKernel`] if the mask has no set bits.
    pub fn from_mask(mask: BitGrid, anchor: Point) -> Result<Self, OpsError> {
        if mask.is_clear() {
            return Err(OpsError::EmptyKernel);
        }
        Ok(Self { mask, anchor })
    }

    /// The active positions.
    pub fn mask(&self) -> &BitGrid {
        &self.mask
    }

    /// The position placed over the pixel being computed.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Offsets, relative to the anchor, of the active positions.
    pub fn offsets(&self) -> impl Iterator<Item = Point> + '_ {
        self.mask.iter_ones().map(move |p| p - self.anchor)
    }
}
