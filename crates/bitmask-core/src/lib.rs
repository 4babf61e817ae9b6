#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// bit-packed 2D grid.
pub mod grid;

/// single scanline storage.
pub mod row;

/// offset-aware overlap queries.
pub mod overlap;

/// points, rectangles and sizes.
pub mod geom;

/// Error types for the grid module.
pub mod error;

pub use crate::error::BitGridError;
pub use crate::geom::{GridSize, Point, Rect};
pub use crate::grid::BitGrid;
pub use crate::overlap::OverlapWindow;
pub use crate::row::{BitRow, CombineOp, Word, WORD_BITS};
