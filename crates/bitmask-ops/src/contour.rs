use bitmask_core::{BitGrid, Point};

use crate::error::OpsError;

/// Neighbour ring, clockwise in screen coordinates starting East:
/// E, SE, S, SW, W, NW, N, NE.
const RING: [Point; 8] = [
    Point::new(1, 0),
    Point::new(1, 1),
    Point::new(0, 1),
    Point::new(-1, 1),
    Point::new(-1, 0),
    Point::new(-1, -1),
    Point::new(0, -1),
    Point::new(1, -1),
];

/// Ring index of West, the backtrack direction of the starting pixel.
const WEST: usize = 4;

/// Trace the outer boundary of the region holding the first set bit.
///
/// Moore-neighbour tracing: from the first set bit of a row-major scan, the
/// 8-neighbourhood of the current pixel is searched clockwise starting just
/// after the last background neighbour, and the walk moves to the first set
/// neighbour found. Out-of-range neighbours are background, so regions
/// touching the grid edge are followed along the edge. The walk stops when it
/// is back at the start and about to repeat its first move.
///
/// # Arguments
///
/// * `src` - The grid to trace, typically holding a single component.
///
/// # Returns
///
/// The boundary pixels in walk order, consecutive points 8-adjacent. The start
/// point is not repeated at the end. An isolated pixel yields a single point.
///
/// # Errors
///
/// [`OpsError::EmptyRegion`] if no bit is set.
///
/// # Examples
///
/// ```
/// use bitmask_core::{BitGrid, Point};
/// use bitmask_ops::contour::trace_outline;
///
/// let grid = BitGrid::from_fn(4, 4, |x, y| (1..3).contains(&x) && (1..3).contains(&y)).unwrap();
/// let outline = trace_outline(&grid).unwrap();
///
/// assert_eq!(
///     outline,
///     vec![Point::new(1, 1), Point::new(2, 1), Point::new(2, 2), Point::new(1, 2)]
/// );
/// ```
pub fn trace_outline(src: &BitGrid) -> Result<Vec<Point>, OpsError> {
    let start = src.first_one().ok_or(OpsError::EmptyRegion)?;

    let Some((second, back)) = step(src, start, WEST) else {
        log::trace!("isolated pixel at {start:?}");
        return Ok(vec![start]);
    };

    // a boundary pixel is entered at most once from each side
    let limit = 4 * src.count() + 4;
    let mut outline = vec![start];
    let (mut current, mut back) = (second, back);

    while let Some((next, next_back)) = step(src, current, back) {
        if current == start && next == second {
            break;
        }
        outline.push(current);
        if outline.len() > limit {
            log::warn!("outline from {start:?} did not close after {limit} points");
            break;
        }
        current = next;
        back = next_back;
    }

    log::debug!("traced outline of {} points from {start:?}", outline.len());

    Ok(outline)
}

/// Every `every`-th point of [`trace_outline`], starting with the first.
///
/// `every` is clamped to at least 1.
pub fn outline_every(src: &BitGrid, every: usize) -> Result<Vec<Point>, OpsError> {
    let outline = trace_outline(src)?;
    Ok(outline.into_iter().step_by(every.max(1)).collect())
}

/// Move from `p` to its first set neighbour clockwise after `back`.
///
/// Returns the neighbour and the ring index, seen from the neighbour, of the
/// background pixel examined just before it.
fn step(src: &BitGrid, p: Point, back: usize) -> Option<(Point, usize)> {
    (1..=RING.len())
        .map(|i| (back + i) % RING.len())
        .find(|&d| {
            let q = p + RING[d];
            src.get(q.x, q.y)
        })
        .map(|d| (p + RING[d], (d + 6 - (d & 1)) % RING.len()))
}
