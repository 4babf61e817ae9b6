use bitmask_core::BitGrid;

/// Raw image moments of the set bits, up to second order.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Moments {
    m00: f64,
    m10: f64,
    m01: f64,
    m20: f64,
    m02: f64,
    m11: f64,
}

impl Moments {
    fn of(src: &BitGrid) -> Self {
        src.iter_ones().fold(Moments::default(), |m, p| {
            let (x, y) = (p.x as f64, p.y as f64);
            Moments {
                m00: m.m00 + 1.0,
                m10: m.m10 + x,
                m01: m.m01 + y,
                m20: m.m20 + x * x,
                m02: m.m02 + y * y,
                m11: m.m11 + x * y,
            }
        })
    }
}

/// Mean coordinate of the set bits, `None` if the grid is clear.
///
/// # Examples
///
/// ```
/// use bitmask_core::BitGrid;
/// use bitmask_ops::measure::centroid;
///
/// let grid = BitGrid::from_fn(5, 3, |x, y| y == 1 && x > 0).unwrap();
/// assert_eq!(centroid(&grid), Some((2.5, 1.0)));
/// ```
pub fn centroid(src: &BitGrid) -> Option<(f64, f64)> {
    let m = Moments::of(src);
    if m.m00 == 0.0 {
        return None;
    }
    Some((m.m10 / m.m00, m.m01 / m.m00))
}

/// Orientation of the principal axis of the set bits in degrees.
///
/// Computed from the second central moments and measured in screen
/// coordinates, so a region leaning down to the right has a negative angle.
/// The result lies in `[-90, 90]` and is `0` for a clear grid.
pub fn orientation(src: &BitGrid) -> f64 {
    let m = Moments::of(src);
    if m.m00 == 0.0 {
        return 0.0;
    }
    let xc = m.m10 / m.m00;
    let yc = m.m01 / m.m00;
    let mu20 = m.m20 / m.m00 - xc * xc;
    let mu02 = m.m02 / m.m00 - yc * yc;
    let mu11 = m.m11 / m.m00 - xc * yc;
    -90.0 * (2.0 * mu11).atan2(mu20 - mu02) / std::f64::consts::PI
}
