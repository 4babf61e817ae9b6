use bitmask_core::BitGrid;

use crate::error::OpsError;

/// Resize a grid with nearest-neighbour sampling.
///
/// Target pixel `(x, y)` takes the source bit at
/// `(x * src_width / width, y * src_height / height)`.
///
/// # Errors
///
/// [`OpsError::InvalidScale`] if either target dimension is negative.
///
/// # Examples
///
/// ```
/// use bitmask_core::BitGrid;
/// use bitmask_ops::transform::scale;
///
/// let grid = BitGrid::from_slice(2, 1, &[1, 0]).unwrap();
/// let scaled = scale(&grid, 4, 2).unwrap();
///
/// assert_eq!(scaled.count(), 4);
/// assert!(scaled.get(1, 1) && !scaled.get(2, 0));
/// ```
pub fn scale(src: &BitGrid, width: i32, height: i32) -> Result<BitGrid, OpsError> {
    if width < 0 || height < 0 {
        return Err(OpsError::InvalidScale(width, height));
    }
    let (src_w, src_h) = (src.width() as i64, src.height() as i64);
    let (dst_w, dst_h) = (width as i64, height as i64);

    let dst = BitGrid::from_fn(width, height, |x, y| {
        let sx = x as i64 * src_w / dst_w;
        let sy = y as i64 * src_h / dst_h;
        src.get(sx as i32, sy as i32)
    })?;

    log::debug!(
        "scaled {}x{} grid to {}x{}",
        src.width(),
        src.height(),
        width,
        height
    );

    Ok(dst)
}
