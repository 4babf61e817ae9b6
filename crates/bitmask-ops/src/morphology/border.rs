/// How erosion treats kernel positions that fall outside the grid.
///
/// Dilation never needs a border rule: out-of-range positions are unset and
/// cannot grow a region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BorderMode {
    /// Out-of-range neighbours are unset, so regions touching the edge are
    /// eroded from the edge as well.
    #[default]
    Clear,

    /// Out-of-range neighbours are skipped and only in-range ones decide.
    Ignore,
}
