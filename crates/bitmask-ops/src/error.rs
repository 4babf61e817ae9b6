use bitmask_core::BitGridError;

/// Errors that can occur in mask analysis operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OpsError {
    /// Error related to the grid.
    #[error(transparent)]
    Grid(#[from] BitGridError),

    /// The operation needs at least one set bit.
    #[error("The region has no set bits")]
    EmptyRegion,

    /// The structuring element has zero size or no set bits.
    #[error("The kernel has no set bits")]
    EmptyKernel,

    /// The requested scaled size is negative.
    #[error("Invalid scale size ({0}, {1})")]
    InvalidScale(i32, i32),
}
