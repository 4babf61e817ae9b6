/// An error type for the grid module.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BitGridError {
    /// Error when the requested grid dimensions are negative or too large to address.
    #[error("Invalid grid dimensions ({0}, {1})")]
    InvalidDimension(i32, i32),

    /// Error when the data length does not match the grid size.
    #[error("Data length ({0}) does not match the grid size ({1})")]
    InvalidDataLength(usize, usize),
}
