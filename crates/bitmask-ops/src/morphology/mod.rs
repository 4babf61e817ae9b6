//! Binary morphology: dilation, erosion and kernel convolution.

/// border handling for erosion.
pub mod border;

/// structuring elements.
pub mod kernel;

/// dilation, erosion, opening, closing and convolution.
pub mod ops;

pub use border::BorderMode;
pub use kernel::{Kernel, KernelShape};
pub use ops::{
    close, convolve, dilate, dilate_with_kernel, erode, erode_with_kernel,
    erode_with_kernel_border, open, CountGrid,
};
