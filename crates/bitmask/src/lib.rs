#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use bitmask_core as grid;

#[doc(inline)]
pub use bitmask_ops as ops;
