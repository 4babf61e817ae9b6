#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// outer boundary tracing.
pub mod contour;

/// Error types for the ops module.
pub mod error;

/// connected component labelling.
pub mod label;

/// image moments of a mask.
pub mod measure;

/// binary morphology with structuring elements.
pub mod morphology;

/// nearest-neighbour resizing.
pub mod transform;

mod union_find;

pub use crate::error::OpsError;
