//! Error types for ndbin-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// ndbin core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Image has no dimensions
    #[error("image must have at least one dimension")]
    ZeroDimensionality,

    /// A dimension has zero extent
    #[error("invalid extent for dimension {dim}: {size}")]
    InvalidExtent { dim: usize, size: usize },

    /// Dimension index out of range
    #[error("dimension {dim} out of range for {ndims}-dimensional image")]
    DimensionOutOfRange { dim: usize, ndims: usize },

    /// Two images that must agree in shape do not
    #[error("image sizes do not match: {expected:?} vs {actual:?}")]
    SizeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Crop or border region exceeds the image extent
    #[error("region out of bounds in dimension {dim}: {start}+{len} > {size}")]
    RegionOutOfBounds {
        dim: usize,
        start: usize,
        len: usize,
        size: usize,
    },

    /// Image too large for the address space
    #[error("image size overflows the addressable range")]
    SizeOverflow,
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
