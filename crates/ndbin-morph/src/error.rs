//! Error types for ndbin-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ndbin_core::CoreError),

    /// Connectivity descriptor not valid for the image dimensionality
    #[error("invalid connectivity: {0}")]
    InvalidConnectivity(String),

    /// Invalid interval (structuring element)
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Operation requires a dimensionality the engine does not support
    #[error("unsupported dimensionality: {operation} requires {required}-dimensional images, got {actual}")]
    UnsupportedDimensionality {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Invalid sequence format
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
