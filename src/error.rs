//! Error types for plotline operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plotline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a framebuffer or raster.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Data length mismatch between x and y arrays.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// A fraction argument fell outside `[0, 1]`.
    #[error("{name} must be in [0, 1], got {value}")]
    FractionOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Coordinate domain error (e.g. log of a non-positive value).
    #[error("Coordinate domain error: {0}")]
    CoordinateDomain(String),

    /// Malformed regression input.
    #[error("Regression error: {0}")]
    Regression(String),

    /// Attempted a grid operation that is invalid for irregular grids.
    #[error("Operation requires a regular grid, got an irregular one")]
    IrregularGrid,

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}
