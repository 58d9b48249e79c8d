//! Custom error types for the matfile-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum MatError {
    /// An error originating from I/O operations on the underlying source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source could not produce the requested number of bytes.
    ///
    /// Also raised by the zero-length-read guard: `read(0)` always fails.
    #[error("short read: requested {requested} bytes with {remaining} remaining")]
    ShortRead { requested: usize, remaining: usize },

    /// A data-element tag carries a type code this crate does not decode,
    /// or a top-level element is neither `compressed` nor `matrix`.
    #[error("unsupported data type: {0}")]
    UnsupportedDataType(u32),

    /// A matrix belongs to a class with no body decoder (sparse, object,
    /// or an unknown class nibble).
    #[error("unsupported array class: {0}")]
    UnsupportedClass(u32),

    /// The stream is structurally invalid for the MAT-file Level 5 format.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Zlib inflation of a compressed element failed.
    #[error("decompression failed: {0}")]
    DecompressionError(String),
}

/// A convenience `Result` type alias using the crate's `MatError` type.
pub type Result<T> = std::result::Result<T, MatError>;
