//! Reader for MATLAB Level-5 MAT-files.
//!
//! A MAT-file is a binary container of named, typed, multi-dimensional
//! arrays. This crate parses the Level 5 layout: a 128-byte header followed
//! by tagged, 8-byte-aligned data elements, optionally zlib-compressed,
//! with runtime-determined endianness. Each top-level element decodes into
//! a [`MatrixValue`] (numeric, cell, struct, or char, possibly nested).
//!
//! Writing MAT-files, the HDF5-based v7.3 layout, and the sparse-class
//! payload are out of scope.
//!
//! # Example
//! ```no_run
//! use matfile_reader::MatFile;
//!
//! # fn main() -> matfile_reader::Result<()> {
//! let mut mat = MatFile::open("results.mat")?;
//! while let Some(value) = mat.read_next()? {
//!     println!("{}: {:?}", value.name, value.dimensions());
//! }
//! # Ok(())
//! # }
//! ```

pub mod matfile;

pub use matfile::error::{MatError, Result};
pub use matfile::models::{
    ArrayClass, DataType, Dimensions, Endianness, Header, MatrixContent, MatrixValue, NumericData,
};
pub use matfile::{Elements, MatFile};
