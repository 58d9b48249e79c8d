//! Core MAT-file reader module.

pub mod compression;
pub mod error;
pub mod header;
pub mod matrix;
pub mod models;
pub mod scalars;
pub mod source;
pub mod tag;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};

use self::error::{MatError, Result};
use self::models::{DataType, Endianness, Header, MatrixValue};
use self::source::ByteSource;

/// The main reader for MATLAB Level-5 MAT-files.
///
/// Wraps any [`Read`] source; top-level data elements are consumed in file
/// order through [`read_next`](Self::read_next) or the
/// [`elements`](Self::elements) iterator.
///
/// A reader owns its source exclusively and is purely sequential. After a
/// decode error the source is positioned mid-element; the handle stays
/// usable but should be treated as poisoned.
#[derive(Debug)]
pub struct MatFile<R> {
    source: R,
    header: Header,
    // Running offset into the element stream, for inter-element padding.
    offset: u64,
}

impl MatFile<BufReader<File>> {
    /// Open a MAT-file from the given path and parse its header.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its header is
    /// shorter than 128 bytes.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("opening MAT-file: {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read> MatFile<R> {
    /// Build a reader over an arbitrary byte source, parsing the 128-byte
    /// header and resolving the file's endianness.
    pub fn from_reader(mut source: R) -> Result<Self> {
        let header = header::parse(&mut source)?;
        info!(
            "MAT-file opened: version={:#06x}, endianness={:?}",
            header.version, header.endianness
        );
        Ok(Self {
            source,
            header,
            offset: header::HEADER_LEN as u64,
        })
    }

    /// The parsed file header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Byte order of the file, resolved from the header's endian indicator.
    pub fn endianness(&self) -> Endianness {
        self.header.endianness
    }

    /// Consume the reader and release the underlying source.
    ///
    /// Dropping the reader closes a file-backed source; this is for callers
    /// that want the source back.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Read the next top-level data element.
    ///
    /// Returns `Ok(None)` on clean end of file at an element boundary. A
    /// top-level element is either a `matrix` or a zlib-`compressed`
    /// wrapper around one; anything else fails with
    /// [`MatError::UnsupportedDataType`].
    pub fn read_next(&mut self) -> Result<Option<MatrixValue>> {
        let order = self.header.endianness;

        // Elements are padded to 8-byte file offsets; a truncated padding
        // run is treated as end of file.
        self.skip_padding()?;

        let mut tag_buf = [0u8; 8];
        let filled = self.fill(&mut tag_buf)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < 8 {
            return Err(MatError::ShortRead {
                requested: 8,
                remaining: filled,
            });
        }

        let type_code = order.read_u32(&tag_buf[0..4]);
        let byte_count = order.read_u32(&tag_buf[4..8]) as usize;
        let data_type = DataType::try_from(type_code)?;
        debug!(
            "top-level element: type={:?}, {} payload bytes",
            data_type, byte_count
        );

        let mut payload = vec![0u8; byte_count];
        let got = self.fill(&mut payload)?;
        if got < byte_count {
            return Err(MatError::ShortRead {
                requested: byte_count,
                remaining: got,
            });
        }

        let value = match data_type {
            DataType::Matrix => {
                let mut src = ByteSource::new(&payload);
                let value = matrix::decode_matrix(&mut src, order)?;
                finish_element(src)?;
                value
            }
            DataType::Compressed => {
                let inflated = compression::inflate(&payload)?;
                if inflated.len() < 8 {
                    return Err(MatError::InvalidFormat(
                        "compressed element too short for an inner tag".to_string(),
                    ));
                }
                let inner_type = DataType::try_from(order.read_u32(&inflated[0..4]))?;
                let inner_count = order.read_u32(&inflated[4..8]) as usize;
                if inner_type != DataType::Matrix {
                    return Err(MatError::UnsupportedDataType(inner_type.code()));
                }
                if inflated.len() < 8 + inner_count {
                    return Err(MatError::InvalidFormat(format!(
                        "compressed element: inner payload declares {} bytes, {} inflated",
                        inner_count,
                        inflated.len() - 8
                    )));
                }
                // Surplus inflated bytes past the declared payload are the
                // outer element's trailing padding.
                let mut src = ByteSource::new(&inflated[8..8 + inner_count]);
                let value = matrix::decode_matrix(&mut src, order)?;
                finish_element(src)?;
                value
            }
            other => return Err(MatError::UnsupportedDataType(other.code())),
        };

        Ok(Some(value))
    }

    /// Iterator over all remaining top-level elements.
    ///
    /// Yields `Result<MatrixValue>` and fuses after the first error.
    pub fn elements(&mut self) -> Elements<'_, R> {
        Elements {
            file: self,
            done: false,
        }
    }

    /// Fill `buf` from the source, retrying on interruption.
    ///
    /// Returns the number of bytes actually read; fewer than `buf.len()`
    /// only at end of input.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }

    fn skip_padding(&mut self) -> Result<()> {
        let pad = (8 - (self.offset % 8) as usize) % 8;
        if pad > 0 {
            let mut buf = [0u8; 8];
            self.fill(&mut buf[..pad])?;
        }
        Ok(())
    }
}

/// Re-align and require the element's declared payload to be fully consumed.
fn finish_element(mut src: ByteSource<'_>) -> Result<()> {
    src.align_to(8);
    let residual = src.remaining();
    if residual > 0 {
        return Err(MatError::InvalidFormat(format!(
            "{} residual bytes after top-level element",
            residual
        )));
    }
    Ok(())
}

/// Iterator over top-level elements of a [`MatFile`].
///
/// Created by [`MatFile::elements`]. A decode error poisons the underlying
/// cursor, so iteration fuses after yielding it.
pub struct Elements<'a, R: Read> {
    file: &'a mut MatFile<R>,
    done: bool,
}

impl<R: Read> Iterator for Elements<'_, R> {
    type Item = Result<MatrixValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.file.read_next() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
