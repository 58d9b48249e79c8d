//! MAT-file header parsing and endianness resolution.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use log::debug;

use super::error::{MatError, Result};
use super::models::{Endianness, Header};

/// Size of the fixed MAT-file header.
pub const HEADER_LEN: usize = 128;

/// Parse the 128-byte header.
///
/// Layout:
/// - Bytes 0..116: free-form ASCII description
/// - Bytes 116..124: subsystem data offset (kept raw)
/// - Bytes 124..126: version, big-endian
/// - Bytes 126..128: endian indicator, `"MI"` for big-endian files and
///   `"IM"` for little-endian files
pub fn parse(source: &mut impl Read) -> Result<Header> {
    let mut raw = [0u8; HEADER_LEN];
    source.read_exact(&mut raw).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            MatError::InvalidFormat(format!("header shorter than {} bytes", HEADER_LEN))
        } else {
            MatError::Io(e)
        }
    })?;

    let description = String::from_utf8_lossy(&raw[..116])
        .trim_end_matches(['\0', ' '])
        .to_string();

    let mut subsystem_offset = [0u8; 8];
    subsystem_offset.copy_from_slice(&raw[116..124]);

    let version = BigEndian::read_u16(&raw[124..126]);

    // The indicator reads "MI" on a file written big-endian; "IM" means the
    // bytes arrive swapped relative to that default.
    let endianness = if &raw[126..128] == b"IM" {
        Endianness::Little
    } else {
        Endianness::Big
    };

    debug!(
        "header parsed: version={:#06x}, endianness={:?}",
        version, endianness
    );

    Ok(Header {
        description,
        subsystem_offset,
        version,
        endianness,
    })
}
