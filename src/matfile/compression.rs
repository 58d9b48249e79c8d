//! Zlib inflation of compressed top-level elements.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::trace;

use super::error::{MatError, Result};

/// Inflate a zlib-deflated payload into a fresh buffer.
///
/// The inflated bytes are a complete data element (tag included); the caller
/// reparses them as a fresh byte source.
pub fn inflate(payload: &[u8]) -> Result<Vec<u8>> {
    trace!("inflating {} compressed bytes", payload.len());
    let mut inflated = Vec::with_capacity(payload.len() * 2);
    let mut decoder = ZlibDecoder::new(payload);
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| MatError::DecompressionError(format!("zlib inflate failed: {}", e)))?;
    trace!("inflated to {} bytes", inflated.len());
    Ok(inflated)
}
