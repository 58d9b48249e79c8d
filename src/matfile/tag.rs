//! Data-element tag decoding, including the small-element compaction.

use super::error::Result;
use super::models::{DataType, Endianness};
use super::source::ByteSource;

/// Decoded tag of a data element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub data_type: DataType,
    pub byte_count: u32,
    /// Header bytes consumed: 8 for the standard form, 4 for the small form.
    pub header_len: usize,
}

/// Read the tag announcing the next sub-element.
///
/// Two on-wire shapes share the first 4 bytes, decoded as a `u32` word in
/// file endianness:
///
/// - Standard: the word is the data type (codes are at most 18, so the
///   upper 16 bits are zero); a second `u32` carries the byte count.
/// - Small element: the byte count is packed into the upper 16 bits of the
///   word, the type into the lower 16; the payload follows in the remaining
///   4 bytes of the same aligned 8-byte slot.
///
/// Probing the upper half of the decoded word covers both endiannesses with
/// one rule.
pub fn read_tag(src: &mut ByteSource<'_>, order: Endianness) -> Result<Tag> {
    let word = order.read_u32(src.read(4)?);
    if word >> 16 != 0 {
        Ok(Tag {
            data_type: DataType::try_from(word & 0xFFFF)?,
            byte_count: word >> 16,
            header_len: 4,
        })
    } else {
        let byte_count = order.read_u32(src.read(4)?);
        Ok(Tag {
            data_type: DataType::try_from(word)?,
            byte_count,
            header_len: 8,
        })
    }
}
