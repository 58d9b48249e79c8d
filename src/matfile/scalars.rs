//! Decoding of homogeneous scalar runs and numeric sub-elements.

use super::error::{MatError, Result};
use super::models::{DataType, Endianness, NumericData};
use super::source::ByteSource;
use super::tag::read_tag;

fn check_width(payload: &[u8], width: usize, data_type: DataType) -> Result<()> {
    if payload.len() % width != 0 {
        return Err(MatError::InvalidFormat(format!(
            "scalar run of {:?}: {} payload bytes is not a multiple of the {}-byte width",
            data_type,
            payload.len(),
            width
        )));
    }
    Ok(())
}

/// Decode a payload into a run of scalars of the width implied by `data_type`.
///
/// UTF payloads decode as unsigned scalars of the corresponding width.
/// Container types (`matrix`, `compressed`) are not scalar runs.
pub fn decode_scalars(
    payload: &[u8],
    order: Endianness,
    data_type: DataType,
) -> Result<NumericData> {
    match data_type {
        DataType::Int8 => Ok(NumericData::Int8(
            payload.iter().map(|&b| b as i8).collect(),
        )),
        DataType::Uint8 | DataType::Utf8 => Ok(NumericData::Uint8(payload.to_vec())),
        DataType::Int16 => {
            check_width(payload, 2, data_type)?;
            Ok(NumericData::Int16(
                payload.chunks_exact(2).map(|c| order.read_i16(c)).collect(),
            ))
        }
        DataType::Uint16 | DataType::Utf16 => {
            check_width(payload, 2, data_type)?;
            Ok(NumericData::Uint16(
                payload.chunks_exact(2).map(|c| order.read_u16(c)).collect(),
            ))
        }
        DataType::Int32 => {
            check_width(payload, 4, data_type)?;
            Ok(NumericData::Int32(
                payload.chunks_exact(4).map(|c| order.read_i32(c)).collect(),
            ))
        }
        DataType::Uint32 | DataType::Utf32 => {
            check_width(payload, 4, data_type)?;
            Ok(NumericData::Uint32(
                payload.chunks_exact(4).map(|c| order.read_u32(c)).collect(),
            ))
        }
        DataType::Single => {
            check_width(payload, 4, data_type)?;
            Ok(NumericData::Single(
                payload.chunks_exact(4).map(|c| order.read_f32(c)).collect(),
            ))
        }
        DataType::Int64 => {
            check_width(payload, 8, data_type)?;
            Ok(NumericData::Int64(
                payload.chunks_exact(8).map(|c| order.read_i64(c)).collect(),
            ))
        }
        DataType::Uint64 => {
            check_width(payload, 8, data_type)?;
            Ok(NumericData::Uint64(
                payload.chunks_exact(8).map(|c| order.read_u64(c)).collect(),
            ))
        }
        DataType::Double => {
            check_width(payload, 8, data_type)?;
            Ok(NumericData::Double(
                payload.chunks_exact(8).map(|c| order.read_f64(c)).collect(),
            ))
        }
        DataType::Matrix | DataType::Compressed => {
            Err(MatError::UnsupportedDataType(data_type.code()))
        }
    }
}

/// Read one numeric sub-element: a tag followed by its scalar payload.
///
/// A `byte_count` of 0 yields an empty run of the tagged type without
/// touching the source; empty numeric arrays are legal.
pub fn read_numeric_subelement(
    src: &mut ByteSource<'_>,
    order: Endianness,
) -> Result<NumericData> {
    let tag = read_tag(src, order)?;
    let payload = if tag.byte_count == 0 {
        &[][..]
    } else {
        src.read(tag.byte_count as usize)?
    };
    decode_scalars(payload, order, tag.data_type)
}
