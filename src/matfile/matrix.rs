//! The recursive matrix decoder: Array Flags → Dimensions → Name → body.

use std::collections::HashMap;

use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8};
use log::trace;

use super::error::{MatError, Result};
use super::models::{
    ArrayClass, DataType, Dimensions, Endianness, MatrixContent, MatrixValue, NumericData,
    CLASS_MASK, FLAG_COMPLEX,
};
use super::scalars::{decode_scalars, read_numeric_subelement};
use super::source::ByteSource;
use super::tag::read_tag;

/// Decode one matrix element.
///
/// The source is positioned just past the element's own `matrix` tag, at the
/// Array Flags sub-element. Every sub-element starts on an 8-byte boundary
/// relative to the element start, so the cursor is re-aligned after each.
pub fn decode_matrix(src: &mut ByteSource<'_>, order: Endianness) -> Result<MatrixValue> {
    // Array Flags
    let flags_tag = read_tag(src, order)?;
    if flags_tag.byte_count != 8 {
        return Err(MatError::InvalidFormat(format!(
            "array flags: expected an 8-byte payload, got {}",
            flags_tag.byte_count
        )));
    }
    let flag_bytes = src.read(8)?;
    let flags = order.read_u32(&flag_bytes[..4]);
    let class = ArrayClass::try_from(flags & CLASS_MASK)?;
    src.align_to(8);

    // Dimensions Array
    let dims = read_dimensions(src, order)?;
    src.align_to(8);

    // Array Name
    let name = read_array_name(src, order)?;
    src.align_to(8);

    trace!(
        "matrix '{}': class={:?}, dims=({}, {}, {}), flags={:#x}",
        name,
        class,
        dims.x,
        dims.y,
        dims.z,
        flags
    );

    let content = match class {
        ArrayClass::Cell => decode_cells(src, order, &dims)?,
        ArrayClass::Struct => decode_struct(src, order, &dims)?,
        ArrayClass::Char => decode_chars(src, order, &dims)?,
        numeric if numeric.is_numeric() => decode_numeric(src, order, &dims, flags, &name)?,
        unsupported => return Err(MatError::UnsupportedClass(unsupported.code())),
    };
    src.align_to(8);

    Ok(MatrixValue {
        name,
        flags,
        class,
        dims,
        content,
    })
}

fn read_dimensions(src: &mut ByteSource<'_>, order: Endianness) -> Result<Dimensions> {
    let tag = read_tag(src, order)?;
    if tag.data_type != DataType::Int32 {
        return Err(MatError::InvalidFormat(format!(
            "dimensions array: expected an i32 payload, got {:?}",
            tag.data_type
        )));
    }
    if tag.byte_count % 4 != 0 {
        return Err(MatError::InvalidFormat(format!(
            "dimensions array: {} payload bytes is not a whole number of axes",
            tag.byte_count
        )));
    }
    let axes = tag.byte_count / 4;
    if axes > 3 {
        return Err(MatError::InvalidFormat(format!(
            "matrix has {} dimensions, at most 3 are supported",
            axes
        )));
    }
    if axes == 0 {
        return Ok(Dimensions::default());
    }

    let payload = src.read(tag.byte_count as usize)?;
    let mut values = payload.chunks_exact(4).map(|c| order.read_i32(c));
    let dims = Dimensions {
        x: values.next().unwrap_or(0),
        y: values.next().unwrap_or(0),
        z: values.next().unwrap_or(0),
    };
    if dims.x < 0 || dims.y < 0 || dims.z < 0 {
        return Err(MatError::InvalidFormat(format!(
            "dimensions array: negative axis in ({}, {}, {})",
            dims.x, dims.y, dims.z
        )));
    }
    Ok(dims)
}

/// Read an Array Name sub-element: a tag followed by the raw ASCII name.
///
/// A `byte_count` of 0 yields the empty name without touching the source.
pub fn read_array_name(src: &mut ByteSource<'_>, order: Endianness) -> Result<String> {
    let tag = read_tag(src, order)?;
    if tag.byte_count == 0 {
        return Ok(String::new());
    }
    let raw = src.read(tag.byte_count as usize)?;
    Ok(String::from_utf8_lossy(raw).into_owned())
}

fn decode_numeric(
    src: &mut ByteSource<'_>,
    order: Endianness,
    dims: &Dimensions,
    flags: u32,
    name: &str,
) -> Result<MatrixContent> {
    let real = read_numeric_subelement(src, order)?;
    src.align_to(8);

    let expected = dims.element_count();
    if real.len() != expected {
        return Err(MatError::InvalidFormat(format!(
            "numeric matrix '{}': {} real scalars for {} elements",
            name,
            real.len(),
            expected
        )));
    }

    let imag = if flags & FLAG_COMPLEX != 0 {
        let imag = read_numeric_subelement(src, order)?;
        src.align_to(8);
        if imag.len() != real.len() {
            return Err(MatError::InvalidFormat(format!(
                "numeric matrix '{}': {} imaginary scalars for {} real",
                name,
                imag.len(),
                real.len()
            )));
        }
        Some(imag)
    } else {
        None
    };

    Ok(MatrixContent::Numeric { real, imag })
}

fn decode_cells(
    src: &mut ByteSource<'_>,
    order: Endianness,
    dims: &Dimensions,
) -> Result<MatrixContent> {
    let count = dims.y.max(0) as usize;
    let mut cells = Vec::with_capacity(count);
    for _ in 0..count {
        // Each child occupies its own tagged 8-byte slot before the body;
        // the recursive decoder starts at the child's Array Flags.
        src.read(8)?;
        let child = decode_matrix(src, order)?;
        src.align_to(8);
        cells.push(child);
    }
    Ok(MatrixContent::Cells(cells))
}

fn decode_struct(
    src: &mut ByteSource<'_>,
    order: Endianness,
    dims: &Dimensions,
) -> Result<MatrixContent> {
    // 16-byte preamble: two tagged sub-elements holding the field name
    // length and the total field-name byte count.
    let preamble = src.read(16)?;
    let field_name_len = order.read_u32(&preamble[4..8]) as usize;
    let fields_byte_count = order.read_u32(&preamble[12..16]) as usize;
    if field_name_len == 0 {
        return Err(MatError::InvalidFormat(
            "struct: field name length is zero".to_string(),
        ));
    }
    let field_count = fields_byte_count / field_name_len;

    let mut field_names = Vec::with_capacity(field_count);
    if field_count > 0 {
        let raw = src.read(field_count * field_name_len)?;
        for chunk in raw.chunks_exact(field_name_len) {
            let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
            field_names.push(String::from_utf8_lossy(&chunk[..end]).into_owned());
        }
    }
    src.align_to(8);

    let mut fields: HashMap<String, Vec<MatrixValue>> = HashMap::new();
    for name in &field_names {
        fields.entry(name.clone()).or_default();
    }

    // Row-major over (row, field), field as the inner axis.
    let rows = dims.y.max(0) as usize;
    if field_count > 0 {
        for i in 0..rows * field_count {
            let value = read_field_value(src, order)?;
            src.align_to(8);
            fields
                .entry(field_names[i % field_count].clone())
                .or_default()
                .push(value);
        }
    }

    Ok(MatrixContent::Struct {
        field_names,
        fields,
    })
}

fn read_field_value(src: &mut ByteSource<'_>, order: Endianness) -> Result<MatrixValue> {
    let tag = read_tag(src, order)?;
    match tag.data_type {
        DataType::Matrix => decode_matrix(src, order),
        scalar_type => {
            let payload = if tag.byte_count == 0 {
                &[][..]
            } else {
                src.read(tag.byte_count as usize)?
            };
            let run = decode_scalars(payload, order, scalar_type)?;
            Ok(scalar_run_value(run))
        }
    }
}

/// Wrap a bare scalar run as a nameless 1×n numeric matrix.
///
/// Struct fields may arrive as plain scalar sub-elements instead of full
/// matrix elements; the struct content stays uniform this way.
fn scalar_run_value(run: NumericData) -> MatrixValue {
    let class = match &run {
        NumericData::Int8(_) => ArrayClass::Int8,
        NumericData::Uint8(_) => ArrayClass::Uint8,
        NumericData::Int16(_) => ArrayClass::Int16,
        NumericData::Uint16(_) => ArrayClass::Uint16,
        NumericData::Int32(_) => ArrayClass::Int32,
        NumericData::Uint32(_) => ArrayClass::Uint32,
        NumericData::Int64(_) => ArrayClass::Int64,
        NumericData::Uint64(_) => ArrayClass::Uint64,
        NumericData::Single(_) => ArrayClass::Single,
        NumericData::Double(_) => ArrayClass::Double,
    };
    MatrixValue {
        name: String::new(),
        flags: class.code(),
        class,
        dims: Dimensions {
            x: 1,
            y: run.len() as i32,
            z: 0,
        },
        content: MatrixContent::Numeric {
            real: run,
            imag: None,
        },
    }
}

fn decode_chars(
    src: &mut ByteSource<'_>,
    order: Endianness,
    dims: &Dimensions,
) -> Result<MatrixContent> {
    let tag = read_tag(src, order)?;
    let payload = if tag.byte_count == 0 {
        &[][..]
    } else {
        src.read(tag.byte_count as usize)?
    };
    Ok(MatrixContent::Chars(decode_char_rows(
        payload,
        tag.data_type,
        order,
        dims.x,
    )))
}

/// Split a char payload into per-row strings.
///
/// Multi-row arrays store code units column-major: unit `k` belongs to row
/// `k mod rows`. Units are UTF-16 in file endianness unless the payload is
/// tagged `miUTF8`.
fn decode_char_rows(
    payload: &[u8],
    data_type: DataType,
    order: Endianness,
    rows: i32,
) -> Vec<String> {
    let utf16 = match order {
        Endianness::Little => UTF_16LE,
        Endianness::Big => UTF_16BE,
    };

    if rows <= 1 {
        let decoded = match data_type {
            DataType::Utf8 => UTF_8.decode(payload).0.into_owned(),
            _ => utf16.decode(payload).0.into_owned(),
        };
        return vec![decoded];
    }

    let rows = rows as usize;
    let mut per_row: Vec<Vec<u8>> = vec![Vec::new(); rows];
    match data_type {
        DataType::Utf8 => {
            for (k, &byte) in payload.iter().enumerate() {
                per_row[k % rows].push(byte);
            }
            per_row
                .into_iter()
                .map(|bytes| UTF_8.decode(&bytes).0.into_owned())
                .collect()
        }
        _ => {
            for (k, unit) in payload.chunks_exact(2).enumerate() {
                per_row[k % rows].extend_from_slice(unit);
            }
            per_row
                .into_iter()
                .map(|bytes| utf16.decode(&bytes).0.into_owned())
                .collect()
        }
    }
}
