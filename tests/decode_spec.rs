//! Sub-decoder tests over literal byte fixtures.

use matfile_reader::matfile::matrix::{decode_matrix, read_array_name};
use matfile_reader::matfile::scalars::{decode_scalars, read_numeric_subelement};
use matfile_reader::matfile::source::ByteSource;
use matfile_reader::matfile::tag::read_tag;
use matfile_reader::{ArrayClass, DataType, MatError, MatrixContent, NumericData};
use matfile_reader::Endianness::{Big, Little};

/// A 3×3 double matrix named "MaTrIx" holding [[1,0,1],[0,1,0],[1,0,1]],
/// starting at the Array Flags sub-element (the element's own tag already
/// consumed).
#[rustfmt::skip]
const VERY_SIMPLE_MATRIX: [u8; 128] = [
    // Array Flags: miUINT32, 8 bytes; flags word 0x6 (class double)
    0x06, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00,
    0x06, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
    // Dimensions: miINT32, 8 bytes; (3, 3)
    0x05, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00,
    0x03, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00,
    // Name: miINT8, 6 bytes; "MaTrIx" + 2 pad
    0x01, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00,
    0x4d, 0x61, 0x54, 0x72, 0x49, 0x78, 0x00, 0x00,
    // Real part: miDOUBLE, 72 bytes; 1 0 1 0 1 0 1 0 1
    0x09, 0x00, 0x00, 0x00, 0x48, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
];

fn le_tag(data_type: u32, byte_count: u32) -> Vec<u8> {
    let mut bytes = data_type.to_le_bytes().to_vec();
    bytes.extend_from_slice(&byte_count.to_le_bytes());
    bytes
}

/// A full little-endian sub-element: standard tag, payload, zero padding to
/// the next 8-byte boundary.
fn le_element(data_type: u32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = le_tag(data_type, payload.len() as u32);
    bytes.extend_from_slice(payload);
    while bytes.len() % 8 != 0 {
        bytes.push(0);
    }
    bytes
}

fn le_i32s(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn le_f64s(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[test]
fn standard_tag_little_endian() {
    let bytes = [0x06, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00];
    let mut src = ByteSource::new(&bytes);
    let tag = read_tag(&mut src, Little).unwrap();
    assert_eq!(tag.data_type, DataType::Uint32);
    assert_eq!(tag.byte_count, 8);
    assert_eq!(tag.header_len, 8);
    assert_eq!(src.tracked_offset(), 8);
}

#[test]
fn small_tag_little_endian() {
    let bytes = [0x06, 0x00, 0x04, 0x00, 0x01, 0x03, 0x03, 0x07];
    let mut src = ByteSource::new(&bytes);
    let tag = read_tag(&mut src, Little).unwrap();
    assert_eq!(tag.data_type, DataType::Uint32);
    assert_eq!(tag.byte_count, 4);
    assert_eq!(tag.header_len, 4);
}

#[test]
fn small_tag_payload_decodes_in_place() {
    // The payload sits in bytes 4..8 of the same aligned slot.
    let bytes = [0x06, 0x00, 0x04, 0x00, 0x01, 0x03, 0x03, 0x07];
    let mut src = ByteSource::new(&bytes);
    let run = read_numeric_subelement(&mut src, Little).unwrap();
    assert_eq!(run, NumericData::Uint32(vec![117637889]));
    assert_eq!(src.tracked_offset(), 8);
}

#[test]
fn standard_tag_big_endian() {
    let bytes = [0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x08];
    let mut src = ByteSource::new(&bytes);
    let tag = read_tag(&mut src, Big).unwrap();
    assert_eq!(tag.data_type, DataType::Uint32);
    assert_eq!(tag.byte_count, 8);
    assert_eq!(tag.header_len, 8);
}

#[test]
fn small_tag_big_endian() {
    // Byte count in the upper halfword: stored first on a big-endian file.
    let bytes = [0x00, 0x04, 0x00, 0x06, 0x01, 0x03, 0x03, 0x07];
    let mut src = ByteSource::new(&bytes);
    let tag = read_tag(&mut src, Big).unwrap();
    assert_eq!(tag.data_type, DataType::Uint32);
    assert_eq!(tag.byte_count, 4);
    assert_eq!(tag.header_len, 4);
}

#[test]
fn unknown_data_type_is_rejected() {
    let bytes = [0x2a, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00];
    let mut src = ByteSource::new(&bytes);
    match read_tag(&mut src, Little) {
        Err(MatError::UnsupportedDataType(42)) => {}
        other => panic!("expected UnsupportedDataType(42), got {:?}", other),
    }
}

#[test]
fn array_name_with_padding() {
    #[rustfmt::skip]
    let bytes = [
        0x01, 0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00,
        0x54, 0x68, 0x69, 0x73, 0x49, 0x73, 0x41, 0x4c,
        0x6f, 0x6e, 0x67, 0x65, 0x72, 0x4e, 0x61, 0x6d,
        0x65, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let mut src = ByteSource::new(&bytes);
    let name = read_array_name(&mut src, Little).unwrap();
    src.align_to(8);
    assert_eq!(name, "ThisIsALongerName");
    assert_eq!(src.tracked_offset(), 32);
    assert_eq!(src.tracked_offset() % 8, 0);
}

#[test]
fn empty_array_name() {
    let bytes = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    let mut src = ByteSource::new(&bytes);
    let name = read_array_name(&mut src, Little).unwrap();
    assert_eq!(name, "");
    assert_eq!(src.tracked_offset(), 8);
}

#[test]
fn scalar_endianness_agreement() {
    let bytes = [0x11, 0x22, 0x33, 0x44];
    let le = decode_scalars(&bytes, Little, DataType::Int32).unwrap();
    let be = decode_scalars(&bytes, Big, DataType::Int32).unwrap();
    assert_eq!(le, NumericData::Int32(vec![0x44332211]));
    assert_eq!(be, NumericData::Int32(vec![0x11223344]));
}

#[test]
fn scalar_run_rejects_container_types() {
    for data_type in [DataType::Matrix, DataType::Compressed] {
        match decode_scalars(&[0; 8], Little, data_type) {
            Err(MatError::UnsupportedDataType(_)) => {}
            other => panic!("expected UnsupportedDataType, got {:?}", other),
        }
    }
}

#[test]
fn scalar_run_rejects_ragged_payload() {
    match decode_scalars(&[0; 7], Little, DataType::Double) {
        Err(MatError::InvalidFormat(_)) => {}
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}

#[test]
fn byte_source_guards() {
    let mut src = ByteSource::new(&[1, 2, 3]);
    match src.read(0) {
        Err(MatError::ShortRead { requested: 0, .. }) => {}
        other => panic!("expected the zero-read guard, got {:?}", other),
    }
    match src.read(4) {
        Err(MatError::ShortRead {
            requested: 4,
            remaining: 3,
        }) => {}
        other => panic!("expected ShortRead, got {:?}", other),
    }
    src.read(3).unwrap();
    src.align_to(8);
    assert_eq!(src.tracked_offset(), 3);
    assert!(src.is_empty());
}

#[test]
fn simple_double_matrix() {
    let mut src = ByteSource::new(&VERY_SIMPLE_MATRIX);
    let value = decode_matrix(&mut src, Little).unwrap();

    assert_eq!(value.name, "MaTrIx");
    assert_eq!(value.flags, 0x6);
    assert_eq!(value.class, ArrayClass::Double);
    assert_eq!(value.dimensions(), (3, 3, 0));
    assert!(!value.is_complex());
    assert!(src.is_empty());

    match value.content {
        MatrixContent::Numeric { real, imag } => {
            assert_eq!(
                real,
                NumericData::Double(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0])
            );
            assert!(imag.is_none());
        }
        other => panic!("expected numeric content, got {:?}", other),
    }
}

#[test]
fn numeric_length_must_match_dimensions() {
    // Same fixture, but the dimensions claim 3×4.
    let mut bytes = VERY_SIMPLE_MATRIX.to_vec();
    bytes[28] = 0x04;
    let mut src = ByteSource::new(&bytes);
    match decode_matrix(&mut src, Little) {
        Err(MatError::InvalidFormat(msg)) => assert!(msg.contains("real scalars")),
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}

#[test]
fn four_axis_matrix_is_rejected() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&le_element(6, &le_i32s(&[6, 0])));
    bytes.extend_from_slice(&le_element(5, &le_i32s(&[1, 1, 1, 1])));
    let mut src = ByteSource::new(&bytes);
    match decode_matrix(&mut src, Little) {
        Err(MatError::InvalidFormat(msg)) => assert!(msg.contains("dimensions")),
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}

#[test]
fn array_flags_must_be_eight_bytes() {
    let bytes = le_element(6, &le_i32s(&[6]));
    let mut src = ByteSource::new(&bytes);
    match decode_matrix(&mut src, Little) {
        Err(MatError::InvalidFormat(msg)) => assert!(msg.contains("array flags")),
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}

#[test]
fn sparse_class_is_unsupported() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&le_element(6, &le_i32s(&[5, 0])));
    bytes.extend_from_slice(&le_element(5, &le_i32s(&[1, 1])));
    bytes.extend_from_slice(&le_element(1, b"sp"));
    let mut src = ByteSource::new(&bytes);
    match decode_matrix(&mut src, Little) {
        Err(MatError::UnsupportedClass(5)) => {}
        other => panic!("expected UnsupportedClass(5), got {:?}", other),
    }
}

/// Body of a 1×1 double matrix with the given name and value.
fn double_matrix_body(name: &str, value: f64) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&le_element(6, &le_i32s(&[6, 0])));
    body.extend_from_slice(&le_element(5, &le_i32s(&[1, 1])));
    body.extend_from_slice(&le_element(1, name.as_bytes()));
    body.extend_from_slice(&le_element(9, &le_f64s(&[value])));
    body
}

#[test]
fn cell_array_honors_encoded_length() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&le_element(6, &le_i32s(&[1, 0])));
    bytes.extend_from_slice(&le_element(5, &le_i32s(&[1, 2])));
    bytes.extend_from_slice(&le_element(1, b"c"));
    for (name, value) in [("a", 1.5), ("b", -2.0)] {
        let body = double_matrix_body(name, value);
        bytes.extend_from_slice(&le_tag(14, body.len() as u32));
        bytes.extend_from_slice(&body);
    }

    let mut src = ByteSource::new(&bytes);
    let value = decode_matrix(&mut src, Little).unwrap();
    assert_eq!(value.name, "c");
    assert_eq!(value.class, ArrayClass::Cell);
    assert!(src.is_empty());

    let cells = match value.content {
        MatrixContent::Cells(cells) => cells,
        other => panic!("expected cells, got {:?}", other),
    };
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].name, "a");
    assert_eq!(cells[1].name, "b");
    assert_eq!(
        cells[1].content,
        MatrixContent::Numeric {
            real: NumericData::Double(vec![-2.0]),
            imag: None,
        }
    );
}

#[test]
fn struct_fields_keep_wire_order() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&le_element(6, &le_i32s(&[2, 0])));
    bytes.extend_from_slice(&le_element(5, &le_i32s(&[1, 1])));
    bytes.extend_from_slice(&le_element(1, b"st"));

    // Preamble: small miINT32 tag with the field name length, then the
    // field-names element (2 names, 4 bytes each).
    bytes.extend_from_slice(&[0x05, 0x00, 0x04, 0x00]);
    bytes.extend_from_slice(&4u32.to_le_bytes());
    bytes.extend_from_slice(&le_tag(1, 8));
    bytes.extend_from_slice(b"ab\0\0cd\0\0");

    // Field "ab": a full 1×1 double matrix element.
    let body = double_matrix_body("", 7.0);
    bytes.extend_from_slice(&le_tag(14, body.len() as u32));
    bytes.extend_from_slice(&body);
    // Field "cd": a bare scalar run.
    bytes.extend_from_slice(&le_element(9, &le_f64s(&[3.0])));

    let mut src = ByteSource::new(&bytes);
    let value = decode_matrix(&mut src, Little).unwrap();
    assert_eq!(value.class, ArrayClass::Struct);
    assert!(src.is_empty());

    let (field_names, fields) = match value.content {
        MatrixContent::Struct {
            field_names,
            fields,
        } => (field_names, fields),
        other => panic!("expected struct, got {:?}", other),
    };
    assert_eq!(field_names, vec!["ab", "cd"]);

    let ab = &fields["ab"];
    assert_eq!(ab.len(), 1);
    assert_eq!(
        ab[0].content,
        MatrixContent::Numeric {
            real: NumericData::Double(vec![7.0]),
            imag: None,
        }
    );

    let cd = &fields["cd"];
    assert_eq!(cd.len(), 1);
    assert_eq!(cd[0].class, ArrayClass::Double);
    assert_eq!(cd[0].dimensions(), (1, 1, 0));
    assert_eq!(
        cd[0].content,
        MatrixContent::Numeric {
            real: NumericData::Double(vec![3.0]),
            imag: None,
        }
    );
}

fn utf16le_units(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

#[test]
fn char_rows_regroup_column_major_units() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&le_element(6, &le_i32s(&[4, 0])));
    bytes.extend_from_slice(&le_element(5, &le_i32s(&[3, 3])));
    bytes.extend_from_slice(&le_element(1, b"s"));
    // Column-major code units of ["abc"; "def"; "ghi"].
    bytes.extend_from_slice(&le_element(4, &utf16le_units("adgbehcfi")));

    let mut src = ByteSource::new(&bytes);
    let value = decode_matrix(&mut src, Little).unwrap();
    assert_eq!(value.class, ArrayClass::Char);
    assert!(src.is_empty());
    assert_eq!(
        value.content,
        MatrixContent::Chars(vec![
            "abc".to_string(),
            "def".to_string(),
            "ghi".to_string(),
        ])
    );
}

#[test]
fn single_row_char_decodes_whole_payload() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&le_element(6, &le_i32s(&[4, 0])));
    bytes.extend_from_slice(&le_element(5, &le_i32s(&[1, 5])));
    bytes.extend_from_slice(&le_element(1, b"greeting"));
    bytes.extend_from_slice(&le_element(4, &utf16le_units("hello")));

    let mut src = ByteSource::new(&bytes);
    let value = decode_matrix(&mut src, Little).unwrap();
    assert_eq!(value.name, "greeting");
    assert_eq!(
        value.content,
        MatrixContent::Chars(vec!["hello".to_string()])
    );
}

#[test]
fn empty_numeric_matrix() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&le_element(6, &le_i32s(&[6, 0])));
    bytes.extend_from_slice(&le_element(5, &le_i32s(&[0, 0])));
    bytes.extend_from_slice(&le_element(1, b"empty"));
    bytes.extend_from_slice(&le_tag(9, 0));

    let mut src = ByteSource::new(&bytes);
    let value = decode_matrix(&mut src, Little).unwrap();
    assert_eq!(value.name, "empty");
    assert_eq!(value.dimensions(), (0, 0, 0));
    match value.content {
        MatrixContent::Numeric { real, imag } => {
            assert!(real.is_empty());
            assert!(imag.is_none());
        }
        other => panic!("expected numeric content, got {:?}", other),
    }
}
