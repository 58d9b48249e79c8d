//! Data structures representing MAT-file format components.

use std::collections::HashMap;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::error::{MatError, Result};

/// Mask to extract the containing class from a matrix's flags word.
pub const CLASS_MASK: u32 = 0x0F;
/// Set when the array is used for logical indexing.
pub const FLAG_LOGICAL: u32 = 1 << 9;
/// Set when MATLAB holds the array on global scope.
pub const FLAG_GLOBAL: u32 = 1 << 10;
/// Set when the data element carries an imaginary part.
pub const FLAG_COMPLEX: u32 = 1 << 11;

/// Byte order of a MAT-file, fixed per file by the header's endian indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Endianness::Little => LittleEndian::read_u16(buf),
            Endianness::Big => BigEndian::read_u16(buf),
        }
    }

    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endianness::Little => LittleEndian::read_u32(buf),
            Endianness::Big => BigEndian::read_u32(buf),
        }
    }

    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Endianness::Little => LittleEndian::read_u64(buf),
            Endianness::Big => BigEndian::read_u64(buf),
        }
    }

    pub fn read_i16(self, buf: &[u8]) -> i16 {
        match self {
            Endianness::Little => LittleEndian::read_i16(buf),
            Endianness::Big => BigEndian::read_i16(buf),
        }
    }

    pub fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            Endianness::Little => LittleEndian::read_i32(buf),
            Endianness::Big => BigEndian::read_i32(buf),
        }
    }

    pub fn read_i64(self, buf: &[u8]) -> i64 {
        match self {
            Endianness::Little => LittleEndian::read_i64(buf),
            Endianness::Big => BigEndian::read_i64(buf),
        }
    }

    pub fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            Endianness::Little => LittleEndian::read_f32(buf),
            Endianness::Big => BigEndian::read_f32(buf),
        }
    }

    pub fn read_f64(self, buf: &[u8]) -> f64 {
        match self {
            Endianness::Little => LittleEndian::read_f64(buf),
            Endianness::Big => BigEndian::read_f64(buf),
        }
    }
}

/// Type tag of a data element's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Single,
    Double,
    Int64,
    Uint64,
    Matrix,
    Compressed,
    Utf8,
    Utf16,
    Utf32,
}

impl DataType {
    /// The on-wire integer code of this data type.
    pub fn code(self) -> u32 {
        match self {
            DataType::Int8 => 1,
            DataType::Uint8 => 2,
            DataType::Int16 => 3,
            DataType::Uint16 => 4,
            DataType::Int32 => 5,
            DataType::Uint32 => 6,
            DataType::Single => 7,
            DataType::Double => 9,
            DataType::Int64 => 12,
            DataType::Uint64 => 13,
            DataType::Matrix => 14,
            DataType::Compressed => 15,
            DataType::Utf8 => 16,
            DataType::Utf16 => 17,
            DataType::Utf32 => 18,
        }
    }
}

impl TryFrom<u32> for DataType {
    type Error = MatError;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            1 => Ok(Self::Int8),
            2 => Ok(Self::Uint8),
            3 => Ok(Self::Int16),
            4 => Ok(Self::Uint16),
            5 => Ok(Self::Int32),
            6 => Ok(Self::Uint32),
            7 => Ok(Self::Single),
            9 => Ok(Self::Double),
            12 => Ok(Self::Int64),
            13 => Ok(Self::Uint64),
            14 => Ok(Self::Matrix),
            15 => Ok(Self::Compressed),
            16 => Ok(Self::Utf8),
            17 => Ok(Self::Utf16),
            18 => Ok(Self::Utf32),
            other => Err(MatError::UnsupportedDataType(other)),
        }
    }
}

/// Class tag embedded in a matrix's flags word, selecting the body layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayClass {
    Cell,
    Struct,
    Object,
    Char,
    Sparse,
    Double,
    Single,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
}

impl ArrayClass {
    /// The on-wire integer code of this class.
    pub fn code(self) -> u32 {
        match self {
            ArrayClass::Cell => 1,
            ArrayClass::Struct => 2,
            ArrayClass::Object => 3,
            ArrayClass::Char => 4,
            ArrayClass::Sparse => 5,
            ArrayClass::Double => 6,
            ArrayClass::Single => 7,
            ArrayClass::Int8 => 8,
            ArrayClass::Uint8 => 9,
            ArrayClass::Int16 => 10,
            ArrayClass::Uint16 => 11,
            ArrayClass::Int32 => 12,
            ArrayClass::Uint32 => 13,
            ArrayClass::Int64 => 14,
            ArrayClass::Uint64 => 15,
        }
    }

    /// Whether this class carries a numeric body (real part plus optional
    /// imaginary part).
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ArrayClass::Double
                | ArrayClass::Single
                | ArrayClass::Int8
                | ArrayClass::Uint8
                | ArrayClass::Int16
                | ArrayClass::Uint16
                | ArrayClass::Int32
                | ArrayClass::Uint32
                | ArrayClass::Int64
                | ArrayClass::Uint64
        )
    }
}

impl TryFrom<u32> for ArrayClass {
    type Error = MatError;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            1 => Ok(Self::Cell),
            2 => Ok(Self::Struct),
            3 => Ok(Self::Object),
            4 => Ok(Self::Char),
            5 => Ok(Self::Sparse),
            6 => Ok(Self::Double),
            7 => Ok(Self::Single),
            8 => Ok(Self::Int8),
            9 => Ok(Self::Uint8),
            10 => Ok(Self::Int16),
            11 => Ok(Self::Uint16),
            12 => Ok(Self::Int32),
            13 => Ok(Self::Uint32),
            14 => Ok(Self::Int64),
            15 => Ok(Self::Uint64),
            other => Err(MatError::UnsupportedClass(other)),
        }
    }
}

/// Dimensions of a matrix; `z` is 0 when the third axis is absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Dimensions {
    /// Total number of scalar elements the dimensions describe.
    ///
    /// An absent third axis counts as 1; any negative axis yields 0.
    pub fn element_count(&self) -> usize {
        if self.x < 0 || self.y < 0 || self.z < 0 {
            return 0;
        }
        self.x as usize * self.y as usize * (self.z.max(1) as usize)
    }
}

/// A homogeneous run of scalars, tagged with its exact on-wire width.
///
/// UTF payloads (codes 16/17/18) decode as unsigned runs of the
/// corresponding width.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Int64(Vec<i64>),
    Uint64(Vec<u64>),
    Single(Vec<f32>),
    Double(Vec<f64>),
}

impl NumericData {
    /// Number of scalars in the run.
    pub fn len(&self) -> usize {
        match self {
            NumericData::Int8(v) => v.len(),
            NumericData::Uint8(v) => v.len(),
            NumericData::Int16(v) => v.len(),
            NumericData::Uint16(v) => v.len(),
            NumericData::Int32(v) => v.len(),
            NumericData::Uint32(v) => v.len(),
            NumericData::Int64(v) => v.len(),
            NumericData::Uint64(v) => v.len(),
            NumericData::Single(v) => v.len(),
            NumericData::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Body of a decoded matrix, one arm per supported class family.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixContent {
    /// Numeric classes: real scalars plus an imaginary run iff the complex
    /// flag is set.
    Numeric {
        real: NumericData,
        imag: Option<NumericData>,
    },
    /// Cell class: child matrices in document order.
    Cells(Vec<MatrixValue>),
    /// Struct class: field names in on-wire order; each name binds
    /// `dims.y` values.
    Struct {
        field_names: Vec<String>,
        fields: HashMap<String, Vec<MatrixValue>>,
    },
    /// Char class: one string per row.
    Chars(Vec<String>),
}

/// A named, typed, multi-dimensional array read from a MAT-file.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixValue {
    pub name: String,
    pub flags: u32,
    pub class: ArrayClass,
    pub dims: Dimensions,
    pub content: MatrixContent,
}

impl MatrixValue {
    /// The dimensions of the matrix as an `(x, y, z)` triple.
    pub fn dimensions(&self) -> (i32, i32, i32) {
        (self.dims.x, self.dims.y, self.dims.z)
    }

    /// Whether the matrix carries an imaginary part.
    pub fn is_complex(&self) -> bool {
        self.flags & FLAG_COMPLEX != 0
    }

    /// Whether the array is used for logical indexing.
    pub fn is_logical(&self) -> bool {
        self.flags & FLAG_LOGICAL != 0
    }

    /// Whether MATLAB holds the array on global scope.
    pub fn is_global(&self) -> bool {
        self.flags & FLAG_GLOBAL != 0
    }
}

/// Parsed 128-byte MAT-file header.
#[derive(Debug, Clone)]
pub struct Header {
    /// Free-form descriptive text (trailing padding trimmed).
    pub description: String,
    /// Subsystem data offset; kept raw, not interpreted.
    pub subsystem_offset: [u8; 8],
    /// MATLAB version field, stored big-endian in the file.
    pub version: u16,
    /// Byte order resolved from the endian indicator.
    pub endianness: Endianness,
}
