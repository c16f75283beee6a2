//! The CDF_Types element type enumeration.

use crate::error::FormatError;

/// CDF element data type, with the stable on-disk numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdfType {
    /// No element type (used for raw byte streams such as a CCR body).
    None,
    Int1,
    Int2,
    Int4,
    Int8,
    Uint1,
    Uint2,
    Uint4,
    Real4,
    Real8,
    /// Milliseconds since 0 AD, stored as a float64.
    Epoch,
    /// Picosecond-resolution epoch, stored as a pair of float64.
    Epoch16,
    /// Nanoseconds since J2000 with leap seconds, stored as an int64.
    Tt2000,
    Byte,
    Float,
    Double,
    Char,
    Uchar,
}

impl CdfType {
    /// Decode the on-disk type tag.
    pub fn from_u32(value: u32) -> Result<CdfType, FormatError> {
        Ok(match value {
            0 => CdfType::None,
            1 => CdfType::Int1,
            2 => CdfType::Int2,
            4 => CdfType::Int4,
            8 => CdfType::Int8,
            11 => CdfType::Uint1,
            12 => CdfType::Uint2,
            14 => CdfType::Uint4,
            21 => CdfType::Real4,
            22 => CdfType::Real8,
            31 => CdfType::Epoch,
            32 => CdfType::Epoch16,
            33 => CdfType::Tt2000,
            41 => CdfType::Byte,
            44 => CdfType::Float,
            45 => CdfType::Double,
            51 => CdfType::Char,
            52 => CdfType::Uchar,
            other => return Err(FormatError::UnknownDataType(other)),
        })
    }

    /// The on-disk type tag.
    pub fn as_u32(self) -> u32 {
        match self {
            CdfType::None => 0,
            CdfType::Int1 => 1,
            CdfType::Int2 => 2,
            CdfType::Int4 => 4,
            CdfType::Int8 => 8,
            CdfType::Uint1 => 11,
            CdfType::Uint2 => 12,
            CdfType::Uint4 => 14,
            CdfType::Real4 => 21,
            CdfType::Real8 => 22,
            CdfType::Epoch => 31,
            CdfType::Epoch16 => 32,
            CdfType::Tt2000 => 33,
            CdfType::Byte => 41,
            CdfType::Float => 44,
            CdfType::Double => 45,
            CdfType::Char => 51,
            CdfType::Uchar => 52,
        }
    }

    /// Size in bytes of one element of this type.
    pub fn size(self) -> usize {
        match self {
            CdfType::None => 0,
            CdfType::Int1 | CdfType::Uint1 | CdfType::Byte | CdfType::Char | CdfType::Uchar => 1,
            CdfType::Int2 | CdfType::Uint2 => 2,
            CdfType::Int4 | CdfType::Uint4 | CdfType::Real4 | CdfType::Float => 4,
            CdfType::Int8
            | CdfType::Real8
            | CdfType::Epoch
            | CdfType::Tt2000
            | CdfType::Double => 8,
            CdfType::Epoch16 => 16,
        }
    }

    /// True for the fixed-width integer types (the delta codec precondition).
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            CdfType::Int1
                | CdfType::Int2
                | CdfType::Int4
                | CdfType::Int8
                | CdfType::Uint1
                | CdfType::Uint2
                | CdfType::Uint4
                | CdfType::Byte
        )
    }

    /// True for IEEE floating-point types, including the epoch variants
    /// (the float-split codec precondition).
    pub fn is_floating_point(self) -> bool {
        matches!(
            self,
            CdfType::Real4
                | CdfType::Real8
                | CdfType::Float
                | CdfType::Double
                | CdfType::Epoch
                | CdfType::Epoch16
        )
    }

    /// True for the character types whose element count is a string length.
    pub fn is_string(self) -> bool {
        matches!(self, CdfType::Char | CdfType::Uchar)
    }
}
