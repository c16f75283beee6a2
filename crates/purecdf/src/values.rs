//! Typed value storage for variables and attribute entries.

use purecdf_format::cdf_type::CdfType;
use purecdf_format::encoding::Endianness;
use purecdf_format::error::FormatError;

/// Decoded values of a variable or attribute entry.
///
/// One variant per supported element kind. Epoch-family variants keep
/// their raw numeric representation; converting to calendar time is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// Milliseconds since 0 AD.
    Epoch(Vec<f64>),
    /// (seconds since 0 AD, picoseconds within the second) pairs.
    Epoch16(Vec<(f64, f64)>),
    /// Nanoseconds since J2000, leap seconds included.
    Tt2000(Vec<i64>),
    String(Vec<String>),
}

/// Strip trailing NULs, then trailing spaces, from a fixed-width field.
fn trim_fixed(raw: &[u8]) -> String {
    let end = raw
        .iter()
        .rposition(|&b| b != 0)
        .map(|p| p + 1)
        .unwrap_or(0);
    String::from_utf8_lossy(&raw[..end])
        .trim_end_matches(' ')
        .to_string()
}

impl Values {
    /// Decode `raw` as elements of `cdf_type` in the given byte order.
    ///
    /// For character types `num_elems` is the fixed string length and
    /// `raw` holds a whole number of such strings; for every other type
    /// the element count is `raw.len()` over the element size.
    pub fn decode(
        raw: &[u8],
        cdf_type: CdfType,
        endianness: Endianness,
        num_elems: usize,
    ) -> Result<Values, FormatError> {
        let e = endianness;
        Ok(match cdf_type {
            CdfType::None => Values::UInt8(raw.to_vec()),
            CdfType::Int1 | CdfType::Byte => Values::Int8(e.decode_i8(raw, raw.len())?),
            CdfType::Int2 => Values::Int16(e.decode_i16(raw, raw.len() / 2)?),
            CdfType::Int4 => Values::Int32(e.decode_i32(raw, raw.len() / 4)?),
            CdfType::Int8 => Values::Int64(e.decode_i64(raw, raw.len() / 8)?),
            CdfType::Uint1 => Values::UInt8(e.decode_u8(raw, raw.len())?),
            CdfType::Uint2 => Values::UInt16(e.decode_u16(raw, raw.len() / 2)?),
            CdfType::Uint4 => Values::UInt32(e.decode_u32(raw, raw.len() / 4)?),
            CdfType::Real4 | CdfType::Float => Values::Float(e.decode_f32(raw, raw.len() / 4)?),
            CdfType::Real8 | CdfType::Double => Values::Double(e.decode_f64(raw, raw.len() / 8)?),
            CdfType::Epoch => Values::Epoch(e.decode_f64(raw, raw.len() / 8)?),
            CdfType::Epoch16 => {
                let flat = e.decode_f64(raw, raw.len() / 8)?;
                Values::Epoch16(
                    flat.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
                )
            }
            CdfType::Tt2000 => Values::Tt2000(e.decode_i64(raw, raw.len() / 8)?),
            CdfType::Char | CdfType::Uchar => {
                let width = num_elems.max(1);
                Values::String(raw.chunks(width).map(trim_fixed).collect())
            }
        })
    }

    /// Number of decoded elements (strings count as one element each).
    pub fn len(&self) -> usize {
        match self {
            Values::Int8(v) => v.len(),
            Values::Int16(v) => v.len(),
            Values::Int32(v) => v.len(),
            Values::Int64(v) => v.len(),
            Values::UInt8(v) => v.len(),
            Values::UInt16(v) => v.len(),
            Values::UInt32(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::Double(v) => v.len(),
            Values::Epoch(v) => v.len(),
            Values::Epoch16(v) => v.len(),
            Values::Tt2000(v) => v.len(),
            Values::String(v) => v.len(),
        }
    }

    /// True when no elements were decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type this variant corresponds to.
    pub fn cdf_type(&self) -> CdfType {
        match self {
            Values::Int8(_) => CdfType::Int1,
            Values::Int16(_) => CdfType::Int2,
            Values::Int32(_) => CdfType::Int4,
            Values::Int64(_) => CdfType::Int8,
            Values::UInt8(_) => CdfType::Uint1,
            Values::UInt16(_) => CdfType::Uint2,
            Values::UInt32(_) => CdfType::Uint4,
            Values::Float(_) => CdfType::Float,
            Values::Double(_) => CdfType::Double,
            Values::Epoch(_) => CdfType::Epoch,
            Values::Epoch16(_) => CdfType::Epoch16,
            Values::Tt2000(_) => CdfType::Tt2000,
            Values::String(_) => CdfType::Char,
        }
    }
}
