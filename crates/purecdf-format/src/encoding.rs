//! CDF encodings and the endianness codec for value payloads.
//!
//! Record headers and descriptor fields are always big-endian, but variable
//! and attribute values follow the encoding declared in the CDF Descriptor
//! Record. The codec here stays generic over either byte order so that
//! foreign-written files decode correctly.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::FormatError;

/// CDF host encoding enumeration (persisted CDR field, stable values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Network,
    Sun,
    Vax,
    DecStation,
    Sgi,
    IbmPc,
    IbmRs,
    Ppc,
    Hp,
    Next,
    AlphaOsf1,
    AlphaVmsD,
    AlphaVmsG,
    AlphaVmsI,
    ArmLittle,
    ArmBig,
    Ia64VmsI,
    Ia64VmsD,
    Ia64VmsG,
}

impl Encoding {
    /// Decode the on-disk encoding enumerant.
    pub fn from_u32(value: u32) -> Result<Encoding, FormatError> {
        Ok(match value {
            1 => Encoding::Network,
            2 => Encoding::Sun,
            3 => Encoding::Vax,
            4 => Encoding::DecStation,
            5 => Encoding::Sgi,
            6 => Encoding::IbmPc,
            7 => Encoding::IbmRs,
            9 => Encoding::Ppc,
            11 => Encoding::Hp,
            12 => Encoding::Next,
            13 => Encoding::AlphaOsf1,
            14 => Encoding::AlphaVmsD,
            15 => Encoding::AlphaVmsG,
            16 => Encoding::AlphaVmsI,
            17 => Encoding::ArmLittle,
            18 => Encoding::ArmBig,
            19 => Encoding::Ia64VmsI,
            20 => Encoding::Ia64VmsD,
            21 => Encoding::Ia64VmsG,
            other => return Err(FormatError::UnknownEncoding(other)),
        })
    }

    /// Byte order of value payloads written with this encoding.
    pub fn endianness(self) -> Endianness {
        match self {
            Encoding::Network
            | Encoding::Sun
            | Encoding::Sgi
            | Encoding::IbmRs
            | Encoding::Ppc
            | Encoding::Hp
            | Encoding::Next
            | Encoding::ArmBig => Endianness::Big,
            Encoding::Vax
            | Encoding::DecStation
            | Encoding::IbmPc
            | Encoding::AlphaOsf1
            | Encoding::AlphaVmsD
            | Encoding::AlphaVmsG
            | Encoding::AlphaVmsI
            | Encoding::ArmLittle
            | Encoding::Ia64VmsI
            | Encoding::Ia64VmsD
            | Encoding::Ia64VmsG => Endianness::Little,
        }
    }
}

/// Source byte order of a raw value span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

fn ensure_len(src: &[u8], needed: usize) -> Result<(), FormatError> {
    if src.len() < needed {
        Err(FormatError::UnexpectedEof {
            expected: needed,
            available: src.len(),
        })
    } else {
        Ok(())
    }
}

macro_rules! decode_fn {
    ($name:ident, $ty:ty, $width:expr, $read_into:ident) => {
        /// Decode `count` elements from `src`, which must hold at least
        /// `count` times the element width in bytes.
        pub fn $name(self, src: &[u8], count: usize) -> Result<Vec<$ty>, FormatError> {
            ensure_len(src, count * $width)?;
            let mut out = vec![0 as $ty; count];
            match self {
                Endianness::Big => BigEndian::$read_into(&src[..count * $width], &mut out),
                Endianness::Little => LittleEndian::$read_into(&src[..count * $width], &mut out),
            }
            Ok(out)
        }
    };
}

macro_rules! encode_fn {
    ($name:ident, $ty:ty, $width:expr, $write_into:ident) => {
        /// Encode the elements to exactly `src.len()` times the element
        /// width in bytes.
        pub fn $name(self, src: &[$ty]) -> Vec<u8> {
            let mut out = vec![0u8; src.len() * $width];
            match self {
                Endianness::Big => BigEndian::$write_into(src, &mut out),
                Endianness::Little => LittleEndian::$write_into(src, &mut out),
            }
            out
        }
    };
}

impl Endianness {
    decode_fn!(decode_u16, u16, 2, read_u16_into);
    decode_fn!(decode_u32, u32, 4, read_u32_into);
    decode_fn!(decode_u64, u64, 8, read_u64_into);
    decode_fn!(decode_i16, i16, 2, read_i16_into);
    decode_fn!(decode_i32, i32, 4, read_i32_into);
    decode_fn!(decode_i64, i64, 8, read_i64_into);
    decode_fn!(decode_f32, f32, 4, read_f32_into);
    decode_fn!(decode_f64, f64, 8, read_f64_into);

    encode_fn!(encode_u16, u16, 2, write_u16_into);
    encode_fn!(encode_u32, u32, 4, write_u32_into);
    encode_fn!(encode_u64, u64, 8, write_u64_into);
    encode_fn!(encode_i16, i16, 2, write_i16_into);
    encode_fn!(encode_i32, i32, 4, write_i32_into);
    encode_fn!(encode_i64, i64, 8, write_i64_into);
    encode_fn!(encode_f32, f32, 4, write_f32_into);
    encode_fn!(encode_f64, f64, 8, write_f64_into);

    /// Decode `count` signed bytes (width 1, order irrelevant).
    pub fn decode_i8(self, src: &[u8], count: usize) -> Result<Vec<i8>, FormatError> {
        ensure_len(src, count)?;
        Ok(src[..count].iter().map(|&b| b as i8).collect())
    }

    /// Decode `count` unsigned bytes (width 1, order irrelevant).
    pub fn decode_u8(self, src: &[u8], count: usize) -> Result<Vec<u8>, FormatError> {
        ensure_len(src, count)?;
        Ok(src[..count].to_vec())
    }
}
