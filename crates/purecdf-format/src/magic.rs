//! CDF magic number pair classification.
//!
//! Every CDF file starts with two big-endian 32-bit words. Their bit
//! patterns identify format validity, the major format generation (V2.x
//! with 32-bit offsets vs V3.x with 64-bit offsets) and whether the record
//! that follows is a Compressed CDF Record wrapping the whole file body.

use byteorder::{BigEndian, ByteOrder};

use crate::error::FormatError;
use crate::records::OffsetWidth;

/// Second magic word of an uncompressed file.
pub const UNCOMPRESSED_MAGIC: u32 = 0x0000_FFFF;
/// Second magic word of a file whose body is wrapped in a CCR.
pub const COMPRESSED_MAGIC: u32 = 0xCCCC_0001;
/// First magic word of a V3.0 file.
pub const V3_MAGIC: u32 = 0xCDF3_0001;

/// The magic number pair at absolute offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicNumbers {
    /// First 32-bit word (big-endian on disk).
    pub m1: u32,
    /// Second 32-bit word (big-endian on disk).
    pub m2: u32,
}

impl MagicNumbers {
    /// Read the magic pair from the first 8 bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<MagicNumbers, FormatError> {
        if data.len() < 8 {
            return Err(FormatError::UnexpectedEof {
                expected: 8,
                available: data.len(),
            });
        }
        Ok(MagicNumbers {
            m1: BigEndian::read_u32(&data[0..4]),
            m2: BigEndian::read_u32(&data[4..8]),
        })
    }

    /// Returns true if the pair identifies a CDF file of any generation.
    ///
    /// V2.6+ and V3.x files carry `0xCDFx_xxxx` in the first word; V2.5
    /// and older use the legacy `0x0000FFFF/0x0000FFFF` pair.
    pub fn is_cdf(&self) -> bool {
        ((self.m1 & 0xFFF0_0000) == 0xCDF0_0000
            && (self.m2 == COMPRESSED_MAGIC || self.m2 == UNCOMPRESSED_MAGIC))
            || (self.m1 == 0x0000_FFFF && self.m2 == 0x0000_FFFF)
    }

    /// Returns true for the V3.x format generation (64-bit offsets).
    pub fn is_v3x(&self) -> bool {
        ((self.m1 >> 12) & 0xFF) >= 0x30
    }

    /// Returns true if the first record is a Compressed CDF Record.
    pub fn is_compressed(&self) -> bool {
        self.m2 == COMPRESSED_MAGIC
    }

    /// Offset-field width implied by the format generation.
    pub fn offset_width(&self) -> OffsetWidth {
        if self.is_v3x() {
            OffsetWidth::V3
        } else {
            OffsetWidth::V2
        }
    }
}
