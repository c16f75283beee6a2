//! Compression codecs for CDF value records.
//!
//! CDF stores a compression enumerant in the Compression Parameters Record
//! of a file or variable; every compressed block (CCR body or CVVR payload)
//! runs through the codec it names. The standard codecs handled here are
//! gzip-wrapped DEFLATE and the CDF zero-run RLE; the Huffman variants are
//! recognized but not supported. Values 16 and up are a non-standard
//! extension: plain zstd, integer delta + zstd, and a float-splitting
//! transform + zstd.
//!
//! The `deflate`/`inflate` entry points dispatch on [`CompressionType`];
//! `inflate` writes into a caller-sized output buffer whose length is the
//! exact uncompressed size (CDF records always declare it) and returns the
//! byte count actually produced.

use core::fmt;

use purecdf_format::cdf_type::CdfType;

pub mod delta;
pub mod float_split;
pub mod gzip;
pub mod rle;
pub mod zstd_codec;

/// Compression codec enumeration (persisted numeric values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    None,
    /// Zero-run RLE (CDF "RLE.0").
    Rle,
    /// Huffman (recognized, not supported).
    Huff,
    /// Adaptive Huffman (recognized, not supported).
    Ahuff,
    /// gzip-wrapped DEFLATE.
    Gzip,
    /// Extension: plain zstd frame.
    Zstd,
    /// Extension: per-element delta then zstd (integer types only).
    DeltaPlusZstd,
    /// Extension: sign/exponent/mantissa split then zstd (float types only).
    FloatZstd,
}

impl CompressionType {
    /// Decode the persisted enumerant.
    pub fn from_u32(value: u32) -> Result<CompressionType, FilterError> {
        Ok(match value {
            0 => CompressionType::None,
            1 => CompressionType::Rle,
            2 => CompressionType::Huff,
            3 => CompressionType::Ahuff,
            5 => CompressionType::Gzip,
            16 => CompressionType::Zstd,
            17 => CompressionType::DeltaPlusZstd,
            18 => CompressionType::FloatZstd,
            other => return Err(FilterError::UnknownCompression(other)),
        })
    }

    /// The persisted enumerant.
    pub fn as_u32(self) -> u32 {
        match self {
            CompressionType::None => 0,
            CompressionType::Rle => 1,
            CompressionType::Huff => 2,
            CompressionType::Ahuff => 3,
            CompressionType::Gzip => 5,
            CompressionType::Zstd => 16,
            CompressionType::DeltaPlusZstd => 17,
            CompressionType::FloatZstd => 18,
        }
    }
}

/// Errors from the compression codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The codec is a valid CDF enumerant but this reader does not
    /// implement it (Huffman variants).
    UnsupportedCompression(CompressionType),
    /// The persisted enumerant is not a known codec.
    UnknownCompression(u32),
    /// The delta codec requires a fixed-width integer element type.
    NotIntegral(CdfType),
    /// The float-split codec requires an IEEE floating-point element type.
    NotFloatingPoint(CdfType),
    /// Buffer length is not a multiple of the element width.
    RaggedInput { len: usize, element_size: usize },
    /// Value count is not a multiple of the per-record value count.
    RaggedRecords { values: usize, record_len: usize },
    /// Decompressed data does not fit the declared uncompressed size.
    OutputTooSmall { needed: usize, capacity: usize },
    /// The compressed stream is truncated or malformed.
    CorruptStream,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::UnsupportedCompression(c) => {
                write!(f, "unsupported CDF compression: {c:?}")
            }
            FilterError::UnknownCompression(v) => {
                write!(f, "unknown CDF compression enumerant: {v}")
            }
            FilterError::NotIntegral(t) => {
                write!(f, "delta compression requires an integer type, got {t:?}")
            }
            FilterError::NotFloatingPoint(t) => {
                write!(f, "float-split compression requires a float type, got {t:?}")
            }
            FilterError::RaggedInput { len, element_size } => {
                write!(f, "buffer of {len} bytes is not a multiple of element size {element_size}")
            }
            FilterError::RaggedRecords { values, record_len } => {
                write!(f, "{values} values do not divide into records of {record_len}")
            }
            FilterError::OutputTooSmall { needed, capacity } => {
                write!(f, "output buffer too small: need {needed} bytes, have {capacity}")
            }
            FilterError::CorruptStream => write!(f, "corrupt compressed stream"),
        }
    }
}

impl std::error::Error for FilterError {}

/// Compress `input` with the named codec.
///
/// `cdf_type` and `record_size` (bytes per logical record) only matter to
/// the element-aware extension codecs; the byte-oriented codecs ignore
/// them.
pub fn deflate(
    ctype: CompressionType,
    input: &[u8],
    cdf_type: CdfType,
    record_size: usize,
) -> Result<Vec<u8>, FilterError> {
    match ctype {
        CompressionType::None => Ok(input.to_vec()),
        CompressionType::Rle => Ok(rle::deflate(input)),
        CompressionType::Huff | CompressionType::Ahuff => {
            Err(FilterError::UnsupportedCompression(ctype))
        }
        CompressionType::Gzip => Ok(gzip::deflate(input)),
        CompressionType::Zstd => Ok(zstd_codec::deflate(input)),
        CompressionType::DeltaPlusZstd => delta::deflate(input, cdf_type),
        CompressionType::FloatZstd => float_split::deflate(input, cdf_type, record_size),
    }
}

/// Decompress `input` into `output` (sized to the declared uncompressed
/// length) and return the byte count produced.
pub fn inflate(
    ctype: CompressionType,
    input: &[u8],
    output: &mut [u8],
    cdf_type: CdfType,
    record_size: usize,
) -> Result<usize, FilterError> {
    match ctype {
        CompressionType::None => {
            if input.len() > output.len() {
                return Err(FilterError::OutputTooSmall {
                    needed: input.len(),
                    capacity: output.len(),
                });
            }
            output[..input.len()].copy_from_slice(input);
            Ok(input.len())
        }
        CompressionType::Rle => rle::inflate(input, output),
        CompressionType::Huff | CompressionType::Ahuff => {
            Err(FilterError::UnsupportedCompression(ctype))
        }
        CompressionType::Gzip => {
            let written = gzip::inflate(input, output);
            if written == 0 && !output.is_empty() {
                return Err(FilterError::CorruptStream);
            }
            Ok(written)
        }
        CompressionType::Zstd => {
            let written = zstd_codec::inflate(input, output);
            if written == 0 && !output.is_empty() {
                return Err(FilterError::CorruptStream);
            }
            Ok(written)
        }
        CompressionType::DeltaPlusZstd => delta::inflate(input, output, cdf_type),
        CompressionType::FloatZstd => float_split::inflate(input, output, cdf_type, record_size),
    }
}
