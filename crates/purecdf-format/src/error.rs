//! Error types for CDF format parsing.

use core::fmt;

use crate::records::RecordType;

/// Errors that can occur when parsing CDF binary format structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The magic number pair at the start of the buffer is not a CDF pair.
    NotACdf {
        /// First magic word (big-endian).
        m1: u32,
        /// Second magic word (big-endian).
        m2: u32,
    },
    /// Unexpected end of data.
    UnexpectedEof {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes actually available.
        available: usize,
    },
    /// A record declared a size smaller than its own header (or zero).
    InvalidRecordSize {
        /// Absolute byte offset of the record.
        offset: u64,
        /// The declared record size.
        size: u64,
    },
    /// A record of one kind was found where another kind was required.
    UnexpectedRecordType {
        /// The kind required at this chain position.
        expected: RecordType,
        /// The raw type tag actually found.
        found: i32,
        /// Absolute byte offset of the record.
        offset: u64,
    },
    /// An index record claims more occupied entries than its tables hold.
    InvalidEntryCount {
        /// Absolute byte offset of the record.
        offset: u64,
        /// Claimed occupied entries.
        used: u32,
        /// Table capacity.
        capacity: u32,
    },
    /// The record type tag is not a known CDF record kind.
    UnknownRecordType {
        /// The raw type tag.
        value: i32,
        /// Absolute byte offset of the record.
        offset: u64,
    },
    /// The CDF data type tag is not a known CDF_Types value.
    UnknownDataType(u32),
    /// The encoding enumerant is not a known CDF encoding.
    UnknownEncoding(u32),
    /// The attribute scope enumerant is not a known CDF scope.
    UnknownAttrScope(u32),
    /// A record chain ran longer than the file could possibly hold,
    /// which means the "next" pointers form a cycle.
    ChainTooLong {
        /// Number of records visited before giving up.
        steps: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::NotACdf { m1, m2 } => {
                write!(f, "not a CDF file: magic pair {m1:#010x}/{m2:#010x}")
            }
            FormatError::UnexpectedEof {
                expected,
                available,
            } => {
                write!(f, "unexpected EOF: need {expected} bytes, have {available}")
            }
            FormatError::InvalidRecordSize { offset, size } => {
                write!(f, "invalid record size {size} at offset {offset:#x}")
            }
            FormatError::UnexpectedRecordType {
                expected,
                found,
                offset,
            } => {
                write!(
                    f,
                    "expected {expected:?} record at offset {offset:#x}, found type {found}"
                )
            }
            FormatError::InvalidEntryCount {
                offset,
                used,
                capacity,
            } => {
                write!(
                    f,
                    "record at offset {offset:#x} claims {used} used entries of {capacity}"
                )
            }
            FormatError::UnknownRecordType { value, offset } => {
                write!(f, "unknown record type {value} at offset {offset:#x}")
            }
            FormatError::UnknownDataType(v) => write!(f, "unknown CDF data type: {v}"),
            FormatError::UnknownEncoding(v) => write!(f, "unknown CDF encoding: {v}"),
            FormatError::UnknownAttrScope(v) => write!(f, "unknown attribute scope: {v}"),
            FormatError::ChainTooLong { steps } => {
                write!(f, "record chain exceeded {steps} steps, next pointers form a cycle")
            }
        }
    }
}

impl std::error::Error for FormatError {}
