//! Error types for the high-level API.

use std::fmt;

use purecdf_filters::FilterError;
use purecdf_format::error::FormatError;

/// Errors that can occur when loading or reading a CDF container.
#[derive(Debug)]
pub enum Error {
    /// I/O error from the filesystem.
    Io(std::io::Error),
    /// Low-level format parsing error.
    Format(FormatError),
    /// Compression codec error.
    Filter(FilterError),
    /// A variable's index entries are not in ascending, non-overlapping
    /// logical record order.
    BlocksOutOfOrder {
        /// Variable whose index is inconsistent.
        variable: String,
    },
    /// An index entry covers logical records past the variable's declared
    /// record count.
    BlockBeyondEnd {
        variable: String,
        /// Last logical record the entry claims to hold.
        last: u32,
        /// Records the variable declares.
        records: usize,
    },
    /// A value record holds fewer bytes than its index entry requires.
    BlockSizeMismatch {
        variable: String,
        /// Bytes the index entry requires.
        expected: usize,
        /// Bytes the value record produced.
        actual: usize,
    },
    /// An index entry points at a record that is not a value record.
    BadValueRecord {
        variable: String,
        /// Absolute offset of the target record.
        offset: u64,
        /// The record type tag actually found there.
        found: i32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Format(e) => write!(f, "CDF format error: {e}"),
            Error::Filter(e) => write!(f, "CDF compression error: {e}"),
            Error::BlocksOutOfOrder { variable } => {
                write!(f, "variable '{variable}': index entries out of order")
            }
            Error::BlockBeyondEnd {
                variable,
                last,
                records,
            } => write!(
                f,
                "variable '{variable}': index entry ends at record {last} but only {records} records are declared"
            ),
            Error::BlockSizeMismatch {
                variable,
                expected,
                actual,
            } => write!(
                f,
                "variable '{variable}': value record holds {actual} bytes, index requires {expected}"
            ),
            Error::BadValueRecord {
                variable,
                offset,
                found,
            } => write!(
                f,
                "variable '{variable}': index points at record type {found} at offset {offset:#x}, expected a value record"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Format(e) => Some(e),
            Error::Filter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Error::Format(e)
    }
}

impl From<FilterError> for Error {
    fn from(e: FilterError) -> Self {
        Error::Filter(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
