//! I/O abstraction layer for CDF file access.
//!
//! Provides a small trait and adapters for reading CDF data from files,
//! memory buffers and optionally memory-mapped files. The format layer
//! works on whole-file byte slices, so the only obligation of a source is
//! to expose its content as `&[u8]`; record loads are explicit
//! offset+length slices of that view and never seek.

use std::io::{self, Read, Seek, SeekFrom};

pub use purecdf_format;

/// Read-only access to CDF data.
///
/// Implementors expose the entire file content as a byte slice, which is
/// the interface `purecdf-format` expects.
pub trait CdfRead {
    /// Returns the entire file content as a byte slice.
    fn as_bytes(&self) -> &[u8];

    /// Returns the length of the data in bytes.
    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the data is empty.
    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

// ---------------------------------------------------------------------------
// MemoryReader — owns a Vec<u8>
// ---------------------------------------------------------------------------

/// In-memory reader backed by an owned `Vec<u8>`.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    data: Vec<u8>,
}

impl MemoryReader {
    /// Create a reader from an owned byte vector.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Create a reader by copying from a byte slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Consume the reader and return the underlying bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl CdfRead for MemoryReader {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

// ---------------------------------------------------------------------------
// BorrowedReader — wraps &[u8] without copying
// ---------------------------------------------------------------------------

/// Zero-copy reader over a borrowed byte slice.
#[derive(Debug, Clone, Copy)]
pub struct BorrowedReader<'a> {
    data: &'a [u8],
}

impl<'a> BorrowedReader<'a> {
    /// Create a reader from a borrowed byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl CdfRead for BorrowedReader<'_> {
    fn as_bytes(&self) -> &[u8] {
        self.data
    }
}

// ---------------------------------------------------------------------------
// FileReader — slurps std::fs::File into memory
// ---------------------------------------------------------------------------

/// File-backed reader that loads the entire file into memory.
#[derive(Debug)]
pub struct FileReader {
    data: Vec<u8>,
}

impl FileReader {
    /// Open a file and read its entire contents into memory.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> io::Result<Self> {
        Self::from_file(std::fs::File::open(path)?)
    }

    /// Create a reader from an already-opened file.
    pub fn from_file(mut file: std::fs::File) -> io::Result<Self> {
        let len = file.seek(SeekFrom::End(0))? as usize;
        file.seek(SeekFrom::Start(0))?;
        let mut data = vec![0u8; len];
        file.read_exact(&mut data)?;
        Ok(Self { data })
    }

    /// Consume the reader and return the underlying bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl CdfRead for FileReader {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(feature = "mmap")]
pub mod mmap;

#[cfg(feature = "mmap")]
pub use mmap::MmapReader;
