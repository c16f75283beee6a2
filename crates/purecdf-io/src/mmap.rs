//! Memory-mapped file reader for zero-copy CDF access.

use memmap2::Mmap;
use std::fs;
use std::io;
use std::path::Path;

use crate::CdfRead;

/// Memory-mapped read-only file, useful for large uncompressed files
/// where `as_bytes()` must not cost a full copy.
pub struct MmapReader {
    _file: fs::File,
    mmap: Mmap,
}

impl MmapReader {
    /// Open a file and memory-map it for reading.
    ///
    /// The caller must ensure that the underlying file is not modified
    /// by another process while the mapping is active.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        // SAFETY: read-only mapping; the caller is responsible for
        // ensuring the file is not concurrently modified.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { _file: file, mmap })
    }

    /// Read a slice at the given offset without copying.
    ///
    /// Returns `None` if `offset + len` exceeds the file size.
    pub fn read_at(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.mmap.get(offset..offset.checked_add(len)?)
    }

    /// Hint the OS to prefetch the whole mapping.
    #[cfg(unix)]
    pub fn advise_willneed(&self) -> io::Result<()> {
        self.mmap.advise(memmap2::Advice::WillNeed)
    }
}

impl CdfRead for MmapReader {
    fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }
}
