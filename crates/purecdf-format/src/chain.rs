//! Linked-list record chain traversal with cycle protection.
//!
//! Descriptor records (ADR, AEDR, VDR, VXR) form singly linked lists
//! through "next" offset fields, terminated by offset 0. Since a corrupt
//! file can make those pointers loop, traversal is bounded by the largest
//! number of distinct records the file could possibly hold.

use crate::error::FormatError;

/// Smallest possible record: a V2 header with no body.
pub const MIN_RECORD_SIZE: u64 = 8;

/// Iterator over a chain of records linked by "next" offsets.
///
/// `load` parses the record at an absolute offset; `next` projects the
/// successor offset out of a parsed record. The chain ends at offset 0
/// and fuses after the first error.
pub struct RecordChain<L, N, T> {
    load: L,
    next: N,
    offset: u64,
    steps: usize,
    max_steps: usize,
    done: bool,
    _marker: std::marker::PhantomData<T>,
}

impl<L, N, T> RecordChain<L, N, T>
where
    L: FnMut(u64) -> Result<T, FormatError>,
    N: Fn(&T) -> u64,
{
    /// Start a chain at `head` over a file of `file_len` bytes.
    ///
    /// A file of `file_len` bytes holds at most `file_len / MIN_RECORD_SIZE`
    /// records, so visiting more than that many proves a cycle.
    pub fn new(head: u64, file_len: usize, load: L, next: N) -> RecordChain<L, N, T> {
        RecordChain {
            load,
            next,
            offset: head,
            steps: 0,
            max_steps: file_len / MIN_RECORD_SIZE as usize + 1,
            done: false,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<L, N, T> Iterator for RecordChain<L, N, T>
where
    L: FnMut(u64) -> Result<T, FormatError>,
    N: Fn(&T) -> u64,
{
    type Item = Result<T, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset == 0 {
            return None;
        }
        if self.steps >= self.max_steps {
            self.done = true;
            return Some(Err(FormatError::ChainTooLong { steps: self.steps }));
        }
        self.steps += 1;
        match (self.load)(self.offset) {
            Ok(record) => {
                self.offset = (self.next)(&record);
                Some(Ok(record))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
