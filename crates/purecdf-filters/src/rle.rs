//! CDF zero-run RLE ("RLE.0").
//!
//! Only runs of zero bytes are encoded: a nonzero byte is stored literally,
//! a zero byte is followed by the run length minus one. Runs are capped at
//! 256 so the count fits a byte. This pays off because CDF pads unwritten
//! records with zero-heavy pad values.

use crate::FilterError;

const MAX_RUN: usize = 256;

/// Encode `input`, compressing runs of zero bytes.
pub fn deflate(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        if b != 0 {
            out.push(b);
            i += 1;
        } else {
            let mut run = 1;
            while run < MAX_RUN && i + run < input.len() && input[i + run] == 0 {
                run += 1;
            }
            out.push(0);
            out.push((run - 1) as u8);
            i += run;
        }
    }
    out
}

/// Decode into `output` and return the bytes written.
pub fn inflate(input: &[u8], output: &mut [u8]) -> Result<usize, FilterError> {
    let mut written = 0;
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        if b != 0 {
            if written >= output.len() {
                return Err(FilterError::OutputTooSmall {
                    needed: written + 1,
                    capacity: output.len(),
                });
            }
            output[written] = b;
            written += 1;
            i += 1;
        } else {
            // A zero must carry its run count.
            let count = match input.get(i + 1) {
                Some(&c) => c as usize + 1,
                None => return Err(FilterError::CorruptStream),
            };
            if written + count > output.len() {
                return Err(FilterError::OutputTooSmall {
                    needed: written + count,
                    capacity: output.len(),
                });
            }
            output[written..written + count].fill(0);
            written += count;
            i += 2;
        }
    }
    Ok(written)
}
