//! Plain zstd frames, the workhorse behind the extension codecs.

/// Default compression level; level 3 is the zstd library default and the
/// usual speed/ratio sweet spot for numeric data.
const LEVEL: i32 = 3;

/// Compress `input` into a single zstd frame. Returns an empty vector on
/// failure.
pub fn deflate(input: &[u8]) -> Vec<u8> {
    let bound = zstd::zstd_safe::compress_bound(input.len());
    let mut out = vec![0u8; bound];
    match zstd::bulk::compress_to_buffer(input, out.as_mut_slice(), LEVEL) {
        Ok(n) => {
            out.truncate(n);
            out
        }
        Err(_) => Vec::new(),
    }
}

/// Decompress a zstd frame into `output` and return the bytes written.
///
/// Returns 0 on a malformed frame or an undersized output; the dispatch
/// layer turns that into a corruption error when output was expected.
pub fn inflate(input: &[u8], output: &mut [u8]) -> usize {
    zstd::bulk::decompress_to_buffer(input, output).unwrap_or(0)
}
