//! gzip-wrapped DEFLATE, the most common CDF codec in the wild.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Compress `input` into a gzip member. Returns an empty vector if the
/// encoder fails, which it cannot for an in-memory sink.
pub fn deflate(input: &[u8]) -> Vec<u8> {
    let sink = Vec::with_capacity(input.len() / 2 + 64);
    let mut encoder = GzEncoder::new(sink, Compression::default());
    if encoder.write_all(input).is_err() {
        return Vec::new();
    }
    encoder.finish().unwrap_or_default()
}

/// Decompress a gzip member into `output` and return the bytes written.
///
/// Returns 0 on a truncated or malformed stream; the dispatch layer turns
/// that into a corruption error when output was expected.
pub fn inflate(input: &[u8], output: &mut [u8]) -> usize {
    let mut decoder = GzDecoder::new(input);
    let mut written = 0;
    while written < output.len() {
        match decoder.read(&mut output[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(_) => return 0,
        }
    }
    written
}
