//! Integer delta transform followed by zstd.
//!
//! Monotonic sequences (timestamps, counters) turn into tiny, highly
//! repetitive deltas that zstd squeezes far better than the raw values.
//! The transform takes first differences at the declared element width
//! with two's-complement wraparound, starting from an implicit previous
//! value of zero, so inflation is an exact inclusive prefix sum.

use purecdf_format::cdf_type::CdfType;

use crate::{zstd_codec, FilterError};

macro_rules! diff {
    ($input:expr, $out:expr, $ty:ty) => {{
        let mut prev: $ty = 0;
        for chunk in $input.chunks_exact(core::mem::size_of::<$ty>()) {
            let v = <$ty>::from_ne_bytes(chunk.try_into().unwrap());
            $out.extend_from_slice(&v.wrapping_sub(prev).to_ne_bytes());
            prev = v;
        }
    }};
}

macro_rules! undiff {
    ($buf:expr, $ty:ty) => {{
        let mut prev: $ty = 0;
        for chunk in $buf.chunks_exact_mut(core::mem::size_of::<$ty>()) {
            let d = <$ty>::from_ne_bytes((&*chunk).try_into().unwrap());
            prev = prev.wrapping_add(d);
            chunk.copy_from_slice(&prev.to_ne_bytes());
        }
    }};
}

/// First differences of `input` at `width`-byte granularity.
pub(crate) fn diff_bytes(input: &[u8], width: usize) -> Result<Vec<u8>, FilterError> {
    if input.len() % width != 0 {
        return Err(FilterError::RaggedInput {
            len: input.len(),
            element_size: width,
        });
    }
    let mut out = Vec::with_capacity(input.len());
    match width {
        1 => diff!(input, out, u8),
        2 => diff!(input, out, u16),
        4 => diff!(input, out, u32),
        8 => diff!(input, out, u64),
        other => {
            return Err(FilterError::RaggedInput {
                len: input.len(),
                element_size: other,
            })
        }
    }
    Ok(out)
}

/// In-place inclusive prefix sum, the inverse of [`diff_bytes`].
pub(crate) fn undiff_bytes(buf: &mut [u8], width: usize) -> Result<(), FilterError> {
    if buf.len() % width != 0 {
        return Err(FilterError::RaggedInput {
            len: buf.len(),
            element_size: width,
        });
    }
    match width {
        1 => undiff!(buf, u8),
        2 => undiff!(buf, u16),
        4 => undiff!(buf, u32),
        8 => undiff!(buf, u64),
        other => {
            return Err(FilterError::RaggedInput {
                len: buf.len(),
                element_size: other,
            })
        }
    }
    Ok(())
}

/// Delta-transform then zstd-compress `input`.
pub fn deflate(input: &[u8], cdf_type: CdfType) -> Result<Vec<u8>, FilterError> {
    if !cdf_type.is_integral() {
        return Err(FilterError::NotIntegral(cdf_type));
    }
    let deltas = diff_bytes(input, cdf_type.size())?;
    Ok(zstd_codec::deflate(&deltas))
}

/// Zstd-decompress then prefix-sum into `output`; returns bytes written.
pub fn inflate(input: &[u8], output: &mut [u8], cdf_type: CdfType) -> Result<usize, FilterError> {
    if !cdf_type.is_integral() {
        return Err(FilterError::NotIntegral(cdf_type));
    }
    if input.is_empty() && output.is_empty() {
        return Ok(0);
    }
    let written = zstd_codec::inflate(input, output);
    if written != output.len() {
        return Err(FilterError::CorruptStream);
    }
    undiff_bytes(output, cdf_type.size())?;
    Ok(written)
}
