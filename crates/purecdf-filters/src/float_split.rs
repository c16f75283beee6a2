//! Float-splitting transform followed by zstd.
//!
//! IEEE floats interleave three fields whose statistics differ wildly:
//! signs rarely change, exponents drift slowly, mantissas look like noise.
//! Compressing them as one byte stream wastes the structure. This codec
//! splits every value into a sign byte, a biased exponent widened to u16
//! and a mantissa widened to u32/u64, groups each field into its own
//! stream, and compresses the streams separately (zstd for signs,
//! delta+zstd for exponents and mantissas).
//!
//! Within each stream, values are reordered so that the element position
//! inside a record varies slowest. Multi-element records usually hold one
//! physical quantity per position, so this groups like-behaved values and
//! makes the exponent deltas near-constant.
//!
//! Layout: a 16-byte header of two big-endian u64 section offsets (start
//! of the exponent and mantissa sections), then the three compressed
//! streams back to back. The sign section always starts at byte 16.

use purecdf_format::cdf_type::CdfType;

use crate::{delta, zstd_codec, FilterError};

const HEADER_LEN: usize = 16;

/// Element width in bytes for the split. Epoch16 values are pairs of f64,
/// so they split at width 8 with twice the element count.
fn split_width(cdf_type: CdfType) -> Result<usize, FilterError> {
    if !cdf_type.is_floating_point() {
        return Err(FilterError::NotFloatingPoint(cdf_type));
    }
    Ok(match cdf_type.size() {
        4 => 4,
        _ => 8,
    })
}

/// Value count per record and record count for a buffer of `n` values.
fn record_geometry(
    n: usize,
    record_size: usize,
    width: usize,
) -> Result<(usize, usize), FilterError> {
    if record_size == 0 || record_size % width != 0 {
        return Err(FilterError::RaggedInput {
            len: record_size,
            element_size: width,
        });
    }
    let record_len = record_size / width;
    if n % record_len != 0 {
        return Err(FilterError::RaggedRecords {
            values: n,
            record_len,
        });
    }
    Ok((record_len, n / record_len))
}

macro_rules! split_streams {
    ($fn_name:ident, $bits:ty, $sign_shift:expr, $exp_shift:expr, $exp_mask:expr, $mant_mask:expr) => {
        fn $fn_name(
            input: &[u8],
            record_len: usize,
            record_count: usize,
        ) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
            const W: usize = core::mem::size_of::<$bits>();
            let n = record_len * record_count;
            let mut sign = vec![0u8; n];
            let mut exp = vec![0u8; n * 2];
            let mut mant = vec![0u8; n * W];
            for i in 0..record_len {
                for r in 0..record_count {
                    let src = r * record_len + i;
                    let dst = i * record_count + r;
                    let bits = <$bits>::from_ne_bytes(
                        input[src * W..src * W + W].try_into().unwrap(),
                    );
                    sign[dst] = (bits >> $sign_shift) as u8;
                    let e = ((bits >> $exp_shift) & $exp_mask) as u16;
                    exp[dst * 2..dst * 2 + 2].copy_from_slice(&e.to_ne_bytes());
                    let m = bits & $mant_mask;
                    mant[dst * W..dst * W + W].copy_from_slice(&m.to_ne_bytes());
                }
            }
            (sign, exp, mant)
        }
    };
}

macro_rules! merge_streams {
    ($fn_name:ident, $bits:ty, $sign_shift:expr, $exp_shift:expr, $exp_mask:expr, $mant_mask:expr) => {
        fn $fn_name(
            sign: &[u8],
            exp: &[u8],
            mant: &[u8],
            record_len: usize,
            record_count: usize,
            output: &mut [u8],
        ) {
            const W: usize = core::mem::size_of::<$bits>();
            for i in 0..record_len {
                for r in 0..record_count {
                    let src = i * record_count + r;
                    let dst = r * record_len + i;
                    let e = u16::from_ne_bytes(exp[src * 2..src * 2 + 2].try_into().unwrap());
                    let m = <$bits>::from_ne_bytes(
                        mant[src * W..src * W + W].try_into().unwrap(),
                    );
                    let bits = (((sign[src] & 1) as $bits) << $sign_shift)
                        | (((e as $bits) & $exp_mask) << $exp_shift)
                        | (m & $mant_mask);
                    output[dst * W..dst * W + W].copy_from_slice(&bits.to_ne_bytes());
                }
            }
        }
    };
}

split_streams!(split_f32, u32, 31, 23, 0xFF_u32, 0x007F_FFFF_u32);
split_streams!(split_f64, u64, 63, 52, 0x7FF_u64, 0x000F_FFFF_FFFF_FFFF_u64);
merge_streams!(merge_f32, u32, 31, 23, 0xFF_u32, 0x007F_FFFF_u32);
merge_streams!(merge_f64, u64, 63, 52, 0x7FF_u64, 0x000F_FFFF_FFFF_FFFF_u64);

/// Split, reorder and compress `input` (`record_size` bytes per record).
pub fn deflate(
    input: &[u8],
    cdf_type: CdfType,
    record_size: usize,
) -> Result<Vec<u8>, FilterError> {
    let width = split_width(cdf_type)?;
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if input.len() % width != 0 {
        return Err(FilterError::RaggedInput {
            len: input.len(),
            element_size: width,
        });
    }
    let n = input.len() / width;
    let (record_len, record_count) = record_geometry(n, record_size, width)?;

    let (sign, exp, mant) = match width {
        4 => split_f32(input, record_len, record_count),
        _ => split_f64(input, record_len, record_count),
    };
    let sign_c = zstd_codec::deflate(&sign);
    let exp_c = zstd_codec::deflate(&delta::diff_bytes(&exp, 2)?);
    let mant_c = zstd_codec::deflate(&delta::diff_bytes(&mant, width)?);

    let exp_offset = (HEADER_LEN + sign_c.len()) as u64;
    let mant_offset = exp_offset + exp_c.len() as u64;
    let mut out =
        Vec::with_capacity(HEADER_LEN + sign_c.len() + exp_c.len() + mant_c.len());
    out.extend_from_slice(&exp_offset.to_be_bytes());
    out.extend_from_slice(&mant_offset.to_be_bytes());
    out.extend_from_slice(&sign_c);
    out.extend_from_slice(&exp_c);
    out.extend_from_slice(&mant_c);
    Ok(out)
}

/// Decompress and recombine into `output`; returns bytes written.
pub fn inflate(
    input: &[u8],
    output: &mut [u8],
    cdf_type: CdfType,
    record_size: usize,
) -> Result<usize, FilterError> {
    let width = split_width(cdf_type)?;
    if input.is_empty() && output.is_empty() {
        return Ok(0);
    }
    if output.len() % width != 0 {
        return Err(FilterError::RaggedInput {
            len: output.len(),
            element_size: width,
        });
    }
    let n = output.len() / width;
    let (record_len, record_count) = record_geometry(n, record_size, width)?;

    if input.len() < HEADER_LEN {
        return Err(FilterError::CorruptStream);
    }
    let exp_offset = u64::from_be_bytes(input[0..8].try_into().unwrap()) as usize;
    let mant_offset = u64::from_be_bytes(input[8..16].try_into().unwrap()) as usize;
    if exp_offset < HEADER_LEN || exp_offset > mant_offset || mant_offset > input.len() {
        return Err(FilterError::CorruptStream);
    }

    let mut sign = vec![0u8; n];
    if zstd_codec::inflate(&input[HEADER_LEN..exp_offset], &mut sign) != n {
        return Err(FilterError::CorruptStream);
    }
    let mut exp = vec![0u8; n * 2];
    if zstd_codec::inflate(&input[exp_offset..mant_offset], &mut exp) != n * 2 {
        return Err(FilterError::CorruptStream);
    }
    delta::undiff_bytes(&mut exp, 2)?;
    let mut mant = vec![0u8; n * width];
    if zstd_codec::inflate(&input[mant_offset..], &mut mant) != n * width {
        return Err(FilterError::CorruptStream);
    }
    delta::undiff_bytes(&mut mant, width)?;

    match width {
        4 => merge_f32(&sign, &exp, &mant, record_len, record_count, output),
        _ => merge_f64(&sign, &exp, &mant, record_len, record_count, output),
    }
    Ok(output.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_f64(values: &[f64], cdf_type: CdfType, record_size: usize) {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        let packed = deflate(&data, cdf_type, record_size).unwrap();
        let mut out = vec![0u8; data.len()];
        assert_eq!(
            inflate(&packed, &mut out, cdf_type, record_size),
            Ok(data.len())
        );
        assert_eq!(out, data, "not bit-exact");
    }

    #[test]
    fn f32_smooth_signal() {
        let values: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.01).sin() * 40.0).collect();
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        // 256 records of 4 values
        let packed = deflate(&data, CdfType::Float, 16).unwrap();
        let mut out = vec![0u8; data.len()];
        assert_eq!(inflate(&packed, &mut out, CdfType::Float, 16), Ok(data.len()));
        assert_eq!(out, data);
    }

    #[test]
    fn f64_special_values_are_bit_exact() {
        roundtrip_f64(
            &[
                0.0,
                -0.0,
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::NAN,
                f64::MIN_POSITIVE,
                5e-324, // smallest subnormal
                f64::MAX,
            ],
            CdfType::Double,
            16,
        );
    }

    #[test]
    fn epoch_values_split_as_f64() {
        let values: Vec<f64> = (0..100).map(|i| 6.3e13 + i as f64 * 1000.0).collect();
        roundtrip_f64(&values, CdfType::Epoch, 8);
    }

    #[test]
    fn epoch16_pairs_split_at_width_8() {
        // 10 Epoch16 values = 20 f64 components, one value per record.
        let values: Vec<f64> = (0..20).map(|i| i as f64 * 1e12).collect();
        roundtrip_f64(&values, CdfType::Epoch16, 16);
    }

    #[test]
    fn exponent_grouping_beats_plain_zstd() {
        // Two quantities per record with very different magnitudes.
        let mut values = Vec::new();
        for i in 0..2000 {
            values.push(1e-9 * (1.0 + i as f64 * 1e-4));
            values.push(1e9 * (1.0 + i as f64 * 1e-4));
        }
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        let split = deflate(&data, CdfType::Double, 16).unwrap();
        let plain = zstd_codec::deflate(&data);
        assert!(split.len() < plain.len());
    }

    #[test]
    fn integer_type_is_rejected() {
        assert_eq!(
            deflate(&[0u8; 16], CdfType::Int4, 4),
            Err(FilterError::NotFloatingPoint(CdfType::Int4))
        );
    }

    #[test]
    fn ragged_record_count_is_rejected() {
        // 3 values cannot form records of 2.
        let data = [0u8; 12];
        assert_eq!(
            deflate(&data, CdfType::Float, 8),
            Err(FilterError::RaggedRecords {
                values: 3,
                record_len: 2
            })
        );
    }

    #[test]
    fn truncated_header_is_corrupt() {
        let mut out = [0u8; 8];
        assert_eq!(
            inflate(&[0u8; 10], &mut out, CdfType::Double, 8),
            Err(FilterError::CorruptStream)
        );
    }

    #[test]
    fn lying_section_offsets_are_corrupt() {
        let mut input = vec![0u8; 32];
        input[0..8].copy_from_slice(&400u64.to_be_bytes()); // past the end
        input[8..16].copy_from_slice(&500u64.to_be_bytes());
        let mut out = [0u8; 8];
        assert_eq!(
            inflate(&input, &mut out, CdfType::Double, 8),
            Err(FilterError::CorruptStream)
        );
    }
}
