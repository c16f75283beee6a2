//! Column-major to row-major reordering of multi-dimensional records.
//!
//! CDF files written by Fortran-era tooling store each record's values
//! column-major (first dimension varies fastest). The public API always
//! presents row-major data, so column-major records are permuted exactly
//! once at load (or first access, for lazy variables).

use crate::values::Values;

/// Permute one record's worth of elements from column-major to row-major.
fn permute_record<T: Clone>(record: &mut [T], dims: &[usize], scratch: &mut Vec<T>) {
    scratch.clear();
    scratch.extend_from_slice(record);
    // Row-major strides: last dimension varies fastest.
    let mut row_strides = vec![1usize; dims.len()];
    for j in (0..dims.len().saturating_sub(1)).rev() {
        row_strides[j] = row_strides[j + 1] * dims[j + 1];
    }
    // Walk the column-major linear index, decompose it, re-project.
    let mut col_stride = 1usize;
    let mut col_strides = vec![1usize; dims.len()];
    for j in 0..dims.len() {
        col_strides[j] = col_stride;
        col_stride *= dims[j];
    }
    for (c, value) in scratch.iter().enumerate() {
        let mut row = 0;
        for j in 0..dims.len() {
            let idx = (c / col_strides[j]) % dims[j];
            row += idx * row_strides[j];
        }
        record[row] = value.clone();
    }
}

fn permute_all<T: Clone>(data: &mut [T], record_count: usize, dims: &[usize]) {
    let record_len: usize = dims.iter().product();
    if record_len == 0 {
        return;
    }
    let mut scratch = Vec::with_capacity(record_len);
    for record in data.chunks_exact_mut(record_len).take(record_count) {
        permute_record(record, dims, &mut scratch);
    }
}

/// Reorder `values` in place from column-major to row-major records.
///
/// Scalars and 1-D records are order-independent and left untouched, as
/// are strings (a string is one element regardless of its char count).
pub fn column_to_row(values: &mut Values, record_count: usize, dims: &[usize]) {
    if dims.len() < 2 {
        return;
    }
    match values {
        Values::Int8(v) => permute_all(v, record_count, dims),
        Values::Int16(v) => permute_all(v, record_count, dims),
        Values::Int32(v) => permute_all(v, record_count, dims),
        Values::Int64(v) => permute_all(v, record_count, dims),
        Values::UInt8(v) => permute_all(v, record_count, dims),
        Values::UInt16(v) => permute_all(v, record_count, dims),
        Values::UInt32(v) => permute_all(v, record_count, dims),
        Values::Float(v) => permute_all(v, record_count, dims),
        Values::Double(v) => permute_all(v, record_count, dims),
        Values::Epoch(v) => permute_all(v, record_count, dims),
        Values::Epoch16(v) => permute_all(v, record_count, dims),
        Values::Tt2000(v) => permute_all(v, record_count, dims),
        Values::String(v) => permute_all(v, record_count, dims),
    }
}
