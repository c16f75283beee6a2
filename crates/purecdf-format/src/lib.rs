//! Pure-Rust CDF binary format parsing.
//!
//! This crate provides low-level parsing of CDF (Common Data Format)
//! descriptor records: the magic number pair, the typed record layouts for
//! both the 32-bit-offset (V2) and 64-bit-offset (V3) format generations,
//! and a forward-only iterator over offset-linked record chains.
//!
//! All on-disk record fields are big-endian; variable and attribute value
//! payloads follow the encoding declared in the CDF Descriptor Record.

pub mod cdf_type;
pub mod chain;
pub mod encoding;
pub mod error;
pub mod magic;
pub mod records;
