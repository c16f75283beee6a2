//! High-level API for reading CDF (Common Data Format) files.
//!
//! This crate provides an ergonomic interface on top of `purecdf-format`:
//! a [`Cdf`] container holding decoded [`Variable`]s and [`Attribute`]s,
//! with eager or lazy loading of variable payloads and transparent
//! handling of compressed files and compressed variables.
//!
//! # Reading
//!
//! ```no_run
//! use purecdf::Cdf;
//!
//! let mut cdf = Cdf::load_path("magnetometer.cdf").unwrap();
//! let var = cdf.variable_mut("B_field").unwrap();
//! println!("shape: {:?}", var.shape());
//! println!("values: {:?}", var.values().unwrap());
//! ```
//!
//! # Lazy loading
//!
//! ```no_run
//! use purecdf::Cdf;
//!
//! let bytes = std::fs::read("large.cdf").unwrap();
//! let mut cdf = Cdf::load_lazy(bytes).unwrap();
//! // Metadata is fully parsed; payloads decompress on first access.
//! let epochs = cdf.variable_mut("Epoch").unwrap().values().unwrap();
//! ```

pub mod attribute;
pub mod error;
pub(crate) mod loading;
pub mod majority;
pub mod values;
pub mod variable;

use std::collections::HashMap;

pub use attribute::Attribute;
pub use error::Error;
pub use values::Values;
pub use variable::Variable;

pub use purecdf_filters::CompressionType;
pub use purecdf_format::cdf_type::CdfType;
pub use purecdf_format::records::Majority;

/// A loaded CDF container: variables, global attributes and file-level
/// metadata.
#[derive(Debug)]
pub struct Cdf {
    pub(crate) variables: HashMap<String, Variable>,
    /// Global attributes, keyed by name.
    pub attributes: HashMap<String, Attribute>,
    /// Storage order of multi-dimensional records. Values are always
    /// presented row-major; this records what the file declared.
    pub majority: Majority,
    /// Distribution (version, release, increment) that wrote the file.
    pub version: (u32, u32, u32),
    /// Whole-file compression, `None` for uncompressed files.
    pub compression: CompressionType,
    /// Copyright text from the CDF Descriptor Record.
    pub copyright: String,
    /// Year of the leap-second table the file was written against.
    pub leap_second_last_updated: Option<u32>,
}

impl Cdf {
    /// Load a container eagerly: every variable payload is decompressed
    /// and decoded up front.
    pub fn load(data: &[u8]) -> Result<Cdf, Error> {
        loading::load_bytes(data.to_vec(), false)
    }

    /// Load metadata eagerly but defer variable payloads until first
    /// access through [`Variable::values`].
    pub fn load_lazy(data: Vec<u8>) -> Result<Cdf, Error> {
        loading::load_bytes(data, true)
    }

    /// Load a container from a file path.
    pub fn load_path<P: AsRef<std::path::Path>>(path: P) -> Result<Cdf, Error> {
        let reader = purecdf_io::FileReader::open(path)?;
        loading::load_bytes(reader.into_inner(), false)
    }

    /// Load a container from a memory-mapped file. The map is released
    /// once loading finishes; payloads are decoded eagerly.
    #[cfg(feature = "mmap")]
    pub fn load_mmap<P: AsRef<std::path::Path>>(path: P) -> Result<Cdf, Error> {
        use purecdf_io::CdfRead;
        let reader = purecdf_io::MmapReader::open(path)?;
        loading::load_bytes(reader.as_bytes().to_vec(), false)
    }

    /// A variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// A variable by name, mutable (required to materialize lazy
    /// payloads).
    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.get_mut(name)
    }

    /// Iterate over all variables.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// A global attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}
