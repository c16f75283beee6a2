//! Variables: shaped, typed, possibly lazily materialized data.

use std::collections::HashMap;
use std::sync::Arc;

use purecdf_filters::CompressionType;
use purecdf_format::cdf_type::CdfType;
use purecdf_format::encoding::Endianness;
use purecdf_format::records::{Majority, OffsetWidth};

use crate::attribute::Attribute;
use crate::error::Error;
use crate::loading;
use crate::values::Values;

/// One index entry: logical records `first..=last` stored in the value
/// record at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBlock {
    pub first: u32,
    pub last: u32,
    pub offset: u64,
}

/// Everything needed to materialize a variable's payload from the raw
/// file bytes. Shared by the eager and lazy paths so they cannot drift.
#[derive(Debug, Clone)]
pub struct ValuesDescriptor {
    pub(crate) cdf_type: CdfType,
    pub(crate) endianness: Endianness,
    /// Element count per value: string length for character types, 1
    /// otherwise.
    pub(crate) num_elems: usize,
    pub(crate) record_count: usize,
    /// Varying dimension extents, row-major.
    pub(crate) dims: Vec<usize>,
    pub(crate) majority: Majority,
    pub(crate) compression: CompressionType,
    pub(crate) width: OffsetWidth,
    pub(crate) blocks: Vec<DataBlock>,
    /// Raw pad bytes for one value, in file encoding.
    pub(crate) pad: Option<Vec<u8>>,
}

impl ValuesDescriptor {
    /// Bytes of one value (a whole string for character types).
    pub(crate) fn value_bytes(&self) -> usize {
        self.cdf_type.size() * self.num_elems
    }

    /// Bytes of one logical record.
    pub(crate) fn record_bytes(&self) -> usize {
        self.dims.iter().product::<usize>() * self.value_bytes()
    }
}

/// A deferred payload: the shared file bytes plus the recipe to decode
/// them.
#[derive(Debug, Clone)]
pub struct LazyValues {
    pub(crate) source: Arc<Vec<u8>>,
    pub(crate) desc: ValuesDescriptor,
}

#[derive(Debug, Clone)]
enum VarData {
    Pending(LazyValues),
    Ready(Values),
}

/// A CDF variable: a named sequence of shaped records.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    /// Stable ordinal within the file.
    pub num: u32,
    /// `[record_count, varying dims...]`.
    shape: Vec<usize>,
    pub cdf_type: CdfType,
    /// Attributes scoped to this variable, keyed by name.
    pub attributes: HashMap<String, Attribute>,
    data: VarData,
}

impl Variable {
    pub(crate) fn new(
        name: String,
        num: u32,
        cdf_type: CdfType,
        desc: &ValuesDescriptor,
        data: Result<Values, LazyValues>,
    ) -> Variable {
        let mut shape = Vec::with_capacity(desc.dims.len() + 1);
        shape.push(desc.record_count);
        shape.extend_from_slice(&desc.dims);
        Variable {
            name,
            num,
            shape,
            cdf_type,
            attributes: HashMap::new(),
            data: match data {
                Ok(values) => VarData::Ready(values),
                Err(lazy) => VarData::Pending(lazy),
            },
        }
    }

    /// `[record_count, varying dims...]`, row-major.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of logical records.
    pub fn record_count(&self) -> usize {
        self.shape[0]
    }

    /// Whether the payload has been materialized yet.
    pub fn is_loaded(&self) -> bool {
        matches!(self.data, VarData::Ready(_))
    }

    /// The variable's values, materializing them on first access.
    ///
    /// For lazily loaded containers this decompresses and decodes the
    /// payload in place; subsequent calls return the cached result. The
    /// first access mutates the variable and is not synchronized.
    pub fn values(&mut self) -> Result<&Values, Error> {
        if let VarData::Pending(lazy) = &self.data {
            let values = loading::read_variable_data(&lazy.source, &lazy.desc, &self.name)?;
            self.data = VarData::Ready(values);
        }
        match &self.data {
            VarData::Ready(values) => Ok(values),
            VarData::Pending(_) => unreachable!(),
        }
    }

    /// An attribute of this variable, by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}
