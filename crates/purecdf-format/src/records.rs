//! CDF descriptor record layouts for both format generations.
//!
//! Every on-disk record starts with a header of `{record_size, record_type}`
//! where `record_size` is an offset-width unsigned integer (4 bytes in V2
//! files, 8 bytes in V3 files) and `record_type` is a 32-bit tag. Field
//! order and meaning are identical between the two families; only the
//! offset-field width and the name-field capacity differ.
//!
//! Decoding is two-phase: fixed fields are read in declaration order, then
//! trailing table fields are read using counts taken from already-decoded
//! sibling fields (or, for the rVDR's `DimVarys` table, from the GDR's
//! `rNumDims` on a different record entirely).

use byteorder::{BigEndian, ByteOrder};

use crate::error::FormatError;

/// Offset-field width of a format generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetWidth {
    /// V2.x: 32-bit offsets, 64-byte name fields.
    V2,
    /// V3.x: 64-bit offsets, 256-byte name fields.
    V3,
}

impl OffsetWidth {
    /// Bytes occupied by one offset-valued field.
    pub fn offset_len(self) -> usize {
        match self {
            OffsetWidth::V2 => 4,
            OffsetWidth::V3 => 8,
        }
    }

    /// Capacity of a name field (null/space padded on disk).
    pub fn name_len(self) -> usize {
        match self {
            OffsetWidth::V2 => 64,
            OffsetWidth::V3 => 256,
        }
    }

    /// The all-ones "unused offset" sentinel of this width.
    pub fn none_sentinel(self) -> u64 {
        match self {
            OffsetWidth::V2 => u32::MAX as u64,
            OffsetWidth::V3 => u64::MAX,
        }
    }
}

/// CDF record kind tags (stable on-disk values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Cdr,
    Gdr,
    RVdr,
    Adr,
    AgrEdr,
    Vxr,
    Vvr,
    ZVdr,
    AzEdr,
    Ccr,
    Cpr,
    Spr,
    Cvvr,
}

impl RecordType {
    /// Decode the on-disk tag; `None` for unknown values.
    pub fn from_i32(value: i32) -> Option<RecordType> {
        Some(match value {
            1 => RecordType::Cdr,
            2 => RecordType::Gdr,
            3 => RecordType::RVdr,
            4 => RecordType::Adr,
            5 => RecordType::AgrEdr,
            6 => RecordType::Vxr,
            7 => RecordType::Vvr,
            8 => RecordType::ZVdr,
            9 => RecordType::AzEdr,
            10 => RecordType::Ccr,
            11 => RecordType::Cpr,
            12 => RecordType::Spr,
            13 => RecordType::Cvvr,
            _ => return None,
        })
    }

    /// The on-disk tag.
    pub fn as_i32(self) -> i32 {
        match self {
            RecordType::Cdr => 1,
            RecordType::Gdr => 2,
            RecordType::RVdr => 3,
            RecordType::Adr => 4,
            RecordType::AgrEdr => 5,
            RecordType::Vxr => 6,
            RecordType::Vvr => 7,
            RecordType::ZVdr => 8,
            RecordType::AzEdr => 9,
            RecordType::Ccr => 10,
            RecordType::Cpr => 11,
            RecordType::Spr => 12,
            RecordType::Cvvr => 13,
        }
    }
}

/// Variable descriptor flavor: row-oriented or column(z)-oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    R,
    Z,
}

/// Storage order of multi-dimensional values (CDR flags bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Majority {
    Row,
    Column,
}

/// Attribute scope enumeration (persisted ADR field, stable values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrScope {
    Global,
    Variable,
    GlobalAssumed,
    VariableAssumed,
}

impl AttrScope {
    /// Decode the on-disk scope enumerant.
    pub fn from_u32(value: u32) -> Result<AttrScope, FormatError> {
        Ok(match value {
            1 => AttrScope::Global,
            2 => AttrScope::Variable,
            3 => AttrScope::GlobalAssumed,
            4 => AttrScope::VariableAssumed,
            other => return Err(FormatError::UnknownAttrScope(other)),
        })
    }

    /// True for global (or assumed-global) scope.
    pub fn is_global(self) -> bool {
        matches!(self, AttrScope::Global | AttrScope::GlobalAssumed)
    }
}

// ---------------------------------------------------------------------------
// Record cursor
// ---------------------------------------------------------------------------

/// Big-endian cursor over record bytes at an absolute file offset.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], offset: u64) -> Result<Cursor<'a>, FormatError> {
        let pos = offset as usize;
        if pos > data.len() {
            return Err(FormatError::UnexpectedEof {
                expected: pos,
                available: data.len(),
            });
        }
        Ok(Cursor { data, pos })
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self.pos.checked_add(n).ok_or(FormatError::UnexpectedEof {
            expected: usize::MAX,
            available: self.data.len(),
        })?;
        if end > self.data.len() {
            return Err(FormatError::UnexpectedEof {
                expected: end,
                available: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32, FormatError> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    fn i32(&mut self) -> Result<i32, FormatError> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    fn offset(&mut self, width: OffsetWidth) -> Result<u64, FormatError> {
        match width {
            OffsetWidth::V2 => Ok(BigEndian::read_u32(self.take(4)?) as u64),
            OffsetWidth::V3 => Ok(BigEndian::read_u64(self.take(8)?)),
        }
    }

    /// Fixed-capacity name field: null/space padded on disk, trimmed on read.
    fn name(&mut self, width: OffsetWidth) -> Result<String, FormatError> {
        let raw = self.take(width.name_len())?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        let trimmed = String::from_utf8_lossy(&raw[..end]);
        Ok(trimmed.trim_end_matches(' ').to_string())
    }

    fn u32_table(&mut self, count: usize) -> Result<Vec<u32>, FormatError> {
        let raw = self.take(count * 4)?;
        let mut out = vec![0u32; count];
        BigEndian::read_u32_into(raw, &mut out);
        Ok(out)
    }

    fn offset_table(
        &mut self,
        width: OffsetWidth,
        count: usize,
    ) -> Result<Vec<u64>, FormatError> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.offset(width)?);
        }
        Ok(out)
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}

// ---------------------------------------------------------------------------
// Record header
// ---------------------------------------------------------------------------

/// The `{record_size, record_type}` header every record starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Total byte length of the record including this header.
    pub record_size: u64,
    /// Raw record kind tag.
    pub record_type: i32,
}

impl RecordHeader {
    /// Bytes occupied by the header at the given width.
    pub fn packed_size(width: OffsetWidth) -> u64 {
        width.offset_len() as u64 + 4
    }

    /// Parse and validate the header at `offset`.
    ///
    /// A declared size smaller than the header itself (including zero) is
    /// structural corruption.
    pub fn parse(
        data: &[u8],
        offset: u64,
        width: OffsetWidth,
    ) -> Result<RecordHeader, FormatError> {
        let mut c = Cursor::new(data, offset)?;
        let record_size = c.offset(width)?;
        let record_type = c.i32()?;
        if record_size < Self::packed_size(width) {
            return Err(FormatError::InvalidRecordSize {
                offset,
                size: record_size,
            });
        }
        Ok(RecordHeader {
            record_size,
            record_type,
        })
    }

    /// Require this header to be one of `accepted` kinds.
    pub fn expect(
        &self,
        accepted: &[RecordType],
        offset: u64,
    ) -> Result<RecordType, FormatError> {
        match RecordType::from_i32(self.record_type) {
            Some(kind) if accepted.contains(&kind) => Ok(kind),
            Some(_) | None => Err(FormatError::UnexpectedRecordType {
                expected: accepted[0],
                found: self.record_type,
                offset,
            }),
        }
    }
}

fn parse_expected<'a>(
    data: &'a [u8],
    offset: u64,
    width: OffsetWidth,
    accepted: &[RecordType],
) -> Result<(RecordHeader, Cursor<'a>), FormatError> {
    let header = RecordHeader::parse(data, offset, width)?;
    header.expect(accepted, offset)?;
    let mut c = Cursor::new(data, offset)?;
    // Re-skip the header; the cursor then sits on the first fixed field.
    c.offset(width)?;
    c.i32()?;
    Ok((header, c))
}

// ---------------------------------------------------------------------------
// CDR — CDF Descriptor Record (the file root, always at offset 8)
// ---------------------------------------------------------------------------

/// CDF Descriptor Record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cdr {
    pub header: RecordHeader,
    pub gdr_offset: u64,
    pub version: u32,
    pub release: u32,
    pub encoding: u32,
    pub flags: u32,
    pub increment: u32,
    pub identifier: u32,
    pub copyright: String,
}

impl Cdr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Cdr, FormatError> {
        let (header, mut c) = parse_expected(data, offset, width, &[RecordType::Cdr])?;
        let gdr_offset = c.offset(width)?;
        let version = c.u32()?;
        let release = c.u32()?;
        let encoding = c.u32()?;
        let flags = c.u32()?;
        let _rfu_a = c.u32()?;
        let _rfu_b = c.u32()?;
        let increment = c.u32()?;
        let identifier = c.u32()?;
        let _rfu_e = c.u32()?;
        // The copyright field is 256 bytes in every generation since 2.6.
        let raw = c.take(256)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        let copyright = String::from_utf8_lossy(&raw[..end]).trim_end().to_string();
        Ok(Cdr {
            header,
            gdr_offset,
            version,
            release,
            encoding,
            flags,
            increment,
            identifier,
            copyright,
        })
    }

    /// Storage order of multi-dimensional values (flags bit 0 set = row).
    pub fn majority(&self) -> Majority {
        if self.flags & 1 != 0 {
            Majority::Row
        } else {
            Majority::Column
        }
    }
}

// ---------------------------------------------------------------------------
// GDR — Global Descriptor Record
// ---------------------------------------------------------------------------

/// Global Descriptor Record: heads of the VDR and ADR chains plus the
/// r-variable dimension table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gdr {
    pub header: RecordHeader,
    pub r_vdr_head: u64,
    pub z_vdr_head: u64,
    pub adr_head: u64,
    pub eof: u64,
    pub nr_vars: u32,
    pub num_attr: u32,
    pub r_max_rec: i32,
    pub r_num_dims: u32,
    pub nz_vars: u32,
    pub leap_second_last_updated: u32,
    /// Dimension extents of all r-variables; length given by `r_num_dims`.
    pub r_dim_sizes: Vec<u32>,
}

impl Gdr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Gdr, FormatError> {
        let (header, mut c) = parse_expected(data, offset, width, &[RecordType::Gdr])?;
        let r_vdr_head = c.offset(width)?;
        let z_vdr_head = c.offset(width)?;
        let adr_head = c.offset(width)?;
        let eof = c.offset(width)?;
        let nr_vars = c.u32()?;
        let num_attr = c.u32()?;
        let r_max_rec = c.i32()?;
        let r_num_dims = c.u32()?;
        let nz_vars = c.u32()?;
        let _uir_head = c.offset(width)?;
        let _rfu_c = c.u32()?;
        let leap_second_last_updated = c.u32()?;
        let _rfu_e = c.u32()?;
        let r_dim_sizes = c.u32_table(r_num_dims as usize)?;
        Ok(Gdr {
            header,
            r_vdr_head,
            z_vdr_head,
            adr_head,
            eof,
            nr_vars,
            num_attr,
            r_max_rec,
            r_num_dims,
            nz_vars,
            leap_second_last_updated,
            r_dim_sizes,
        })
    }
}

// ---------------------------------------------------------------------------
// ADR — Attribute Descriptor Record
// ---------------------------------------------------------------------------

/// Attribute Descriptor Record: one named attribute with two entry chains,
/// one for global/r-variable entries and one for z-variable entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adr {
    pub header: RecordHeader,
    pub adr_next: u64,
    pub agr_edr_head: u64,
    pub scope: AttrScope,
    /// Stable attribute ordinal.
    pub num: u32,
    pub ngr_entries: u32,
    pub max_gr_entries: u32,
    pub az_edr_head: u64,
    pub nz_entries: u32,
    pub max_z_entries: u32,
    pub name: String,
}

impl Adr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Adr, FormatError> {
        let (header, mut c) = parse_expected(data, offset, width, &[RecordType::Adr])?;
        let adr_next = c.offset(width)?;
        let agr_edr_head = c.offset(width)?;
        let scope = AttrScope::from_u32(c.u32()?)?;
        let num = c.u32()?;
        let ngr_entries = c.u32()?;
        let max_gr_entries = c.u32()?;
        let _rfu_a = c.u32()?;
        let az_edr_head = c.offset(width)?;
        let nz_entries = c.u32()?;
        let max_z_entries = c.u32()?;
        let _rfu_e = c.u32()?;
        let name = c.name(width)?;
        Ok(Adr {
            header,
            adr_next,
            agr_edr_head,
            scope,
            num,
            ngr_entries,
            max_gr_entries,
            az_edr_head,
            nz_entries,
            max_z_entries,
            name,
        })
    }
}

// ---------------------------------------------------------------------------
// AEDR — Attribute-Entry Descriptor Record
// ---------------------------------------------------------------------------

/// Attribute-Entry Descriptor Record: one entry of an attribute. The
/// literal value payload trails the fixed header; no typed field is
/// declared for it, so `value_offset` records where it begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aedr {
    pub header: RecordHeader,
    pub aedr_next: u64,
    /// Ordinal of the owning attribute.
    pub attr_num: u32,
    pub data_type: u32,
    /// Entry number: the entry index for global attributes, the owning
    /// variable's ordinal for variable-scoped attributes.
    pub num: u32,
    pub num_elements: u32,
    pub num_strings: u32,
    /// Absolute offset of the trailing value payload.
    pub value_offset: u64,
}

impl Aedr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Aedr, FormatError> {
        let (header, mut c) = parse_expected(
            data,
            offset,
            width,
            &[RecordType::AgrEdr, RecordType::AzEdr],
        )?;
        let aedr_next = c.offset(width)?;
        let attr_num = c.u32()?;
        let data_type = c.u32()?;
        let num = c.u32()?;
        let num_elements = c.u32()?;
        let num_strings = c.u32()?;
        let _rf_b = c.u32()?;
        let _rf_c = c.u32()?;
        let _rf_d = c.u32()?;
        let _rf_e = c.u32()?;
        let value_offset = c.position();
        Ok(Aedr {
            header,
            aedr_next,
            attr_num,
            data_type,
            num,
            num_elements,
            num_strings,
            value_offset,
        })
    }
}

// ---------------------------------------------------------------------------
// VDR — Variable Descriptor Record (row and column variants)
// ---------------------------------------------------------------------------

/// Variable Descriptor Record. The z-variant carries its own dimension
/// table; the r-variant shares the GDR's, so parsing an rVDR needs the
/// GDR's `rNumDims` to size the `DimVarys` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vdr {
    pub header: RecordHeader,
    pub kind: VarKind,
    pub vdr_next: u64,
    pub data_type: u32,
    /// Highest logical record index written, -1 when no records exist.
    pub max_rec: i32,
    pub vxr_head: u64,
    pub vxr_tail: u64,
    pub flags: u32,
    pub s_records: u32,
    pub num_elems: u32,
    /// Stable variable ordinal.
    pub num: u32,
    pub cpr_or_spr_offset: u64,
    pub blocking_factor: u32,
    pub name: String,
    /// Dimension extents (z-variables only; empty for r-variables).
    pub z_dim_sizes: Vec<u32>,
    /// Per-dimension variance flags (nonzero = varying).
    pub dim_varys: Vec<u32>,
    /// Raw pad value bytes in file encoding, when flags bit 1 is set.
    pub pad_values: Option<Vec<u8>>,
}

impl Vdr {
    /// Parse a VDR of the given flavor. `r_num_dims` is the GDR's
    /// dimension count and `value_size` the byte length of one value
    /// (element size times `NumElems` for character types); both size
    /// trailing tables that are not self-describing.
    pub fn parse(
        data: &[u8],
        offset: u64,
        width: OffsetWidth,
        kind: VarKind,
        r_num_dims: u32,
        value_size: impl Fn(u32, u32) -> usize,
    ) -> Result<Vdr, FormatError> {
        let expected = match kind {
            VarKind::R => RecordType::RVdr,
            VarKind::Z => RecordType::ZVdr,
        };
        let (header, mut c) = parse_expected(data, offset, width, &[expected])?;
        let vdr_next = c.offset(width)?;
        let data_type = c.u32()?;
        let max_rec = c.i32()?;
        let vxr_head = c.offset(width)?;
        let vxr_tail = c.offset(width)?;
        let flags = c.u32()?;
        let s_records = c.u32()?;
        let _rfu_b = c.u32()?;
        let _rfu_c = c.u32()?;
        let _rfu_f = c.u32()?;
        let num_elems = c.u32()?;
        let num = c.u32()?;
        let cpr_or_spr_offset = c.offset(width)?;
        let blocking_factor = c.u32()?;
        let name = c.name(width)?;
        let (z_dim_sizes, num_dims) = match kind {
            VarKind::R => (Vec::new(), r_num_dims),
            VarKind::Z => {
                let z_num_dims = c.u32()?;
                (c.u32_table(z_num_dims as usize)?, z_num_dims)
            }
        };
        let dim_varys = c.u32_table(num_dims as usize)?;
        let pad_values = if flags & 2 != 0 {
            Some(c.take(value_size(data_type, num_elems))?.to_vec())
        } else {
            None
        };
        Ok(Vdr {
            header,
            kind,
            vdr_next,
            data_type,
            max_rec,
            vxr_head,
            vxr_tail,
            flags,
            s_records,
            num_elems,
            num,
            cpr_or_spr_offset,
            blocking_factor,
            name,
            z_dim_sizes,
            dim_varys,
            pad_values,
        })
    }

    /// Flags bit 0: clear means non-record-varying.
    pub fn record_varying(&self) -> bool {
        self.flags & 1 != 0
    }

    /// Flags bit 2: this variable's value blocks are compressed.
    pub fn compressed(&self) -> bool {
        self.flags & 4 != 0
    }

    /// Whether `cpr_or_spr_offset` points at a real CPR.
    pub fn has_cpr(&self, width: OffsetWidth) -> bool {
        self.cpr_or_spr_offset != 0 && self.cpr_or_spr_offset != width.none_sentinel()
    }
}

// ---------------------------------------------------------------------------
// VXR — Variable-Index Record
// ---------------------------------------------------------------------------

/// Variable-Index Record: three parallel tables mapping inclusive logical
/// record ranges `[first[i], last[i]]` to the byte offset of the value
/// record that stores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vxr {
    pub header: RecordHeader,
    pub vxr_next: u64,
    /// Table capacity.
    pub n_entries: u32,
    /// Occupied entries (a prefix of the tables).
    pub n_used_entries: u32,
    pub first: Vec<u32>,
    pub last: Vec<u32>,
    pub offsets: Vec<u64>,
}

impl Vxr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Vxr, FormatError> {
        let (header, mut c) = parse_expected(data, offset, width, &[RecordType::Vxr])?;
        let vxr_next = c.offset(width)?;
        let n_entries = c.u32()?;
        let n_used_entries = c.u32()?;
        // used_entries() indexes the tables by the occupancy count.
        if n_used_entries > n_entries {
            return Err(FormatError::InvalidEntryCount {
                offset,
                used: n_used_entries,
                capacity: n_entries,
            });
        }
        let first = c.u32_table(n_entries as usize)?;
        let last = c.u32_table(n_entries as usize)?;
        let offsets = c.offset_table(width, n_entries as usize)?;
        Ok(Vxr {
            header,
            vxr_next,
            n_entries,
            n_used_entries,
            first,
            last,
            offsets,
        })
    }

    /// The occupied `(first, last, offset)` entries.
    pub fn used_entries(&self) -> impl Iterator<Item = (u32, u32, u64)> + '_ {
        (0..self.n_used_entries as usize)
            .map(move |i| (self.first[i], self.last[i], self.offsets[i]))
    }
}

// ---------------------------------------------------------------------------
// VVR / CVVR — value records
// ---------------------------------------------------------------------------

/// Variable-Value Record: a raw uncompressed block. The payload length is
/// derived from `record_size`, not separately stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vvr {
    pub header: RecordHeader,
    /// Absolute offset of the value payload.
    pub data_offset: u64,
    /// Payload byte length.
    pub data_len: usize,
}

impl Vvr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Vvr, FormatError> {
        let (header, c) = parse_expected(data, offset, width, &[RecordType::Vvr])?;
        let data_offset = c.position();
        let data_len = (header.record_size - RecordHeader::packed_size(width)) as usize;
        if (data_offset as usize).saturating_add(data_len) > data.len() {
            return Err(FormatError::UnexpectedEof {
                expected: data_offset as usize + data_len,
                available: data.len(),
            });
        }
        Ok(Vvr {
            header,
            data_offset,
            data_len,
        })
    }
}

/// Compressed Variable-Value Record: a reserved word, the compressed byte
/// count `cSize`, then `cSize` compressed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cvvr {
    pub header: RecordHeader,
    pub c_size: u64,
    /// Absolute offset of the compressed payload.
    pub data_offset: u64,
}

impl Cvvr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Cvvr, FormatError> {
        let (header, mut c) = parse_expected(data, offset, width, &[RecordType::Cvvr])?;
        let _rfu_a = c.u32()?;
        let c_size = c.offset(width)?;
        let data_offset = c.position();
        if (data_offset as usize).saturating_add(c_size as usize) > data.len() {
            return Err(FormatError::UnexpectedEof {
                expected: data_offset as usize + c_size as usize,
                available: data.len(),
            });
        }
        Ok(Cvvr {
            header,
            c_size,
            data_offset,
        })
    }
}

// ---------------------------------------------------------------------------
// CPR / CCR — compression records
// ---------------------------------------------------------------------------

/// Compression Parameters Record: the codec enumerant and its parameters,
/// attached to the file (via the CCR) or to a variable (via the VDR's
/// `CPRorSPRoffset`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpr {
    pub header: RecordHeader,
    /// Raw compression-type enumerant (interpreted by the filters layer).
    pub c_type: u32,
    pub p_count: u32,
    pub c_parms: Vec<u32>,
}

impl Cpr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Cpr, FormatError> {
        let (header, mut c) = parse_expected(data, offset, width, &[RecordType::Cpr])?;
        let c_type = c.u32()?;
        let _rfu_a = c.u32()?;
        let p_count = c.u32()?;
        let c_parms = c.u32_table(p_count as usize)?;
        Ok(Cpr {
            header,
            c_type,
            p_count,
            c_parms,
        })
    }
}

/// Compressed CDF Record: wraps the entire compressed file body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ccr {
    pub header: RecordHeader,
    pub cpr_offset: u64,
    /// Total uncompressed size of the wrapped body.
    pub u_size: u64,
    /// Absolute offset of the compressed body.
    pub data_offset: u64,
    /// Compressed body byte length (derived from `record_size`).
    pub data_len: usize,
}

impl Ccr {
    pub fn parse(data: &[u8], offset: u64, width: OffsetWidth) -> Result<Ccr, FormatError> {
        let (header, mut c) = parse_expected(data, offset, width, &[RecordType::Ccr])?;
        let cpr_offset = c.offset(width)?;
        let u_size = c.offset(width)?;
        let _rfu_a = c.u32()?;
        let data_offset = c.position();
        let fixed = data_offset - offset;
        if header.record_size < fixed {
            return Err(FormatError::InvalidRecordSize {
                offset,
                size: header.record_size,
            });
        }
        let data_len = (header.record_size - fixed) as usize;
        if (data_offset as usize).saturating_add(data_len) > data.len() {
            return Err(FormatError::UnexpectedEof {
                expected: data_offset as usize + data_len,
                available: data.len(),
            });
        }
        Ok(Ccr {
            header,
            cpr_offset,
            u_size,
            data_offset,
            data_len,
        })
    }
}
