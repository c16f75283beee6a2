//! Container assembly: from raw bytes to a [`Cdf`].
//!
//! Loading is a fixed walk over the descriptor graph: magic pair, CCR
//! unwrap if the whole body is compressed, CDR, GDR, the ADR/AEDR chains
//! (attributes), then the rVDR and zVDR chains (variables). Variable
//! attributes are staged by owner ordinal while walking the ADR chains
//! and moved onto their variable when its VDR is reached. A load either
//! produces a complete container or fails; there are no partial results.

use std::collections::HashMap;
use std::sync::Arc;

use purecdf_filters::{self as filters, CompressionType, FilterError};
use purecdf_format::cdf_type::CdfType;
use purecdf_format::chain::RecordChain;
use purecdf_format::encoding::{Encoding, Endianness};
use purecdf_format::error::FormatError;
use purecdf_format::magic::{MagicNumbers, UNCOMPRESSED_MAGIC};
use purecdf_format::records::{
    Adr, Aedr, Ccr, Cdr, Cpr, Cvvr, Gdr, Majority, OffsetWidth, RecordHeader, RecordType, VarKind,
    Vdr, Vvr, Vxr,
};

use crate::attribute::Attribute;
use crate::error::Error;
use crate::majority;
use crate::values::Values;
use crate::variable::{DataBlock, LazyValues, ValuesDescriptor, Variable};
use crate::Cdf;

/// Variable-scoped attribute entries waiting for their owner's VDR,
/// keyed by descriptor flavor and variable ordinal.
type StagedAttrs = HashMap<(VarKind, u32), Vec<(String, Values)>>;

pub(crate) fn load_bytes(data: Vec<u8>, lazy: bool) -> Result<Cdf, Error> {
    let magic = MagicNumbers::parse(&data)?;
    if !magic.is_cdf() {
        return Err(Error::Format(FormatError::NotACdf {
            m1: magic.m1,
            m2: magic.m2,
        }));
    }
    let width = magic.offset_width();
    let (data, file_compression) = if magic.is_compressed() {
        unwrap_ccr(data, width)?
    } else {
        (data, CompressionType::None)
    };
    parse_container(Arc::new(data), width, file_compression, lazy)
}

/// Decompress the Compressed CDF Record wrapping the file body and
/// rebuild an uncompressed image: the original magic pair (second word
/// rewritten to the uncompressed marker) followed by the inflated body.
fn unwrap_ccr(data: Vec<u8>, width: OffsetWidth) -> Result<(Vec<u8>, CompressionType), Error> {
    let ccr = Ccr::parse(&data, 8, width)?;
    let cpr = Cpr::parse(&data, ccr.cpr_offset, width)?;
    let ctype = CompressionType::from_u32(cpr.c_type)?;
    let compressed =
        &data[ccr.data_offset as usize..ccr.data_offset as usize + ccr.data_len];
    let mut body = vec![0u8; ccr.u_size as usize];
    let written = filters::inflate(ctype, compressed, &mut body, CdfType::None, 0)?;
    if written != body.len() {
        return Err(Error::Filter(FilterError::CorruptStream));
    }
    let mut rebuilt = Vec::with_capacity(8 + body.len());
    rebuilt.extend_from_slice(&data[0..4]);
    rebuilt.extend_from_slice(&UNCOMPRESSED_MAGIC.to_be_bytes());
    rebuilt.extend_from_slice(&body);
    Ok((rebuilt, ctype))
}

fn parse_container(
    source: Arc<Vec<u8>>,
    width: OffsetWidth,
    file_compression: CompressionType,
    lazy: bool,
) -> Result<Cdf, Error> {
    let data: &[u8] = &source;
    let cdr = Cdr::parse(data, 8, width)?;
    let endianness = Encoding::from_u32(cdr.encoding)?.endianness();
    let majority = cdr.majority();
    let gdr = Gdr::parse(data, cdr.gdr_offset, width)?;

    let mut attributes = HashMap::new();
    let mut staged = StagedAttrs::new();
    let adrs = RecordChain::new(
        gdr.adr_head,
        data.len(),
        |offset| Adr::parse(data, offset, width),
        |adr: &Adr| adr.adr_next,
    );
    for adr in adrs {
        let adr = adr?;
        collect_attribute(data, width, &adr, endianness, &mut attributes, &mut staged)?;
    }

    let mut variables = HashMap::new();
    for (kind, head) in [(VarKind::R, gdr.r_vdr_head), (VarKind::Z, gdr.z_vdr_head)] {
        let vdrs = RecordChain::new(
            head,
            data.len(),
            |offset| Vdr::parse(data, offset, width, kind, gdr.r_num_dims, pad_len),
            |vdr: &Vdr| vdr.vdr_next,
        );
        for vdr in vdrs {
            let vdr = vdr?;
            let mut variable = build_variable(
                data,
                &source,
                width,
                &gdr,
                &vdr,
                kind,
                endianness,
                majority,
                file_compression,
                lazy,
            )?;
            if let Some(entries) = staged.remove(&(kind, vdr.num)) {
                for (name, values) in entries {
                    variable
                        .attributes
                        .insert(name.clone(), Attribute::new(name, vec![values]));
                }
            }
            variables.insert(variable.name.clone(), variable);
        }
    }

    Ok(Cdf {
        variables,
        attributes,
        majority,
        version: (cdr.version, cdr.release, cdr.increment),
        compression: file_compression,
        copyright: cdr.copyright,
        leap_second_last_updated: match gdr.leap_second_last_updated {
            0 | u32::MAX => None,
            v => Some(v),
        },
    })
}

/// Pad-value byte length declared by a VDR: one value's worth.
fn pad_len(data_type: u32, num_elems: u32) -> usize {
    CdfType::from_u32(data_type)
        .map(|t| t.size())
        .unwrap_or(0)
        * num_elems as usize
}

/// Walk both entry chains of one ADR and route the decoded entries:
/// global attributes are finished immediately, variable attributes are
/// staged under their owner's ordinal.
fn collect_attribute(
    data: &[u8],
    width: OffsetWidth,
    adr: &Adr,
    endianness: Endianness,
    attributes: &mut HashMap<String, Attribute>,
    staged: &mut StagedAttrs,
) -> Result<(), Error> {
    if adr.scope.is_global() {
        let mut entries = Vec::new();
        for head in [adr.agr_edr_head, adr.az_edr_head] {
            for aedr in entry_chain(data, width, head) {
                let aedr = aedr?;
                entries.push((aedr.num, decode_entry(data, &aedr, endianness)?));
            }
        }
        entries.sort_by_key(|(num, _)| *num);
        attributes.insert(
            adr.name.clone(),
            Attribute::new(
                adr.name.clone(),
                entries.into_iter().map(|(_, v)| v).collect(),
            ),
        );
    } else {
        for (kind, head) in [(VarKind::R, adr.agr_edr_head), (VarKind::Z, adr.az_edr_head)] {
            for aedr in entry_chain(data, width, head) {
                let aedr = aedr?;
                let values = decode_entry(data, &aedr, endianness)?;
                staged
                    .entry((kind, aedr.num))
                    .or_default()
                    .push((adr.name.clone(), values));
            }
        }
    }
    Ok(())
}

fn entry_chain<'a>(
    data: &'a [u8],
    width: OffsetWidth,
    head: u64,
) -> impl Iterator<Item = Result<Aedr, FormatError>> + 'a {
    RecordChain::new(
        head,
        data.len(),
        move |offset| Aedr::parse(data, offset, width),
        |aedr: &Aedr| aedr.aedr_next,
    )
}

/// Decode the literal payload trailing an AEDR's fixed fields.
fn decode_entry(data: &[u8], aedr: &Aedr, endianness: Endianness) -> Result<Values, Error> {
    let cdf_type = CdfType::from_u32(aedr.data_type)?;
    let len = cdf_type.size() * aedr.num_elements as usize;
    let start = aedr.value_offset as usize;
    let end = start.saturating_add(len);
    if end > data.len() {
        return Err(Error::Format(FormatError::UnexpectedEof {
            expected: end,
            available: data.len(),
        }));
    }
    let num_elems = if cdf_type.is_string() {
        aedr.num_elements as usize
    } else {
        1
    };
    Ok(Values::decode(&data[start..end], cdf_type, endianness, num_elems)?)
}

#[allow(clippy::too_many_arguments)]
fn build_variable(
    data: &[u8],
    source: &Arc<Vec<u8>>,
    width: OffsetWidth,
    gdr: &Gdr,
    vdr: &Vdr,
    kind: VarKind,
    endianness: Endianness,
    majority: Majority,
    file_compression: CompressionType,
    lazy: bool,
) -> Result<Variable, Error> {
    let cdf_type = CdfType::from_u32(vdr.data_type)?;
    let num_elems = if cdf_type.is_string() {
        (vdr.num_elems as usize).max(1)
    } else {
        1
    };
    // Shape keeps only the varying dimensions.
    let declared_dims: &[u32] = match kind {
        VarKind::Z => &vdr.z_dim_sizes,
        VarKind::R => &gdr.r_dim_sizes,
    };
    let dims: Vec<usize> = declared_dims
        .iter()
        .zip(&vdr.dim_varys)
        .filter(|(_, varys)| **varys != 0)
        .map(|(d, _)| *d as usize)
        .collect();
    // A non-record-varying variable holds one record shared by all
    // logical records.
    let record_count = if vdr.record_varying() {
        // MaxRec is untrusted; widen before the +1 so i32::MAX cannot wrap.
        (i64::from(vdr.max_rec) + 1).max(0) as usize
    } else if vdr.max_rec >= 0 {
        1
    } else {
        0
    };
    let compression = if vdr.compressed() {
        if vdr.has_cpr(width) {
            let cpr = Cpr::parse(data, vdr.cpr_or_spr_offset, width)?;
            CompressionType::from_u32(cpr.c_type)?
        } else {
            file_compression
        }
    } else {
        CompressionType::None
    };
    let blocks = collect_blocks(data, width, vdr, record_count)?;
    let desc = ValuesDescriptor {
        cdf_type,
        endianness,
        num_elems,
        record_count,
        dims,
        majority,
        compression,
        width,
        blocks,
        pad: vdr.pad_values.clone(),
    };
    let payload = if lazy {
        Err(LazyValues {
            source: Arc::clone(source),
            desc: desc.clone(),
        })
    } else {
        Ok(read_variable_data(data, &desc, &vdr.name)?)
    };
    Ok(Variable::new(
        vdr.name.clone(),
        vdr.num,
        cdf_type,
        &desc,
        payload,
    ))
}

/// Walk the VXR chain and validate the index: entries must cover
/// ascending, non-overlapping logical ranges inside the declared record
/// count.
fn collect_blocks(
    data: &[u8],
    width: OffsetWidth,
    vdr: &Vdr,
    record_count: usize,
) -> Result<Vec<DataBlock>, Error> {
    let mut blocks = Vec::new();
    let vxrs = RecordChain::new(
        vdr.vxr_head,
        data.len(),
        |offset| Vxr::parse(data, offset, width),
        |vxr: &Vxr| vxr.vxr_next,
    );
    for vxr in vxrs {
        let vxr = vxr?;
        for (first, last, offset) in vxr.used_entries() {
            blocks.push(DataBlock {
                first,
                last,
                offset,
            });
        }
    }
    let mut prev_last: Option<u32> = None;
    for block in &blocks {
        if block.first > block.last
            || prev_last.is_some_and(|p| block.first <= p)
        {
            return Err(Error::BlocksOutOfOrder {
                variable: vdr.name.clone(),
            });
        }
        if block.last as usize >= record_count {
            return Err(Error::BlockBeyondEnd {
                variable: vdr.name.clone(),
                last: block.last,
                records: record_count,
            });
        }
        prev_last = Some(block.last);
    }
    Ok(blocks)
}

/// Materialize a variable's payload: pad-fill the full buffer, overlay
/// every indexed block (decompressing as needed), decode, and apply the
/// column-to-row swap when the file is column-major.
pub(crate) fn read_variable_data(
    data: &[u8],
    desc: &ValuesDescriptor,
    name: &str,
) -> Result<Values, Error> {
    let record_bytes = desc.record_bytes();
    let mut buf = vec![0u8; desc.record_count * record_bytes];
    if let Some(pad) = desc.pad.as_deref().filter(|p| !p.is_empty()) {
        for chunk in buf.chunks_mut(pad.len()) {
            chunk.copy_from_slice(&pad[..chunk.len()]);
        }
    }

    for block in &desc.blocks {
        let blen = (block.last - block.first + 1) as usize * record_bytes;
        if blen == 0 {
            continue;
        }
        let dst_start = block.first as usize * record_bytes;
        let dst = &mut buf[dst_start..dst_start + blen];
        let header = RecordHeader::parse(data, block.offset, desc.width)?;
        match RecordType::from_i32(header.record_type) {
            Some(RecordType::Vvr) => {
                let vvr = Vvr::parse(data, block.offset, desc.width)?;
                if vvr.data_len < blen {
                    return Err(Error::BlockSizeMismatch {
                        variable: name.to_string(),
                        expected: blen,
                        actual: vvr.data_len,
                    });
                }
                let start = vvr.data_offset as usize;
                dst.copy_from_slice(&data[start..start + blen]);
            }
            Some(RecordType::Cvvr) => {
                let cvvr = Cvvr::parse(data, block.offset, desc.width)?;
                let start = cvvr.data_offset as usize;
                let compressed = &data[start..start + cvvr.c_size as usize];
                let written =
                    filters::inflate(desc.compression, compressed, dst, desc.cdf_type, record_bytes)?;
                if written != blen {
                    return Err(Error::BlockSizeMismatch {
                        variable: name.to_string(),
                        expected: blen,
                        actual: written,
                    });
                }
            }
            _ => {
                return Err(Error::BadValueRecord {
                    variable: name.to_string(),
                    offset: block.offset,
                    found: header.record_type,
                });
            }
        }
    }

    let mut values = Values::decode(&buf, desc.cdf_type, desc.endianness, desc.num_elems)?;
    if desc.majority == Majority::Column {
        majority::column_to_row(&mut values, desc.record_count, &desc.dims);
    }
    Ok(values)
}
