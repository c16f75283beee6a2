//! Synthetic CDF file builder for integration tests.
//!
//! Emits V3 (64-bit offset) files record by record, auto-linking the
//! descriptor chains: each new ADR/AEDR/VDR/VXR patches the previous
//! chain member's "next" field (or the owning head field) to point at
//! itself. Counts in the GDR are patched in `finish()`.

#![allow(dead_code)]

/// Record type tags.
pub const CDR: i32 = 1;
pub const GDR: i32 = 2;
pub const R_VDR: i32 = 3;
pub const ADR: i32 = 4;
pub const AGR_EDR: i32 = 5;
pub const VXR: i32 = 6;
pub const VVR: i32 = 7;
pub const Z_VDR: i32 = 8;
pub const AZ_EDR: i32 = 9;
pub const CCR: i32 = 10;
pub const CPR: i32 = 11;
pub const CVVR: i32 = 13;

const NAME_LEN: usize = 256;

#[derive(Debug, Clone, Copy, Default)]
struct GdrFields {
    r_vdr_head: usize,
    z_vdr_head: usize,
    adr_head: usize,
    eof: usize,
    nr_vars: usize,
    num_attr: usize,
    nz_vars: usize,
}

pub struct FileBuilder {
    buf: Vec<u8>,
    gdr: GdrFields,
    // Chain tails: absolute positions of the "next" field to patch when
    // the following chain member is written (None = patch the head).
    adr_tail: Option<usize>,
    agr_tail: Option<usize>,
    az_tail: Option<usize>,
    r_vdr_tail: Option<usize>,
    z_vdr_tail: Option<usize>,
    vxr_link: Option<(usize, usize)>, // (head-or-next pos, vxr_tail pos in VDR)
    nr_vars: u32,
    nz_vars: u32,
    num_attr: u32,
}

impl FileBuilder {
    /// Start an uncompressed V3 file: magic pair only.
    pub fn new() -> FileBuilder {
        let mut b = FileBuilder {
            buf: Vec::new(),
            gdr: GdrFields::default(),
            adr_tail: None,
            agr_tail: None,
            az_tail: None,
            r_vdr_tail: None,
            z_vdr_tail: None,
            vxr_link: None,
            nr_vars: 0,
            nz_vars: 0,
            num_attr: 0,
        };
        b.u32(0xCDF3_0001);
        b.u32(0x0000_FFFF);
        b
    }

    // -- primitive writers --------------------------------------------------

    pub fn pos(&self) -> u64 {
        self.buf.len() as u64
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn bytes(&mut self, b: &[u8]) {
        self.buf.extend_from_slice(b);
    }

    fn name(&mut self, s: &str) {
        let mut field = vec![0u8; NAME_LEN];
        field[..s.len()].copy_from_slice(s.as_bytes());
        self.buf.extend_from_slice(&field);
    }

    fn patch_u64(&mut self, at: usize, v: u64) {
        self.buf[at..at + 8].copy_from_slice(&v.to_be_bytes());
    }

    fn patch_u32(&mut self, at: usize, v: u32) {
        self.buf[at..at + 4].copy_from_slice(&v.to_be_bytes());
    }

    /// Write a record header with a placeholder size; returns the record
    /// start for `end_record`.
    fn begin_record(&mut self, rtype: i32) -> usize {
        let start = self.buf.len();
        self.u64(0);
        self.i32(rtype);
        start
    }

    fn end_record(&mut self, start: usize) {
        let size = (self.buf.len() - start) as u64;
        self.patch_u64(start, size);
    }

    /// Position of the field `index` u64-fields past the record header.
    fn field_pos(start: usize, byte_offset: usize) -> usize {
        start + 12 + byte_offset
    }

    // -- records ------------------------------------------------------------

    /// CDR at offset 8. `flags` bit 0 set means row majority.
    pub fn cdr(&mut self, encoding: u32, flags: u32) {
        assert_eq!(self.pos(), 8);
        let start = self.begin_record(CDR);
        let gdr_offset_pos = self.buf.len();
        self.u64(0); // GDRoffset, patched by gdr()
        self.u32(3); // Version
        self.u32(9); // Release
        self.u32(encoding);
        self.u32(flags);
        self.u32(0); // rfuA
        self.u32(0); // rfuB
        self.u32(0); // Increment
        self.u32(3); // Identifier
        self.u32(0); // rfuE
        let mut copyright = vec![0u8; 256];
        let text = b"Common Data Format (CDF)";
        copyright[..text.len()].copy_from_slice(text);
        self.bytes(&copyright);
        self.end_record(start);
        let gdr_at = self.pos();
        self.patch_u64(gdr_offset_pos, gdr_at);
    }

    /// GDR directly after the CDR. `r_dim_sizes` declares the shared
    /// r-variable dimensions.
    pub fn gdr(&mut self, r_dim_sizes: &[u32]) {
        let start = self.begin_record(GDR);
        self.gdr.r_vdr_head = self.buf.len();
        self.u64(0);
        self.gdr.z_vdr_head = self.buf.len();
        self.u64(0);
        self.gdr.adr_head = self.buf.len();
        self.u64(0);
        self.gdr.eof = self.buf.len();
        self.u64(0);
        self.gdr.nr_vars = self.buf.len();
        self.u32(0);
        self.gdr.num_attr = self.buf.len();
        self.u32(0);
        self.i32(-1); // rMaxRec
        self.u32(r_dim_sizes.len() as u32);
        self.gdr.nz_vars = self.buf.len();
        self.u32(0);
        self.u64(0); // UIRhead
        self.u32(0); // rfuC
        self.u32(2017); // LeapSecondLastUpdated
        self.u32(0); // rfuE
        for &d in r_dim_sizes {
            self.u32(d);
        }
        self.end_record(start);
    }

    /// ADR: starts a new attribute; subsequent `aedr` calls append
    /// entries to it. Scope: 1 global, 2 variable (and the assumed
    /// variants 3/4).
    pub fn adr(&mut self, name: &str, scope: u32, num: u32) {
        let at = self.pos();
        match self.adr_tail {
            Some(next_pos) => self.patch_u64(next_pos, at),
            None => {
                let head = self.gdr.adr_head;
                self.patch_u64(head, at);
            }
        }
        let start = self.begin_record(ADR);
        self.adr_tail = Some(self.buf.len());
        self.u64(0); // ADRnext
        self.agr_tail = Some(self.buf.len());
        self.u64(0); // AgrEDRhead
        self.u32(scope);
        self.u32(num);
        self.u32(0); // NgrEntries
        self.u32(0); // MAXgrEntries
        self.u32(0); // rfuA
        self.az_tail = Some(self.buf.len());
        self.u64(0); // AzEDRhead
        self.u32(0); // NzEntries
        self.u32(0); // MAXzEntries
        self.u32(0); // rfuE
        self.name(name);
        self.end_record(start);
        self.num_attr += 1;
        // The head fields double as the first chain link; aedr() swaps
        // these for real "next" fields as entries are written.
    }

    /// AEDR appended to the current attribute. `z` selects the z-entry
    /// chain; `num` is the entry index (global) or owner variable
    /// ordinal (variable scope). `value` is the raw payload in file
    /// encoding.
    pub fn aedr(&mut self, z: bool, attr_num: u32, num: u32, data_type: u32, num_elements: u32, value: &[u8]) {
        let at = self.pos();
        let tail = if z { &mut self.az_tail } else { &mut self.agr_tail };
        let link = tail.expect("aedr before adr");
        self.patch_u64(link, at);
        let start = self.begin_record(if z { AZ_EDR } else { AGR_EDR });
        let next_pos = self.buf.len();
        self.u64(0); // AEDRnext
        self.u32(attr_num);
        self.u32(data_type);
        self.u32(num);
        self.u32(num_elements);
        self.u32(0); // NumStrings
        self.u32(0);
        self.u32(0);
        self.u32(0);
        self.u32(0);
        self.bytes(value);
        self.end_record(start);
        if z {
            self.az_tail = Some(next_pos);
        } else {
            self.agr_tail = Some(next_pos);
        }
    }

    /// zVDR: starts a new z variable; a following `vxr` call indexes it.
    /// `dims` pairs each extent with its variance flag. Flags: bit 0
    /// record-varying, bit 1 pad present, bit 2 compressed.
    pub fn zvdr(
        &mut self,
        name: &str,
        data_type: u32,
        max_rec: i32,
        flags: u32,
        num_elems: u32,
        num: u32,
        dims: &[(u32, bool)],
        pad: Option<&[u8]>,
        cpr_offset: u64,
    ) {
        let at = self.pos();
        match self.z_vdr_tail {
            Some(next_pos) => self.patch_u64(next_pos, at),
            None => {
                let head = self.gdr.z_vdr_head;
                self.patch_u64(head, at);
            }
        }
        let start = self.begin_record(Z_VDR);
        self.z_vdr_tail = Some(self.buf.len());
        self.u64(0); // VDRnext
        self.u32(data_type);
        self.i32(max_rec);
        let vxr_head_pos = self.buf.len();
        self.u64(0); // VXRhead
        let vxr_tail_pos = self.buf.len();
        self.u64(0); // VXRtail
        self.u32(flags);
        self.u32(0); // SRecords
        self.u32(0);
        self.u32(0);
        self.u32(0);
        self.u32(num_elems);
        self.u32(num);
        self.u64(cpr_offset);
        self.u32(0); // BlockingFactor
        self.name(name);
        self.u32(dims.len() as u32);
        for &(d, _) in dims {
            self.u32(d);
        }
        for &(_, varys) in dims {
            self.u32(varys as u32);
        }
        if let Some(pad) = pad {
            self.bytes(pad);
        }
        self.end_record(start);
        self.vxr_link = Some((vxr_head_pos, vxr_tail_pos));
        self.nz_vars += 1;
    }

    /// rVDR: like `zvdr` but sharing the GDR's dimensions; `dim_varys`
    /// must match the GDR's dimension count.
    pub fn rvdr(
        &mut self,
        name: &str,
        data_type: u32,
        max_rec: i32,
        flags: u32,
        num: u32,
        dim_varys: &[bool],
        pad: Option<&[u8]>,
    ) {
        let at = self.pos();
        match self.r_vdr_tail {
            Some(next_pos) => self.patch_u64(next_pos, at),
            None => {
                let head = self.gdr.r_vdr_head;
                self.patch_u64(head, at);
            }
        }
        let start = self.begin_record(R_VDR);
        self.r_vdr_tail = Some(self.buf.len());
        self.u64(0);
        self.u32(data_type);
        self.i32(max_rec);
        let vxr_head_pos = self.buf.len();
        self.u64(0);
        let vxr_tail_pos = self.buf.len();
        self.u64(0);
        self.u32(flags);
        self.u32(0);
        self.u32(0);
        self.u32(0);
        self.u32(0);
        self.u32(1); // NumElems
        self.u32(num);
        self.u64(0); // CPRorSPRoffset
        self.u32(0);
        self.name(name);
        for &varys in dim_varys {
            self.u32(varys as u32);
        }
        if let Some(pad) = pad {
            self.bytes(pad);
        }
        self.end_record(start);
        self.vxr_link = Some((vxr_head_pos, vxr_tail_pos));
        self.nr_vars += 1;
    }

    /// VXR indexing the most recent VDR. Entries are `(first, last,
    /// record offset)` with offsets of previously written VVRs/CVVRs.
    pub fn vxr(&mut self, entries: &[(u32, u32, u64)]) {
        let at = self.pos();
        let (link, tail_pos) = self.vxr_link.expect("vxr before vdr");
        self.patch_u64(link, at);
        self.patch_u64(tail_pos, at);
        let start = self.begin_record(VXR);
        let next_pos = self.buf.len();
        self.u64(0); // VXRnext
        self.u32(entries.len() as u32);
        self.u32(entries.len() as u32);
        for &(first, _, _) in entries {
            self.u32(first);
        }
        for &(_, last, _) in entries {
            self.u32(last);
        }
        for &(_, _, offset) in entries {
            self.u64(offset);
        }
        self.end_record(start);
        self.vxr_link = Some((next_pos, tail_pos));
    }

    /// VVR holding raw record bytes; returns its offset.
    pub fn vvr(&mut self, payload: &[u8]) -> u64 {
        let at = self.pos();
        let start = self.begin_record(VVR);
        self.bytes(payload);
        self.end_record(start);
        at
    }

    /// CVVR holding pre-compressed record bytes; returns its offset.
    pub fn cvvr(&mut self, compressed: &[u8]) -> u64 {
        let at = self.pos();
        let start = self.begin_record(CVVR);
        self.u32(0); // rfuA
        self.u64(compressed.len() as u64);
        self.bytes(compressed);
        self.end_record(start);
        at
    }

    /// CPR naming a codec; returns its offset for VDR CPRorSPRoffset.
    pub fn cpr(&mut self, c_type: u32) -> u64 {
        let at = self.pos();
        let start = self.begin_record(CPR);
        self.u32(c_type);
        self.u32(0); // rfuA
        self.u32(0); // pCount
        self.end_record(start);
        at
    }

    /// A record with an arbitrary (usually wrong) type tag; returns its
    /// offset. For corruption tests.
    pub fn raw_record(&mut self, rtype: i32, payload: &[u8]) -> u64 {
        let at = self.pos();
        let start = self.begin_record(rtype);
        self.bytes(payload);
        self.end_record(start);
        at
    }

    /// Patch chain counts into the GDR and return the file bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let eof = self.pos();
        let (eof_pos, nr_pos, na_pos, nz_pos) = (
            self.gdr.eof,
            self.gdr.nr_vars,
            self.gdr.num_attr,
            self.gdr.nz_vars,
        );
        self.patch_u64(eof_pos, eof);
        self.patch_u32(nr_pos, self.nr_vars);
        self.patch_u32(na_pos, self.num_attr);
        self.patch_u32(nz_pos, self.nz_vars);
        self.buf
    }
}

/// Wrap an uncompressed file image in a whole-file CCR + CPR using the
/// given codec and pre-compressed body.
pub fn wrap_in_ccr(uncompressed: &[u8], c_type: u32, compressed_body: &[u8]) -> Vec<u8> {
    let body_len = (uncompressed.len() - 8) as u64;
    let mut out = Vec::new();
    out.extend_from_slice(&uncompressed[0..4]);
    out.extend_from_slice(&0xCCCC_0001u32.to_be_bytes());
    // CCR at 8: header(12) + CPRoffset(8) + uSize(8) + rfuA(4) + data
    let ccr_size = 12 + 8 + 8 + 4 + compressed_body.len() as u64;
    let cpr_offset = 8 + ccr_size;
    out.extend_from_slice(&ccr_size.to_be_bytes());
    out.extend_from_slice(&(CCR).to_be_bytes());
    out.extend_from_slice(&cpr_offset.to_be_bytes());
    out.extend_from_slice(&body_len.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(compressed_body);
    // CPR
    let cpr_size: u64 = 12 + 4 + 4 + 4;
    out.extend_from_slice(&cpr_size.to_be_bytes());
    out.extend_from_slice(&(CPR).to_be_bytes());
    out.extend_from_slice(&c_type.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out
}
