// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Canonical Huffman tables for JPEG entropy coding.
//!
//! Both the encode and the decode side are derived from the same compact
//! (bits, huffval) specification, generated per ITU-T T.81 Annex C.

use super::bitio::BitReader;
use super::error::{JpegError, Result};

/// AC symbol for a run of 16 zero coefficients.
pub const ZRL: u8 = 0xF0;
/// AC symbol ending a block: every remaining coefficient is zero.
pub const EOB: u8 = 0x00;

/// Huffman table class as stored in DHT / referenced by SOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

/// Huffman table specification as carried in a DHT segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanSpec {
    pub class: TableClass,
    /// Table ID (0–3).
    pub id: u8,
    /// Number of codes of each length (1–16).
    pub bits: [u8; 16],
    /// Symbol values in order of increasing code length.
    pub huffval: Vec<u8>,
}

// ITU-T T.81 Tables K.3 – K.6.
const STD_DC_LUMA_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
const STD_DC_LUMA_VALS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

const STD_DC_CHROMA_BITS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
const STD_DC_CHROMA_VALS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

const STD_AC_LUMA_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 0x7D];
const STD_AC_LUMA_VALS: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08, 0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2A, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7,
    0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5,
    0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
    0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8,
    0xF9, 0xFA,
];

const STD_AC_CHROMA_BITS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 0x77];
const STD_AC_CHROMA_VALS: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91, 0xA1, 0xB1, 0xC1, 0x09, 0x23, 0x33, 0x52, 0xF0,
    0x15, 0x62, 0x72, 0xD1, 0x0A, 0x16, 0x24, 0x34, 0xE1, 0x25, 0xF1, 0x17, 0x18, 0x19, 0x1A, 0x26,
    0x27, 0x28, 0x29, 0x2A, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5,
    0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3,
    0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA,
    0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8,
    0xF9, 0xFA,
];

impl HuffmanSpec {
    pub fn new(class: TableClass, id: u8, bits: [u8; 16], huffval: &[u8]) -> Self {
        Self {
            class,
            id,
            bits,
            huffval: huffval.to_vec(),
        }
    }

    /// Standard luminance DC table, bound to ID 0.
    pub fn std_dc_luma() -> Self {
        Self::new(TableClass::Dc, 0, STD_DC_LUMA_BITS, &STD_DC_LUMA_VALS)
    }

    /// Standard chrominance DC table, bound to ID 1.
    pub fn std_dc_chroma() -> Self {
        Self::new(TableClass::Dc, 1, STD_DC_CHROMA_BITS, &STD_DC_CHROMA_VALS)
    }

    /// Standard luminance AC table, bound to ID 0.
    pub fn std_ac_luma() -> Self {
        Self::new(TableClass::Ac, 0, STD_AC_LUMA_BITS, &STD_AC_LUMA_VALS)
    }

    /// Standard chrominance AC table, bound to ID 1.
    pub fn std_ac_chroma() -> Self {
        Self::new(TableClass::Ac, 1, STD_AC_CHROMA_BITS, &STD_AC_CHROMA_VALS)
    }

    /// Total number of codes declared by `bits`.
    pub fn num_codes(&self) -> usize {
        self.bits.iter().map(|&b| b as usize).sum()
    }
}

/// Walk the canonical code assignment: calls `f(symbol, code, length)` for
/// every code in order. Fails if the counts do not match the symbol list or
/// a length overflows its code space.
fn for_each_code(bits: &[u8; 16], huffval: &[u8], mut f: impl FnMut(u8, u16, u8)) -> Result<()> {
    let total: usize = bits.iter().map(|&b| b as usize).sum();
    if total != huffval.len() || total > 256 {
        return Err(JpegError::InvalidMarkerData("DHT symbol count mismatch"));
    }

    let mut code: u32 = 0;
    let mut si = 0;
    for length in 1..=16u8 {
        let count = bits[(length - 1) as usize] as u32;
        if code + count > (1u32 << length) {
            return Err(JpegError::InvalidMarkerData("DHT code lengths overflow"));
        }
        for _ in 0..count {
            f(huffval[si], code as u16, length);
            si += 1;
            code += 1;
        }
        code <<= 1;
    }
    Ok(())
}

/// Huffman encode table: maps symbol → (code_bits, code_length).
pub struct HuffmanEncodeTable {
    /// Length 0 means the symbol is not in the table.
    table: [(u16, u8); 256],
}

impl HuffmanEncodeTable {
    /// Build an encode table from JPEG-style counts and symbols.
    pub fn build(bits: &[u8; 16], huffval: &[u8]) -> Result<Self> {
        let mut table = [(0u16, 0u8); 256];
        for_each_code(bits, huffval, |symbol, code, length| {
            table[symbol as usize] = (code, length);
        })?;
        Ok(Self { table })
    }

    pub fn from_spec(spec: &HuffmanSpec) -> Result<Self> {
        Self::build(&spec.bits, &spec.huffval)
    }

    /// Encode a symbol: returns (code_bits, code_length).
    pub fn encode(&self, symbol: u8) -> Result<(u16, u8)> {
        let (code, len) = self.table[symbol as usize];
        if len == 0 {
            Err(JpegError::InvalidMarkerData(
                "Huffman table missing code for symbol",
            ))
        } else {
            Ok((code, len))
        }
    }
}

/// Huffman decode table in the T.81 Annex F.2.2.3 form.
///
/// Decoding pulls one bit at a time and compares the running code against
/// the largest code of the current length.
pub struct HuffmanDecodeTable {
    /// Largest code of each length, or -1 when that length is unused.
    maxcode: [i32; 16],
    /// Smallest code of each length.
    mincode: [i32; 16],
    /// Index into `huffval` of the first symbol of each length.
    valptr: [usize; 16],
    huffval: Vec<u8>,
}

impl HuffmanDecodeTable {
    /// Build a decode table from JPEG-style counts and symbols.
    pub fn build(bits: &[u8; 16], huffval: &[u8]) -> Result<Self> {
        let mut maxcode = [-1i32; 16];
        let mut mincode = [0i32; 16];
        let mut valptr = [0usize; 16];
        let mut si = 0usize;

        for_each_code(bits, huffval, |_, code, length| {
            let l = (length - 1) as usize;
            if maxcode[l] < 0 {
                mincode[l] = code as i32;
                valptr[l] = si;
            }
            maxcode[l] = code as i32;
            si += 1;
        })?;

        Ok(Self {
            maxcode,
            mincode,
            valptr,
            huffval: huffval.to_vec(),
        })
    }

    pub fn from_spec(spec: &HuffmanSpec) -> Result<Self> {
        Self::build(&spec.bits, &spec.huffval)
    }

    /// Decode one Huffman symbol from the bit stream.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u8> {
        let mut code = reader.read_bit()? as i32;
        for l in 0..16 {
            if self.maxcode[l] >= 0 && code <= self.maxcode[l] && code >= self.mincode[l] {
                let idx = self.valptr[l] + (code - self.mincode[l]) as usize;
                return Ok(self.huffval[idx]);
            }
            if l < 15 {
                code = (code << 1) | reader.read_bit()? as i32;
            }
        }
        Err(JpegError::MalformedEntropyStream("no Huffman code matches"))
    }
}

/// Number of bits needed for `|value|`: the JPEG magnitude category.
pub fn bit_length(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Encode a signed value into JPEG "additional bits" representation.
/// Returns (magnitude_bits, category/size).
///
/// Negative values are sign-biased: `value + (1 << size) - 1`.
pub fn encode_value(value: i32) -> (u16, u8) {
    let size = bit_length(value);
    if size == 0 {
        return (0, 0);
    }
    let bits = if value > 0 {
        value
    } else {
        value + (1 << size) - 1
    };
    (bits as u16, size)
}

/// Extend a signed value from its JPEG "additional bits" representation.
///
/// Per ITU-T T.81 Table F.1: if the high bit is 0, the value is negative.
pub fn extend_sign(value: u16, bits: u8) -> i32 {
    if bits == 0 {
        return 0;
    }
    let half = 1i32 << (bits - 1);
    if (value as i32) < half {
        value as i32 - (1i32 << bits) + 1
    } else {
        value as i32
    }
}
