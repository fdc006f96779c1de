// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Quantization and Huffman table parsing/serialization.
//!
//! Handles DQT (Define Quantization Table) and DHT (Define Huffman Table)
//! marker segments. A single segment may carry several tables. Quantization
//! values are stored in zigzag order on the wire.

use byteorder::{BigEndian, ByteOrder};

use super::error::{JpegError, Result};
use super::huffman::{HuffmanSpec, TableClass};
use super::marker::{write_segment, DHT, DQT};
use super::quant::QuantTable;
use super::zigzag::ZIGZAG_TO_NATURAL;

/// Parse a DQT marker segment body (after the 2-byte length).
///
/// Returns a list of (table_id, QuantTable) pairs. Both 8-bit and 16-bit
/// entries are accepted.
pub fn parse_dqt(data: &[u8]) -> Result<Vec<(u8, QuantTable)>> {
    let mut tables = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let pq_tq = data[pos];
        pos += 1;
        let precision = pq_tq >> 4;
        let table_id = pq_tq & 0x0F;

        if table_id > 3 {
            return Err(JpegError::InvalidMarkerData("quantization table ID out of range"));
        }
        let entry_size = match precision {
            0 => 1,
            1 => 2,
            _ => return Err(JpegError::UnsupportedFeature("DQT precision")),
        };
        if pos + 64 * entry_size > data.len() {
            return Err(JpegError::InvalidMarkerData("DQT table shorter than 64 entries"));
        }

        let mut values = [0u16; 64];
        for (zi, &ni) in ZIGZAG_TO_NATURAL.iter().enumerate() {
            values[ni] = if entry_size == 1 {
                data[pos + zi] as u16
            } else {
                BigEndian::read_u16(&data[pos + zi * 2..])
            };
        }
        if values.contains(&0) {
            return Err(JpegError::InvalidMarkerData("zero quantization value"));
        }
        pos += 64 * entry_size;

        tables.push((table_id, QuantTable::new(values)));
    }

    Ok(tables)
}

/// Write a DQT marker segment (including 0xFFDB marker and length).
///
/// Values must fit in 8 bits, which every quality-scaled table does.
pub fn write_dqt(out: &mut Vec<u8>, table_id: u8, qt: &QuantTable) {
    debug_assert!(qt.values.iter().all(|&v| (1..=255).contains(&v)));
    let mut payload = Vec::with_capacity(65);
    payload.push(table_id & 0x0F);
    payload.extend(ZIGZAG_TO_NATURAL.iter().map(|&ni| qt.values[ni] as u8));
    write_segment(out, DQT, &payload);
}

/// Parse a DHT marker segment body (after the 2-byte length).
pub fn parse_dht(data: &[u8]) -> Result<Vec<HuffmanSpec>> {
    let mut specs = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let tc_th = data[pos];
        pos += 1;
        let class = match tc_th >> 4 {
            0 => TableClass::Dc,
            1 => TableClass::Ac,
            _ => return Err(JpegError::InvalidMarkerData("Huffman table class out of range")),
        };
        let id = tc_th & 0x0F;
        if id > 3 {
            return Err(JpegError::InvalidMarkerData("Huffman table ID out of range"));
        }

        if pos + 16 > data.len() {
            return Err(JpegError::InvalidMarkerData("DHT code counts truncated"));
        }
        let mut bits = [0u8; 16];
        bits.copy_from_slice(&data[pos..pos + 16]);
        pos += 16;

        let total: usize = bits.iter().map(|&b| b as usize).sum();
        if pos + total > data.len() {
            return Err(JpegError::InvalidMarkerData("DHT symbol list truncated"));
        }
        specs.push(HuffmanSpec::new(class, id, bits, &data[pos..pos + total]));
        pos += total;
    }

    Ok(specs)
}

/// Write a DHT marker segment (including 0xFFC4 marker and length).
pub fn write_dht(out: &mut Vec<u8>, spec: &HuffmanSpec) {
    let mut payload = Vec::with_capacity(17 + spec.huffval.len());
    payload.push(((spec.class as u8) << 4) | (spec.id & 0x0F));
    payload.extend_from_slice(&spec.bits);
    payload.extend_from_slice(&spec.huffval);
    write_segment(out, DHT, &payload);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::quant::STD_LUMA_QUANT;

    #[test]
    fn parse_8bit_dqt() {
        let mut body = vec![0x00u8]; // pq=0, tq=0
        for i in 0..64u8 {
            body.push(i + 1);
        }
        let tables = parse_dqt(&body).unwrap();
        assert_eq!(tables.len(), 1);
        let (id, qt) = &tables[0];
        assert_eq!(*id, 0);
        assert_eq!(qt.values[0], 1);
        assert_eq!(qt.values[1], 2);
        assert_eq!(qt.values[8], 3);
    }

    #[test]
    fn parse_16bit_dqt() {
        let mut body = vec![0x11u8]; // pq=1, tq=1
        for i in 0..64u16 {
            body.extend_from_slice(&(300 + i).to_be_bytes());
        }
        let tables = parse_dqt(&body).unwrap();
        assert_eq!(tables[0].0, 1);
        assert_eq!(tables[0].1.values[8], 302);
    }

    #[test]
    fn dqt_roundtrip_is_zigzag_on_the_wire() {
        let qt = QuantTable::new(STD_LUMA_QUANT);
        let mut written = Vec::new();
        write_dqt(&mut written, 1, &qt);
        assert_eq!(&written[..5], &[0xFF, 0xDB, 0x00, 0x43, 0x01]);
        // zigzag order: 16, 11, 12, 14, 12, 10, ...
        assert_eq!(&written[5..11], &[16, 11, 12, 14, 12, 10]);

        let tables = parse_dqt(&written[4..]).unwrap();
        assert_eq!(tables, vec![(1, qt)]);
    }

    #[test]
    fn two_tables_in_one_segment() {
        let mut body = vec![0x00u8];
        body.extend(std::iter::repeat(1u8).take(64));
        body.push(0x01);
        body.extend(std::iter::repeat(2u8).take(64));
        let tables = parse_dqt(&body).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].0, 1);
        assert!(tables[1].1.values.iter().all(|&v| v == 2));
    }

    #[test]
    fn bad_dqt_rejected() {
        assert!(parse_dqt(&[0x00, 1, 2, 3]).is_err());
        assert!(parse_dqt(&[0x04]).is_err());
        let mut zeros = vec![0x00u8];
        zeros.extend([0u8; 64]);
        assert!(parse_dqt(&zeros).is_err());
        assert!(matches!(
            parse_dqt(&[0x20]),
            Err(JpegError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn parse_dht_basic() {
        let mut body = vec![0x00u8];
        let bits = [0u8, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
        body.extend_from_slice(&bits);
        let vals: Vec<u8> = (0..12).collect();
        body.extend_from_slice(&vals);

        let specs = parse_dht(&body).unwrap();
        assert_eq!(specs, vec![HuffmanSpec::std_dc_luma()]);
    }

    #[test]
    fn dht_roundtrip() {
        let spec = HuffmanSpec::std_ac_chroma();
        let mut written = Vec::new();
        write_dht(&mut written, &spec);
        assert_eq!(&written[..5], &[0xFF, 0xC4, 0x00, 0xB5, 0x11]);
        let specs = parse_dht(&written[4..]).unwrap();
        assert_eq!(specs, vec![spec]);
    }

    #[test]
    fn bad_dht_rejected() {
        assert!(parse_dht(&[0x20]).is_err());
        assert!(parse_dht(&[0x05]).is_err());
        assert!(parse_dht(&[0x00, 1, 0, 0]).is_err());
        let mut body = vec![0x10u8, 0, 2];
        body.extend([0u8; 14]);
        body.push(0x01); // only one of two symbols present
        assert!(parse_dht(&body).is_err());
    }
}
