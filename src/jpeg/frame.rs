// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Frame (SOF0) and scan (SOS) headers.
//!
//! Only the baseline 4:4:4 subset is accepted: 8-bit precision, one
//! (grayscale) or three (YCbCr) components, every component sampled 1x1,
//! and a single interleaved scan covering the full spectrum.

use byteorder::{BigEndian, ByteOrder};

use super::error::{JpegError, Result};
use super::marker::{write_segment, SOF0, SOS};

/// Information about one image component from SOF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component ID (typically 1=Y, 2=Cb, 3=Cr).
    pub id: u8,
    /// Quantization table ID (0–3).
    pub quant_table_id: u8,
}

/// Frame information parsed from a SOF0 marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    pub height: u16,
    pub width: u16,
    pub components: Vec<Component>,
}

impl FrameInfo {
    /// Number of 8×8 blocks per row (partial edge blocks included).
    pub fn blocks_wide(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Number of 8×8 block rows.
    pub fn blocks_tall(&self) -> usize {
        (self.height as usize).div_ceil(8)
    }

    /// MCU count; with 1x1 sampling each MCU holds one block per component.
    pub fn mcu_count(&self) -> usize {
        self.blocks_wide() * self.blocks_tall()
    }
}

/// Parse a SOF0 marker segment body (after the 2-byte length).
pub fn parse_sof0(data: &[u8]) -> Result<FrameInfo> {
    if data.len() < 6 {
        return Err(JpegError::InvalidMarkerData("SOF0 header too short"));
    }

    let precision = data[0];
    if precision != 8 {
        return Err(JpegError::UnsupportedFeature("sample precision other than 8 bits"));
    }
    let height = BigEndian::read_u16(&data[1..3]);
    let width = BigEndian::read_u16(&data[3..5]);
    let num_components = data[5] as usize;

    if height == 0 {
        return Err(JpegError::UnsupportedFeature("height defined by DNL marker"));
    }
    if width == 0 {
        return Err(JpegError::InvalidMarkerData("zero image width"));
    }
    if num_components != 1 && num_components != 3 {
        return Err(JpegError::UnsupportedFeature("component count other than 1 or 3"));
    }
    if data.len() < 6 + num_components * 3 {
        return Err(JpegError::InvalidMarkerData("SOF0 component list truncated"));
    }

    let mut components: Vec<Component> = Vec::with_capacity(num_components);
    for chunk in data[6..6 + num_components * 3].chunks_exact(3) {
        let (id, sampling, quant_table_id) = (chunk[0], chunk[1], chunk[2]);
        if sampling != 0x11 {
            return Err(JpegError::UnsupportedFeature("chroma subsampling"));
        }
        if quant_table_id > 3 {
            return Err(JpegError::InvalidMarkerData("quantization table ID out of range"));
        }
        if components.iter().any(|c| c.id == id) {
            return Err(JpegError::InvalidMarkerData("duplicate component ID"));
        }
        components.push(Component { id, quant_table_id });
    }

    Ok(FrameInfo {
        height,
        width,
        components,
    })
}

/// Write a SOF0 segment: precision 8, every component 1x1-sampled.
pub fn write_sof0(out: &mut Vec<u8>, frame: &FrameInfo) {
    let mut payload = Vec::with_capacity(6 + frame.components.len() * 3);
    payload.push(8);
    payload.extend_from_slice(&frame.height.to_be_bytes());
    payload.extend_from_slice(&frame.width.to_be_bytes());
    payload.push(frame.components.len() as u8);
    for c in &frame.components {
        payload.extend_from_slice(&[c.id, 0x11, c.quant_table_id]);
    }
    write_segment(out, SOF0, &payload);
}

/// Component selector for one scan component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanComponent {
    /// Index into FrameInfo.components.
    pub comp_idx: usize,
    /// DC Huffman table ID.
    pub dc_table: usize,
    /// AC Huffman table ID.
    pub ac_table: usize,
}

/// Parse an SOS header against the frame it belongs to.
///
/// The scan must interleave every frame component in frame order, cover
/// spectral range 0..=63 and use no successive approximation.
pub fn parse_sos(data: &[u8], frame: &FrameInfo) -> Result<Vec<ScanComponent>> {
    if data.is_empty() {
        return Err(JpegError::InvalidMarkerData("empty SOS"));
    }
    let num_components = data[0] as usize;
    if data.len() < 1 + num_components * 2 + 3 {
        return Err(JpegError::InvalidMarkerData("SOS header truncated"));
    }
    if num_components != frame.components.len() {
        return Err(JpegError::UnsupportedFeature("non-interleaved scan"));
    }

    let mut selectors = Vec::with_capacity(num_components);
    for chunk in data[1..1 + num_components * 2].chunks_exact(2) {
        let comp_id = chunk[0];
        let comp_idx = frame
            .components
            .iter()
            .position(|c| c.id == comp_id)
            .ok_or(JpegError::InvalidMarkerData("SOS references unknown component"))?;
        if comp_idx != selectors.len() {
            return Err(JpegError::UnsupportedFeature("scan component order differs from frame"));
        }
        let dc_table = (chunk[1] >> 4) as usize;
        let ac_table = (chunk[1] & 0x0F) as usize;
        if dc_table > 3 || ac_table > 3 {
            return Err(JpegError::InvalidMarkerData("Huffman table ID out of range"));
        }
        selectors.push(ScanComponent {
            comp_idx,
            dc_table,
            ac_table,
        });
    }

    let params = &data[1 + num_components * 2..];
    let (ss, se, ah_al) = (params[0], params[1], params[2]);
    if ss != 0 || se != 63 || ah_al != 0 {
        return Err(JpegError::UnsupportedFeature("spectral selection or successive approximation"));
    }

    Ok(selectors)
}

/// Write an SOS segment: full spectrum, no successive approximation.
pub fn write_sos(out: &mut Vec<u8>, frame: &FrameInfo, scan: &[ScanComponent]) {
    let mut payload = Vec::with_capacity(4 + scan.len() * 2);
    payload.push(scan.len() as u8);
    for sc in scan {
        payload.push(frame.components[sc.comp_idx].id);
        payload.push(((sc.dc_table as u8) << 4) | sc.ac_table as u8);
    }
    payload.extend_from_slice(&[0, 63, 0]);
    write_segment(out, SOS, &payload);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ycbcr_frame(width: u16, height: u16) -> FrameInfo {
        FrameInfo {
            height,
            width,
            components: vec![
                Component { id: 1, quant_table_id: 0 },
                Component { id: 2, quant_table_id: 1 },
                Component { id: 3, quant_table_id: 1 },
            ],
        }
    }

    #[test]
    fn parse_ycbcr_444() {
        let data = [
            8, 1, 0xE0, 2, 0x80, 3, // precision, height=480, width=640, 3 comps
            1, 0x11, 0, //
            2, 0x11, 1, //
            3, 0x11, 1, //
        ];
        let fi = parse_sof0(&data).unwrap();
        assert_eq!(fi, ycbcr_frame(640, 480));
        assert_eq!(fi.blocks_wide(), 80);
        assert_eq!(fi.blocks_tall(), 60);
    }

    #[test]
    fn sof0_roundtrip() {
        let fi = ycbcr_frame(13, 7);
        let mut out = Vec::new();
        write_sof0(&mut out, &fi);
        assert_eq!(&out[..4], &[0xFF, 0xC0, 0x00, 17]);
        assert_eq!(parse_sof0(&out[4..]).unwrap(), fi);
    }

    #[test]
    fn non_aligned_block_counts() {
        let fi = ycbcr_frame(10, 17);
        assert_eq!(fi.blocks_wide(), 2);
        assert_eq!(fi.blocks_tall(), 3);
        assert_eq!(fi.mcu_count(), 6);
    }

    #[test]
    fn parse_grayscale() {
        let data = [8, 0, 64, 0, 64, 1, 1, 0x11, 0];
        let fi = parse_sof0(&data).unwrap();
        assert_eq!(fi.components.len(), 1);
        assert_eq!(fi.mcu_count(), 64);
    }

    #[test]
    fn reject_unsupported_frames() {
        let twelve_bit = [12, 0, 8, 0, 8, 1, 1, 0x11, 0];
        assert!(matches!(parse_sof0(&twelve_bit), Err(JpegError::UnsupportedFeature(_))));

        let four_comps = [8, 0, 8, 0, 8, 4, 1, 0x11, 0, 2, 0x11, 0, 3, 0x11, 0, 4, 0x11, 0];
        assert!(matches!(parse_sof0(&four_comps), Err(JpegError::UnsupportedFeature(_))));

        let subsampled = [8, 0, 8, 0, 8, 3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1];
        assert!(matches!(parse_sof0(&subsampled), Err(JpegError::UnsupportedFeature(_))));

        let truncated = [8, 0, 8, 0, 8, 3, 1, 0x11];
        assert!(matches!(parse_sof0(&truncated), Err(JpegError::InvalidMarkerData(_))));
    }

    #[test]
    fn sos_roundtrip() {
        let fi = ycbcr_frame(8, 8);
        let scan = vec![
            ScanComponent { comp_idx: 0, dc_table: 0, ac_table: 0 },
            ScanComponent { comp_idx: 1, dc_table: 1, ac_table: 1 },
            ScanComponent { comp_idx: 2, dc_table: 1, ac_table: 1 },
        ];
        let mut out = Vec::new();
        write_sos(&mut out, &fi, &scan);
        assert_eq!(
            out,
            vec![0xFF, 0xDA, 0x00, 12, 3, 1, 0x00, 2, 0x11, 3, 0x11, 0, 63, 0]
        );
        assert_eq!(parse_sos(&out[4..], &fi).unwrap(), scan);
    }

    #[test]
    fn sos_rejects_progressive_params_and_unknown_ids() {
        let fi = ycbcr_frame(8, 8);
        let progressive = [3, 1, 0x00, 2, 0x11, 3, 0x11, 0, 0, 0];
        assert!(matches!(parse_sos(&progressive, &fi), Err(JpegError::UnsupportedFeature(_))));

        let unknown = [3, 1, 0x00, 9, 0x11, 3, 0x11, 0, 63, 0];
        assert!(matches!(parse_sos(&unknown, &fi), Err(JpegError::InvalidMarkerData(_))));

        let single = [1, 1, 0x00, 0, 63, 0];
        assert!(matches!(parse_sos(&single, &fi), Err(JpegError::UnsupportedFeature(_))));
    }
}
