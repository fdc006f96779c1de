// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Baseline JPEG decoder.
//!
//! Walks the header segments up to SOS, collecting quantization tables,
//! Huffman tables, the frame header and the restart interval, then decodes
//! the single interleaved scan MCU by MCU and reconstructs RGBA pixels.

use log::{debug, trace};

use super::bitio::BitReader;
use super::color::{clamp_sample, ycbcr_to_rgb};
use super::dct::{inverse_dct, Samples};
use super::entropy::{decode_block, DcPredictors};
use super::error::{JpegError, Result};
use super::frame::{parse_sof0, parse_sos, FrameInfo, ScanComponent};
use super::huffman::{HuffmanDecodeTable, HuffmanSpec, TableClass};
use super::marker::{self, iterate_markers, parse_dri, MarkerReader};
use super::quant::QuantTable;
use super::tables::{parse_dht, parse_dqt};
use crate::image::PixelBuffer;

/// Image properties available from the frame header alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u16,
    pub height: u16,
    /// 1 for grayscale, 3 for YCbCr.
    pub components: u8,
}

/// Read the image dimensions without decoding any scan data.
///
/// Stops at the first SOF0; fails if SOS or EOI comes first.
pub fn read_info(data: &[u8]) -> Result<ImageInfo> {
    let mut reader = MarkerReader::new(data)?;
    loop {
        let segment = reader.next_segment()?;
        match segment.marker {
            marker::SOF0 => {
                let frame = parse_sof0(segment.data)?;
                return Ok(ImageInfo {
                    width: frame.width,
                    height: frame.height,
                    components: frame.components.len() as u8,
                });
            }
            marker::SOS | marker::EOI => {
                return Err(JpegError::InvalidMarkerData("no SOF0 before scan"));
            }
            _ => {}
        }
    }
}

/// Everything the header walk collects before the scan starts.
#[derive(Default)]
struct Header {
    quant_tables: [Option<QuantTable>; 4],
    dc_specs: [Option<HuffmanSpec>; 4],
    ac_specs: [Option<HuffmanSpec>; 4],
    frame: Option<FrameInfo>,
    restart_interval: u16,
}

impl Header {
    fn store_huffman(&mut self, spec: HuffmanSpec) {
        let id = spec.id as usize;
        match spec.class {
            TableClass::Dc => self.dc_specs[id] = Some(spec),
            TableClass::Ac => self.ac_specs[id] = Some(spec),
        }
    }
}

/// Per-component decoding state resolved from the scan header.
struct ComponentDecoder<'a> {
    quant: &'a QuantTable,
    dc: HuffmanDecodeTable,
    ac: HuffmanDecodeTable,
}

/// Decode a baseline JPEG into an RGBA buffer with alpha 255.
pub fn decode(data: &[u8]) -> Result<PixelBuffer> {
    let (segments, scan_start) = iterate_markers(data)?;

    let mut header = Header::default();
    let mut scan: Option<Vec<ScanComponent>> = None;
    for segment in &segments {
        match segment.marker {
            marker::DQT => {
                for (id, table) in parse_dqt(segment.data)? {
                    header.quant_tables[id as usize] = Some(table);
                }
            }
            marker::DHT => {
                for spec in parse_dht(segment.data)? {
                    header.store_huffman(spec);
                }
            }
            marker::SOF0 => {
                if header.frame.is_some() {
                    return Err(JpegError::InvalidMarkerData("multiple SOF0 segments"));
                }
                header.frame = Some(parse_sof0(segment.data)?);
            }
            marker::DRI => header.restart_interval = parse_dri(segment.data)?,
            marker::SOS => {
                let frame = header
                    .frame
                    .as_ref()
                    .ok_or(JpegError::InvalidMarkerData("SOS before SOF0"))?;
                scan = Some(parse_sos(segment.data, frame)?);
            }
            marker::EOI => return Err(JpegError::InvalidMarkerData("EOI before scan")),
            // APPn, COM and anything else unrecognised are skipped by length.
            _ => {}
        }
    }

    let frame = header
        .frame
        .as_ref()
        .ok_or(JpegError::InvalidMarkerData("missing SOF0"))?;
    let scan = scan.ok_or(JpegError::InvalidMarkerData("missing SOS"))?;

    let mut decoders = Vec::with_capacity(scan.len());
    for sc in &scan {
        let component = &frame.components[sc.comp_idx];
        let quant = header.quant_tables[component.quant_table_id as usize]
            .as_ref()
            .ok_or(JpegError::InvalidMarkerData("scan references undefined quantization table"))?;
        let dc = header.dc_specs[sc.dc_table]
            .as_ref()
            .ok_or(JpegError::InvalidMarkerData("scan references undefined DC Huffman table"))?;
        let ac = header.ac_specs[sc.ac_table]
            .as_ref()
            .ok_or(JpegError::InvalidMarkerData("scan references undefined AC Huffman table"))?;
        decoders.push(ComponentDecoder {
            quant,
            dc: HuffmanDecodeTable::from_spec(dc)?,
            ac: HuffmanDecodeTable::from_spec(ac)?,
        });
    }

    let image = decode_scan(data, scan_start, frame, &decoders, header.restart_interval)?;
    debug!(
        "decoded {}x{} ({} component(s), restart interval {}) from {} bytes",
        frame.width,
        frame.height,
        frame.components.len(),
        header.restart_interval,
        data.len()
    );
    Ok(image)
}

/// Decode every MCU of the scan and write the cropped pixels.
fn decode_scan(
    data: &[u8],
    scan_start: usize,
    frame: &FrameInfo,
    decoders: &[ComponentDecoder],
    restart_interval: u16,
) -> Result<PixelBuffer> {
    // Every block costs at least two Huffman codes (DC and EOB) of one bit or more.
    let min_bits = frame.mcu_count() * decoders.len() * 2;
    if data.len().saturating_sub(scan_start) * 8 < min_bits {
        return Err(JpegError::UnexpectedEndOfData);
    }

    let (width, height) = (frame.width as u32, frame.height as u32);
    let mut image = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
    let mut reader = BitReader::new(data, scan_start);
    let mut preds = DcPredictors::new(decoders.len());
    let mut mcu_count = 0usize;
    let mut expected_rst = 0u8;

    for block_row in 0..frame.blocks_tall() {
        for block_col in 0..frame.blocks_wide() {
            if restart_interval > 0 && mcu_count > 0 && mcu_count % (restart_interval as usize) == 0 {
                let index = reader.read_restart_marker()?;
                if index != expected_rst {
                    return Err(JpegError::MalformedEntropyStream("unexpected restart marker"));
                }
                trace!("RST{index} before MCU {mcu_count}");
                expected_rst = (expected_rst + 1) % 8;
                preds.reset();
            }

            let mut planes = [[0.0f64; 64]; 3];
            for (ci, dec) in decoders.iter().enumerate() {
                let block = decode_block(&mut reader, preds.get_mut(ci), &dec.dc, &dec.ac)?;
                planes[ci] = inverse_dct(&dec.quant.dequantize(&block));
            }
            store_mcu(&mut image, &planes[..decoders.len()], block_row, block_col);
            mcu_count += 1;
        }
    }

    Ok(image)
}

/// Colour-convert one MCU into the image, dropping samples past the edges.
fn store_mcu(image: &mut PixelBuffer, planes: &[Samples], block_row: usize, block_col: usize) {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let x0 = block_col * 8;
    let y0 = block_row * 8;

    for y in 0..8.min(height - y0) {
        for x in 0..8.min(width - x0) {
            let i = y * 8 + x;
            let (r, g, b) = match planes {
                [luma] => {
                    let v = clamp_sample(luma[i] + 128.0);
                    (v, v, v)
                }
                [luma, cb, cr] => ycbcr_to_rgb(luma[i], cb[i], cr[i]),
                _ => unreachable!("frame has 1 or 3 components"),
            };
            image.set_pixel((x0 + x) as u32, (y0 + y) as u32, [r, g, b, 255]);
        }
    }
}
