// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Baseline JPEG encoder.
//!
//! Writes SOI, APP0/JFIF, two DQT segments, SOF0, four DHT segments (the
//! standard T.81 Annex K tables), an optional DRI, SOS, the entropy-coded
//! scan and EOI. Every component is sampled 1x1, so each MCU is exactly one
//! Y, one Cb and one Cr block.

use log::debug;

use super::bitio::BitWriter;
use super::color::rgb_to_ycbcr;
use super::dct::{forward_dct, Samples};
use super::entropy::{encode_block, DcPredictors};
use super::error::{JpegError, Result};
use super::frame::{write_sof0, write_sos, Component, FrameInfo, ScanComponent};
use super::huffman::{HuffmanEncodeTable, HuffmanSpec};
use super::marker::{self, write_app0_jfif, write_dri, write_marker};
use super::quant::QuantTable;
use super::tables::{write_dht, write_dqt};
use crate::image::PixelBuffer;

/// Default quality used when the caller does not choose one.
pub const DEFAULT_QUALITY: u8 = 85;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Quality factor, 1 (smallest) to 100 (best). Values outside are rejected.
    pub quality: u8,
    /// MCUs between restart markers; 0 disables restart markers.
    pub restart_interval: u16,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            restart_interval: 0,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_restart_interval(mut self, interval: u16) -> Self {
        self.restart_interval = interval;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(JpegError::InvalidArgument(format!(
                "quality must be in 1..=100, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Per-component encoding state: which quant table and Huffman tables apply.
struct ComponentCoder<'a> {
    quant: &'a QuantTable,
    dc: &'a HuffmanEncodeTable,
    ac: &'a HuffmanEncodeTable,
}

/// Encode an RGBA image as a baseline JPEG. Alpha is ignored.
pub fn encode(image: &PixelBuffer, options: &EncodeOptions) -> Result<Vec<u8>> {
    options.validate()?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(JpegError::InvalidArgument(format!(
            "image dimensions must be non-zero, got {width}x{height}"
        )));
    }
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(JpegError::InvalidArgument(format!(
            "image dimensions exceed 65535, got {width}x{height}"
        )));
    }

    let luma_q = QuantTable::luma(options.quality)?;
    let chroma_q = QuantTable::chroma(options.quality)?;
    let specs = [
        HuffmanSpec::std_dc_luma(),
        HuffmanSpec::std_dc_chroma(),
        HuffmanSpec::std_ac_luma(),
        HuffmanSpec::std_ac_chroma(),
    ];
    let dc_luma = HuffmanEncodeTable::from_spec(&specs[0])?;
    let dc_chroma = HuffmanEncodeTable::from_spec(&specs[1])?;
    let ac_luma = HuffmanEncodeTable::from_spec(&specs[2])?;
    let ac_chroma = HuffmanEncodeTable::from_spec(&specs[3])?;

    let frame = FrameInfo {
        height: height as u16,
        width: width as u16,
        components: vec![
            Component { id: 1, quant_table_id: 0 },
            Component { id: 2, quant_table_id: 1 },
            Component { id: 3, quant_table_id: 1 },
        ],
    };
    let scan = [
        ScanComponent { comp_idx: 0, dc_table: 0, ac_table: 0 },
        ScanComponent { comp_idx: 1, dc_table: 1, ac_table: 1 },
        ScanComponent { comp_idx: 2, dc_table: 1, ac_table: 1 },
    ];

    let mut out = Vec::new();
    write_marker(&mut out, marker::SOI);
    write_app0_jfif(&mut out);
    write_dqt(&mut out, 0, &luma_q);
    write_dqt(&mut out, 1, &chroma_q);
    write_sof0(&mut out, &frame);
    for spec in &specs {
        write_dht(&mut out, spec);
    }
    if options.restart_interval > 0 {
        write_dri(&mut out, options.restart_interval);
    }
    write_sos(&mut out, &frame, &scan);
    let header_len = out.len();

    let coders = [
        ComponentCoder { quant: &luma_q, dc: &dc_luma, ac: &ac_luma },
        ComponentCoder { quant: &chroma_q, dc: &dc_chroma, ac: &ac_chroma },
        ComponentCoder { quant: &chroma_q, dc: &dc_chroma, ac: &ac_chroma },
    ];
    let scan_data = encode_scan(image, &frame, &coders, options.restart_interval)?;
    out.extend_from_slice(&scan_data);
    write_marker(&mut out, marker::EOI);

    debug!(
        "encoded {width}x{height} at quality {}: {} header + {} scan bytes",
        options.quality,
        header_len,
        scan_data.len()
    );
    Ok(out)
}

/// Entropy-code every MCU in raster order.
fn encode_scan(
    image: &PixelBuffer,
    frame: &FrameInfo,
    coders: &[ComponentCoder; 3],
    restart_interval: u16,
) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    let mut preds = DcPredictors::new(coders.len());
    let mut mcu_count = 0usize;
    let mut restart_count = 0u8;

    for block_row in 0..frame.blocks_tall() {
        for block_col in 0..frame.blocks_wide() {
            if restart_interval > 0 && mcu_count > 0 && mcu_count % (restart_interval as usize) == 0 {
                writer.write_marker(marker::RST0 + restart_count);
                restart_count = (restart_count + 1) % 8;
                preds.reset();
            }

            let planes = load_mcu(image, block_row, block_col);
            for (ci, (coder, samples)) in coders.iter().zip(planes.iter()).enumerate() {
                let quantized = coder.quant.quantize(&forward_dct(samples));
                encode_block(&mut writer, &quantized, preds.get_mut(ci), coder.dc, coder.ac)?;
            }
            mcu_count += 1;
        }
    }

    Ok(writer.into_bytes())
}

/// Colour-convert one 8×8 MCU into level-shifted Y, Cb and Cr blocks.
///
/// Pixels past the right or bottom edge replicate the last column / row.
fn load_mcu(image: &PixelBuffer, block_row: usize, block_col: usize) -> [Samples; 3] {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let data = image.data();
    let mut planes = [[0.0f64; 64]; 3];

    for y in 0..8 {
        let py = (block_row * 8 + y).min(height - 1);
        for x in 0..8 {
            let px = (block_col * 8 + x).min(width - 1);
            let i = (py * width + px) * 4;
            let (luma, cb, cr) = rgb_to_ycbcr(data[i], data[i + 1], data[i + 2]);
            planes[0][y * 8 + x] = luma;
            planes[1][y * 8 + x] = cb;
            planes[2][y * 8 + x] = cr;
        }
    }
    planes
}
