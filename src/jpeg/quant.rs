// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Quantization tables and the quantize / dequantize steps.
//!
//! Tables are kept in natural (row-major) order; only the DQT serializer
//! in [`super::tables`] deals with zigzag order.

use super::dct::{Block, Samples};
use super::error::{JpegError, Result};

/// Standard luminance quantization table (ITU-T T.81 Table K.1), natural order.
pub const STD_LUMA_QUANT: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Standard chrominance quantization table (ITU-T T.81 Table K.2), natural order.
pub const STD_CHROMA_QUANT: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// Quantization table: 64 values in natural (row-major) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTable {
    /// Quantization values, indexed by row * 8 + col. Never zero.
    pub values: [u16; 64],
}

impl QuantTable {
    pub fn new(values: [u16; 64]) -> Self {
        Self { values }
    }

    /// Luminance table for `quality` (1–100).
    pub fn luma(quality: u8) -> Result<Self> {
        scale_quant_table(&STD_LUMA_QUANT, quality)
    }

    /// Chrominance table for `quality` (1–100).
    pub fn chroma(quality: u8) -> Result<Self> {
        scale_quant_table(&STD_CHROMA_QUANT, quality)
    }

    /// Quantize DCT coefficients: `round(coef / q)` per position.
    pub fn quantize(&self, coeffs: &Samples) -> Block {
        let mut out = [0i32; 64];
        for i in 0..64 {
            out[i] = (coeffs[i] / self.values[i] as f64).round() as i32;
        }
        out
    }

    /// Dequantize: `coef * q` per position.
    pub fn dequantize(&self, block: &Block) -> Samples {
        let mut out = [0.0f64; 64];
        for i in 0..64 {
            out[i] = block[i] as f64 * self.values[i] as f64;
        }
        out
    }
}

/// Scale a standard table by the IJG quality formula.
///
/// `quality < 50` uses `5000 / quality`, otherwise `200 - 2 * quality`;
/// each entry becomes `(std * scale + 50) / 100` clamped to 1..=255.
/// Quality 50 reproduces `std` exactly. Quality outside 1..=100 is rejected.
pub fn scale_quant_table(std: &[u16; 64], quality: u8) -> Result<QuantTable> {
    if !(1..=100).contains(&quality) {
        return Err(JpegError::InvalidArgument(format!(
            "quality must be in 1..=100, got {quality}"
        )));
    }
    let quality = quality as u32;
    let scale = if quality < 50 {
        5000 / quality
    } else {
        200 - 2 * quality
    };

    let mut values = [0u16; 64];
    for (v, &s) in values.iter_mut().zip(std.iter()) {
        *v = ((s as u32 * scale + 50) / 100).clamp(1, 255) as u16;
    }
    Ok(QuantTable::new(values))
}
