// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! 8×8 forward and inverse DCT.
//!
//! Straightforward separable floating-point DCT-II / DCT-III with the
//! orthonormal JPEG scaling. Inputs to [`forward_dct`] are level-shifted
//! samples (roughly -128..=127); [`inverse_dct`] returns level-shifted
//! samples that the caller re-centres, rounds and clamps. Samples stay in
//! floating point on both sides so the only loss in the pipeline is the
//! quantizer.

use std::sync::OnceLock;

/// One 8×8 block of quantized coefficients in natural (row-major) order.
pub type Block = [i32; 64];

/// One 8×8 block of real values in natural order: level-shifted samples
/// before [`forward_dct`] / after [`inverse_dct`], or unquantized
/// frequency coefficients in between.
pub type Samples = [f64; 64];

/// `COSINE[u][x] = C(u) * cos((2x + 1) * u * PI / 16)` with
/// C(0) = 1/sqrt(8) and C(u>0) = 1/2.
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for (u, row) in table.iter_mut().enumerate() {
            let norm = if u == 0 { 1.0 / 8f64.sqrt() } else { 0.5 };
            for (x, c) in row.iter_mut().enumerate() {
                *c = norm * ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

/// Forward 2D DCT of a block of level-shifted samples.
pub fn forward_dct(samples: &Samples) -> Samples {
    let cos = cosine_table();

    // Rows.
    let mut temp = [0.0f64; 64];
    for row in 0..8 {
        for u in 0..8 {
            let mut sum = 0.0;
            for x in 0..8 {
                sum += samples[row * 8 + x] * cos[u][x];
            }
            temp[row * 8 + u] = sum;
        }
    }

    // Columns.
    let mut coeffs = [0.0f64; 64];
    for col in 0..8 {
        for v in 0..8 {
            let mut sum = 0.0;
            for y in 0..8 {
                sum += temp[y * 8 + col] * cos[v][y];
            }
            coeffs[v * 8 + col] = sum;
        }
    }
    coeffs
}

/// Inverse 2D DCT. Output samples are still level-shifted.
pub fn inverse_dct(coeffs: &Samples) -> Samples {
    let cos = cosine_table();

    // Columns.
    let mut temp = [0.0f64; 64];
    for col in 0..8 {
        for y in 0..8 {
            let mut sum = 0.0;
            for v in 0..8 {
                sum += coeffs[v * 8 + col] * cos[v][y];
            }
            temp[y * 8 + col] = sum;
        }
    }

    // Rows.
    let mut samples = [0.0f64; 64];
    for row in 0..8 {
        for x in 0..8 {
            let mut sum = 0.0;
            for u in 0..8 {
                sum += temp[row * 8 + u] * cos[u][x];
            }
            samples[row * 8 + x] = sum;
        }
    }
    samples
}
