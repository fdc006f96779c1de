// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! JFIF RGB <-> YCbCr conversion.
//!
//! ```text
//! Y  =  0.299    * R + 0.587    * G + 0.114    * B - 128
//! Cb = -0.168736 * R - 0.331264 * G + 0.5      * B
//! Cr =  0.5      * R - 0.418688 * G - 0.081312 * B
//! ```
//!
//! All three outputs are centred on zero, ready for the DCT. The usual +128
//! chroma offset and the -128 level shift cancel, so neither appears.

/// Convert one RGB pixel to level-shifted (Y, Cb, Cr).
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b - 128.0;
    let cb = -0.168736 * r - 0.331264 * g + 0.5 * b;
    let cr = 0.5 * r - 0.418688 * g - 0.081312 * b;
    (y, cb, cr)
}

/// Convert level-shifted (Y, Cb, Cr) back to RGB, rounded and clamped.
#[inline]
pub fn ycbcr_to_rgb(y: f64, cb: f64, cr: f64) -> (u8, u8, u8) {
    let y = y + 128.0;
    let r = y + 1.402 * cr;
    let g = y - 0.344136 * cb - 0.714136 * cr;
    let b = y + 1.772 * cb;
    (clamp_sample(r), clamp_sample(g), clamp_sample(b))
}

/// Round a reconstructed sample and clamp it to 0..=255.
#[inline]
pub fn clamp_sample(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
