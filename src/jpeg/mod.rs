// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Pure-Rust baseline JPEG codec for RGBA pixel buffers.
//!
//! Encodes to and decodes from baseline sequential JPEG with the standard
//! Annex K quantization and Huffman tables and no chroma subsampling.
//!
//! Supports:
//! - Baseline sequential DCT (SOF0), 8-bit precision
//! - YCbCr (3 components) on write; YCbCr and grayscale on read
//! - 4:4:4 sampling only (every component 1x1)
//! - Restart markers (DRI/RST) on read and write
//! - 8-bit and 16-bit DQT entries on read
//! - Images whose dimensions are not multiples of 8
//!
//! Does NOT support:
//! - Progressive, lossless, hierarchical or arithmetic-coded frames
//!   (rejected at parse time)
//! - Chroma subsampling and 12-bit precision (rejected at parse time)
//! - Optimized Huffman tables, EXIF or ICC handling

pub mod error;
pub mod zigzag;
pub mod dct;
pub mod quant;
pub mod color;
pub mod bitio;
pub mod huffman;
pub mod entropy;
pub mod marker;
pub mod tables;
pub mod frame;
pub mod encoder;
pub mod decoder;

pub use decoder::{decode, read_info, ImageInfo};
pub use encoder::{encode, EncodeOptions, DEFAULT_QUALITY};
pub use error::{JpegError, Result};
