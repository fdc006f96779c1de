// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # mconv-jpeg
//!
//! Pure-Rust baseline JPEG encoder and decoder for RGBA pixel buffers, the
//! JPEG backend of the mconv image converter.
//!
//! Encoding converts RGB to YCbCr, runs an 8×8 DCT per block, quantizes with
//! the quality-scaled standard tables and Huffman-codes the result. Decoding
//! runs the same pipeline backwards and returns opaque RGBA.
//!
//! # Quick start
//!
//! ```rust
//! use mconv_jpeg::{decode, encode, EncodeOptions, PixelBuffer};
//!
//! let image = PixelBuffer::filled(16, 16, [200, 40, 40, 255]);
//! let jpeg = encode(&image, &EncodeOptions::default().with_quality(90)).unwrap();
//! let back = decode(&jpeg).unwrap();
//! assert_eq!((back.width(), back.height()), (16, 16));
//! ```

pub mod image;
pub mod jpeg;

pub use image::PixelBuffer;
pub use jpeg::{decode, encode, read_info, EncodeOptions, ImageInfo, JpegError, Result};
