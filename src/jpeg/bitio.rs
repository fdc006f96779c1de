// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit-level I/O for JPEG entropy-coded data.
//!
//! Provides [`BitReader`] for decoding and [`BitWriter`] for encoding the
//! entropy-coded scan data. Both handle JPEG byte-stuffing (0xFF -> 0xFF 0x00)
//! and operate in MSB-first bit order.
//!
//! The final partial byte of a scan is padded with 1-bits. Pad bits carry no
//! data: the reader only ever pulls the bits a Huffman code or magnitude
//! field asks for, and the marker that follows the scan ends it.

use super::error::{JpegError, Result};

/// Bit-level reader for JPEG entropy-coded data.
///
/// A 0xFF 0x00 pair yields one 0xFF data byte. A 0xFF followed by anything
/// else is a marker: the reader stops in front of it without consuming it.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Bit buffer, valid bits are the low `bits_left` bits.
    buf: u32,
    bits_left: u8,
    /// Set when a marker (0xFF followed by a non-zero byte) stops the stream.
    marker_found: Option<u8>,
}

impl<'a> BitReader<'a> {
    /// Create a reader over `data`, starting at byte offset `pos`
    /// (the first entropy-coded byte after the SOS header).
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos,
            buf: 0,
            bits_left: 0,
            marker_found: None,
        }
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.bits_left == 0 {
            self.fill_byte()?;
        }
        self.bits_left -= 1;
        Ok(((self.buf >> self.bits_left) & 1) as u8)
    }

    /// Read `count` bits (0–16) and return them right-aligned.
    pub fn read_bits(&mut self, count: u8) -> Result<u16> {
        debug_assert!(count <= 16);
        if count == 0 {
            return Ok(0);
        }
        while self.bits_left < count {
            self.fill_byte()?;
        }
        self.bits_left -= count;
        let val = (self.buf >> self.bits_left) & ((1u32 << count) - 1);
        self.buf &= (1u32 << self.bits_left) - 1;
        Ok(val as u16)
    }

    /// Discard the remaining bits of the current byte.
    pub fn byte_align(&mut self) {
        self.bits_left = 0;
        self.buf = 0;
    }

    /// Current byte position in the underlying data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The marker byte that stopped the stream, if any.
    pub fn marker_found(&self) -> Option<u8> {
        self.marker_found
    }

    /// Byte-align and consume an RST0–RST7 marker, returning its index (0–7).
    ///
    /// Fill bytes (extra 0xFF) in front of the marker are skipped.
    pub fn read_restart_marker(&mut self) -> Result<u8> {
        self.byte_align();
        while self.pos + 1 < self.data.len() && self.data[self.pos] == 0xFF {
            let next = self.data[self.pos + 1];
            if next == 0xFF {
                self.pos += 1;
                continue;
            }
            if (next & 0xF8) == 0xD0 {
                self.pos += 2;
                self.marker_found = None;
                return Ok(next & 0x07);
            }
            break;
        }
        if self.pos + 1 >= self.data.len() {
            return Err(JpegError::UnexpectedEndOfData);
        }
        Err(JpegError::MalformedEntropyStream("expected restart marker"))
    }

    fn fill_byte(&mut self) -> Result<()> {
        if self.marker_found.is_some() || self.pos >= self.data.len() {
            return Err(JpegError::UnexpectedEndOfData);
        }
        let byte = self.data[self.pos];

        if byte == 0xFF {
            if self.pos + 1 >= self.data.len() {
                return Err(JpegError::UnexpectedEndOfData);
            }
            let next = self.data[self.pos + 1];
            if next != 0x00 {
                // Leave the marker in place for the caller.
                self.marker_found = Some(next);
                return Err(JpegError::UnexpectedEndOfData);
            }
            self.pos += 2;
        } else {
            self.pos += 1;
        }

        self.buf = (self.buf << 8) | (byte as u32);
        self.bits_left += 8;
        Ok(())
    }
}

/// Bit-level writer for JPEG entropy-coded data.
///
/// Bits accumulate in an integer register; every completed byte is emitted
/// immediately, followed by a stuffed 0x00 when it is 0xFF.
#[derive(Default)]
pub struct BitWriter {
    output: Vec<u8>,
    /// Pending bits, right-aligned. Always fewer than 8 between calls.
    acc: u32,
    bits_used: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the low `count` bits (0–16) of `value`, MSB-first.
    pub fn write_bits(&mut self, value: u16, count: u8) {
        debug_assert!(count <= 16);
        if count == 0 {
            return;
        }
        let mask = (1u32 << count) - 1;
        self.acc = (self.acc << count) | (value as u32 & mask);
        self.bits_used += count;
        while self.bits_used >= 8 {
            self.bits_used -= 8;
            let byte = (self.acc >> self.bits_used) as u8;
            self.emit_byte(byte);
        }
        self.acc &= (1u32 << self.bits_used) - 1;
    }

    /// Pad the partial byte with 1-bits and emit it. No-op when byte-aligned.
    pub fn flush(&mut self) {
        if self.bits_used > 0 {
            let remaining = 8 - self.bits_used;
            self.write_bits((1u16 << remaining) - 1, remaining);
        }
    }

    /// Flush and append a raw (unstuffed) marker, e.g. RSTn between intervals.
    pub fn write_marker(&mut self, marker: u8) {
        self.flush();
        self.output.push(0xFF);
        self.output.push(marker);
    }

    /// Number of bits waiting for the next byte boundary.
    pub fn pending_bits(&self) -> u8 {
        self.bits_used
    }

    /// Flush and return the encoded bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.output
    }

    fn emit_byte(&mut self, byte: u8) {
        self.output.push(byte);
        if byte == 0xFF {
            self.output.push(0x00);
        }
    }
}
