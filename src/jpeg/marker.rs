// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! JPEG marker segment framing.
//!
//! Reading walks the segments of a JPEG byte stream up to and including the
//! SOS header, returning the byte offset where entropy-coded scan data
//! begins. Writing emits marker codes and length-prefixed segments. All
//! container integers are big-endian and every length counts itself.

use byteorder::{BigEndian, ByteOrder};
use log::trace;

use super::error::{JpegError, Result};

/// JPEG marker constants (the byte after 0xFF).
pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOF0: u8 = 0xC0;
pub const DHT: u8 = 0xC4;
pub const DQT: u8 = 0xDB;
pub const DRI: u8 = 0xDD;
pub const SOS: u8 = 0xDA;
pub const APP0: u8 = 0xE0;
pub const COM: u8 = 0xFE;
pub const RST0: u8 = 0xD0;

/// One marker segment borrowed from the input.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    /// The marker byte (e.g., 0xDB for DQT). Does NOT include the 0xFF prefix.
    pub marker: u8,
    /// Payload after the 2-byte length field (empty for SOI/EOI/RSTn).
    pub data: &'a [u8],
    /// Byte offset of the marker's 0xFF in the input.
    pub offset: usize,
}

/// Sequential reader over the marker segments of a JPEG stream.
pub struct MarkerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MarkerReader<'a> {
    /// Check SOI and position the reader after it.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
            return Err(JpegError::InvalidSignature);
        }
        Ok(Self { data, pos: 2 })
    }

    /// Byte offset just past the last segment returned.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the next segment. Fill bytes (repeated 0xFF) are skipped.
    pub fn next_segment(&mut self) -> Result<Segment<'a>> {
        let data = self.data;
        let mut pos = self.pos;

        if pos >= data.len() {
            return Err(JpegError::UnexpectedEndOfData);
        }
        if data[pos] != 0xFF {
            return Err(JpegError::InvalidMarkerData("expected marker"));
        }
        while pos + 1 < data.len() && data[pos + 1] == 0xFF {
            pos += 1;
        }
        if pos + 1 >= data.len() {
            return Err(JpegError::UnexpectedEndOfData);
        }

        let offset = pos;
        let marker = data[pos + 1];
        pos += 2;

        if marker == EOI || marker == SOI || (RST0..=RST0 + 7).contains(&marker) {
            trace!("marker 0xFF{marker:02X} at {offset}");
            self.pos = pos;
            return Ok(Segment {
                marker,
                data: &[],
                offset,
            });
        }
        if marker == 0x00 {
            return Err(JpegError::InvalidMarkerData("stuffed byte outside scan data"));
        }
        if let Some(feature) = unsupported_frame(marker) {
            return Err(JpegError::UnsupportedFeature(feature));
        }

        if pos + 2 > data.len() {
            return Err(JpegError::TruncatedSegment {
                marker,
                declared: 2,
                available: data.len() - pos,
            });
        }
        let length = BigEndian::read_u16(&data[pos..pos + 2]) as usize;
        if length < 2 || pos + length > data.len() {
            return Err(JpegError::TruncatedSegment {
                marker,
                declared: length,
                available: data.len() - pos,
            });
        }

        trace!("segment 0xFF{marker:02X} at {offset}, {length} bytes");
        self.pos = pos + length;
        Ok(Segment {
            marker,
            data: &data[pos + 2..pos + length],
            offset,
        })
    }
}

/// Collect all segments from SOI up to and including SOS (or EOI).
///
/// Returns the segments and the byte offset where scan data begins.
pub fn iterate_markers(data: &[u8]) -> Result<(Vec<Segment<'_>>, usize)> {
    let mut reader = MarkerReader::new(data)?;
    let mut segments = Vec::new();
    loop {
        let segment = reader.next_segment()?;
        let marker = segment.marker;
        segments.push(segment);
        if marker == SOS || marker == EOI {
            return Ok((segments, reader.position()));
        }
    }
}

/// Name the unsupported coding process of a SOFn marker, if `marker` is one.
fn unsupported_frame(marker: u8) -> Option<&'static str> {
    match marker {
        0xC1 => Some("extended sequential DCT (SOF1)"),
        0xC2 => Some("progressive DCT (SOF2)"),
        0xC3 => Some("lossless (SOF3)"),
        0xC5..=0xC7 => Some("differential coding"),
        0xC9..=0xCB | 0xCD..=0xCF => Some("arithmetic coding"),
        0xCC => Some("arithmetic coding conditioning (DAC)"),
        _ => None,
    }
}

/// Parse DRI (Define Restart Interval) marker data.
pub fn parse_dri(data: &[u8]) -> Result<u16> {
    if data.len() != 2 {
        return Err(JpegError::InvalidMarkerData("DRI payload must be 2 bytes"));
    }
    Ok(BigEndian::read_u16(data))
}

/// Append a bare marker (no length, no payload), e.g. SOI or EOI.
pub fn write_marker(out: &mut Vec<u8>, marker: u8) {
    out.push(0xFF);
    out.push(marker);
}

/// Append a marker followed by a big-endian length (payload + 2) and the payload.
pub fn write_segment(out: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    debug_assert!(payload.len() + 2 <= u16::MAX as usize);
    write_marker(out, marker);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
}

/// Append the JFIF APP0 segment: version 1.1, no units, 1:1 density, no thumbnail.
pub fn write_app0_jfif(out: &mut Vec<u8>) {
    let payload = [
        b'J', b'F', b'I', b'F', 0, // identifier
        1, 1, // version 1.1
        0, // density units: none (aspect ratio only)
        0, 1, 0, 1, // X / Y density
        0, 0, // no thumbnail
    ];
    write_segment(out, APP0, &payload);
}

/// Append a DRI segment.
pub fn write_dri(out: &mut Vec<u8>, interval: u16) {
    write_segment(out, DRI, &interval.to_be_bytes());
}
