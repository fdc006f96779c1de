// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for JPEG encoding and decoding.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a baseline JPEG.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JpegError {
    /// Input does not start with SOI (0xFFD8).
    #[error("missing SOI marker (not a JPEG)")]
    InvalidSignature,
    /// Valid JPEG, but outside the baseline 4:4:4 subset this codec handles.
    #[error("unsupported JPEG feature: {0}")]
    UnsupportedFeature(&'static str),
    /// A marker segment declares more bytes than remain in the input.
    #[error("truncated segment 0xFF{marker:02X}: declared {declared} bytes, {available} available")]
    TruncatedSegment {
        marker: u8,
        declared: usize,
        available: usize,
    },
    /// Entropy-coded data does not decode under the active Huffman tables.
    #[error("malformed entropy-coded data: {0}")]
    MalformedEntropyStream(&'static str),
    /// Input ended (or a marker appeared) while more scan bits were required.
    #[error("unexpected end of JPEG data")]
    UnexpectedEndOfData,
    /// A marker segment has inconsistent content.
    #[error("invalid marker data: {0}")]
    InvalidMarkerData(&'static str),
    /// The caller passed an out-of-range option or an inconsistent buffer.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl JpegError {
    /// True when the error was caused by the caller rather than by the input bytes.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// True when the input is not a JPEG at all, as opposed to a corrupt one.
    pub fn is_not_jpeg(&self) -> bool {
        matches!(self, Self::InvalidSignature)
    }
}

pub type Result<T> = std::result::Result<T, JpegError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_are_distinguishable() {
        assert!(JpegError::InvalidArgument("quality".into()).is_caller_error());
        assert!(!JpegError::UnexpectedEndOfData.is_caller_error());
        assert!(!JpegError::MalformedEntropyStream("x").is_caller_error());
        assert!(JpegError::InvalidSignature.is_not_jpeg());
        assert!(!JpegError::UnsupportedFeature("progressive").is_not_jpeg());
    }

    #[test]
    fn display_includes_marker() {
        let err = JpegError::TruncatedSegment {
            marker: 0xDB,
            declared: 67,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "truncated segment 0xFFDB: declared 67 bytes, 10 available"
        );
    }
}
