//! Error type shared by all decoders.

use std::path::PathBuf;
use std::str::Utf8Error;
use thiserror::Error;

/// Errors that can occur while reading or decoding an image.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file extension for {}: expected one of {}", .path.display(), .expected.join(", "))]
    UnsupportedExtension {
        path: PathBuf,
        expected: &'static [&'static str],
    },

    #[error("Header is not valid UTF-8: {0}")]
    HeaderDecode(#[from] Utf8Error),

    #[error("Malformed header line {line}: {content:?} (expected key=value)")]
    HeaderFormat { line: usize, content: String },

    #[error("Missing header key: {0}")]
    MissingHeaderKey(&'static str),

    #[error("Invalid header value for {key}: {value:?} (expected a positive integer)")]
    HeaderValue { key: &'static str, value: String },

    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("Payload size mismatch: expected {expected} bytes, found {actual}")]
    PayloadSizeMismatch { expected: usize, actual: usize },

    #[error("Image dimensions {lines}x{columns} are too large")]
    DimensionOverflow { lines: usize, columns: usize },

    #[error("Invalid number on ascii line {line}: {token:?}")]
    AsciiParse { line: usize, token: String },

    #[error("Ascii row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl DecodeError {
    /// Returns true if the error occurred after the header was parsed, i.e.
    /// while selecting the encoding or reshaping the payload.
    pub fn is_pixel_error(&self) -> bool {
        matches!(
            self,
            Self::MissingHeaderKey(_)
                | Self::HeaderValue { .. }
                | Self::UnsupportedPixelFormat(_)
                | Self::PayloadSizeMismatch { .. }
                | Self::DimensionOverflow { .. }
        )
    }
}
