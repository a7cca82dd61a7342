//! TechnoTeam image decoder.
//!
//! This module ties header parsing and payload decoding together and keeps
//! the parsed header available when pixel decoding fails, so the metadata of
//! a damaged or unsupported image can still be inspected.

use crate::error::DecodeError;
use crate::header::{self, HeaderMap};
use crate::pixels;
use crate::source;
use crate::types::DecodeResult;
use std::path::Path;

/// Decoder for TechnoTeam binary images (`.pus`, `.pf`, `.pcf`).
///
/// Every decode call starts from scratch; the only state is the header of the
/// most recent call.
#[derive(Debug, Default)]
pub struct TtImageDecoder {
    header: Option<HeaderMap>,
}

impl TtImageDecoder {
    /// Creates a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Header parsed by the most recent decode call.
    ///
    /// Returns `Some` whenever the header itself was valid, including when
    /// the pixel data could not be decoded.
    pub fn header(&self) -> Option<&HeaderMap> {
        self.header.as_ref()
    }

    /// Takes the header parsed by the most recent decode call.
    pub fn take_header(&mut self) -> Option<HeaderMap> {
        self.header.take()
    }

    /// Clears the retained header.
    pub fn reset(&mut self) {
        self.header = None;
    }

    /// Decodes a complete container held in memory.
    pub fn decode_bytes(&mut self, raw: &[u8]) -> Result<DecodeResult, DecodeError> {
        self.reset();

        let (header, payload) = header::parse(raw)?;
        let header = self.header.insert(header);

        let encoding = pixels::encoding(header)?;
        let pixels = pixels::decode_with(encoding, header, payload)?;

        Ok(DecodeResult {
            header: header.clone(),
            encoding,
            pixels,
        })
    }

    /// Reads and decodes a container from disk.
    ///
    /// The path must exist and carry one of the `pus`, `pf` or `pcf`
    /// extensions.
    pub fn decode_file<P: AsRef<Path>>(&mut self, path: P) -> Result<DecodeResult, DecodeError> {
        self.reset();
        let raw = source::read_tt_file(path)?;
        self.decode_bytes(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PixelData, PixelEncoding};

    fn container(header: &str, payload: &[u8]) -> Vec<u8> {
        let mut raw = header.as_bytes().to_vec();
        raw.push(0);
        raw.extend_from_slice(payload);
        raw
    }

    #[test]
    fn test_decoder_initial_state() {
        let decoder = TtImageDecoder::new();
        assert!(decoder.header().is_none());
    }

    #[test]
    fn test_decode_camera_image() {
        let payload: Vec<u8> = [0u16, 1, 65535, 1000]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let raw = container(
            "Typ=Pic98::TPlane<unsigned short>\r\n|Lines=2\r\n|Columns=2\r\n",
            &payload,
        );

        let mut decoder = TtImageDecoder::new();
        let result = decoder.decode_bytes(&raw).unwrap();
        assert_eq!(result.encoding, PixelEncoding::CameraU16);
        assert_eq!(result.pixels.shape().dims(), vec![2, 2]);
        assert_eq!(
            result.pixels.data(),
            &PixelData::U16(vec![0, 1, 65535, 1000])
        );
        assert_eq!(result.header.get("Lines"), Some("2"));
        assert_eq!(decoder.header(), Some(&result.header));
    }

    #[test]
    fn test_header_survives_unsupported_format() {
        let raw = container("Typ=Pic98::TPlane<double>\nLines=1\nColumns=1\nCamera=LMK", &[0; 8]);
        let mut decoder = TtImageDecoder::new();

        let err = decoder.decode_bytes(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedPixelFormat(_)));
        assert!(err.is_pixel_error());

        let header = decoder.header().expect("header retained");
        assert_eq!(header.get("Camera"), Some("LMK"));
    }

    #[test]
    fn test_header_survives_missing_key() {
        let raw = container("Lines=1\nColumns=1", &[0; 4]);
        let mut decoder = TtImageDecoder::new();
        assert!(matches!(
            decoder.decode_bytes(&raw),
            Err(DecodeError::MissingHeaderKey("Typ"))
        ));
        assert_eq!(decoder.header().map(|h| h.len()), Some(2));
    }

    #[test]
    fn test_no_header_after_header_error() {
        let mut decoder = TtImageDecoder::new();
        let good = container("Typ=Pic98::TPlane<float>\nLines=1\nColumns=1", &[0; 4]);
        decoder.decode_bytes(&good).unwrap();
        assert!(decoder.header().is_some());

        // a failed header parse must not leave the previous header behind
        let bad = container("not a header", &[]);
        assert!(matches!(
            decoder.decode_bytes(&bad),
            Err(DecodeError::HeaderFormat { .. })
        ));
        assert!(decoder.header().is_none());
    }

    #[test]
    fn test_decode_without_terminator_does_not_panic() {
        let mut decoder = TtImageDecoder::new();
        let result = decoder.decode_bytes(b"Typ=Pic98::TPlane<float>\nLines=1\nColumns=1");
        assert!(matches!(
            result,
            Err(DecodeError::PayloadSizeMismatch {
                expected: 4,
                actual: 0
            })
        ));
    }
}
