//! Payload decoding for the three TechnoTeam pixel encodings.
//!
//! The `Typ` header entry selects the element type, `Lines` and `Columns`
//! select the shape. The payload must have exactly the computed length.

use crate::error::DecodeError;
use crate::header::{HeaderMap, KEY_COLUMNS, KEY_LINES, KEY_TYPE};
use crate::types::{PixelArray, PixelData, PixelEncoding, Shape};
use byteorder::{ByteOrder, LittleEndian};

/// Resolves the pixel encoding named by the `Typ` entry.
pub fn encoding(header: &HeaderMap) -> Result<PixelEncoding, DecodeError> {
    let tag = header
        .get(KEY_TYPE)
        .ok_or(DecodeError::MissingHeaderKey(KEY_TYPE))?;
    PixelEncoding::from_tag(tag).ok_or_else(|| DecodeError::UnsupportedPixelFormat(tag.to_string()))
}

/// Reads a required positive integer dimension from the header.
fn dimension(header: &HeaderMap, key: &'static str) -> Result<usize, DecodeError> {
    let value = header.get(key).ok_or(DecodeError::MissingHeaderKey(key))?;
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DecodeError::HeaderValue {
            key,
            value: value.to_string(),
        }),
    }
}

/// Computes the image shape and the exact payload length it requires.
pub fn layout(header: &HeaderMap, encoding: PixelEncoding) -> Result<(Shape, usize), DecodeError> {
    let lines = dimension(header, KEY_LINES)?;
    let columns = dimension(header, KEY_COLUMNS)?;
    let shape = Shape::new(lines, columns, encoding.channels());

    let expected = lines
        .checked_mul(columns)
        .and_then(|n| n.checked_mul(encoding.channels()))
        .and_then(|n| n.checked_mul(encoding.element_size()))
        .ok_or(DecodeError::DimensionOverflow { lines, columns })?;

    Ok((shape, expected))
}

/// Decodes `payload` into a pixel array as described by `header`.
pub fn decode(header: &HeaderMap, payload: &[u8]) -> Result<PixelArray, DecodeError> {
    let encoding = encoding(header)?;
    decode_with(encoding, header, payload)
}

/// Decodes `payload` with an already resolved encoding.
pub fn decode_with(
    encoding: PixelEncoding,
    header: &HeaderMap,
    payload: &[u8],
) -> Result<PixelArray, DecodeError> {
    let (shape, expected) = layout(header, encoding)?;
    if payload.len() != expected {
        return Err(DecodeError::PayloadSizeMismatch {
            expected,
            actual: payload.len(),
        });
    }

    let data = match encoding {
        PixelEncoding::CameraU16 => {
            let mut values = vec![0u16; shape.len()];
            LittleEndian::read_u16_into(payload, &mut values);
            PixelData::U16(values)
        }
        PixelEncoding::LuminanceF32 | PixelEncoding::ColorRgbF32 => {
            let mut values = vec![0f32; shape.len()];
            LittleEndian::read_f32_into(payload, &mut values);
            PixelData::F32(values)
        }
    };

    PixelArray::new(shape, data).ok_or(DecodeError::PayloadSizeMismatch {
        expected,
        actual: payload.len(),
    })
}
