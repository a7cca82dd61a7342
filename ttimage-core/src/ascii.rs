//! Decoder for ascii pixel grids exported by the measurement software.
//!
//! The layout is two preamble lines, one line per image row with
//! tab-separated decimal values, and a terminating newline. Values may use a
//! comma as decimal separator.

use crate::error::DecodeError;
use crate::types::{PixelArray, PixelData, Shape};

/// Number of preamble lines before the first image row.
pub const PREAMBLE_LINES: usize = 2;

const FIELD_SEPARATOR: char = '\t';

/// Decodes an ascii pixel grid into a single-channel float array.
///
/// The first two lines and the last line are dropped by position, then rows
/// that are blank after trimming are skipped. Input with no remaining rows
/// yields an empty `(0, 0)` array.
pub fn decode(text: &str) -> Result<PixelArray, DecodeError> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= PREAMBLE_LINES + 1 {
        return Ok(PixelArray::empty());
    }
    let data_lines = &lines[PREAMBLE_LINES..lines.len() - 1];

    let mut values = Vec::new();
    let mut columns = 0;
    let mut rows = 0;
    for (index, line) in data_lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut count = 0;
        for token in line.split(FIELD_SEPARATOR) {
            let value = token
                .trim()
                .replace(',', ".")
                .parse::<f32>()
                .map_err(|_| DecodeError::AsciiParse {
                    line: index + PREAMBLE_LINES + 1,
                    token: token.to_string(),
                })?;
            values.push(value);
            count += 1;
        }

        if rows == 0 {
            columns = count;
        } else if count != columns {
            return Err(DecodeError::RaggedRow {
                row: rows,
                expected: columns,
                actual: count,
            });
        }
        rows += 1;
    }

    if rows == 0 {
        return Ok(PixelArray::empty());
    }
    Ok(PixelArray::from_parts(
        Shape::new(rows, columns, 1),
        PixelData::F32(values),
    ))
}
