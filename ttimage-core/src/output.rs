//! Export writers for decoded pixel arrays.
//!
//! Supports delimited text (CSV) and NumPy `.npy` files.

use crate::header::HeaderMap;
use crate::types::{PixelArray, PixelData, Shape};
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output writing.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Value separator for text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Semicolon,
    Space,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
            Self::Semicolon => ';',
            Self::Space => ' ',
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = OutputError;

    /// Parses a delimiter from its name ("comma", "tab", ...) or the
    /// character itself.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(Self::Comma),
            "tab" | "\t" | "\\t" => Ok(Self::Tab),
            "semicolon" | ";" => Ok(Self::Semicolon),
            "space" | " " => Ok(Self::Space),
            other => Err(OutputError::InvalidFormat(format!(
                "Unknown delimiter: {:?}. Use comma, tab, semicolon or space",
                other
            ))),
        }
    }
}

/// CSV writer for pixel arrays.
///
/// Each image line becomes one text line. Multi-channel pixels are written
/// channel-interleaved, `r,g,b,r,g,b,...`.
pub struct CsvWriter<W: Write> {
    writer: BufWriter<W>,
    delimiter: Delimiter,
}

impl<W: Write> CsvWriter<W> {
    /// Creates a new CSV writer.
    pub fn new(writer: W, delimiter: Delimiter) -> Self {
        Self {
            writer: BufWriter::new(writer),
            delimiter,
        }
    }

    /// Writes the `%shape:` comment line.
    pub fn write_shape(&mut self, shape: Shape) -> Result<(), OutputError> {
        let dims: Vec<String> = shape.dims().iter().map(|d| d.to_string()).collect();
        writeln!(self.writer, "%shape:{}", dims.join(","))?;
        Ok(())
    }

    /// Writes all rows of `array`.
    pub fn write_array(&mut self, array: &PixelArray) -> Result<(), OutputError> {
        let shape = array.shape();
        let row_len = shape.columns * shape.channels;
        if row_len == 0 {
            return Ok(());
        }
        match array.data() {
            PixelData::U16(values) => {
                for row in values.chunks_exact(row_len) {
                    self.write_row(row)?;
                }
            }
            PixelData::F32(values) => {
                for row in values.chunks_exact(row_len) {
                    self.write_row(row)?;
                }
            }
        }
        Ok(())
    }

    fn write_row<T: std::fmt::Display>(&mut self, row: &[T]) -> Result<(), OutputError> {
        let delimiter = self.delimiter.as_char();
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                write!(self.writer, "{}", delimiter)?;
            }
            write!(self.writer, "{}", value)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// NumPy `.npy` (format version 1.0) writer.
///
/// The file holds a little-endian C-order array of dtype `<u2` or `<f4` with
/// the image shape `(lines, columns)` or `(lines, columns, 3)`.
pub struct NpyWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> NpyWriter<W> {
    const MAGIC: &'static [u8] = b"\x93NUMPY";
    const ALIGNMENT: usize = 64;

    /// Creates a new npy writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Writes the npy preamble and array header.
    pub fn write_header(&mut self, array: &PixelArray) -> Result<(), OutputError> {
        let descr = match array.data() {
            PixelData::U16(_) => "<u2",
            PixelData::F32(_) => "<f4",
        };
        let dims: Vec<String> = array.shape().dims().iter().map(|d| d.to_string()).collect();
        let mut dict = format!(
            "{{'descr': '{}', 'fortran_order': False, 'shape': ({}), }}",
            descr,
            dims.join(", ")
        );

        // magic + version + u16 length, then the dict padded to the alignment
        let preamble = Self::MAGIC.len() + 2 + 2;
        let unpadded = preamble + dict.len() + 1;
        let padded = unpadded.div_ceil(Self::ALIGNMENT) * Self::ALIGNMENT;
        dict.extend(std::iter::repeat(' ').take(padded - unpadded));
        dict.push('\n');

        let header_len = u16::try_from(dict.len())
            .map_err(|_| OutputError::InvalidFormat("npy header too long".to_string()))?;

        self.writer.write_all(Self::MAGIC)?;
        self.writer.write_all(&[1, 0])?;
        self.writer.write_u16::<LittleEndian>(header_len)?;
        self.writer.write_all(dict.as_bytes())?;
        Ok(())
    }

    /// Writes the array elements.
    pub fn write_data(&mut self, array: &PixelArray) -> Result<(), OutputError> {
        match array.data() {
            PixelData::U16(values) => {
                for &v in values {
                    self.writer.write_u16::<LittleEndian>(v)?;
                }
            }
            PixelData::F32(values) => {
                for &v in values {
                    self.writer.write_f32::<LittleEndian>(v)?;
                }
            }
        }
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a pixel array to a CSV file.
pub fn write_csv<P: AsRef<Path>>(
    path: P,
    array: &PixelArray,
    delimiter: Delimiter,
) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = CsvWriter::new(file, delimiter);
    writer.write_shape(array.shape())?;
    writer.write_array(array)?;
    writer.flush()?;
    Ok(())
}

/// Writes a pixel array to a `.npy` file.
pub fn write_npy<P: AsRef<Path>>(path: P, array: &PixelArray) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = NpyWriter::new(file);
    writer.write_header(array)?;
    writer.write_data(array)?;
    writer.flush()?;
    Ok(())
}

/// Writes header entries as `key=value` lines.
pub fn write_header<P: AsRef<Path>>(path: P, header: &HeaderMap) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(header.to_header_text().as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn camera_array() -> PixelArray {
        PixelArray::new(Shape::new(2, 2, 1), PixelData::U16(vec![0, 1, 65535, 1000])).unwrap()
    }

    #[test]
    fn test_delimiter_parsing() {
        assert_eq!(Delimiter::from_str("comma").unwrap(), Delimiter::Comma);
        assert_eq!(Delimiter::from_str("TAB").unwrap(), Delimiter::Tab);
        assert_eq!(Delimiter::from_str(";").unwrap(), Delimiter::Semicolon);
        assert_eq!(Delimiter::from_str("space").unwrap(), Delimiter::Space);
        assert!(Delimiter::from_str("pipe").is_err());
    }

    #[test]
    fn test_csv_writer() {
        let mut output = Vec::new();
        {
            let array = camera_array();
            let mut writer = CsvWriter::new(&mut output, Delimiter::Comma);
            writer.write_shape(array.shape()).unwrap();
            writer.write_array(&array).unwrap();
            writer.flush().unwrap();
        }

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "%shape:2,2\n0,1\n65535,1000\n");
    }

    #[test]
    fn test_csv_writer_color_interleaved() {
        let array = PixelArray::new(
            Shape::new(1, 2, 3),
            PixelData::F32(vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0]),
        )
        .unwrap();
        let mut output = Vec::new();
        {
            let mut writer = CsvWriter::new(&mut output, Delimiter::Tab);
            writer.write_shape(array.shape()).unwrap();
            writer.write_array(&array).unwrap();
            writer.flush().unwrap();
        }

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "%shape:1,2,3\n0.5\t1\t1.5\t2\t2.5\t3\n");
    }

    #[test]
    fn test_npy_writer() {
        let array = camera_array();
        let mut output = Vec::new();
        {
            let mut writer = NpyWriter::new(&mut output);
            writer.write_header(&array).unwrap();
            writer.write_data(&array).unwrap();
            writer.flush().unwrap();
        }

        assert_eq!(&output[0..6], b"\x93NUMPY");
        assert_eq!(&output[6..8], &[1, 0]);
        let header_len = u16::from_le_bytes([output[8], output[9]]) as usize;
        let data_start = 10 + header_len;
        assert_eq!(data_start % 64, 0);

        let dict = std::str::from_utf8(&output[10..data_start]).unwrap();
        assert!(dict.starts_with("{'descr': '<u2', 'fortran_order': False, 'shape': (2, 2), }"));
        assert!(dict.ends_with('\n'));

        assert_eq!(output.len(), data_start + 8);
        assert_eq!(&output[data_start + 4..data_start + 6], &65535u16.to_le_bytes());
    }

    #[test]
    fn test_npy_writer_color_shape() {
        let array = PixelArray::new(Shape::new(1, 1, 3), PixelData::F32(vec![1.0, 2.0, 3.0])).unwrap();
        let mut output = Vec::new();
        {
            let mut writer = NpyWriter::new(&mut output);
            writer.write_header(&array).unwrap();
            writer.flush().unwrap();
        }
        let text = String::from_utf8_lossy(&output);
        assert!(text.contains("'descr': '<f4'"));
        assert!(text.contains("'shape': (1, 1, 3)"));
    }

    #[test]
    fn test_write_header_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("header.txt");
        let header: HeaderMap = [("Typ", "Pic98::TPlane<float>"), ("Lines", "2")]
            .into_iter()
            .collect();
        write_header(&path, &header).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Typ=Pic98::TPlane<float>\nLines=2\n"
        );
    }
}
