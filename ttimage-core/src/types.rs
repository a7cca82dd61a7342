//! Core types for decoded TechnoTeam images.
//!
//! This module defines the pixel encodings selected by the `Typ` header key
//! and the dense array type every decoder produces.

use crate::header::HeaderMap;

/// Pixel encodings of the TechnoTeam binary container.
///
/// The three file variants (`.pus`, `.pf`, `.pcf`) share one container layout
/// and differ only in how the payload after the header is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelEncoding {
    /// Camera image: unsigned 16-bit little-endian, one channel
    CameraU16,
    /// Luminance image: 32-bit float, one channel
    LuminanceF32,
    /// Color image: 32-bit float, three interleaved channels
    ColorRgbF32,
}

impl PixelEncoding {
    const CAMERA_TAG: &'static str = "Pic98::TPlane<unsigned short>";
    const LUMINANCE_TAG: &'static str = "Pic98::TPlane<float>";
    const COLOR_TAG: &'static str = "Pic98::TPlane<Pic98::TRGBFloatPixel>";

    /// Attempts to resolve an encoding from the exact `Typ` header value.
    #[inline]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            Self::CAMERA_TAG => Some(Self::CameraU16),
            Self::LUMINANCE_TAG => Some(Self::LuminanceF32),
            Self::COLOR_TAG => Some(Self::ColorRgbF32),
            _ => None,
        }
    }

    /// Returns the `Typ` header value for this encoding.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CameraU16 => Self::CAMERA_TAG,
            Self::LuminanceF32 => Self::LUMINANCE_TAG,
            Self::ColorRgbF32 => Self::COLOR_TAG,
        }
    }

    /// Size in bytes of one stored element (one channel of one pixel).
    #[inline]
    pub fn element_size(&self) -> usize {
        match self {
            Self::CameraU16 => 2,
            Self::LuminanceF32 | Self::ColorRgbF32 => 4,
        }
    }

    /// Number of interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        match self {
            Self::ColorRgbF32 => 3,
            Self::CameraU16 | Self::LuminanceF32 => 1,
        }
    }
}

/// Array shape: `(lines, columns)` for single-channel images,
/// `(lines, columns, channels)` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shape {
    pub lines: usize,
    pub columns: usize,
    pub channels: usize,
}

impl Shape {
    pub fn new(lines: usize, columns: usize, channels: usize) -> Self {
        Self {
            lines,
            columns,
            channels,
        }
    }

    /// Shape of an empty single-channel array, `(0, 0)`.
    pub fn empty() -> Self {
        Self::new(0, 0, 1)
    }

    /// Total number of stored elements.
    pub fn len(&self) -> usize {
        self.lines * self.columns * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Array dimensions, 2 entries for single-channel shapes and 3 otherwise.
    pub fn dims(&self) -> Vec<usize> {
        if self.channels == 1 {
            vec![self.lines, self.columns]
        } else {
            vec![self.lines, self.columns, self.channels]
        }
    }
}

/// Element storage of a decoded array.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl PixelData {
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A dense row-major pixel array.
///
/// Multi-channel arrays are channel-interleaved: the channel values of one
/// pixel are stored contiguously before the next pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelArray {
    shape: Shape,
    data: PixelData,
}

impl PixelArray {
    /// Wraps `data` with `shape`, returning `None` if the element counts differ.
    pub fn new(shape: Shape, data: PixelData) -> Option<Self> {
        if shape.len() != data.len() {
            return None;
        }
        Some(Self { shape, data })
    }

    /// Builds an array from parts whose element count is known to match.
    pub(crate) fn from_parts(shape: Shape, data: PixelData) -> Self {
        debug_assert_eq!(shape.len(), data.len());
        Self { shape, data }
    }

    /// An empty `(0, 0)` float array.
    pub fn empty() -> Self {
        Self {
            shape: Shape::empty(),
            data: PixelData::F32(Vec::new()),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    pub fn into_data(self) -> PixelData {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element at `(line, column, channel)` widened to `f64`.
    pub fn get(&self, line: usize, column: usize, channel: usize) -> Option<f64> {
        let Shape {
            lines,
            columns,
            channels,
        } = self.shape;
        if line >= lines || column >= columns || channel >= channels {
            return None;
        }
        let index = (line * columns + column) * channels + channel;
        match &self.data {
            PixelData::U16(v) => v.get(index).map(|&x| x as f64),
            PixelData::F32(v) => v.get(index).map(|&x| x as f64),
        }
    }

    /// Iterates over the image rows, each row a slice of `columns * channels`
    /// elements converted to `f64`.
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        let row_len = self.shape.columns * self.shape.channels;
        (0..self.shape.lines).map(move |line| {
            let range = line * row_len..(line + 1) * row_len;
            match &self.data {
                PixelData::U16(v) => v[range].iter().map(|&x| x as f64).collect(),
                PixelData::F32(v) => v[range].iter().map(|&x| x as f64).collect(),
            }
        })
    }

    /// Returns all elements as `f32`. Unsigned 16-bit values convert exactly.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match &self.data {
            PixelData::U16(v) => v.iter().map(|&x| x as f32).collect(),
            PixelData::F32(v) => v.clone(),
        }
    }
}

/// Result of decoding a TechnoTeam binary image.
#[derive(Debug, Clone)]
pub struct DecodeResult {
    /// Parsed header entries
    pub header: HeaderMap,
    /// Encoding selected by the `Typ` entry
    pub encoding: PixelEncoding,
    /// Decoded pixels
    pub pixels: PixelArray,
}
