//! Decoder library for TechnoTeam luminance camera images.
//!
//! This crate decodes the binary image containers written by TechnoTeam
//! luminance measurement cameras (`.pus`, `.pf`, `.pcf`) into a pixel array
//! and the header metadata, and reads the ascii pixel grids the measurement
//! software exports (`.txt`).
//!
//! # Example
//!
//! ```no_run
//! use ttimage_core::TtImageDecoder;
//!
//! let mut decoder = TtImageDecoder::new();
//! let result = decoder.decode_file("luminance.pf").unwrap();
//!
//! println!("Encoding: {}", result.encoding.tag());
//! println!("Shape: {:?}", result.pixels.shape().dims());
//! ```
//!
//! # Formats
//!
//! | `Typ` header value | Elements | Shape |
//! |---|---|---|
//! | `Pic98::TPlane<unsigned short>` | `u16` | lines x columns |
//! | `Pic98::TPlane<float>` | `f32` | lines x columns |
//! | `Pic98::TPlane<Pic98::TRGBFloatPixel>` | `f32` | lines x columns x 3 |
//!
//! All decoding functions are pure: they neither print nor log, and report
//! every problem as a [`DecodeError`].

pub mod ascii;
pub mod decoder;
pub mod error;
pub mod header;
pub mod output;
pub mod pixels;
pub mod source;
pub mod types;

use std::path::Path;

// Re-export commonly used types
pub use decoder::TtImageDecoder;
pub use error::DecodeError;
pub use header::HeaderMap;
pub use output::{Delimiter, OutputError};
pub use source::ImageKind;
pub use types::{DecodeResult, PixelArray, PixelData, PixelEncoding, Shape};

/// Reads and decodes a TechnoTeam binary image file.
pub fn read_tt_image<P: AsRef<Path>>(path: P) -> Result<DecodeResult, DecodeError> {
    TtImageDecoder::new().decode_file(path)
}

/// Reads and decodes an ascii image file.
pub fn read_ascii_image<P: AsRef<Path>>(path: P) -> Result<PixelArray, DecodeError> {
    let text = source::read_ascii_file(path)?;
    ascii::decode(&text)
}
