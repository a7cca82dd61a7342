//! Python bindings for the TechnoTeam image decoder with numpy output.
//!
//! Binary images decode to a `(numpy.ndarray, dict)` pair: the pixel array
//! (`uint16` or `float32`, shape `(lines, columns)` or `(lines, columns, 3)`)
//! and the header entries.

use numpy::{IntoPyArray, PyArrayDyn};
use pyo3::exceptions::{PyFileNotFoundError, PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::PathBuf;
use ttimage_core::{
    ascii, source, DecodeError, DecodeResult, HeaderMap, PixelArray, PixelData, TtImageDecoder,
};

/// Maps a decode error onto the closest Python exception.
fn to_py_err(err: DecodeError) -> PyErr {
    match err {
        DecodeError::FileNotFound(_) => PyFileNotFoundError::new_err(err.to_string()),
        DecodeError::Io(_) => PyIOError::new_err(err.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Converts a pixel array into a numpy array of matching dtype and shape.
fn to_ndarray(py: Python<'_>, array: PixelArray) -> PyResult<PyObject> {
    let dims = array.shape().dims();
    let ndarray: PyObject = match array.into_data() {
        PixelData::U16(values) => {
            let flat = values.into_pyarray(py);
            let shaped: &PyArrayDyn<u16> = flat.reshape(dims)?;
            shaped.to_object(py)
        }
        PixelData::F32(values) => {
            let flat = values.into_pyarray(py);
            let shaped: &PyArrayDyn<f32> = flat.reshape(dims)?;
            shaped.to_object(py)
        }
    };
    Ok(ndarray)
}

/// Converts header entries into a Python dict preserving header order.
fn header_to_dict<'py>(py: Python<'py>, header: &HeaderMap) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);
    for (key, value) in header.iter() {
        dict.set_item(key, value)?;
    }
    Ok(dict)
}

/// Finishes a binary decode.
///
/// With `strict` disabled, a pixel-level failure returns an empty `(0, 0)`
/// array together with the parsed header instead of raising.
fn finish_decode(
    py: Python<'_>,
    decoder: &TtImageDecoder,
    result: Result<DecodeResult, DecodeError>,
    strict: bool,
) -> PyResult<(PyObject, PyObject)> {
    match result {
        Ok(result) => {
            let header = header_to_dict(py, &result.header)?.to_object(py);
            Ok((to_ndarray(py, result.pixels)?, header))
        }
        Err(err) if !strict && err.is_pixel_error() => match decoder.header() {
            Some(header) => {
                let header = header_to_dict(py, header)?.to_object(py);
                Ok((to_ndarray(py, PixelArray::empty())?, header))
            }
            None => Err(to_py_err(err)),
        },
        Err(err) => Err(to_py_err(err)),
    }
}

/// Reads a TechnoTeam image (*.pus, *.pf, *.pcf).
///
/// Args:
///     path: Path to the image file
///     strict: Raise on pixel decoding errors (default: True). When False,
///         an image whose header parses but whose pixels cannot be decoded
///         returns an empty (0, 0) array with the header dict.
///
/// Returns:
///     tuple: (numpy.ndarray, dict)
///
/// Example:
///     >>> import ttimage
///     >>> pixels, header = ttimage.read_tt_image("luminance.pf")
///     >>> pixels.shape
///     (1024, 1360)
///     >>> header["Typ"]
///     'Pic98::TPlane<float>'
#[pyfunction]
#[pyo3(signature = (path, strict=true))]
fn read_tt_image(py: Python<'_>, path: &str, strict: bool) -> PyResult<(PyObject, PyObject)> {
    let path = PathBuf::from(path);
    let mut decoder = TtImageDecoder::new();
    let result = decoder.decode_file(&path);
    finish_decode(py, &decoder, result, strict)
}

/// Decodes a TechnoTeam image held in memory.
///
/// Args:
///     data: Complete file contents (header, zero byte, payload)
///     strict: See `read_tt_image`
///
/// Returns:
///     tuple: (numpy.ndarray, dict)
#[pyfunction]
#[pyo3(signature = (data, strict=true))]
fn decode_tt_bytes(py: Python<'_>, data: &[u8], strict: bool) -> PyResult<(PyObject, PyObject)> {
    let mut decoder = TtImageDecoder::new();
    let result = decoder.decode_bytes(data);
    finish_decode(py, &decoder, result, strict)
}

/// Reads only the header of a TechnoTeam image.
///
/// The pixel data is not validated.
///
/// Returns:
///     dict: Header entries in file order
#[pyfunction]
fn read_tt_header(py: Python<'_>, path: &str) -> PyResult<PyObject> {
    let raw = source::read_tt_file(path).map_err(to_py_err)?;
    let (header, _) = ttimage_core::header::parse(&raw).map_err(to_py_err)?;
    Ok(header_to_dict(py, &header)?.to_object(py))
}

/// Reads an ascii image (*.txt).
///
/// Returns:
///     numpy.ndarray: 2D float32 array, one row per text line
#[pyfunction]
fn read_ascii_image(py: Python<'_>, path: &str) -> PyResult<PyObject> {
    let array = ttimage_core::read_ascii_image(path).map_err(to_py_err)?;
    to_ndarray(py, array)
}

/// Decodes ascii image text.
///
/// Returns:
///     numpy.ndarray: 2D float32 array
#[pyfunction]
fn decode_ascii_text(py: Python<'_>, text: &str) -> PyResult<PyObject> {
    let array = ascii::decode(text).map_err(to_py_err)?;
    to_ndarray(py, array)
}

/// TechnoTeam image decoder module for Python.
#[pymodule]
fn ttimage(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(read_tt_image, m)?)?;
    m.add_function(wrap_pyfunction!(decode_tt_bytes, m)?)?;
    m.add_function(wrap_pyfunction!(read_tt_header, m)?)?;
    m.add_function(wrap_pyfunction!(read_ascii_image, m)?)?;
    m.add_function(wrap_pyfunction!(decode_ascii_text, m)?)?;
    Ok(())
}
