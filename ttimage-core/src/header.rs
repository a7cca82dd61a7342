//! Header parsing for the TechnoTeam binary container.
//!
//! A container is a UTF-8 text header of `key=value` lines, a single zero
//! byte, and the raw pixel payload:
//!
//! ```text
//! Typ=Pic98::TPlane<float>\r\n|Lines=480\r\n|Columns=640\r\n...\0<payload>
//! ```
//!
//! Carriage returns and `|` characters may appear anywhere in the header and
//! are stripped before the lines are split.

use crate::error::DecodeError;
use std::str::FromStr;

/// Byte separating the header region from the payload.
pub const HEADER_TERMINATOR: u8 = 0x00;

/// Header key selecting the pixel encoding.
pub const KEY_TYPE: &str = "Typ";
/// Header key holding the number of image lines (rows).
pub const KEY_LINES: &str = "Lines";
/// Header key holding the number of image columns.
pub const KEY_COLUMNS: &str = "Columns";

/// Ordered key/value entries of an image header.
///
/// Entries keep insertion order. Inserting an existing key replaces its value
/// in place, so the last occurrence wins while the position of the first is
/// kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the previous value for `key` if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Looks up `key` and parses its trimmed value, returning `None` if the
    /// key is absent or the value does not parse.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes the entries as `key=value\n` lines.
    pub fn to_header_text(&self) -> String {
        let mut text = String::new();
        for (key, value) in self.iter() {
            text.push_str(key);
            text.push('=');
            text.push_str(value);
            text.push('\n');
        }
        text
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut header = HeaderMap::new();
        for (key, value) in iter {
            header.insert(key, value);
        }
        header
    }
}

/// Splits a raw container at the first zero byte into header bytes and
/// payload bytes.
///
/// Without a zero byte the whole buffer is header and the payload is empty.
pub fn split_container(raw: &[u8]) -> (&[u8], &[u8]) {
    match raw.iter().position(|&b| b == HEADER_TERMINATOR) {
        Some(r) => (&raw[..r], &raw[r + 1..]),
        None => (raw, &[]),
    }
}

/// Parses a raw container into its header entries and the payload slice.
pub fn parse(raw: &[u8]) -> Result<(HeaderMap, &[u8]), DecodeError> {
    let (header_bytes, payload) = split_container(raw);
    let text = std::str::from_utf8(header_bytes)?;
    let header = parse_text(text)?;
    Ok((header, payload))
}

/// Parses header text into entries.
///
/// Every line after normalization must contain `=`; the first `=` separates
/// key from value. An empty header is a single empty line and fails.
pub fn parse_text(text: &str) -> Result<HeaderMap, DecodeError> {
    let normalized: String = text.chars().filter(|&c| c != '\r' && c != '|').collect();
    let normalized = normalized.trim_end_matches('\n');

    let mut header = HeaderMap::new();
    for (index, line) in normalized.split('\n').enumerate() {
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| DecodeError::HeaderFormat {
                line: index + 1,
                content: line.to_string(),
            })?;
        header.insert(key, value);
    }
    Ok(header)
}
