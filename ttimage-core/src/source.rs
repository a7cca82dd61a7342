//! File access for the decoders.
//!
//! Paths are checked for existence and for an allowed extension before any
//! bytes are read. The decoders themselves never look at file names.

use crate::error::DecodeError;
use std::path::Path;

/// Extensions of the TechnoTeam binary image variants.
pub const TT_EXTENSIONS: &[&str] = &["pus", "pf", "pcf"];

/// Extensions of ascii pixel grids.
pub const ASCII_EXTENSIONS: &[&str] = &["txt"];

/// Kind of image file, as determined by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// `.pus`, `.pf` or `.pcf` container
    TechnoTeam,
    /// `.txt` pixel grid
    Ascii,
}

impl ImageKind {
    /// Classifies a path by its extension. Matching is case-sensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if TT_EXTENSIONS.contains(&ext) {
            Some(Self::TechnoTeam)
        } else if ASCII_EXTENSIONS.contains(&ext) {
            Some(Self::Ascii)
        } else {
            None
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::TechnoTeam => TT_EXTENSIONS,
            Self::Ascii => ASCII_EXTENSIONS,
        }
    }
}

fn check_path(path: &Path, expected: &'static [&'static str]) -> Result<(), DecodeError> {
    if !path.exists() {
        return Err(DecodeError::FileNotFound(path.to_path_buf()));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !expected.contains(&ext) {
        return Err(DecodeError::UnsupportedExtension {
            path: path.to_path_buf(),
            expected,
        });
    }
    Ok(())
}

/// Checks that `path` exists and names a TechnoTeam binary image.
pub fn check_tt_path(path: &Path) -> Result<(), DecodeError> {
    check_path(path, TT_EXTENSIONS)
}

/// Checks that `path` exists and names an ascii image.
pub fn check_ascii_path(path: &Path) -> Result<(), DecodeError> {
    check_path(path, ASCII_EXTENSIONS)
}

/// Reads a whole TechnoTeam container after checking its path.
pub fn read_tt_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, DecodeError> {
    let path = path.as_ref();
    check_tt_path(path)?;
    Ok(std::fs::read(path)?)
}

/// Reads a whole ascii image after checking its path.
pub fn read_ascii_file<P: AsRef<Path>>(path: P) -> Result<String, DecodeError> {
    let path = path.as_ref();
    check_ascii_path(path)?;
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_image_kind_from_path() {
        assert_eq!(
            ImageKind::from_path(Path::new("scene.pus")),
            Some(ImageKind::TechnoTeam)
        );
        assert_eq!(
            ImageKind::from_path(Path::new("dir/scene.pf")),
            Some(ImageKind::TechnoTeam)
        );
        assert_eq!(
            ImageKind::from_path(Path::new("scene.pcf")),
            Some(ImageKind::TechnoTeam)
        );
        assert_eq!(
            ImageKind::from_path(Path::new("scene.txt")),
            Some(ImageKind::Ascii)
        );
        assert_eq!(ImageKind::from_path(Path::new("scene.PUS")), None);
        assert_eq!(ImageKind::from_path(Path::new("scene")), None);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.pus");
        match read_tt_file(&path) {
            Err(DecodeError::FileNotFound(p)) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"Typ=x\0").unwrap();
        assert!(matches!(
            read_tt_file(&path),
            Err(DecodeError::UnsupportedExtension { .. })
        ));

        let txt = dir.path().join("image.pf");
        std::fs::write(&txt, b"").unwrap();
        assert!(matches!(
            read_ascii_file(&txt),
            Err(DecodeError::UnsupportedExtension { expected, .. }) if expected == ASCII_EXTENSIONS
        ));
    }

    #[test]
    fn test_reads_whole_file() {
        let dir = TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("image.pcf");
        std::fs::write(&path, b"a=b\0\x01\x02\x03").unwrap();
        assert_eq!(read_tt_file(&path).unwrap(), b"a=b\0\x01\x02\x03");
    }
}
