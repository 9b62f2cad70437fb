//! Disk I/O helpers: load the document and replace the file in one step.
//!
//! Writes go to a sibling temp file that is then renamed over the target. On
//! local file systems that's close to atomic; on network shares or FAT there
//! are no hard guarantees.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::serializer::Serializer;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Read and decode the file at `path`.
///
/// `Ok(None)` means there is nothing to load: the file is missing or empty.
/// A file that exists but can't be read or decoded is an error.
pub fn load<S: Serializer>(path: &Path, serializer: &S) -> Result<Option<Document>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serializer.deserialize(&bytes).map(Some)
}

/// Encode `doc` and write it over `path` via `<path>.tmp` + rename.
pub fn save<S: Serializer>(path: &Path, doc: &Document, serializer: &S) -> Result<()> {
    let bytes = serializer.serialize(doc)?;
    atomic_write(path, &bytes)
}

/// Write `bytes` to a temp file next to `path`, then rename it into place.
/// A crash mid-write leaves the old file intact.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    std::fs::write(&tmp, bytes)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

// `.userDefaultsStore` has no extension to swap, so append instead.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".tmp");
    path.with_file_name(name)
}
