//! Text I/O with atomic, locked writes

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;
    drop(temp_file);

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    tracing::debug!(path = %path, bytes = content.len(), "wrote file");
    Ok(())
}

/// Read a UTF-8 text file.
///
/// Invalid UTF-8 surfaces as an [`Error::Io`] with `InvalidData` kind.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Size of a file in bytes.
pub fn file_size(path: &NormalizedPath) -> Result<u64> {
    let native_path = path.to_native();
    fs::metadata(&native_path)
        .map(|m| m.len())
        .map_err(|e| Error::io(&native_path, e))
}

/// List regular files directly inside `dir` with the given extension,
/// sorted by file name.
pub fn list_files(dir: &NormalizedPath, extension: &str) -> Result<Vec<NormalizedPath>> {
    let native_dir = dir.to_native();
    if !native_dir.is_dir() {
        return Err(Error::NotADirectory { path: native_dir });
    }

    let entries = fs::read_dir(&native_dir).map_err(|e| Error::io(&native_dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_dir, e))?;
        let path = NormalizedPath::new(entry.path());
        if path.is_file() && path.extension() == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
