//! JSON artifact writers.

use std::path::Path;

use serde::Serialize;

use crate::error::DataError;

/// Serialize `value` as indented JSON and write it to `path`.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DataError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| DataError::json(path, e))?;
    write_atomic(path, &bytes)
}

/// Serialize `value` as compact JSON and write it to `path`.
pub fn write_json_compact<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DataError> {
    let bytes = serde_json::to_vec(value).map_err(|e| DataError::json(path, e))?;
    write_atomic(path, &bytes)
}

/// Write to a sibling temp file, then rename over the destination.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    std::fs::write(&tmp, bytes).map_err(|e| DataError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| DataError::io(path, e))?;
    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
