// assay-core/src/infrastructure/report.rs

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::infrastructure::error::InfrastructureError;

/// Writes a report as pretty JSON. Readers never observe a half-written file.
pub fn write_json_report<T: Serialize, P: AsRef<Path>>(
    path: P,
    report: &T,
) -> Result<(), InfrastructureError> {
    let mut json = serde_json::to_vec_pretty(report)?;
    json.push(b'\n');
    atomic_write(path.as_ref(), &json)?;
    info!(path = %path.as_ref().display(), "Report written");
    Ok(())
}

/// Writes to a temporary file next to `path`, then renames it over `path`.
///
/// The temporary file lives in the target directory so the rename never crosses a
/// filesystem boundary. Missing parent directories are created.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), InfrastructureError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}
