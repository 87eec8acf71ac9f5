//! Writing the finished artifact to disk
//!
//! Bytes are staged in a temporary file next to the target and renamed over
//! it once fully written. A failed write leaves any previous report intact.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use scoresheet_core::ReportError;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write rendered bytes to `path`.
///
/// A target that is write-protected or held open by another program
/// surfaces as `OutputLocked`; any other failure as `Io`.
pub fn write_report(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    if is_read_only(path) {
        return Err(ReportError::OutputLocked {
            path: path.to_path_buf(),
        });
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| write_error(path, e))?;
    if let Some(permissions) = output_permissions(path) {
        staged
            .as_file()
            .set_permissions(permissions)
            .map_err(|e| write_error(path, e))?;
    }
    staged.persist(path).map_err(|e| write_error(path, e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "report written");
    Ok(())
}

/// Map an I/O failure on the output path to the report error shown to the user
pub fn write_error(path: &Path, source: io::Error) -> ReportError {
    if is_locked(&source) {
        ReportError::OutputLocked {
            path: path.to_path_buf(),
        }
    } else {
        ReportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Whether an I/O error means the output is held elsewhere or write-protected
pub fn is_locked(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied || is_sharing_violation(err)
}

fn is_read_only(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.permissions().readonly())
}

/// An existing report keeps its permissions; a new one gets the usual file mode
fn output_permissions(path: &Path) -> Option<fs::Permissions> {
    match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

/// ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
#[cfg(windows)]
fn is_sharing_violation(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(32 | 33))
}

#[cfg(not(windows))]
fn is_sharing_violation(_err: &io::Error) -> bool {
    false
}
