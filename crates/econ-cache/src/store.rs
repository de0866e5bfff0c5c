//! Atomic frame persistence.
//!
//! The data file is written to a temporary sibling path and promoted with an
//! OS-level rename. A concurrent reader of the canonical path sees either
//! the complete previous version or the complete new version; a crash before
//! the rename leaves the previous version untouched. Concurrent writers to
//! the same series are not coordinated (last rename wins).

use polars::prelude::DataFrame;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use econ_core::{CacheFormat, DataError, Result};

use crate::format::write_frame;
use crate::meta::CacheMetadata;
use crate::paths::ORIG_META_SUFFIX;

/// Writes `frame` to `data_path` atomically, then best-effort saves the
/// sidecar when `meta` is non-empty.
///
/// Returns the canonical `data_path` for caller bookkeeping. Encoding and
/// rename failures surface as errors; a sidecar write failure does not,
/// since by then the data file has already been promoted and the sidecar is
/// advisory.
pub fn save_atomic(
    frame: &mut DataFrame,
    data_path: &Path,
    meta: &CacheMetadata,
    format: CacheFormat,
) -> Result<PathBuf> {
    let tmp_path = tmp_sibling(data_path);
    debug!(tmp = %tmp_path.display(), "writing frame to temporary file");

    if let Err(err) = write_frame(frame, &tmp_path, format) {
        // Leave the canonical path as it was; drop the partial temp file.
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    fs::rename(&tmp_path, data_path).map_err(|err| {
        let _ = fs::remove_file(&tmp_path);
        DataError::Storage(format!(
            "promoting {} to {}: {err}",
            tmp_path.display(),
            data_path.display()
        ))
    })?;

    if !meta.is_empty() {
        let meta_path = sidecar_path(data_path);
        if let Err(err) = meta.save(&meta_path) {
            warn!(path = %meta_path.display(), %err, "failed to save sidecar metadata");
        }
    }

    info!(path = %data_path.display(), rows = frame.height(), "cache file promoted");
    Ok(data_path.to_path_buf())
}

/// Temporary sibling of `data_path` in the same directory, so the final
/// rename never crosses a filesystem boundary.
fn tmp_sibling(data_path: &Path) -> PathBuf {
    let mut name = data_path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Sidecar path for a data file named `{series}.orig.{ext}`.
fn sidecar_path(data_path: &Path) -> PathBuf {
    let stem = data_path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default();
    data_path.with_file_name(format!("{stem}{ORIG_META_SUFFIX}"))
}
