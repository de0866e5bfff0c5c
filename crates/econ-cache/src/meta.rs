//! Sidecar metadata records.
//!
//! The sidecar carries the fetch timestamp and the HTTP validators (`ETag`,
//! `Last-Modified`) of the last successful fetch. It is advisory only: an
//! absent or unreadable sidecar means "no validators known", which costs one
//! unconditional refetch and nothing else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use econ_core::{DataError, Result};

/// Freshness bookkeeping for one cached series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// When the cached data file was fetched.
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
    /// `ETag` response header of the last fetch, if the server sent one.
    #[serde(default)]
    pub etag: Option<String>,
    /// `Last-Modified` response header of the last fetch, if the server sent
    /// one.
    #[serde(default)]
    pub last_modified: Option<String>,
}

impl CacheMetadata {
    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fetched_at.is_none() && self.etag.is_none() && self.last_modified.is_none()
    }

    /// Loads a sidecar record.
    ///
    /// An absent file is an empty record, not an error. A file that exists
    /// but is not valid JSON is [`DataError::CorruptMetadata`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no sidecar metadata, treating as empty");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(DataError::Storage(format!(
                    "reading {}: {err}",
                    path.display()
                )));
            }
        };
        serde_json::from_str(&text).map_err(|_| DataError::CorruptMetadata {
            path: path.to_path_buf(),
        })
    }

    /// Loads a sidecar record, degrading every failure to an empty record.
    ///
    /// This is what the fetch path uses: metadata never fails a fetch, it
    /// only decides whether the next request can be conditional.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "unreadable sidecar metadata, treating as empty");
            Self::default()
        })
    }

    /// Serializes the record as JSON, overwriting `path`.
    ///
    /// A plain overwrite: a torn sidecar write only degrades cache-hit
    /// efficiency, so it does not get the atomic-rename treatment the data
    /// file does.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string(self).map_err(|err| DataError::Format(err.to_string()))?;
        fs::write(path, json)
            .map_err(|err| DataError::Storage(format!("writing {}: {err}", path.display())))
    }
}
