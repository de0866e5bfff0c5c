//! Cache path resolution.
//!
//! Paths are a pure function of the destination directory, the series id and
//! the cache format. The sidecar name is format-independent so that the
//! validators survive a format change without being silently orphaned under
//! a different name.

use std::path::{Path, PathBuf};

use econ_core::{CacheFormat, SeriesId};

/// Suffix of the sidecar metadata file, appended to the series id.
pub const ORIG_META_SUFFIX: &str = ".orig.meta.json";

/// Resolves the data file and sidecar metadata file paths for a series.
///
/// Returns `(data_path, meta_path)`:
/// `dest/{series}.orig.{ext}` and `dest/{series}.orig.meta.json`.
#[must_use]
pub fn cache_paths(dest: &Path, series: &SeriesId, format: CacheFormat) -> (PathBuf, PathBuf) {
    let data_path = dest.join(format!("{series}.orig.{}", format.extension()));
    let meta_path = dest.join(format!("{series}{ORIG_META_SUFFIX}"));
    (data_path, meta_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_paths_shape() {
        let (data, meta) = cache_paths(
            Path::new("data/orig"),
            &SeriesId::new("UNRATE"),
            CacheFormat::Parquet,
        );
        assert_eq!(data, Path::new("data/orig/UNRATE.orig.parquet"));
        assert_eq!(meta, Path::new("data/orig/UNRATE.orig.meta.json"));
    }

    #[test]
    fn test_meta_path_is_format_independent() {
        let dest = Path::new("cache");
        let series = SeriesId::new("GDP");
        let (_, meta_parquet) = cache_paths(dest, &series, CacheFormat::Parquet);
        let (_, meta_csv) = cache_paths(dest, &series, CacheFormat::Csv);
        assert_eq!(meta_parquet, meta_csv);
    }

    #[test]
    fn test_data_path_tracks_format() {
        let dest = Path::new("cache");
        let series = SeriesId::new("GDP");
        let (feather, _) = cache_paths(dest, &series, CacheFormat::Feather);
        assert_eq!(feather, Path::new("cache/GDP.orig.feather"));
    }
}
