#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/econdata/econdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! On-disk cache for series frames.
//!
//! Each cached series is a pair of co-located files under the destination
//! directory: a data file (`{series}.orig.{ext}`) holding the two-column
//! frame, and an advisory JSON sidecar (`{series}.orig.meta.json`) holding
//! freshness validators. The data file is only ever replaced through an
//! atomic rename, so readers never observe a partial write; the sidecar has
//! no such guarantee and is treated as best-effort everywhere.

/// Frame encode/decode for the supported cache formats.
pub mod format;
/// Sidecar metadata records.
pub mod meta;
/// Cache path resolution.
pub mod paths;
/// Atomic frame persistence.
pub mod store;

pub use format::{read_frame, write_frame};
pub use meta::CacheMetadata;
pub use paths::{ORIG_META_SUFFIX, cache_paths};
pub use store::save_atomic;
