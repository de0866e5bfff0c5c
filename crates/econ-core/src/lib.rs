#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/econdata/econdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for economic data acquisition.
//!
//! This crate provides the foundational abstractions shared by the cache and
//! provider crates:
//!
//! - [`SeriesId`](series::SeriesId) - Identifier of one external time series
//! - [`SeriesFrequency`](series::SeriesFrequency) - Catalog frequency groups
//! - [`CacheFormat`](format::CacheFormat) - On-disk encoding selector
//! - [`Clock`](clock::Clock) - Injectable time source
//! - [`SeriesProvider`](provider::SeriesProvider) - Provider trait
//! - [`DataError`](error::DataError) - Error taxonomy

/// Injectable time source for staleness decisions.
pub mod clock;
/// Error types for fetch and cache operations.
pub mod error;
/// On-disk cache encodings.
pub mod format;
/// Provider trait for fetching series data.
pub mod provider;
/// Series identifier and frequency types.
pub mod series;

// Re-export commonly used items at crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DataError, Result};
pub use format::CacheFormat;
pub use provider::SeriesProvider;
pub use series::{SeriesFrequency, SeriesId};
