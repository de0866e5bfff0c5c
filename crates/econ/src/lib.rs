#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/econdata/econdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Economic time-series acquisition pipeline.
//!
//! This crate ties the workspace together: it re-exports the core types and
//! the caching layer, and adds the batch ingestion step that walks a series
//! catalog, fetches every series through a [`SeriesProvider`], and combines
//! the results into one wide monthly frame.
//!
//! # Features
//!
//! - `fred` - FRED provider (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use econ::{FredProvider, IngestConfig, SeriesCatalog, ingest_catalog};
//!
//! #[tokio::main]
//! async fn main() -> econ::Result<()> {
//!     let catalog = SeriesCatalog::load("config/fred_series.json".as_ref())?;
//!     let config = IngestConfig::new(
//!         "https://api.stlouisfed.org/fred/series/observations",
//!         std::env::var("FRED_API_KEY").expect("FRED_API_KEY not set"),
//!     );
//!
//!     let provider = FredProvider::new();
//!     let combined = ingest_catalog(&provider, &catalog, &config).await?;
//!     println!("{} rows x {} series", combined.height(), combined.width() - 1);
//!     Ok(())
//! }
//! ```

/// Series catalog and request URI construction.
pub mod catalog;
/// Batch ingestion over a series catalog.
pub mod ingest;

// Core types and traits
pub use econ_core::*;

// Cache layer
pub use econ_cache::{CacheMetadata, cache_paths, read_frame, save_atomic, write_frame};

// Providers
#[cfg(feature = "fred")]
pub use econ_fred::{CacheSettings, FredProvider, RetryPolicy, RetryingClient};

pub use catalog::{SeriesCatalog, request_uri};
pub use ingest::{IngestConfig, ingest_catalog};
