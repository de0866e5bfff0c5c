//! Provider trait for fetching series data.
//!
//! This module defines [`SeriesProvider`], the seam between the batch
//! ingestion step and a concrete data source. The ingestion step only ever
//! sees this trait, so its behavior (sequential fetches, per-series error
//! isolation) can be tested against stub providers.

use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::fmt::Debug;

use crate::{error::Result, series::SeriesId};

/// A source of economic time series.
///
/// Implementations fetch one series at a time and return it as a normalized
/// two-column frame: `date` and one value column named after the series.
#[async_trait]
pub trait SeriesProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g. "FRED"), used in logs.
    fn name(&self) -> &str;

    /// Fetches a single series from `request_uri`.
    ///
    /// The returned frame has a `date` column and a numeric column named
    /// after `series`. Implementations are free to serve the result from a
    /// local cache instead of the network.
    async fn fetch_series(&self, series: &SeriesId, request_uri: &str) -> Result<DataFrame>;
}
