//! Batch ingestion over a series catalog.
//!
//! Series are fetched one at a time, in catalog order. A failing series is
//! logged and skipped so the rest of the batch still completes; deciding
//! whether a missing series is tolerable is the downstream combiner's call.

use polars::prelude::*;
use tracing::{debug, error, info};

use econ_core::{DataError, Result, SeriesFrequency, SeriesProvider};

use crate::catalog::{SeriesCatalog, request_uri};

/// Remote endpoint settings for a batch run.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Base observations URL, without query parameters.
    pub api_base_url: String,
    /// API key appended to every request URI.
    pub api_key: String,
}

impl IngestConfig {
    /// Creates a config for the given endpoint and key.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Fetches every series in `catalog` through `provider` and combines the
/// results into one wide frame: a `date` column plus one column per series
/// that fetched successfully.
///
/// Frames are outer-joined on `date` and sorted; low-frequency series are
/// then forward-filled across the monthly grid, spreading each quarterly or
/// annual value over the months until the next one. An empty catalog, or a
/// batch where every series failed, yields an empty frame.
pub async fn ingest_catalog(
    provider: &dyn SeriesProvider,
    catalog: &SeriesCatalog,
    config: &IngestConfig,
) -> Result<DataFrame> {
    let mut fetched: Vec<(SeriesFrequency, DataFrame)> = Vec::with_capacity(catalog.len());

    for (frequency, series) in catalog.entries() {
        let uri = request_uri(&config.api_base_url, &config.api_key, series, frequency);
        info!(
            %series,
            frequency = frequency.label(),
            provider = provider.name(),
            "starting fetch"
        );
        match provider.fetch_series(series, &uri).await {
            Ok(frame) => {
                debug!(%series, rows = frame.height(), "fetch complete");
                fetched.push((frequency, frame));
            }
            // Per-series isolation: log and continue with the rest.
            Err(err) => error!(%series, %err, "fetch failed, continuing with remaining series"),
        }
    }

    info!(
        fetched = fetched.len(),
        requested = catalog.len(),
        "combining fetched series"
    );
    combine(fetched)
}

/// Outer-joins fetched frames on `date` and forward-fills the low-frequency
/// columns.
fn combine(fetched: Vec<(SeriesFrequency, DataFrame)>) -> Result<DataFrame> {
    let fill_forward: Vec<String> = fetched
        .iter()
        .filter(|(frequency, _)| frequency.needs_forward_fill())
        .flat_map(|(_, frame)| {
            frame
                .get_column_names()
                .into_iter()
                .filter(|name| name.as_str() != "date")
                .map(|name| name.to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    let mut frames = fetched.into_iter().map(|(_, frame)| frame);
    let mut joined = match frames.next() {
        Some(first) => first.lazy(),
        None => return Ok(DataFrame::empty()),
    };
    for frame in frames {
        joined = joined.join(
            frame.lazy(),
            [col("date")],
            [col("date")],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        );
    }

    let mut combined = joined
        .sort(["date"], Default::default())
        .collect()
        .map_err(|err| DataError::Format(format!("combining series: {err}")))?;

    for name in fill_forward {
        let filled = combined
            .column(name.as_str())
            .map_err(|err| DataError::Format(err.to_string()))?
            .as_materialized_series()
            .fill_null(FillNullStrategy::Forward(None))
            .map_err(|err| DataError::Format(err.to_string()))?;
        combined
            .replace(name.as_str(), filled)
            .map_err(|err| DataError::Format(err.to_string()))?;
    }

    Ok(combined)
}
