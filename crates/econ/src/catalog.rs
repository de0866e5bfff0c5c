//! Series catalog and request URI construction.
//!
//! The catalog is a small JSON document listing the series to ingest,
//! grouped by native reporting frequency. The groups drive both the request
//! parameters (high-frequency series are aggregated to monthly by the API)
//! and the post-join treatment (low-frequency series are forward-filled).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use econ_core::{DataError, Result, SeriesFrequency, SeriesId};

/// The series to ingest, grouped by native reporting frequency.
///
/// ```json
/// {
///   "monthly_series": ["UNRATE", "CPIAUCNS"],
///   "hf_series": ["DFF"],
///   "lf_series": ["GDP", "MEHOINUSA646N"]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesCatalog {
    /// Series reported monthly.
    #[serde(default)]
    pub monthly_series: Vec<SeriesId>,
    /// Series reported more often than monthly; requested with end-of-period
    /// monthly aggregation.
    #[serde(default)]
    pub hf_series: Vec<SeriesId>,
    /// Series reported quarterly or annually; forward-filled after the join.
    #[serde(default)]
    pub lf_series: Vec<SeriesId>,
}

impl SeriesCatalog {
    /// Loads a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| DataError::Config(format!("reading {}: {err}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|err| DataError::Config(format!("parsing {}: {err}", path.display())))
    }

    /// Total number of series across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.monthly_series.len() + self.hf_series.len() + self.lf_series.len()
    }

    /// Returns true if no group lists any series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(frequency, series)` pairs in ingestion order: monthly,
    /// then high-frequency, then low-frequency.
    pub fn entries(&self) -> impl Iterator<Item = (SeriesFrequency, &SeriesId)> {
        self.monthly_series
            .iter()
            .map(|series| (SeriesFrequency::Monthly, series))
            .chain(
                self.hf_series
                    .iter()
                    .map(|series| (SeriesFrequency::HighFrequency, series)),
            )
            .chain(
                self.lf_series
                    .iter()
                    .map(|series| (SeriesFrequency::LowFrequency, series)),
            )
    }
}

/// Builds the fully formed observations request URI for one series.
///
/// High-frequency series ask the API for end-of-period monthly aggregation
/// so every fetched frame lands on the same monthly grid.
#[must_use]
pub fn request_uri(
    api_base_url: &str,
    api_key: &str,
    series: &SeriesId,
    frequency: SeriesFrequency,
) -> String {
    let mut uri = format!("{api_base_url}?series_id={series}&api_key={api_key}&file_type=json");
    if frequency.needs_monthly_aggregation() {
        uri.push_str("&frequency=m&aggregation_method=eop");
    }
    uri
}
