//! On-disk cache encodings.
//!
//! This module defines [`CacheFormat`], the closed set of encodings a cached
//! series frame can be written in. Exactly one format is used for a given
//! series across its cache lifetime; mixing formats for the same series is
//! not reconciled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Encoding used for a cached series data file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheFormat {
    /// Apache Parquet: typed columnar binary. The default; preserves column
    /// dtypes and compresses well.
    #[default]
    Parquet,
    /// Arrow IPC ("feather"): untyped-for-our-purposes columnar binary kept
    /// for interoperability.
    Feather,
    /// Delimited text for simple interoperability; no dtype fidelity.
    Csv,
}

impl CacheFormat {
    /// File extension used for data files in this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Feather => "feather",
            Self::Csv => "csv",
        }
    }

    /// Returns true if a round-trip through this format preserves column
    /// dtypes exactly.
    #[must_use]
    pub const fn preserves_dtypes(&self) -> bool {
        matches!(self, Self::Parquet)
    }
}

impl fmt::Display for CacheFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for CacheFormat {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parquet" => Ok(Self::Parquet),
            "feather" | "ipc" => Ok(Self::Feather),
            "csv" => Ok(Self::Csv),
            other => Err(DataError::Config(format!("unknown cache format: {other}"))),
        }
    }
}
