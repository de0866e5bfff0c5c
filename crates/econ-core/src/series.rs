//! Series identifier and frequency types.
//!
//! This module defines [`SeriesId`], the opaque token naming one external
//! economic time series, and [`SeriesFrequency`], the catalog groups used by
//! the batch ingestion step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one external economic time series.
///
/// Identifiers are automatically uppercased on creation; FRED series ids are
/// case-insensitive but canonically uppercase (e.g. `UNRATE`, `GDP`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesId(String);

impl SeriesId {
    /// Creates a new series id from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the series id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeriesId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SeriesId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Native reporting frequency group of a series in the ingestion catalog.
///
/// The target grid for the combined dataset is monthly; the group decides how
/// a series is requested and whether its values must be spread across months
/// after the join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesFrequency {
    /// Reported monthly; used as-is.
    Monthly,
    /// Reported more often than monthly; aggregated to end-of-period months
    /// by the remote API.
    HighFrequency,
    /// Reported quarterly or annually; forward-filled across the monthly
    /// grid after combination.
    LowFrequency,
}

impl SeriesFrequency {
    /// Returns true if the remote API must aggregate this series down to
    /// monthly observations.
    #[must_use]
    pub const fn needs_monthly_aggregation(&self) -> bool {
        matches!(self, Self::HighFrequency)
    }

    /// Returns true if values must be forward-filled across the monthly grid.
    #[must_use]
    pub const fn needs_forward_fill(&self) -> bool {
        matches!(self, Self::LowFrequency)
    }

    /// Human-readable label used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::HighFrequency => "high-frequency",
            Self::LowFrequency => "low-frequency",
        }
    }
}
