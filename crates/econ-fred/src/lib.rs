#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/econdata/econdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! FRED (Federal Reserve Economic Data) provider.
//!
//! This crate implements the `econ-core` provider trait for the
//! [FRED API](https://fred.stlouisfed.org/docs/api/fred/), with a local
//! per-series file cache in front of the network:
//!
//! - Fresh cache files are served without any network round-trip
//! - Stale cache files turn into conditional requests (`If-None-Match` /
//!   `If-Modified-Since`), so an unchanged series costs a 304 and no body
//! - Cache writes are atomic: readers never observe a partial data file
//!
//! # Example
//!
//! ```no_run
//! use econ_fred::FredProvider;
//! use econ_core::{CacheFormat, SeriesId};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FredProvider::new();
//!     let series = SeriesId::new("UNRATE");
//!     let uri = "https://api.stlouisfed.org/fred/series/observations\
//!                ?series_id=UNRATE&api_key=...&file_type=json";
//!
//!     let frame = provider
//!         .fetch_with_cache(&series, uri, Path::new("data/orig"), 30.0, CacheFormat::Parquet)
//!         .await?;
//!     println!("Fetched {} rows", frame.height());
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use polars::prelude::*;
use reqwest::StatusCode;
use reqwest::header::{ETAG, HeaderMap, HeaderName, HeaderValue, LAST_MODIFIED};
use serde::Deserialize;
use tracing::{debug, info, warn};

use econ_cache::{CacheMetadata, cache_paths, read_frame, save_atomic};
use econ_core::{CacheFormat, Clock, DataError, Result, SeriesId, SeriesProvider, SystemClock};

/// Resilient HTTP client with bounded retries.
pub mod http;

pub use http::{RetryPolicy, RetryingClient};

/// Cache behavior for a configured provider instance.
#[derive(Clone, Debug)]
pub struct CacheSettings {
    /// Directory holding the per-series data and sidecar files.
    pub dest: PathBuf,
    /// Maximum cache age, in days, before a refetch is considered. Zero
    /// forces a (conditional) request on every call.
    pub max_age_days: f64,
    /// Encoding for cached data files.
    pub format: CacheFormat,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dest: PathBuf::from("data/orig"),
            max_age_days: 30.0,
            format: CacheFormat::Parquet,
        }
    }
}

/// FRED data provider with a local caching layer.
///
/// One series per call, fetched sequentially; the cache directory is the
/// only shared state and the atomic-rename discipline is its only guard.
pub struct FredProvider {
    client: RetryingClient,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
}

impl fmt::Debug for FredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FredProvider")
            .field("settings", &self.settings)
            .finish()
    }
}

impl Default for FredProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FredProvider {
    /// Creates a provider with default retry policy and cache settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(CacheSettings::default())
    }

    /// Creates a provider with the given cache settings.
    #[must_use]
    pub fn with_settings(settings: CacheSettings) -> Self {
        Self {
            client: RetryingClient::new(RetryPolicy::default()),
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    /// Replaces the retry policy (rebuilds the HTTP client).
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.client = RetryingClient::new(policy);
        self
    }

    /// Replaces the time source used for staleness decisions.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fetches a series, serving from the local cache when possible.
    ///
    /// The decision sequence: a data file younger than `max_age_days` is
    /// returned without touching the network; otherwise a GET carrying the
    /// cached validators is issued, a 304 re-serves the cached file, and a
    /// 200 is normalized, atomically persisted with fresh validators, and
    /// returned. Terminal HTTP errors surface per series so a batch caller
    /// can isolate them.
    pub async fn fetch_with_cache(
        &self,
        series: &SeriesId,
        request_uri: &str,
        dest: &Path,
        max_age_days: f64,
        format: CacheFormat,
    ) -> Result<DataFrame> {
        info!(%series, "fetching series");
        fs::create_dir_all(dest)
            .map_err(|err| DataError::Storage(format!("creating {}: {err}", dest.display())))?;

        let (data_path, meta_path) = cache_paths(dest, series, format);
        let meta = CacheMetadata::load_or_default(&meta_path);

        if let Some(age_days) = self.cache_age_days(&data_path) {
            if age_days <= max_age_days {
                debug!(%series, age_days, max_age_days, "cache is fresh, serving from disk");
                return read_frame(&data_path, format);
            }
            debug!(%series, age_days, max_age_days, "cache is stale");
        }

        let response = self
            .client
            .get(request_uri, conditional_headers(&meta))
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            if data_path.exists() {
                debug!(%series, "not modified, serving cached frame");
                return read_frame(&data_path, format);
            }
            // The server validated a cached copy we do not have; nothing to
            // return, so treat it as a failed fetch.
            return Err(DataError::Http {
                series: series.to_string(),
                status: status.as_u16(),
                body: "304 Not Modified without a cached data file".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%series, status = status.as_u16(), "terminal HTTP failure");
            return Err(DataError::Http {
                series: series.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let etag = header_string(response.headers(), &ETAG);
        let last_modified = header_string(response.headers(), &LAST_MODIFIED);

        let page: ObservationsPage = response
            .json()
            .await
            .map_err(|err| DataError::MalformedResponse(format!("{series}: {err}")))?;
        let observations = page.observations.ok_or_else(|| {
            DataError::MalformedResponse(format!("missing observations for {series}"))
        })?;
        info!(
            %series,
            count = page.count.unwrap_or(observations.len() as u64),
            "received observations"
        );

        let mut frame = normalize_observations(series, &observations)?;

        let fresh = CacheMetadata {
            fetched_at: Some(self.clock.now()),
            etag,
            last_modified,
        };
        save_atomic(&mut frame, &data_path, &fresh, format)?;

        Ok(frame)
    }

    /// Age of the cached data file in fractional days, or `None` when no
    /// cache file exists (or its mtime is unreadable).
    fn cache_age_days(&self, data_path: &Path) -> Option<f64> {
        let modified: DateTime<Utc> = fs::metadata(data_path).ok()?.modified().ok()?.into();
        let age = self.clock.now().signed_duration_since(modified);
        Some(age.num_milliseconds() as f64 / 86_400_000.0)
    }
}

#[async_trait]
impl SeriesProvider for FredProvider {
    fn name(&self) -> &str {
        "FRED"
    }

    async fn fetch_series(&self, series: &SeriesId, request_uri: &str) -> Result<DataFrame> {
        self.fetch_with_cache(
            series,
            request_uri,
            &self.settings.dest,
            self.settings.max_age_days,
            self.settings.format,
        )
        .await
    }
}

/// Observations page of the FRED API response.
#[derive(Debug, Deserialize)]
struct ObservationsPage {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    observations: Option<Vec<Observation>>,
}

/// One dated observation. FRED sends values as strings, with `"."` standing
/// in for a missing value.
#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// Builds conditional request headers from cached validators.
fn conditional_headers(meta: &CacheMetadata) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(etag) = &meta.etag {
        if let Ok(value) = HeaderValue::from_str(etag) {
            headers.insert(reqwest::header::IF_NONE_MATCH, value);
        }
    }
    if let Some(last_modified) = &meta.last_modified {
        if let Ok(value) = HeaderValue::from_str(last_modified) {
            headers.insert(reqwest::header::IF_MODIFIED_SINCE, value);
        }
    }
    headers
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Normalizes raw observations into the canonical two-column frame.
///
/// `date` is parsed as `%Y-%m-%d` into a `Date` column; the value column is
/// named after the series and coerced to `f64`, with unparseable entries
/// (FRED's `"."` placeholder included) mapped to null rather than failing.
fn normalize_observations(series: &SeriesId, observations: &[Observation]) -> Result<DataFrame> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

    let mut dates = Vec::with_capacity(observations.len());
    for obs in observations {
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|_| {
            DataError::MalformedResponse(format!(
                "unparseable observation date {:?} for {series}",
                obs.date
            ))
        })?;
        dates.push((date - epoch).num_days() as i32);
    }

    let values: Vec<Option<f64>> = observations
        .iter()
        .map(|obs| obs.value.trim().parse::<f64>().ok())
        .collect();

    let date_col = Column::new("date".into(), dates)
        .cast(&DataType::Date)
        .map_err(|err| DataError::Format(err.to_string()))?;
    let value_col = Column::new(series.as_str().into(), values);

    DataFrame::new(vec![date_col, value_col]).map_err(|err| DataError::Format(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use econ_core::FixedClock;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn obs(date: &str, value: &str) -> Observation {
        Observation {
            date: date.to_string(),
            value: value.to_string(),
        }
    }

    fn fast_provider(settings: CacheSettings) -> FredProvider {
        FredProvider::with_settings(settings).with_retry_policy(RetryPolicy {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1),
            backoff_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        })
    }

    fn file_mtime(path: &Path) -> DateTime<Utc> {
        fs::metadata(path).unwrap().modified().unwrap().into()
    }

    #[test]
    fn test_normalize_coerces_missing_values() {
        let series = SeriesId::new("FOO");
        let frame = normalize_observations(
            &series,
            &[obs("2020-01-01", "1.5"), obs("2020-02-01", ".")],
        )
        .unwrap();

        assert_eq!(frame.height(), 2);
        let names: Vec<&str> = frame.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["date", "FOO"]);

        let values = frame.column("FOO").unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(1.5));
        assert_eq!(values.get(1), None);
        assert_eq!(frame.column("date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let series = SeriesId::new("FOO");
        let observations = [
            obs("2020-01-01", "1.5"),
            obs("2020-02-01", "."),
            obs("2020-03-01", "not a number"),
        ];
        let first = normalize_observations(&series, &observations).unwrap();
        let second = normalize_observations(&series, &observations).unwrap();
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn test_normalize_rejects_bad_date() {
        let series = SeriesId::new("FOO");
        let err = normalize_observations(&series, &[obs("01/02/2020", "1.0")]).unwrap_err();
        assert!(matches!(err, DataError::MalformedResponse(_)));
    }

    #[test]
    fn test_conditional_headers_carry_validators() {
        let meta = CacheMetadata {
            fetched_at: None,
            etag: Some("\"abc123\"".to_string()),
            last_modified: Some("Wed, 01 Jan 2025 00:00:00 GMT".to_string()),
        };
        let headers = conditional_headers(&meta);
        assert_eq!(
            headers.get(reqwest::header::IF_NONE_MATCH).unwrap(),
            "\"abc123\""
        );
        assert_eq!(
            headers.get(reqwest::header::IF_MODIFIED_SINCE).unwrap(),
            "Wed, 01 Jan 2025 00:00:00 GMT"
        );

        assert!(conditional_headers(&CacheMetadata::default()).is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_fetch_persists_cache_pair() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/obs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ETag", "\"v1\"")
                    .insert_header("Last-Modified", "Wed, 01 Jan 2025 00:00:00 GMT")
                    .set_body_json(json!({
                        "count": 2,
                        "observations": [
                            {"date": "2020-01-01", "value": "1.5"},
                            {"date": "2020-02-01", "value": "."}
                        ]
                    })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let provider = fast_provider(CacheSettings::default());
        let series = SeriesId::new("FOO");

        let frame = provider
            .fetch_with_cache(
                &series,
                &format!("{}/obs", server.uri()),
                dir.path(),
                30.0,
                CacheFormat::Parquet,
            )
            .await
            .unwrap();

        assert_eq!(frame.height(), 2);
        let names: Vec<&str> = frame.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["date", "FOO"]);
        let values = frame.column("FOO").unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(1.5));
        assert_eq!(values.get(1), None);

        let data_path = dir.path().join("FOO.orig.parquet");
        let meta_path = dir.path().join("FOO.orig.meta.json");
        assert!(data_path.exists());
        let meta = CacheMetadata::load(&meta_path).unwrap();
        assert!(meta.fetched_at.is_some());
        assert_eq!(meta.etag.as_deref(), Some("\"v1\""));
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let series = SeriesId::new("FOO");
        let (data_path, _) = cache_paths(dir.path(), &series, CacheFormat::Parquet);
        let mut cached =
            normalize_observations(&series, &[obs("2020-01-01", "1.5")]).unwrap();
        save_atomic(
            &mut cached,
            &data_path,
            &CacheMetadata::default(),
            CacheFormat::Parquet,
        )
        .unwrap();

        // Exactly max_age_days old is still fresh; a hair older is not
        // (covered by test_stale_cache_triggers_request below).
        for age in [
            ChronoDuration::days(29),
            ChronoDuration::days(30),
        ] {
            let clock = Arc::new(FixedClock::new(file_mtime(&data_path) + age));
            let provider = fast_provider(CacheSettings::default()).with_clock(clock);

            let frame = provider
                .fetch_with_cache(
                    &series,
                    &format!("{}/obs", server.uri()),
                    dir.path(),
                    30.0,
                    CacheFormat::Parquet,
                )
                .await
                .unwrap();
            assert_eq!(frame.height(), 1);
        }
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/obs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "observations": [{"date": "2021-01-01", "value": "2.0"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let series = SeriesId::new("FOO");
        let (data_path, _) = cache_paths(dir.path(), &series, CacheFormat::Parquet);
        let mut cached =
            normalize_observations(&series, &[obs("2020-01-01", "1.5")]).unwrap();
        save_atomic(
            &mut cached,
            &data_path,
            &CacheMetadata::default(),
            CacheFormat::Parquet,
        )
        .unwrap();

        let age = ChronoDuration::days(30) + ChronoDuration::hours(1);
        let clock = Arc::new(FixedClock::new(file_mtime(&data_path) + age));
        let provider = fast_provider(CacheSettings::default()).with_clock(clock);

        let frame = provider
            .fetch_with_cache(
                &series,
                &format!("{}/obs", server.uri()),
                dir.path(),
                30.0,
                CacheFormat::Parquet,
            )
            .await
            .unwrap();

        // The refreshed frame replaced the cached one.
        let values = frame.column("FOO").unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(2.0));
    }

    #[tokio::test]
    async fn test_not_modified_serves_cached_frame() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/obs"))
            .and(header("If-None-Match", "\"v1\""))
            .respond_with(ResponseTemplate::new(304))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let series = SeriesId::new("FOO");
        let (data_path, meta_path) = cache_paths(dir.path(), &series, CacheFormat::Parquet);
        let seeded = CacheMetadata {
            fetched_at: None,
            etag: Some("\"v1\"".to_string()),
            last_modified: None,
        };
        let mut cached =
            normalize_observations(&series, &[obs("2020-01-01", "1.5")]).unwrap();
        save_atomic(&mut cached, &data_path, &seeded, CacheFormat::Parquet).unwrap();

        let clock = Arc::new(FixedClock::new(
            file_mtime(&data_path) + ChronoDuration::days(60),
        ));
        let provider = fast_provider(CacheSettings::default()).with_clock(clock);

        let frame = provider
            .fetch_with_cache(
                &series,
                &format!("{}/obs", server.uri()),
                dir.path(),
                30.0,
                CacheFormat::Parquet,
            )
            .await
            .unwrap();

        assert!(frame.equals_missing(&cached));
        // No rewrite happened: the sidecar still holds the seeded record.
        assert_eq!(CacheMetadata::load(&meta_path).unwrap(), seeded);
    }

    #[tokio::test]
    async fn test_not_modified_without_cache_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let provider = fast_provider(CacheSettings::default());

        let err = provider
            .fetch_with_cache(
                &SeriesId::new("FOO"),
                &format!("{}/obs", server.uri()),
                dir.path(),
                30.0,
                CacheFormat::Parquet,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Http { status: 304, .. }));
    }

    #[tokio::test]
    async fn test_terminal_status_surfaces_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("unknown series"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let provider = fast_provider(CacheSettings::default());

        let err = provider
            .fetch_with_cache(
                &SeriesId::new("NOPE"),
                &format!("{}/obs", server.uri()),
                dir.path(),
                30.0,
                CacheFormat::Parquet,
            )
            .await
            .unwrap_err();
        match err {
            DataError::Http {
                series,
                status,
                body,
            } => {
                assert_eq!(series, "NOPE");
                assert_eq!(status, 404);
                assert_eq!(body, "unknown series");
            }
            other => panic!("expected Http error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_observations_is_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let provider = fast_provider(CacheSettings::default());

        let err = provider
            .fetch_with_cache(
                &SeriesId::new("FOO"),
                &format!("{}/obs", server.uri()),
                dir.path(),
                30.0,
                CacheFormat::Parquet,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_retries_exhausted_surface_last_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let provider = fast_provider(CacheSettings::default());

        let err = provider
            .fetch_with_cache(
                &SeriesId::new("FOO"),
                &format!("{}/obs", server.uri()),
                dir.path(),
                30.0,
                CacheFormat::Parquet,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Http { status: 503, .. }));
    }
}
