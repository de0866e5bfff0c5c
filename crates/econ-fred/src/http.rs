//! Resilient HTTP client.
//!
//! All provider traffic is idempotent GETs, so transient server failures and
//! rate limiting are retried with exponential backoff plus jitter. Anything
//! that is not a GET gets exactly one attempt regardless of policy; that
//! guard lives in the request path itself, not in configuration.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use econ_core::{DataError, Result};

/// Statuses worth retrying: rate limiting and transient server-side errors.
const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry and timeout configuration for [`RetryingClient`].
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total request attempts, including the first (default 3).
    pub max_attempts: u32,
    /// Base delay before the first retry; doubles each attempt.
    pub backoff_base: Duration,
    /// Upper bound of the uniform jitter added to each delay.
    pub backoff_jitter: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout, bounding worst-case latency per attempt.
    pub read_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
            backoff_jitter: Duration::from_millis(1500),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client wrapper with bounded automatic retries.
#[derive(Clone, Debug)]
pub struct RetryingClient {
    client: Client,
    policy: RetryPolicy,
}

impl RetryingClient {
    /// Creates a client with the given retry policy and its timeouts.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        let client = Client::builder()
            .connect_timeout(policy.connect_timeout)
            .timeout(policy.read_timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, policy }
    }

    /// Issues a GET request, retrying on retryable statuses and connection
    /// errors up to the policy budget.
    ///
    /// Once attempts are exhausted the last received response is returned as
    /// `Ok` for the caller to inspect; a final connection-level failure is
    /// [`DataError::Network`].
    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response> {
        self.execute(Method::GET, url, headers).await
    }

    async fn execute(&self, method: Method, url: &str, headers: HeaderMap) -> Result<Response> {
        // Hard constraint: only GETs are idempotent here, so only GETs ever
        // get a retry budget larger than one.
        let budget = if method == Method::GET {
            self.policy.max_attempts.max(1)
        } else {
            1
        };

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let request = self
                .client
                .request(method.clone(), url)
                .headers(headers.clone());

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if attempt < budget && is_retryable(status) {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            url,
                            status = status.as_u16(),
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "retryable status, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    debug!(url, status = status.as_u16(), attempt, "request settled");
                    return Ok(response);
                }
                Err(err) if attempt < budget => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        url,
                        attempt,
                        %err,
                        delay_ms = delay.as_millis() as u64,
                        "request failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    return Err(DataError::Network(format!("GET {url}: {err}")));
                }
            }
        }
    }

    /// Exponential delay for the given attempt number plus uniform jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let doubled = self
            .policy
            .backoff_base
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        doubled + self.policy.backoff_jitter.mul_f64(fastrand::f64())
    }
}

fn is_retryable(status: StatusCode) -> bool {
    RETRY_STATUSES.contains(&status.as_u16())
}
