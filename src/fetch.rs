//! HTTP page fetching with randomized headers and retry/backoff.
//!
//! This module wraps a single GET in the pacing policy the standings sites
//! tolerate. It is split along the same seams as the rest of the pipeline:
//! - [`Transport`]: Core trait performing one GET and returning status + body
//! - [`ReqwestTransport`]: The production transport over a pooled `reqwest::Client`
//! - [`Fetcher`]: Decorator that adds pacing, header rotation and retries to any [`Transport`]
//!
//! # Retry Strategy
//!
//! - Up to `attempts` tries (3 by default)
//! - Before the first try: uniform [2, 5] s
//! - Before try `n` (0-based, `n > 0`): uniform [3, 8] s × (n + 1)
//! - 403 adds uniform [10, 20] s, 429 adds uniform [15, 30] s
//! - Any non-200 outcome except on the last try adds uniform [5, 10] s
//!
//! Exhausting the budget yields `None`, which callers treat as "no data from
//! this source" rather than as an error.

use crate::entropy::Entropy;
use crate::utils::truncate_for_log;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION,
    DNT, REFERER, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Desktop and mobile browser identities rotated per attempt.
pub const USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    // Safari on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    // Chrome on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Mobile
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Android 14; Mobile; rv:121.0) Gecko/121.0 Firefox/121.0",
];

/// Search-engine landing pages used as an occasional `Referer`.
pub const REFERERS: &[&str] = &[
    "https://www.google.com.mx/",
    "https://www.google.com/",
    "https://www.bing.com/",
    "https://duckduckgo.com/",
];

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// A closed range of seconds to wait, drawn uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    fn draw(&self, rng: &mut impl Entropy) -> Duration {
        Duration::from_secs_f64(rng.uniform(self.min_secs, self.max_secs).max(0.0))
    }
}

/// Timeouts, pool size and pacing for outbound requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchPolicy {
    pub attempts: u32,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    /// Idle connections kept per host.
    pub pool_size: usize,
    pub accept_invalid_certs: bool,
    pub referer_probability: f64,
    pub initial_delay: DelayRange,
    /// Multiplied by `attempt + 1` before every retry.
    pub retry_delay: DelayRange,
    pub forbidden_delay: DelayRange,
    pub rate_limited_delay: DelayRange,
    pub between_attempts: DelayRange,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            pool_size: 10,
            accept_invalid_certs: false,
            referer_probability: 0.7,
            initial_delay: DelayRange::new(2.0, 5.0),
            retry_delay: DelayRange::new(3.0, 8.0),
            forbidden_delay: DelayRange::new(10.0, 20.0),
            rate_limited_delay: DelayRange::new(15.0, 30.0),
            between_attempts: DelayRange::new(5.0, 10.0),
        }
    }
}

impl FetchPolicy {
    /// Wait before try `attempt` (0-based).
    fn delay_before(&self, attempt: u32, rng: &mut impl Entropy) -> Duration {
        if attempt == 0 {
            self.initial_delay.draw(rng)
        } else {
            self.retry_delay.draw(rng) * (attempt + 1)
        }
    }

    /// Same status handling, no waiting.
    #[cfg(test)]
    pub fn immediate() -> Self {
        let zero = DelayRange::new(0.0, 0.0);
        Self {
            initial_delay: zero,
            retry_delay: zero,
            forbidden_delay: zero,
            rate_limited_delay: zero,
            between_attempts: zero,
            ..Self::default()
        }
    }
}

/// Status code and body of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

/// Failure to obtain any response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// Performs a single GET.
///
/// Implementors only move bytes; pacing and retries belong to [`Fetcher`].
pub trait Transport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Page, TransportError>;
}

/// [`Transport`] over a shared, pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the client once; it is reused for every request so connections are pooled.
    pub fn new(policy: &FetchPolicy) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(policy.connect_timeout_secs))
            .read_timeout(Duration::from_secs(policy.read_timeout_secs))
            .pool_max_idle_per_host(policy.pool_size)
            .redirect(reqwest::redirect::Policy::limited(10))
            .danger_accept_invalid_certs(policy.accept_invalid_certs)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Page, TransportError> {
        let response = self.client.get(url).headers(headers).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Page { status, body })
    }
}

/// Build a fresh browser-like header set.
///
/// One user agent is picked uniformly from [`USER_AGENTS`]; with probability
/// `referer_probability` a `Referer` is picked from [`REFERERS`].
pub fn random_headers(rng: &mut impl Entropy, referer_probability: f64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let ua = USER_AGENTS[rng.index(USER_AGENTS.len())];
    headers.insert(USER_AGENT, HeaderValue::from_static(ua));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("es-MX,es;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    if rng.chance(referer_probability) {
        let referer = REFERERS[rng.index(REFERERS.len())];
        headers.insert(REFERER, HeaderValue::from_static(referer));
    }
    headers
}

/// How one attempt ended.
#[derive(Debug)]
enum Attempt {
    Success(Page),
    Forbidden,
    RateLimited,
    ServerError(u16),
    Unexpected(u16),
    Failed(TransportError),
}

impl Attempt {
    fn classify(result: Result<Page, TransportError>) -> Self {
        match result {
            Ok(page) => match page.status {
                200 => Attempt::Success(page),
                403 => Attempt::Forbidden,
                429 => Attempt::RateLimited,
                404 | 500 | 502 | 503 => Attempt::ServerError(page.status),
                other => {
                    debug!(
                        status = other,
                        body = %truncate_for_log(&page.body, 200),
                        "Unexpected response body"
                    );
                    Attempt::Unexpected(other)
                }
            },
            Err(e) => Attempt::Failed(e),
        }
    }
}

/// Adds pacing, header rotation and retries to a [`Transport`].
pub struct Fetcher<T> {
    transport: T,
    policy: FetchPolicy,
}

impl<T> fmt::Debug for Fetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, policy: FetchPolicy) -> Self {
        Self { transport, policy }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `url`, returning the first 200 response or `None` once the
    /// attempt budget is spent.
    #[instrument(level = "info", skip(self, rng))]
    pub async fn fetch(&self, url: &str, rng: &mut impl Entropy) -> Option<Page> {
        let total_t0 = Instant::now();
        let attempts = self.policy.attempts;

        for attempt in 0..attempts {
            let delay = self.policy.delay_before(attempt, rng);
            info!(attempt = attempt + 1, ?delay, "Waiting before request");
            sleep(delay).await;

            let headers = random_headers(rng, self.policy.referer_probability);
            let attempt_t0 = Instant::now();
            let outcome = Attempt::classify(self.transport.get(url, headers).await);
            let elapsed_ms_attempt = attempt_t0.elapsed().as_millis();

            match outcome {
                Attempt::Success(page) => {
                    info!(
                        attempt = attempt + 1,
                        status = page.status,
                        bytes = page.body.len(),
                        elapsed_ms_attempt,
                        elapsed_ms_total = total_t0.elapsed().as_millis(),
                        "Fetched page"
                    );
                    return Some(page);
                }
                Attempt::Forbidden => {
                    let wait = self.policy.forbidden_delay.draw(rng);
                    warn!(
                        attempt = attempt + 1,
                        status = 403,
                        ?wait,
                        "Access forbidden; backing off"
                    );
                    sleep(wait).await;
                }
                Attempt::RateLimited => {
                    let wait = self.policy.rate_limited_delay.draw(rng);
                    warn!(attempt = attempt + 1, status = 429, ?wait, "Rate limited; backing off");
                    sleep(wait).await;
                }
                Attempt::ServerError(status) => {
                    warn!(attempt = attempt + 1, status, "Server error");
                }
                Attempt::Unexpected(status) => {
                    warn!(attempt = attempt + 1, status, "Unexpected status");
                }
                Attempt::Failed(TransportError::Other(e)) => {
                    error!(attempt = attempt + 1, error = %e, elapsed_ms_attempt, "Request failed");
                }
                Attempt::Failed(e) => {
                    warn!(attempt = attempt + 1, error = %e, elapsed_ms_attempt, "Request failed");
                }
            }

            if attempt + 1 < attempts {
                sleep(self.policy.between_attempts.draw(rng)).await;
            }
        }

        error!(
            attempts,
            elapsed_ms_total = total_t0.elapsed().as_millis(),
            "Fetch exhausted retries"
        );
        None
    }
}
