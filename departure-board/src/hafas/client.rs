//! transport.rest HTTP client.
//!
//! Queries the HAFAS `/journeys` endpoint and hands back the raw journeys.
//! Transient failures are retried with a fixed delay; once the attempt
//! budget is spent the fetch yields an empty list rather than an error.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::domain::{ProductSet, StationId};
use crate::pipeline::JourneySource;
use crate::retry::{DEFAULT_RETRY_DELAY, RetryError, RetryPolicy, with_retry};

use super::error::HafasError;
use super::types::{RawJourney, RawJourneysResponse};

/// Default base URL (BVG profile of transport.rest).
pub const DEFAULT_BASE_URL: &str = "https://v6.bvg.transport.rest";

/// Default number of journeys requested per query.
pub const DEFAULT_RESULTS: u8 = 6;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_USER_AGENT: &str = concat!("departure-board/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body characters kept in error messages.
const BODY_SNIPPET_LEN: usize = 500;

/// Configuration for the journey API client.
#[derive(Debug, Clone)]
pub struct HafasConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Number of journeys requested per query
    pub results: u8,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Pause between retry attempts
    pub retry_delay: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl HafasConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            results: DEFAULT_RESULTS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_delay: DEFAULT_RETRY_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom base URL (for testing or another HAFAS profile).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the number of journeys requested per query.
    pub fn with_results(mut self, results: u8) -> Self {
        self.results = results;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the pause between retry attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for HafasConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Journey API client.
#[derive(Debug, Clone)]
pub struct HafasClient {
    http: reqwest::Client,
    base_url: String,
    results: u8,
    retry_delay: Duration,
}

impl HafasClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HafasConfig) -> Result<Self, HafasError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            results: config.results,
            retry_delay: config.retry_delay,
        })
    }

    /// Query parameters for a journeys request.
    fn query(
        &self,
        origin: &StationId,
        destination: &StationId,
        products: &ProductSet,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("from", origin.as_str().to_string()),
            ("to", destination.as_str().to_string()),
            ("results", self.results.to_string()),
        ];
        query.extend(
            products
                .query_flags()
                .into_iter()
                .map(|(name, enabled)| (name, enabled.to_string())),
        );
        query.push(("stopovers", "false".to_string()));
        query.push(("remarks", "false".to_string()));
        query
    }

    /// Make a single journeys request.
    ///
    /// A success status whose body is not JSON, or has no `journeys` array,
    /// is reported as `HafasError::Malformed`.
    pub async fn try_fetch_journeys(
        &self,
        origin: &StationId,
        destination: &StationId,
        products: &ProductSet,
    ) -> Result<Vec<RawJourney>, HafasError> {
        let url = format!("{}/journeys", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&self.query(origin, destination, products))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HafasError::Api {
                status: status.as_u16(),
                message: body.chars().take(BODY_SNIPPET_LEN).collect(),
            });
        }

        let body = response.text().await?;

        let parsed: RawJourneysResponse =
            serde_json::from_str(&body).map_err(|e| HafasError::Malformed {
                message: e.to_string(),
                body: Some(body.chars().take(BODY_SNIPPET_LEN).collect()),
            })?;

        parsed.into_journeys().ok_or_else(|| HafasError::Malformed {
            message: "missing journeys array".to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_LEN).collect()),
        })
    }

    /// Fetch journeys, retrying transient failures.
    ///
    /// Makes at most `max_attempts` requests (at least one), pausing the
    /// configured retry delay in between. If every attempt fails
    /// transiently, returns an empty list. Errors that retrying cannot fix
    /// are returned as `Err`.
    #[instrument(skip(self, products), fields(from = %origin, to = %destination))]
    pub async fn fetch_journeys(
        &self,
        origin: &StationId,
        destination: &StationId,
        products: &ProductSet,
        max_attempts: u32,
    ) -> Result<Vec<RawJourney>, HafasError> {
        let policy = RetryPolicy::new(max_attempts, self.retry_delay);

        let result = with_retry(&policy, || {
            self.try_fetch_journeys(origin, destination, products)
        })
        .await;

        match result {
            Ok(journeys) => {
                debug!(count = journeys.len(), "fetched journeys");
                Ok(journeys)
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                warn!(attempts, error = %last, "giving up on journeys query, returning no journeys");
                Ok(Vec::new())
            }
            Err(RetryError::Permanent(e)) => Err(e),
        }
    }
}

#[async_trait]
impl JourneySource for HafasClient {
    async fn journeys(
        &self,
        origin: &StationId,
        destination: &StationId,
        products: &ProductSet,
        max_attempts: u32,
    ) -> Result<Vec<RawJourney>, HafasError> {
        self.fetch_journeys(origin, destination, products, max_attempts)
            .await
    }
}
