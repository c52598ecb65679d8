use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;

/// Failure of an upstream provider call. Any one of these fails the whole
/// request; individual missing fields inside a successful payload never do.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Non-success HTTP status from the provider
    #[error("upstream returned HTTP {status}")]
    Status { status: reqwest::StatusCode },
    /// Transport-level failure (connect, timeout, TLS)
    #[error("upstream request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    /// Response body was not valid JSON
    #[error("upstream response was not valid JSON: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
}

/// Data source seam for the aggregator. The production implementation talks
/// to ESPN; tests substitute canned payloads.
#[async_trait]
pub trait SportsDataSource: Send + Sync {
    /// Scoreboard for the current window.
    async fn scoreboard(&self) -> Result<Value, UpstreamError>;

    /// Scoreboard for the extended forward window, so the next fixture is
    /// found even when it falls outside the near-term query.
    async fn scoreboard_ahead(&self) -> Result<Value, UpstreamError>;

    /// League table.
    async fn standings(&self) -> Result<Value, UpstreamError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Client for the ESPN site API (scoreboard) and v2 API (standings).
/// Holds no cache state; freshness is delegated to the HTTP cache in front
/// of the service.
pub struct EspnClient {
    http: Client,
    site_api_url: String,
    v2_api_url: String,
    league_code: String,
    lookahead_days: u32,
    retries: u32,
}

const RETRY_PAUSE: Duration = Duration::from_millis(250);

impl EspnClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            // ESPN rejects requests without a browser-ish user agent
            .user_agent("Mozilla/5.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EspnClient {
            http,
            site_api_url: config.espn_site_api_url.clone(),
            v2_api_url: config.espn_v2_api_url.clone(),
            league_code: config.league_code.clone(),
            lookahead_days: config.lookahead_days,
            retries: config.upstream_retries,
        })
    }

    async fn fetch(&self, url: &str) -> Result<Value, UpstreamError> {
        debug!("Fetching {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| UpstreamError::Request { source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { status });
        }

        resp.json::<Value>()
            .await
            .map_err(|source| UpstreamError::Decode { source })
    }

    /// Retry wrapper around `fetch` with a short fixed pause between
    /// attempts. The last error wins.
    async fn fetch_with_retry(&self, url: &str) -> Result<Value, UpstreamError> {
        let mut attempt = 0;
        loop {
            match self.fetch(url).await {
                Ok(payload) => return Ok(payload),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        "Upstream call to {} failed (attempt {}/{}): {}",
                        url,
                        attempt,
                        self.retries + 1,
                        e
                    );
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Date range for the extended window, `YYYYMMDD-YYYYMMDD` from today
    /// through the configured lookahead.
    fn ahead_range(&self, now: DateTime<Utc>) -> String {
        let start = now.date_naive();
        let end = start + Days::new(u64::from(self.lookahead_days));
        format!("{}-{}", start.format("%Y%m%d"), end.format("%Y%m%d"))
    }
}

#[async_trait]
impl SportsDataSource for EspnClient {
    async fn scoreboard(&self) -> Result<Value, UpstreamError> {
        let url = format!(
            "{}/soccer/{}/scoreboard",
            self.site_api_url, self.league_code
        );
        self.fetch_with_retry(&url).await
    }

    async fn scoreboard_ahead(&self) -> Result<Value, UpstreamError> {
        let url = format!(
            "{}/soccer/{}/scoreboard?dates={}",
            self.site_api_url,
            self.league_code,
            self.ahead_range(Utc::now())
        );
        self.fetch_with_retry(&url).await
    }

    async fn standings(&self) -> Result<Value, UpstreamError> {
        let url = format!("{}/soccer/{}/standings", self.v2_api_url, self.league_code);
        self.fetch_with_retry(&url).await
    }

    fn name(&self) -> &str {
        "ESPN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;

    fn client() -> EspnClient {
        EspnClient::new(&Config::parse_from(["sportsboard"])).unwrap()
    }

    #[test]
    fn test_ahead_range_spans_lookahead() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        // Default lookahead is 30 days; 2026 is not a leap year
        assert_eq!(client().ahead_range(now), "20260201-20260303");
    }

    #[test]
    fn test_ahead_range_crosses_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 12, 20, 0, 0, 0).unwrap();
        assert_eq!(client().ahead_range(now), "20261220-20270119");
    }
}
