//! Solcast rooftop forecast API client
//!
//! Fetches `{base_url}/rooftop_sites/{site_id}/forecasts?format=json` with a
//! bearer token. DNS resolution failures are retried a bounded number of
//! times with doubling delays; every other failure is returned at once.

use std::error::Error as StdError;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::ForecastDocument;
use crate::config::Config;

/// Errors that can occur when fetching a forecast
#[derive(Debug, Error)]
pub enum SolcastError {
    /// Site id or API key not configured; no request was made
    #[error("Set SOLCAST_SITE_ID and SOLCAST_API_KEY in the environment.")]
    MissingCredentials,

    /// Host name could not be resolved, even after retrying
    #[error("DNS lookup failed after {attempts} attempts: {source}")]
    DnsResolution {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// Connection, timeout or body read failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Response body was not a forecast document
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Anything that can produce a fresh forecast document
///
/// The cache policy is written against this trait so it can be exercised
/// without a network.
#[allow(async_fn_in_trait)]
pub trait ForecastSource {
    async fn fetch_forecast(&self) -> Result<ForecastDocument, SolcastError>;
}

/// Client for the Solcast rooftop sites API
#[derive(Debug, Clone)]
pub struct SolcastClient {
    client: Client,
    base_url: String,
    site_id: String,
    api_key: String,
    has_credentials: bool,
    dns_retries: u32,
    retry_base_delay: Duration,
}

impl SolcastClient {
    /// Creates a client from the fetch-related parts of `config`
    pub fn new(config: &Config) -> Result<Self, SolcastError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(SolcastError::ClientBuild)?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a client around an existing HTTP client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            site_id: config.site_id.clone(),
            api_key: config.api_key.clone(),
            has_credentials: config.has_credentials(),
            dns_retries: config.dns_retries,
            retry_base_delay: config.retry_base_delay,
        }
    }

    /// URL of the forecast endpoint for the configured site
    pub fn forecast_url(&self) -> String {
        format!(
            "{}/rooftop_sites/{}/forecasts?format=json",
            self.base_url, self.site_id
        )
    }

    /// Fetches the forecast, retrying DNS failures
    ///
    /// # Returns
    /// * `Ok(ForecastDocument)` - The parsed response body
    /// * `Err(SolcastError::MissingCredentials)` - Without touching the network
    /// * `Err(SolcastError)` - Any other failure, after retries where allowed
    pub async fn fetch(&self) -> Result<ForecastDocument, SolcastError> {
        if !self.has_credentials {
            return Err(SolcastError::MissingCredentials);
        }

        let url = self.forecast_url();
        let mut retries = 0;
        let mut delay = self.retry_base_delay;

        let result = loop {
            match self.request(&url).await {
                Err(SolcastError::Request(e)) if is_dns_failure(&e) => {
                    if retries >= self.dns_retries {
                        break Err(SolcastError::DnsResolution {
                            attempts: retries + 1,
                            source: e,
                        });
                    }
                    debug!(retry = retries + 1, delay_ms = delay.as_millis() as u64, "DNS lookup failed, backing off");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    retries += 1;
                }
                other => break other,
            }
        };

        if retries > 0 {
            eprintln!("{}", dns_retry_status(retries));
        }

        result
    }

    /// Performs a single request and decodes the body
    async fn request(&self, url: &str) -> Result<ForecastDocument, SolcastError> {
        debug!(url = %url, "requesting Solcast forecast");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Solcast API returned an error status");
            return Err(SolcastError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let text = response.text().await?;
        let document: ForecastDocument = serde_json::from_str(&text)?;
        debug!(intervals = document.forecasts.len(), "received forecast");

        Ok(document)
    }
}

impl ForecastSource for SolcastClient {
    async fn fetch_forecast(&self) -> Result<ForecastDocument, SolcastError> {
        self.fetch().await
    }
}

/// The status line printed once a DNS retry sequence has finished
///
/// One `retrying` per retry attempt, e.g.
/// `DNS lookup failed, retrying retrying retrying`.
pub fn dns_retry_status(retries: u32) -> String {
    let mut status = String::from("DNS lookup failed,");
    for _ in 0..retries {
        status.push_str(" retrying");
    }
    status
}

/// Whether a request error was caused by host name resolution
fn is_dns_failure(err: &reqwest::Error) -> bool {
    if !err.is_connect() {
        return false;
    }

    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        let message = cause.to_string().to_ascii_lowercase();
        if message.contains("dns error")
            || message.contains("failed to lookup address")
            || message.contains("name or service not known")
        {
            return true;
        }
        source = cause.source();
    }
    false
}
