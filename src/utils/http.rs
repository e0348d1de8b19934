// src/utils/http.rs
use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::input::Header;
use crate::error::{ParamCrawlError, ParamCrawlResult};
use crate::probe::{Fetch, FetchedPage};

/// HTTP client shared by every prober in a run
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a new HTTP client. Every request it sends is bounded by
    /// `timeout_secs`; zero leaves requests unbounded.
    pub fn new(user_agent: Option<String>, timeout_secs: u64) -> ParamCrawlResult<Self> {
        let user_agent = user_agent.unwrap_or_else(|| format!("paramcrawl/{}", env!("CARGO_PKG_VERSION")));
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let mut builder = Client::builder().user_agent(&user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ParamCrawlError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, user_agent, timeout })
    }

    /// Get the user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Per-request timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn map_send_error(&self, url: &str, error: reqwest::Error) -> ParamCrawlError {
        if error.is_timeout() {
            ParamCrawlError::TimeoutError {
                operation: format!("GET {}", url),
                seconds: self.timeout.map_or(0, |t| t.as_secs()),
            }
        } else {
            ParamCrawlError::NetworkError(format!("Failed to GET {}: {}", url, error))
        }
    }
}

/// `200 OK` style status line
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &str, headers: &[Header]) -> ParamCrawlResult<FetchedPage> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        for header in headers {
            request = request.header(header.name.as_str(), header.value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        let status_line = status_line(response.status());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.map_send_error(url, e)
                } else {
                    ParamCrawlError::ReadError(format!("Failed to read body of {}: {}", url, e))
                }
            })?;

        debug!("{} answered {} with {} bytes", url, status_line, bytes.len());

        Ok(FetchedPage {
            status_line,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
