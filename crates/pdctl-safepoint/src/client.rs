//! HTTP access to the coordinator's control API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};

use crate::Config;
use crate::error::DispatchError;

/// Performs a single request against the coordinator.
///
/// `path` is relative to the coordinator endpoint and has no leading `/`.
/// Implementations return the response body on a 2xx status and an error
/// otherwise; an empty body is a successful result.
#[async_trait]
pub trait RequestDispatcher: Send + Sync {
    /// Sends `method` to `path` with the given headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails or the status is not a success.
    async fn do_request(
        &self,
        path: &str,
        method: Method,
        headers: HeaderMap,
    ) -> std::result::Result<String, DispatchError>;
}

/// [`RequestDispatcher`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
    base_url: String,
}

impl HttpDispatcher {
    /// Creates a dispatcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.pd_addr.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the coordinator endpoint without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl RequestDispatcher for HttpDispatcher {
    async fn do_request(
        &self,
        path: &str,
        method: Method,
        headers: HeaderMap,
    ) -> std::result::Result<String, DispatchError> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "sending request");

        let response = self
            .client
            .request(method, &url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| DispatchError::Transport {
                message: error_chain(e),
            })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(|e| DispatchError::Body {
            message: error_chain(e),
        })
    }
}

/// Renders `err` with its whole source chain, e.g. `error sending request: ... Connection refused`.
fn error_chain(err: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::from(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pd_addr: &str) -> Config {
        Config {
            pd_addr: pd_addr.to_string(),
            timeout_secs: 5,
            ..Config::default()
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let dispatcher = HttpDispatcher::new(&config("http://127.0.0.1:2379/")).expect("client");
        assert_eq!(dispatcher.base_url(), "http://127.0.0.1:2379");
        assert_eq!(
            dispatcher.url("pd/api/v1/gc/safepoint"),
            "http://127.0.0.1:2379/pd/api/v1/gc/safepoint"
        );
    }

    #[test]
    fn test_leading_slash_in_path_is_tolerated() {
        let dispatcher = HttpDispatcher::new(&config("http://pd:2379")).expect("client");
        assert_eq!(
            dispatcher.url("/pd/api/v1/gc/safepoint"),
            "http://pd:2379/pd/api/v1/gc/safepoint"
        );
    }
}
