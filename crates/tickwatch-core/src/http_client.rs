use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

/// HTTP request envelope used by source transport calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: 3_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response envelope returned by a source transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level failure, classified so the adapter can tell transient
/// network trouble from everything else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("connection failed: {detail}")]
    Connect { detail: String },
    #[error("transport failure: {detail}")]
    Transport { detail: String },
}

impl HttpError {
    /// Timeouts and refused connections may clear on a later attempt.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connect { .. })
    }
}

/// Transport contract for source adapters.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Offline transport. Every request succeeds with an empty JSON object, which
/// the daily-series parser reports as no data rather than a network failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpClient;

impl HttpClient for NoopHttpClient {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async { Ok(HttpResponse::ok_json("{}")) })
    }
}

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Live transport backed by reqwest. Per-request timeouts come from the
/// `HttpRequest`; the connect timeout is fixed.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tickwatch/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let sent = self
                .client
                .get(&request.url)
                .timeout(Duration::from_millis(request.timeout_ms))
                .send()
                .await;

            let response = match sent {
                Ok(response) => response,
                Err(error) if error.is_timeout() => {
                    return Err(HttpError::Timeout {
                        timeout_ms: request.timeout_ms,
                    })
                }
                Err(error) if error.is_connect() => {
                    return Err(HttpError::Connect {
                        detail: error.to_string(),
                    })
                }
                Err(error) => {
                    return Err(HttpError::Transport {
                        detail: error.to_string(),
                    })
                }
            };

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|error| HttpError::Transport {
                detail: format!("body read failed: {error}"),
            })?;

            Ok(HttpResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_defaults_to_a_three_second_timeout() {
        let request = HttpRequest::get("https://example.test/query");
        assert_eq!(request.timeout_ms, 3_000);

        let slow = request.with_timeout_ms(5_000);
        assert_eq!(slow.timeout_ms, 5_000);
    }

    #[test]
    fn only_network_level_failures_are_retryable() {
        assert!(HttpError::Timeout { timeout_ms: 3_000 }.retryable());
        assert!(HttpError::Connect {
            detail: String::from("refused")
        }
        .retryable());
        assert!(!HttpError::Transport {
            detail: String::from("bad body")
        }
        .retryable());
    }

    #[tokio::test]
    async fn noop_client_answers_with_an_empty_object() {
        let response = NoopHttpClient
            .execute(HttpRequest::get("https://example.test/query"))
            .await
            .expect("offline transport never fails");

        assert!(response.is_success());
        assert_eq!(response.body, "{}");
    }
}
