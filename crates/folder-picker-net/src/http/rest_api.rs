//! Site-bound REST client with authentication, throttling and retry.
//!
//! [`RestApiClient`] joins request paths onto a site URL, attaches default
//! headers and credentials, runs request interceptors and retries transient
//! failures with exponential backoff.
//!
//! # Example
//!
//! ```ignore
//! use folder_picker_net::http::RestApiClient;
//!
//! let client = RestApiClient::builder("https://contoso.sharepoint.com/sites/a")
//!     .bearer_auth("my-token")
//!     .accept("application/json;odata=nometadata")
//!     .build()?;
//!
//! let response = client.get("/_api/web/folders").send().await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::client::HttpClient;
use super::request::{Authentication, HttpRequest};
use super::response::HttpResponse;
use crate::error::{NetworkError, Result};

/// Retry behavior for transient failures.
///
/// Connection errors, timeouts, `429`, `503` and other 5xx responses are
/// retried. A `Retry-After` on a throttled response replaces the backoff
/// delay, capped at `max_delay_ms`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// First backoff delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound for any wait, in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor between backoff delays.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Never retry.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.backoff_multiplier).min(self.max_delay())
    }

    fn cap(&self, wait: Duration) -> Duration {
        wait.min(self.max_delay())
    }
}

/// Throttling hints read from response headers.
///
/// SharePoint sends `Retry-After` with `429` and `503`; the `X-RateLimit-*`
/// and `RateLimit-*` families are read when present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed in the current window.
    pub limit: Option<u64>,
    /// Requests left in the current window.
    pub remaining: Option<u64>,
    /// Server-requested wait, as sent.
    pub retry_after: Option<Duration>,
}

impl RateLimitInfo {
    /// Read the hints of a response.
    pub fn from_response(response: &HttpResponse) -> Self {
        Self::from_headers(response.headers())
    }

    /// Read the hints from a header map. Only seconds-valued `Retry-After`
    /// is understood.
    pub fn from_headers(headers: &http::HeaderMap) -> Self {
        let number = |names: &[&str]| {
            names.iter().find_map(|name| {
                headers
                    .get(*name)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse::<u64>().ok())
            })
        };

        Self {
            limit: number(&["X-RateLimit-Limit", "RateLimit-Limit"]),
            remaining: number(&["X-RateLimit-Remaining", "RateLimit-Remaining"]),
            retry_after: number(&["Retry-After"]).map(Duration::from_secs),
        }
    }

    /// Whether the server asked the client to back off.
    pub fn is_rate_limited(&self) -> bool {
        self.remaining == Some(0) || self.retry_after.is_some()
    }
}

/// Hook run on every request just before it is sent.
pub type RequestInterceptor = Arc<dyn Fn(&mut HttpRequest) + Send + Sync>;

/// Builder for [`RestApiClient`].
pub struct RestApiClientBuilder {
    base_url: String,
    http_client: Option<HttpClient>,
    default_headers: http::HeaderMap,
    auth: Option<Authentication>,
    retry_config: RetryConfig,
    interceptors: Vec<RequestInterceptor>,
}

impl RestApiClientBuilder {
    /// Start a client for the site at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: None,
            default_headers: http::HeaderMap::new(),
            auth: None,
            retry_config: RetryConfig::default(),
            interceptors: Vec::new(),
        }
    }

    /// Send through an existing HTTP client.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Send `name: value` with every request. Invalid pairs are ignored
    /// with a warning.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        match (name.try_into(), value.try_into()) {
            (Ok(name), Ok(value)) => {
                self.default_headers.insert(name, value);
            }
            _ => tracing::warn!(target: "folder_picker_net::http", "ignoring invalid default header"),
        }
        self
    }

    /// Set the `Accept` header.
    pub fn accept(self, media_type: &str) -> Self {
        self.default_header(http::header::ACCEPT, media_type)
    }

    /// Authenticate with a bearer token.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Authentication::Bearer(token.into()));
        self
    }

    /// Authenticate with HTTP Basic.
    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.auth = Some(Authentication::Basic {
            username: username.into(),
            password,
        });
        self
    }

    /// Set the retry behavior.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Disable retries.
    pub fn no_retry(self) -> Self {
        self.retry(RetryConfig::none())
    }

    /// Run `interceptor` on every request, in registration order, after
    /// headers and credentials are applied.
    pub fn add_request_interceptor<F>(mut self, interceptor: F) -> Self
    where
        F: Fn(&mut HttpRequest) + Send + Sync + 'static,
    {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Build the client. Fails if the base URL is not absolute.
    pub fn build(self) -> Result<RestApiClient> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => HttpClient::new()?,
        };

        Ok(RestApiClient {
            inner: Arc::new(RestApiClientInner {
                http_client,
                base_url,
                default_headers: self.default_headers,
                auth: self.auth,
                retry_config: self.retry_config,
                interceptors: self.interceptors,
                last_rate_limit: Mutex::new(None),
            }),
        })
    }
}

struct RestApiClientInner {
    http_client: HttpClient,
    base_url: String,
    default_headers: http::HeaderMap,
    auth: Option<Authentication>,
    retry_config: RetryConfig,
    interceptors: Vec<RequestInterceptor>,
    last_rate_limit: Mutex<Option<RateLimitInfo>>,
}

/// A REST client bound to a site URL. Clones share configuration and pool.
#[derive(Clone)]
pub struct RestApiClient {
    inner: Arc<RestApiClientInner>,
}

impl RestApiClient {
    /// Start configuring a client for `base_url`.
    pub fn builder(base_url: impl Into<String>) -> RestApiClientBuilder {
        RestApiClientBuilder::new(base_url)
    }

    /// The site URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The underlying HTTP client.
    pub fn http_client(&self) -> &HttpClient {
        &self.inner.http_client
    }

    /// The retry behavior.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry_config
    }

    /// Hints from the most recent throttled response.
    pub fn last_rate_limit(&self) -> Option<RateLimitInfo> {
        self.inner.last_rate_limit.lock().clone()
    }

    /// A GET for `path` below the site URL. `path` may carry its own query
    /// string.
    pub fn get(&self, path: &str) -> RestApiRequestBuilder {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut request = HttpRequest::get(format!("{}{separator}{path}", self.inner.base_url));
        request.headers = self.inner.default_headers.clone();
        request.auth = self.inner.auth.clone();

        RestApiRequestBuilder {
            client: self.clone(),
            request,
        }
    }

    async fn send_with_retry(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let retry = &self.inner.retry_config;
        let mut backoff = Duration::from_millis(retry.initial_delay_ms);
        let mut attempt = 0;

        loop {
            let outcome = self.inner.http_client.execute(request).await;
            let wait = match &outcome {
                Ok(response) => self.retry_wait(response, backoff),
                Err(NetworkError::Connection(_) | NetworkError::Timeout) => Some(backoff),
                Err(_) => None,
            };

            match wait {
                Some(wait) if attempt < retry.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        target: "folder_picker_net::http",
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "retrying request"
                    );
                    tokio::time::sleep(wait).await;
                    backoff = retry.next_delay(backoff);
                }
                _ => return outcome,
            }
        }
    }

    /// The wait before retrying `response`, or `None` when it is final.
    fn retry_wait(&self, response: &HttpResponse, backoff: Duration) -> Option<Duration> {
        let status = response.status();
        if status == 429 || status == 503 {
            let info = RateLimitInfo::from_response(response);
            tracing::warn!(
                target: "folder_picker_net::http",
                status,
                retry_after = ?info.retry_after,
                "request throttled"
            );
            let wait = info
                .retry_after
                .map_or(backoff, |after| self.inner.retry_config.cap(after));
            *self.inner.last_rate_limit.lock() = Some(info);
            Some(wait)
        } else if response.is_server_error() {
            Some(backoff)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for RestApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApiClient")
            .field("base_url", &self.inner.base_url)
            .field("has_auth", &self.inner.auth.is_some())
            .field("retry", &self.inner.retry_config)
            .finish()
    }
}

/// A GET being prepared on a [`RestApiClient`].
pub struct RestApiRequestBuilder {
    client: RestApiClient,
    request: HttpRequest,
}

impl RestApiRequestBuilder {
    /// Add a header. Invalid pairs are ignored.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.request.headers.insert(name, value);
        }
        self
    }

    /// Use this bearer token instead of the client's credentials.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.request.auth = Some(Authentication::Bearer(token.into()));
        self
    }

    /// Override the client's timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// The request as it would be sent, before interceptors run.
    pub fn build(self) -> HttpRequest {
        self.request
    }

    /// Run the interceptors and send, retrying transient failures.
    pub async fn send(self) -> Result<HttpResponse> {
        let Self {
            client,
            mut request,
        } = self;
        for interceptor in &client.inner.interceptors {
            interceptor(&mut request);
        }
        client.send_with_retry(&request).await
    }

    /// Send and decode a JSON body. Non-2xx statuses are
    /// [`NetworkError::HttpStatus`].
    pub async fn json_response<T: DeserializeOwned>(self) -> Result<T> {
        self.send().await?.error_for_status()?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_to_cap() {
        let retry = RetryConfig {
            initial_delay_ms: 100,
            max_delay_ms: 350,
            ..RetryConfig::default()
        };
        let second = retry.next_delay(Duration::from_millis(100));
        assert_eq!(second, Duration::from_millis(200));
        assert_eq!(retry.next_delay(second), Duration::from_millis(350));
    }

    #[test]
    fn test_retry_after_is_capped() {
        let retry = RetryConfig {
            max_delay_ms: 5_000,
            ..RetryConfig::default()
        };
        assert_eq!(retry.cap(Duration::from_secs(3600)), Duration::from_secs(5));
        assert_eq!(retry.cap(Duration::from_secs(2)), Duration::from_secs(2));
    }

    #[test]
    fn test_retry_config_from_partial_toml() {
        let retry: RetryConfig = toml::from_str("max_retries = 1").unwrap();
        assert_eq!(retry.max_retries, 1);
        assert_eq!(retry.max_delay_ms, 30000);
    }
}
