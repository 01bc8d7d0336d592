//! The pooled `reqwest` client.

use std::sync::Arc;
use std::time::Duration;

use super::request::{Authentication, HttpRequest};
use super::response::HttpResponse;
use crate::error::Result;

/// Connection settings for [`HttpClient`].
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Whole-request timeout.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Keep a cookie store between requests.
    pub cookies_enabled: bool,
    /// `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            cookies_enabled: true,
            user_agent: Some(format!("FolderPicker/{} (Rust)", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Start from the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Drop the cookie store.
    pub fn no_cookies(mut self) -> Self {
        self.config.cookies_enabled = false;
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = reqwest::Client::builder().cookie_store(self.config.cookies_enabled);
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = &self.config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(HttpClient {
            inner: Arc::new(HttpClientInner {
                client: builder.build()?,
                config: self.config,
            }),
        })
    }
}

struct HttpClientInner {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// A configured HTTP client. Clones share one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

impl HttpClient {
    /// A client with default settings.
    pub fn new() -> Result<Self> {
        HttpClientBuilder::new().build()
    }

    /// Start configuring a client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// The settings the client was built with.
    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    /// Send `request` and buffer the response.
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = url::Url::parse(&request.url)?;
        tracing::trace!(target: "folder_picker_net::http", %url, "GET");

        let mut builder = self.inner.client.get(url).headers(request.headers.clone());
        builder = match &request.auth {
            Some(Authentication::Bearer(token)) => builder.bearer_auth(token),
            Some(Authentication::Basic { username, password }) => {
                builder.basic_auth(username, password.as_deref())
            }
            None => builder,
        };
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        HttpResponse::read(builder.send().await?).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
