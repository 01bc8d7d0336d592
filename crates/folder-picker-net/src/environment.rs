//! Backend selection for the hosting environment.
//!
//! A picker running in a local workbench has no SharePoint web to talk to
//! and is served by [`MockFolderLister`]; inside SharePoint it uses
//! [`SpFolderLister`]. [`lister_for_environment`] makes that choice from a
//! [`SiteConfig`], which can be loaded from TOML:
//!
//! ```toml
//! environment = "sharepoint"
//! site_url = "https://contoso.sharepoint.com/sites/a"
//! access_token = "eyJ0eXAi..."
//! timeout_secs = 20
//!
//! [retry]
//! max_retries = 2
//! ```

use std::sync::Arc;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use folder_picker_core::{FolderLister, MockFolderLister};

use crate::error::{NetworkError, Result};
use crate::http::{HttpClient, RestApiClient, RetryConfig};
use crate::sharepoint::{ODATA_NOMETADATA, SpFolderLister};

/// Where the picker is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentType {
    /// Local workbench; folders come from the mock backend.
    #[default]
    Local,
    /// A SharePoint site.
    SharePoint,
}

/// Connection settings for the folder backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Hosting environment.
    pub environment: EnvironmentType,
    /// Absolute URL of the SharePoint web.
    pub site_url: String,
    /// Bearer token sent with every request.
    pub access_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry behavior for throttled and failed requests.
    pub retry: RetryConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentType::Local,
            site_url: String::new(),
            access_token: None,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Settings for the local workbench.
    pub fn local() -> Self {
        Self::default()
    }

    /// Settings for the SharePoint web at `site_url`.
    pub fn sharepoint(site_url: impl Into<String>) -> Self {
        Self {
            environment: EnvironmentType::SharePoint,
            site_url: site_url.into(),
            ..Self::default()
        }
    }

    /// Set the bearer token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Set the retry behavior.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Parse settings from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that a SharePoint configuration names an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.environment == EnvironmentType::Local {
            return Ok(());
        }
        let url = url::Url::parse(&self.site_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NetworkError::InvalidUrl(format!(
                "unsupported scheme '{}' in site_url",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// The server-relative URL of the web, `""` for a root site.
    ///
    /// The path is percent-decoded to match the `ServerRelativeUrl` values
    /// SharePoint returns. Pass this to the picker's
    /// `web_server_relative_url` setting.
    pub fn web_server_relative_url(&self) -> Result<String> {
        let url = url::Url::parse(&self.site_url)?;
        let path = percent_decode_str(url.path())
            .decode_utf8()
            .map_err(|err| NetworkError::InvalidUrl(format!("site_url path is not UTF-8: {err}")))?;
        Ok(path.trim_end_matches('/').to_string())
    }

    /// Build the REST client these settings describe.
    pub fn rest_client(&self) -> Result<RestApiClient> {
        self.validate()?;
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(self.timeout_secs.max(1)))
            .build()?;

        let mut builder = RestApiClient::builder(&self.site_url)
            .http_client(http)
            .accept(ODATA_NOMETADATA)
            .retry(self.retry.clone());
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        builder.build()
    }
}

/// Choose the folder backend for `config`.
pub fn lister_for_environment(config: &SiteConfig) -> Result<Arc<dyn FolderLister>> {
    match config.environment {
        EnvironmentType::Local => {
            tracing::debug!(target: "folder_picker_net::sharepoint", "using mock folder lister");
            Ok(Arc::new(MockFolderLister::new()))
        }
        EnvironmentType::SharePoint => {
            tracing::debug!(target: "folder_picker_net::sharepoint", site_url = %config.site_url, "using SharePoint folder lister");
            Ok(Arc::new(SpFolderLister::with_client(config.rest_client()?)))
        }
    }
}
