//! Outgoing requests.

use std::time::Duration;

/// Credentials attached to a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication {
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// HTTP Basic.
    Basic {
        /// Account name.
        username: String,
        /// Password, if any.
        password: Option<String>,
    },
}

/// A GET request ready to be sent.
///
/// `url` is parsed but otherwise sent as written, so OData `$` options in
/// the query string reach the server unencoded.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// Absolute URL including the query string.
    pub url: String,
    /// Headers sent with the request.
    pub headers: http::HeaderMap,
    /// Per-request timeout, overriding the client's.
    pub timeout: Option<Duration>,
    /// Credentials.
    pub auth: Option<Authentication>,
}

impl HttpRequest {
    /// A GET for `url` with no headers or credentials.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: http::HeaderMap::new(),
            timeout: None,
            auth: None,
        }
    }
}
