//! Buffered responses.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{NetworkError, Result};

/// A response whose body has been read in full.
pub struct HttpResponse {
    status: http::StatusCode,
    headers: http::HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// The status code.
    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the status is 5xx.
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// The response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Decode the body as JSON. Malformed bodies are [`NetworkError::Json`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-2xx response into [`NetworkError::HttpStatus`], carrying the
    /// trimmed body text as the message.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let text = String::from_utf8_lossy(&self.body);
        let message = Some(text.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        Err(NetworkError::HttpStatus {
            status: self.status(),
            message,
        })
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("body_len", &self.body.len())
            .finish()
    }
}
