//! HTTP client used by the SharePoint backend.
//!
//! Only what the folder lister needs: authenticated GETs with buffered
//! bodies. [`HttpClient`] wraps a configured `reqwest` client and
//! [`RestApiClient`] binds it to a site URL with default headers, retry and
//! request interceptors.
//!
//! # Example
//!
//! ```ignore
//! use folder_picker_net::http::{RestApiClient, RetryConfig};
//!
//! let client = RestApiClient::builder("https://contoso.sharepoint.com/sites/a")
//!     .bearer_auth(token)
//!     .retry(RetryConfig::none())
//!     .build()?;
//!
//! let response = client.get("/_api/web/folders").send().await?;
//! println!("Status: {}", response.status());
//! ```

mod client;
mod request;
mod response;
mod rest_api;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{Authentication, HttpRequest};
pub use response::HttpResponse;
pub use rest_api::{
    RateLimitInfo, RequestInterceptor, RestApiClient, RestApiClientBuilder, RestApiRequestBuilder,
    RetryConfig,
};
