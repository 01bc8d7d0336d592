//! Folder lister backed by the SharePoint REST API.

use futures_util::FutureExt;
use serde::Deserialize;

use folder_picker_core::{Folder, FolderLister, FolderPage, ListFuture, PageWindow, TransportError};

use super::query::FolderQuery;
use crate::error::Result;
use crate::http::RestApiClient;

/// Media type asking SharePoint for a bare `{"value": [...]}` payload.
pub const ODATA_NOMETADATA: &str = "application/json;odata=nometadata";

/// Response body of the folders endpoint.
#[derive(Debug, Deserialize)]
struct FolderCollection {
    value: Vec<Folder>,
}

/// Lists folders of a SharePoint web through `/_api/web`.
///
/// A missing folder (HTTP 404) yields an empty page. Every other failure is
/// reported as a [`TransportError`].
#[derive(Debug, Clone)]
pub struct SpFolderLister {
    client: RestApiClient,
}

impl SpFolderLister {
    /// Create a lister for the web at `site_url`, e.g.
    /// `https://contoso.sharepoint.com/sites/a`.
    pub fn new(site_url: &str) -> Result<Self> {
        let client = RestApiClient::builder(site_url)
            .accept(ODATA_NOMETADATA)
            .build()?;
        Ok(Self { client })
    }

    /// Create a lister on top of a configured REST client.
    ///
    /// The client should send `Accept: application/json;odata=nometadata`.
    pub fn with_client(client: RestApiClient) -> Self {
        Self { client }
    }

    /// The underlying REST client.
    pub fn client(&self) -> &RestApiClient {
        &self.client
    }

    /// Fetch one page of child folders.
    pub async fn fetch_page(&self, parent_path: &str, window: PageWindow) -> Result<FolderPage> {
        let query = FolderQuery::new(parent_path, window);
        let response = self.client.get(&query.to_path()).send().await?;

        if response.status() == 404 {
            tracing::debug!(
                target: "folder_picker_net::sharepoint",
                parent_path,
                "folder not found, returning empty page"
            );
            return Ok(FolderPage::new());
        }

        let collection: FolderCollection = response.error_for_status()?.json()?;

        tracing::debug!(
            target: "folder_picker_net::sharepoint",
            parent_path,
            page = window.index,
            count = collection.value.len(),
            "listed folders"
        );
        Ok(collection.value)
    }
}

impl FolderLister for SpFolderLister {
    fn list<'a>(&'a self, parent_path: &'a str, window: PageWindow) -> ListFuture<'a> {
        async move {
            self.fetch_page(parent_path, window).await.map_err(|err| {
                tracing::warn!(target: "folder_picker_net::sharepoint", parent_path, error = %err, "folder listing failed");
                TransportError::from(err)
            })
        }
        .boxed()
    }
}
